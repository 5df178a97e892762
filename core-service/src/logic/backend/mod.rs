//! Backend Module - Dashboard to fraud-scoring API communication
//!
//! This module handles:
//! - Transaction list queries
//! - Summary counts
//! - Per-transaction explanations
//! - Health probe

pub mod client;

pub use client::{ApiConfig, ApiError, FraudApiClient};
