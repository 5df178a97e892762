//! Refresh Module - Refresh Controller
//!
//! This module handles:
//! - Foreground and background (silent) reloads of the transaction list
//! - New high-risk detection between consecutive snapshots
//! - Offline fallback to synthetic data
//! - The periodic refresh loop

pub mod controller;
pub mod scheduler;
pub mod state;


pub use controller::{RefreshController, RefreshOutcome};
pub use scheduler::RefreshLoop;
pub use state::{DashboardState, SharedState};
