//! Fraud Dashboard Core
//!
//! Fetches scored transactions from the fraud backend, filters and pages them
//! in memory, derives chart data, and explains individual scores. The
//! `api::Dashboard` façade is the entry point for any frontend.

pub mod api;
pub mod constants;
pub mod logic;
