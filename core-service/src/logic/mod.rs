//! Logic Module - Business Logic & Engines
//!
//! - `transactions/` - Wire types shared by every engine
//! - `filter/` - Filter, sort, paginate, chart aggregates
//! - `refresh/` - Refresh controller, view state, background loop
//! - `mock/` - Synthetic data for offline mode
//! - `explain/` - Per-transaction feature contributions
//! - `backend/` - HTTP client for the scoring service

pub mod backend;
pub mod config;
pub mod events;
pub mod explain;
pub mod filter;
pub mod mock;
pub mod refresh;
pub mod transactions;
