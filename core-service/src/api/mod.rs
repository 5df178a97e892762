//! API Module
//!
//! Frontend-facing surface of the dashboard core.
//!
//! Usage:
//! - `api::Dashboard::new(config, sink)` then `mount().await`
//! - read views with `current_page()`, `charts()`, `summary()`
//! - drive it from text with `api::ConsoleCommand::parse`
//! - `unmount().await` before dropping

pub mod commands;
pub mod console;

#[cfg(test)]
mod tests;

pub use commands::*;
pub use console::{ConsoleCommand, HELP};
