//! Mock Module - offline fallback data

pub mod generator;

pub use generator::{generate, synthesize_summary};
