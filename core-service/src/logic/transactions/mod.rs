//! Transactions Module - Core data model
//!
//! Transaction records as returned by the scoring backend (or synthesized
//! offline). No logic here - only data structures and wire tolerance.

pub mod types;

#[cfg(test)]
mod tests;

pub use types::{Device, FraudSplit, HourCount, MerchantCount, ScoredTransaction, Summary, Transaction};
