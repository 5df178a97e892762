//! Transaction Types
//!
//! The backend is loose about a few fields (numeric user ids, 0/1 labels),
//! so deserialization accepts both forms and normalizes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// TRANSACTION
// ============================================================================

/// Device the payment was made from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Mobile,
    Desktop,
    Tablet,
    /// Any value the dashboard does not know about
    #[serde(other)]
    Other,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Mobile => "mobile",
            Device::Desktop => "desktop",
            Device::Tablet => "tablet",
            Device::Other => "other",
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single payment, immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "string_or_number")]
    pub transaction_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    pub amount: f64,
    pub country: String,
    #[serde(default)]
    pub device: Option<Device>,
    pub merchant: String,
    pub timestamp: DateTime<Utc>,
}

/// Transaction plus the model's verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTransaction {
    pub tx: Transaction,
    /// Fraud probability in [0, 1]
    pub score: f64,
    /// Classification decision; not tied to `score` by any threshold
    #[serde(deserialize_with = "bool_or_int")]
    pub label: bool,
}

impl ScoredTransaction {
    pub fn id(&self) -> &str {
        &self.tx.transaction_id
    }

    /// Fraud-labelled with a score strictly above `threshold`
    pub fn is_high_risk(&self, threshold: f64) -> bool {
        self.label && self.score > threshold
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

/// Fraud vs legitimate counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudSplit {
    pub fraud: usize,
    pub nonfraud: usize,
}

impl FraudSplit {
    pub fn total(&self) -> usize {
        self.fraud + self.nonfraud
    }

    pub fn fraud_percentage(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.fraud as f64 / total as f64 * 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantCount {
    pub merchant: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

/// Aggregate counts, fetched from `/transactions/summary` or synthesized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub fraud_vs_nonfraud: FraudSplit,
    pub total_transactions: usize,
    #[serde(default)]
    pub fraud_percentage: Option<f64>,
    #[serde(default)]
    pub top_5_fraud_merchants: Vec<MerchantCount>,
    #[serde(default)]
    pub frauds_per_hour: Vec<HourCount>,
}

impl Summary {
    pub fn from_split(split: FraudSplit) -> Self {
        Self {
            fraud_vs_nonfraud: split,
            total_transactions: split.total(),
            fraud_percentage: Some(split.fraud_percentage()),
            top_5_fraud_merchants: Vec::new(),
            frauds_per_hour: Vec::new(),
        }
    }

    /// Percentage as reported, or derived from the counts when the backend omits it
    pub fn fraud_percentage(&self) -> f64 {
        self.fraud_percentage
            .unwrap_or_else(|| self.fraud_vs_nonfraud.fraud_percentage())
    }
}

// ============================================================================
// WIRE HELPERS
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrInt {
    Bool(bool),
    Int(i64),
}

fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match BoolOrInt::deserialize(deserializer)? {
        BoolOrInt::Bool(b) => b,
        BoolOrInt::Int(n) => n != 0,
    })
}
