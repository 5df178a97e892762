//! Filter Types
//!
//! Value objects describing what the table should show.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::logic::transactions::ScoredTransaction;

// ============================================================================
// RANGES
// ============================================================================

#[derive(Deserialize)]
struct RawAmountRange {
    min: f64,
    max: f64,
}

impl From<RawAmountRange> for AmountRange {
    fn from(raw: RawAmountRange) -> Self {
        AmountRange::new(raw.min, raw.max)
    }
}

/// Inclusive amount bounds. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAmountRange")]
pub struct AmountRange {
    min: f64,
    max: f64,
}

impl AmountRange {
    /// Inverted bounds are swapped
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Move the lower bound; drags `max` up if it would invert
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = min;
        if self.max < min {
            self.max = min;
        }
        self
    }

    /// Move the upper bound; drags `min` down if it would invert
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = max;
        if self.min > max {
            self.min = max;
        }
        self
    }

    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

#[derive(Deserialize)]
struct RawDateRange {
    #[serde(default)]
    from: Option<NaiveDate>,
    #[serde(default)]
    to: Option<NaiveDate>,
}

impl From<RawDateRange> for DateRange {
    fn from(raw: RawDateRange) -> Self {
        let mut range = DateRange::default();
        if let Some(from) = raw.from {
            range.set_from(from);
        }
        if let Some(to) = raw.to {
            range.set_to(to);
        }
        range
    }
}

/// Calendar-day bounds, both inclusive. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDateRange")]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        RawDateRange { from, to }.into()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Picking a start after the current end moves the end to the same day
    pub fn set_from(&mut self, from: NaiveDate) {
        self.from = Some(from);
        if matches!(self.to, Some(to) if to < from) {
            self.to = Some(from);
        }
    }

    /// Picking an end before the current start moves the start to the same day
    pub fn set_to(&mut self, to: NaiveDate) {
        self.to = Some(to);
        if matches!(self.from, Some(from) if from > to) {
            self.from = Some(to);
        }
    }

    pub fn clear_from(&mut self) {
        self.from = None;
    }

    pub fn clear_to(&mut self) {
        self.to = None;
    }
}

// ============================================================================
// SORTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Score,
    Amount,
    Timestamp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

// ============================================================================
// FILTER SPEC
// ============================================================================

/// Everything the user picked in the filter bar. Empty means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Free-text query over user id, merchant and country
    pub search: Option<String>,
    pub amount: Option<AmountRange>,
    pub countries: BTreeSet<String>,
    pub merchants: BTreeSet<String>,
    pub fraud_only: bool,
    pub dates: DateRange,
    pub sort: Option<SortSpec>,
}

impl FilterSpec {
    /// Non-blank, trimmed search text
    pub fn query(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.query().is_none()
            && self.amount.is_none()
            && self.countries.is_empty()
            && self.merchants.is_empty()
            && !self.fraud_only
            && self.dates.is_open()
    }
}

// ============================================================================
// RESULT
// ============================================================================

/// One page of the filtered list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteredPage {
    pub page_items: Vec<ScoredTransaction>,
    pub total_matching: usize,
    /// 1-based page that was sliced
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
}
