//! Chart Aggregates
//!
//! Pure reductions over a transaction list (filtered or not). Accepts owned
//! records or references, so the engine's `Vec<&ScoredTransaction>` feeds in
//! without cloning.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};

use chrono::{Local, TimeZone, Timelike};
use serde::Serialize;

use crate::logic::transactions::{FraudSplit, ScoredTransaction};

/// Amount sums for one country
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryAmounts {
    pub country: String,
    pub total: f64,
    pub fraud: f64,
    pub legit: f64,
}

/// Activity within one hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourBucket {
    pub hour: u32,
    pub count: usize,
    pub fraud: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MerchantStats {
    pub merchant: String,
    pub count: usize,
    pub fraud: usize,
}

/// Everything the chart row needs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub fraud_split: FraudSplit,
    pub by_country: Vec<CountryAmounts>,
    pub by_hour: Vec<HourBucket>,
    pub top_merchants: Vec<MerchantStats>,
}

pub fn aggregate<T: Borrow<ScoredTransaction>>(items: &[T], top_n: usize) -> Aggregates {
    aggregate_in(items, top_n, &Local)
}

pub fn aggregate_in<T, Tz>(items: &[T], top_n: usize, tz: &Tz) -> Aggregates
where
    T: Borrow<ScoredTransaction>,
    Tz: TimeZone,
{
    Aggregates {
        fraud_split: fraud_split(items),
        by_country: amounts_by_country(items),
        by_hour: counts_by_hour_in(items, tz),
        top_merchants: top_merchants(items, top_n),
    }
}

pub fn fraud_split<T: Borrow<ScoredTransaction>>(items: &[T]) -> FraudSplit {
    let fraud = items
        .iter()
        .filter(|t| Borrow::<ScoredTransaction>::borrow(*t).label)
        .count();
    FraudSplit {
        fraud,
        nonfraud: items.len() - fraud,
    }
}

/// Per-country sums, ordered by country code
pub fn amounts_by_country<T: Borrow<ScoredTransaction>>(items: &[T]) -> Vec<CountryAmounts> {
    let mut sums: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for item in items {
        let record = item.borrow();
        let entry = sums.entry(record.tx.country.as_str()).or_insert((0.0, 0.0));
        if record.label {
            entry.0 += record.tx.amount;
        } else {
            entry.1 += record.tx.amount;
        }
    }

    sums.into_iter()
        .map(|(country, (fraud, legit))| CountryAmounts {
            country: country.to_string(),
            total: fraud + legit,
            fraud,
            legit,
        })
        .collect()
}

/// Counts per hour of day (hours with no activity are omitted), ascending by hour
pub fn counts_by_hour_in<T, Tz>(items: &[T], tz: &Tz) -> Vec<HourBucket>
where
    T: Borrow<ScoredTransaction>,
    Tz: TimeZone,
{
    let mut hours: BTreeMap<u32, HourBucket> = BTreeMap::new();

    for item in items {
        let record = item.borrow();
        let hour = record.tx.timestamp.with_timezone(tz).hour();
        let bucket = hours.entry(hour).or_insert(HourBucket { hour, count: 0, fraud: 0 });
        bucket.count += 1;
        if record.label {
            bucket.fraud += 1;
        }
    }

    hours.into_values().collect()
}

/// Busiest `n` merchants by transaction count; ties go to the alphabetically first
pub fn top_merchants<T: Borrow<ScoredTransaction>>(items: &[T], n: usize) -> Vec<MerchantStats> {
    let mut stats: HashMap<&str, (usize, usize)> = HashMap::new();

    for item in items {
        let record = item.borrow();
        let entry = stats.entry(record.tx.merchant.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if record.label {
            entry.1 += 1;
        }
    }

    let mut ranked: Vec<MerchantStats> = stats
        .into_iter()
        .map(|(merchant, (count, fraud))| MerchantStats {
            merchant: merchant.to_string(),
            count,
            fraud,
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.merchant.cmp(&b.merchant)));
    ranked.truncate(n);
    ranked
}
