//! Synthetic transactions for offline mode.
//!
//! Not meant to be realistic, only plausible enough that the table and charts
//! have something to show while the backend is down.

use std::collections::{BTreeMap, HashMap};

use chrono::{Local, TimeZone, Timelike, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::logic::transactions::{
    Device, FraudSplit, HourCount, MerchantCount, ScoredTransaction, Summary, Transaction,
};

pub const COUNTRIES: [&str; 9] = ["IN", "US", "GB", "CA", "AU", "DE", "FR", "NG", "BR"];
pub const MERCHANTS: [&str; 6] = ["electronics", "grocery", "fashion", "travel", "gaming", "utilities"];
pub const DEVICES: [Device; 2] = [Device::Mobile, Device::Desktop];

pub const MIN_AMOUNT: f64 = 100.0;
pub const MAX_AMOUNT: f64 = 5100.0;
const FRAUD_PROBABILITY: f64 = 0.3;

/// `count` records with ids `TXN-{offset+1}` onward, all stamped now
pub fn generate<R: Rng + ?Sized>(count: usize, offset: usize, rng: &mut R) -> Vec<ScoredTransaction> {
    let now = Utc::now();

    (0..count)
        .map(|i| {
            let label = rng.gen_bool(FRAUD_PROBABILITY);
            let score = if label {
                rng.gen_range(0.5..1.0)
            } else {
                rng.gen_range(0.0..0.4)
            };
            let amount = (rng.gen_range(MIN_AMOUNT..=MAX_AMOUNT) * 100.0).round() / 100.0;

            ScoredTransaction {
                tx: Transaction {
                    transaction_id: format!("TXN-{:06}", offset + i + 1),
                    user_id: format!("U{}", rng.gen_range(1000..2000)),
                    amount: amount.clamp(MIN_AMOUNT, MAX_AMOUNT),
                    country: pick(&COUNTRIES, rng).to_string(),
                    device: DEVICES.choose(rng).copied(),
                    merchant: pick(&MERCHANTS, rng).to_string(),
                    timestamp: now,
                },
                score,
                label,
            }
        })
        .collect()
}

fn pick<'a, R: Rng + ?Sized>(options: &'a [&'a str], rng: &mut R) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

/// Summary derived from whatever data the dashboard currently holds.
/// Hours are local, matching the hour chart.
pub fn synthesize_summary(records: &[ScoredTransaction]) -> Summary {
    synthesize_summary_in(records, &Local)
}

pub fn synthesize_summary_in<Tz: TimeZone>(records: &[ScoredTransaction], tz: &Tz) -> Summary {
    let fraud = records.iter().filter(|r| r.label).count();
    let mut summary = Summary::from_split(FraudSplit {
        fraud,
        nonfraud: records.len() - fraud,
    });

    let mut merchants: HashMap<&str, usize> = HashMap::new();
    let mut hours: BTreeMap<u32, usize> = (0..24).map(|h| (h, 0)).collect();
    for record in records.iter().filter(|r| r.label) {
        *merchants.entry(record.tx.merchant.as_str()).or_default() += 1;
        *hours.entry(record.tx.timestamp.with_timezone(tz).hour()).or_default() += 1;
    }

    let mut top: Vec<MerchantCount> = merchants
        .into_iter()
        .map(|(merchant, count)| MerchantCount { merchant: merchant.to_string(), count })
        .collect();
    top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.merchant.cmp(&b.merchant)));
    top.truncate(5);

    summary.top_5_fraud_merchants = top;
    summary.frauds_per_hour = hours
        .into_iter()
        .map(|(hour, count)| HourCount { hour, count })
        .collect();
    summary
}
