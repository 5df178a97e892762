//! Filter Engine
//!
//! Pure predicate passes over the in-memory transaction list, then a page slice.
//! All predicates are conjunctive, so evaluation order only affects speed.

use std::cmp::Ordering;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use super::types::{AmountRange, FilterSpec, FilteredPage, SortKey, SortOrder, SortSpec};
use crate::logic::transactions::ScoredTransaction;

/// Filter, sort and paginate using the machine's local time zone for date bounds
pub fn apply_filters(
    all: &[ScoredTransaction],
    spec: &FilterSpec,
    page: usize,
    page_size: usize,
) -> FilteredPage {
    apply_filters_in(all, spec, page, page_size, &Local)
}

/// Same as [`apply_filters`] with an explicit time zone for day boundaries
pub fn apply_filters_in<Tz: TimeZone>(
    all: &[ScoredTransaction],
    spec: &FilterSpec,
    page: usize,
    page_size: usize,
    tz: &Tz,
) -> FilteredPage {
    let filtered = filter_all_in(all, spec, tz);
    let total_matching = filtered.len();
    let page = page.max(1);

    FilteredPage {
        page_items: paginate(&filtered, page, page_size)
            .iter()
            .map(|t| (*t).clone())
            .collect(),
        total_matching,
        page,
        page_size,
        page_count: page_count(total_matching, page_size),
    }
}

/// Every matching record, in input order (or sort order when a sort is set)
pub fn filter_all_in<'a, Tz: TimeZone>(
    all: &'a [ScoredTransaction],
    spec: &FilterSpec,
    tz: &Tz,
) -> Vec<&'a ScoredTransaction> {
    let predicate = Predicate::new(spec, tz);
    let mut filtered: Vec<&ScoredTransaction> = all.iter().filter(|t| predicate.matches(t)).collect();

    if let Some(sort) = spec.sort {
        sort_records(&mut filtered, sort);
    }

    filtered
}

pub fn filter_all<'a>(all: &'a [ScoredTransaction], spec: &FilterSpec) -> Vec<&'a ScoredTransaction> {
    filter_all_in(all, spec, &Local)
}

// ============================================================================
// PAGINATION
// ============================================================================

/// Slice `[(page-1)*page_size, page*page_size)` clamped to the list. Page 0 reads as page 1.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `total` rows; an empty list still has one (empty) page
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(total, page_size))
}

// ============================================================================
// PREDICATES
// ============================================================================

/// Filters compiled once per pass: lowercased query, resolved day boundaries
struct Predicate<'s> {
    spec: &'s FilterSpec,
    query: Option<String>,
    amount: Option<AmountRange>,
    not_before: Option<DateTime<Utc>>,
    before: Option<DateTime<Utc>>,
}

impl<'s> Predicate<'s> {
    fn new<Tz: TimeZone>(spec: &'s FilterSpec, tz: &Tz) -> Self {
        Self {
            spec,
            query: spec.query().map(str::to_lowercase),
            amount: spec.amount,
            not_before: spec.dates.start().map(|d| start_of_day(d, tz)),
            before: spec
                .dates
                .end()
                .and_then(|d| d.succ_opt())
                .map(|next| start_of_day(next, tz)),
        }
    }

    fn matches(&self, record: &ScoredTransaction) -> bool {
        let tx = &record.tx;

        if self.spec.fraud_only && !record.label {
            return false;
        }
        if let Some(range) = &self.amount {
            if !range.contains(tx.amount) {
                return false;
            }
        }
        if !self.spec.countries.is_empty() && !self.spec.countries.contains(&tx.country) {
            return false;
        }
        if !self.spec.merchants.is_empty() && !self.spec.merchants.contains(&tx.merchant) {
            return false;
        }
        if let Some(lower) = self.not_before {
            if tx.timestamp < lower {
                return false;
            }
        }
        // End day is inclusive through its last instant
        if let Some(upper) = self.before {
            if tx.timestamp >= upper {
                return false;
            }
        }
        if let Some(query) = &self.query {
            let hit = [&tx.user_id, &tx.merchant, &tx.country]
                .iter()
                .any(|field| field.to_lowercase().contains(query.as_str()));
            if !hit {
                return false;
            }
        }

        true
    }
}

/// Local midnight of `date` as an instant. Falls back to UTC midnight when the
/// zone skips midnight that day.
fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

// ============================================================================
// SORTING
// ============================================================================

fn sort_records(records: &mut [&ScoredTransaction], sort: SortSpec) {
    records.sort_by(|a, b| {
        let ordering = match sort.key {
            SortKey::Score => a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal),
            SortKey::Amount => a.tx.amount.partial_cmp(&b.tx.amount).unwrap_or(Ordering::Equal),
            SortKey::Timestamp => a.tx.timestamp.cmp(&b.tx.timestamp),
        };
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
