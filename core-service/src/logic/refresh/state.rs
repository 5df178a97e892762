//! Dashboard View State
//!
//! Everything the page shows, owned by one object for the lifetime of a
//! mounted dashboard and shared behind `Arc<RwLock<_>>`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::logic::filter::{apply_filters, clamp_page, FilterSpec, FilteredPage};
use crate::logic::transactions::{ScoredTransaction, Summary};

pub type SharedState = Arc<RwLock<DashboardState>>;

#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Latest full batch (live or synthetic)
    transactions: Vec<ScoredTransaction>,
    /// Ids from the last successful live fetch
    previous_ids: Option<HashSet<String>>,
    summary: Option<Summary>,
    filters: FilterSpec,
    page: usize,
    page_size: usize,
    view: FilteredPage,
    offline: bool,
    last_refreshed: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new(page_size: usize) -> Self {
        Self {
            transactions: Vec::new(),
            previous_ids: None,
            summary: None,
            filters: FilterSpec::default(),
            page: 1,
            page_size,
            view: FilteredPage {
                page: 1,
                page_size,
                page_count: 1,
                ..Default::default()
            },
            offline: false,
            last_refreshed: None,
        }
    }

    pub fn shared(page_size: usize) -> SharedState {
        Arc::new(RwLock::new(Self::new(page_size)))
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    pub fn transactions(&self) -> &[ScoredTransaction] {
        &self.transactions
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The current page as last computed by the filter engine
    pub fn view(&self) -> &FilteredPage {
        &self.view
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn has_snapshot(&self) -> bool {
        self.previous_ids.is_some()
    }

    // ------------------------------------------------------------------
    // User input (any filter change goes back to page 1)
    // ------------------------------------------------------------------

    pub fn set_filters(&mut self, filters: FilterSpec) {
        self.filters = filters;
        self.page = 1;
        self.recompute();
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.filters.search = search;
        self.page = 1;
        self.recompute();
    }

    /// Jump to a page, clamped to the pages that exist
    pub fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.view.total_matching, self.page_size);
        self.recompute();
    }

    // ------------------------------------------------------------------
    // Refresh results
    // ------------------------------------------------------------------

    /// Records in `incoming` that are high risk and were not in the previous
    /// live snapshot. Empty when there is no snapshot yet.
    pub fn new_high_risk<'a>(&self, incoming: &'a [ScoredTransaction], threshold: f64) -> Vec<&'a ScoredTransaction> {
        let Some(previous) = &self.previous_ids else {
            return Vec::new();
        };

        incoming
            .iter()
            .filter(|r| r.is_high_risk(threshold) && !previous.contains(r.id()))
            .collect()
    }

    /// Install a live batch and remember its ids for the next diff
    pub fn apply_live(&mut self, records: Vec<ScoredTransaction>) {
        self.previous_ids = Some(records.iter().map(|r| r.id().to_string()).collect());
        self.transactions = records;
        self.offline = false;
        self.last_refreshed = Some(Utc::now());
        self.recompute();
    }

    /// Install synthetic data. The live snapshot is kept so the next
    /// successful fetch is diffed against real ids, not mock ones.
    pub fn apply_offline(&mut self, records: Vec<ScoredTransaction>) {
        self.transactions = records;
        self.offline = true;
        self.last_refreshed = Some(Utc::now());
        self.recompute();
    }

    pub fn set_summary(&mut self, summary: Summary) {
        self.summary = Some(summary);
    }

    /// Re-run the filter engine; a page past the end is pulled back to the last one
    pub fn recompute(&mut self) {
        let view = apply_filters(&self.transactions, &self.filters, self.page, self.page_size);
        let clamped = clamp_page(self.page, view.total_matching, self.page_size);

        self.view = if clamped != view.page {
            self.page = clamped;
            apply_filters(&self.transactions, &self.filters, clamped, self.page_size)
        } else {
            view
        };
    }
}
