//! Refresh Controller
//!
//! fetch -> diff -> filter cycle for the transaction list, plus the summary.
//! Every request is tagged with a sequence number and only the latest issued
//! request may touch the state (last-issued-wins).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::state::SharedState;
use crate::constants::OFFLINE_MOCK_COUNT;
use crate::logic::backend::{ApiError, FraudApiClient};
use crate::logic::config::DashboardConfig;
use crate::logic::events::{Notification, NotificationSink};
use crate::logic::mock;
use crate::logic::transactions::ScoredTransaction;

/// What a refresh did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Live data installed
    Updated { count: usize, new_high_risk: usize },
    /// Backend unavailable, synthetic data installed
    Offline { count: usize },
    /// A newer request was issued meanwhile; response dropped
    Stale,
}

pub struct RefreshController {
    client: FraudApiClient,
    state: SharedState,
    sink: Arc<dyn NotificationSink>,
    batch_limit: usize,
    high_risk_threshold: f64,
    list_seq: AtomicU64,
    summary_seq: AtomicU64,
}

impl RefreshController {
    pub fn new(
        client: FraudApiClient,
        state: SharedState,
        sink: Arc<dyn NotificationSink>,
        config: &DashboardConfig,
    ) -> Self {
        Self {
            client,
            state,
            sink,
            batch_limit: config.batch_limit,
            high_risk_threshold: config.high_risk_threshold,
            list_seq: AtomicU64::new(0),
            summary_seq: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Reload the transaction list. `silent` refreshes (the timer) announce
    /// new high-risk records but never announce their own failure.
    pub async fn refresh(&self, silent: bool) -> RefreshOutcome {
        let seq = self.list_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.client.query_transactions(self.batch_limit, 0).await;

        if self.list_seq.load(Ordering::SeqCst) != seq {
            log::debug!("Dropping stale transaction response #{}", seq);
            return RefreshOutcome::Stale;
        }

        match result {
            Ok(records) => self.install_live(records, silent),
            Err(e) => self.install_offline(&e, silent),
        }
    }

    /// Reload the summary, synthesizing it from current data on failure
    pub async fn refresh_summary(&self) {
        let seq = self.summary_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.client.summary().await;

        if self.summary_seq.load(Ordering::SeqCst) != seq {
            log::debug!("Dropping stale summary response #{}", seq);
            return;
        }

        let mut state = self.state.write();
        match result {
            Ok(summary) => state.set_summary(summary),
            Err(e) => {
                log::warn!("Summary unavailable: {} - deriving from local data", e);
                let summary = mock::synthesize_summary(state.transactions());
                state.set_summary(summary);
            }
        }
    }

    fn install_live(&self, records: Vec<ScoredTransaction>, silent: bool) -> RefreshOutcome {
        let count = records.len();
        let new_high_risk = {
            let mut state = self.state.write();
            let fresh = if silent {
                state.new_high_risk(&records, self.high_risk_threshold).len()
            } else {
                0
            };
            state.apply_live(records);
            fresh
        };

        log::info!("Loaded {} transactions ({} new high-risk)", count, new_high_risk);
        if new_high_risk > 0 {
            self.sink.notify(Notification::high_risk(new_high_risk));
        }

        RefreshOutcome::Updated { count, new_high_risk }
    }

    fn install_offline(&self, error: &ApiError, silent: bool) -> RefreshOutcome {
        if silent {
            log::debug!("Background refresh failed: {}", error);
        } else {
            log::warn!("Refresh failed: {} - switching to offline data", error);
            self.sink.notify(Notification::refresh_failed(&error.to_string()));
        }

        let records = mock::generate(OFFLINE_MOCK_COUNT, 0, &mut rand::thread_rng());
        let count = records.len();
        self.state.write().apply_offline(records);

        RefreshOutcome::Offline { count }
    }
}
