//! Dashboard Commands - API for the presentation layer
//!
//! The single entry point a frontend talks to. Owns the view state from mount
//! to unmount and hands out serializable view models only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logic::backend::{ApiConfig, ApiError, FraudApiClient};
use crate::logic::config::DashboardConfig;
use crate::logic::events::NotificationSink;
use crate::logic::explain::{self, ExplainFetcher, Explanation};
use crate::logic::filter::{self, Aggregates, FilterSpec};
use crate::logic::refresh::{DashboardState, RefreshController, RefreshLoop, RefreshOutcome, SharedState};
use crate::logic::transactions::{ScoredTransaction, Summary};

// ============================================================================
// VIEW MODELS
// ============================================================================

/// Table row
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRow {
    pub transaction_id: String,
    pub user_id: String,
    pub amount: f64,
    pub country: String,
    pub device: Option<String>,
    pub merchant: String,
    pub timestamp: String,
    pub score: f64,
    pub label: bool,
    pub high_risk: bool,
}

/// One table page plus pager info
#[derive(Debug, Clone, Serialize)]
pub struct TransactionPage {
    pub rows: Vec<TransactionRow>,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_matching: usize,
    pub offline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributionRow {
    pub feature: String,
    pub label: String,
    pub shap_value: f64,
    pub value: Option<serde_json::Value>,
}

/// Explain modal content
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationView {
    pub transaction_id: String,
    pub score: Option<f64>,
    pub summary: String,
    pub top_feature: Option<String>,
    /// Sorted by contribution magnitude, largest first
    pub rows: Vec<ContributionRow>,
    pub is_fallback: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStatus {
    pub mounted: bool,
    pub offline: bool,
    pub loaded: usize,
    pub last_refreshed: Option<String>,
    pub api_url: String,
}

// ============================================================================
// DASHBOARD
// ============================================================================

pub struct Dashboard {
    config: DashboardConfig,
    state: SharedState,
    client: FraudApiClient,
    controller: Arc<RefreshController>,
    explainer: ExplainFetcher,
    refresh_loop: Option<RefreshLoop>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, sink: Arc<dyn NotificationSink>) -> Result<Self, ApiError> {
        let client = FraudApiClient::new(ApiConfig::from(&config))?;
        let state = DashboardState::shared(config.page_size);
        let controller = Arc::new(RefreshController::new(client.clone(), state.clone(), sink, &config));
        let explainer = ExplainFetcher::new(client.clone());

        Ok(Self {
            config,
            state,
            client,
            controller,
            explainer,
            refresh_loop: None,
        })
    }

    /// Initial foreground load, then start the background loop (once)
    pub async fn mount(&mut self) -> RefreshOutcome {
        let outcome = self.refresh().await;

        if self.refresh_loop.is_none() {
            self.refresh_loop = Some(RefreshLoop::start(self.controller.clone(), self.config.refresh_interval));
        }
        outcome
    }

    /// Stop the background loop; the state stays readable
    pub async fn unmount(&mut self) {
        if let Some(refresh_loop) = self.refresh_loop.take() {
            refresh_loop.stop().await;
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.refresh_loop.as_ref().is_some_and(RefreshLoop::is_running)
    }

    /// User-triggered refresh; failures are announced
    pub async fn refresh(&self) -> RefreshOutcome {
        let outcome = self.controller.refresh(false).await;
        self.controller.refresh_summary().await;
        outcome
    }

    pub async fn backend_healthy(&self) -> bool {
        match self.client.health_check().await {
            Ok(health) => health.status == "ok",
            Err(e) => {
                log::debug!("Health check failed: {}", e);
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Filters and paging
    // ------------------------------------------------------------------

    pub fn set_filters(&self, filters: FilterSpec) {
        self.state.write().set_filters(filters);
    }

    pub fn set_search(&self, query: &str) {
        let query = Some(query.to_string()).filter(|q| !q.trim().is_empty());
        self.state.write().set_search(query);
    }

    pub fn set_page(&self, page: usize) {
        self.state.write().set_page(page);
    }

    pub fn filters(&self) -> FilterSpec {
        self.state.read().filters().clone()
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn current_page(&self) -> TransactionPage {
        let state = self.state.read();
        let view = state.view();

        TransactionPage {
            rows: view
                .page_items
                .iter()
                .map(|r| to_row(r, self.config.high_risk_threshold))
                .collect(),
            page: view.page,
            page_size: view.page_size,
            page_count: view.page_count,
            total_matching: view.total_matching,
            offline: state.is_offline(),
        }
    }

    /// Chart data over every record matching the current filters
    pub fn charts(&self) -> Aggregates {
        let state = self.state.read();
        let matching = filter::filter_all(state.transactions(), state.filters());
        filter::aggregate(&matching, self.config.top_merchants)
    }

    pub fn summary(&self) -> Option<Summary> {
        self.state.read().summary().cloned()
    }

    pub fn status(&self) -> DashboardStatus {
        let state = self.state.read();
        DashboardStatus {
            mounted: self.is_mounted(),
            offline: state.is_offline(),
            loaded: state.transactions().len(),
            last_refreshed: state.last_refreshed().map(|dt: DateTime<Utc>| dt.to_rfc3339()),
            api_url: self.config.api_url.clone(),
        }
    }

    pub async fn explain(&self, transaction_id: &str) -> ExplanationView {
        let explanation = self.explainer.explain(transaction_id).await;
        to_explanation_view(&explanation)
    }
}

fn to_row(record: &ScoredTransaction, threshold: f64) -> TransactionRow {
    let tx = &record.tx;
    TransactionRow {
        transaction_id: tx.transaction_id.clone(),
        user_id: tx.user_id.clone(),
        amount: tx.amount,
        country: tx.country.clone(),
        device: tx.device.map(|d| d.to_string()),
        merchant: tx.merchant.clone(),
        timestamp: tx.timestamp.to_rfc3339(),
        score: record.score,
        label: record.label,
        high_risk: record.is_high_risk(threshold),
    }
}

fn to_explanation_view(explanation: &Explanation) -> ExplanationView {
    let mut rows: Vec<ContributionRow> = explanation
        .contributions
        .iter()
        .map(|c| ContributionRow {
            feature: c.feature.clone(),
            label: explain::humanize_feature(&c.feature),
            shap_value: c.shap_value,
            value: c.raw_value.clone().or_else(|| c.value.clone()),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.shap_value
            .abs()
            .partial_cmp(&a.shap_value.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ExplanationView {
        transaction_id: explanation.transaction_id.clone(),
        score: explanation.score,
        summary: explain::summarize(explanation),
        top_feature: explain::top_contribution(explanation).map(|c| explain::humanize_feature(&c.feature)),
        rows,
        is_fallback: explanation.is_fallback,
    }
}
