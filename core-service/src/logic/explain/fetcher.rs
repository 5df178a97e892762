use super::engine::{fallback_explanation, normalize_payload};
use super::types::Explanation;
use crate::logic::backend::FraudApiClient;

/// Fetches explanations on demand. Never fails: any backend problem yields
/// the canned fallback so the modal always has something to show.
#[derive(Debug, Clone)]
pub struct ExplainFetcher {
    client: FraudApiClient,
}

impl ExplainFetcher {
    pub fn new(client: FraudApiClient) -> Self {
        Self { client }
    }

    pub async fn explain(&self, transaction_id: &str) -> Explanation {
        let result = self
            .client
            .explain(transaction_id)
            .await
            .and_then(|body| normalize_payload(transaction_id, &body));

        match result {
            Ok(explanation) => {
                log::debug!(
                    "Explanation for {}: {} contributions",
                    transaction_id,
                    explanation.contributions.len()
                );
                explanation
            }
            Err(e) => {
                log::warn!("Explain failed for {}: {} - using fallback", transaction_id, e);
                fallback_explanation(transaction_id)
            }
        }
    }
}
