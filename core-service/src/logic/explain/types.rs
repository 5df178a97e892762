use serde::{Deserialize, Serialize};

/// One feature's push on the score, in canonical field names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    /// Pipeline feature name, e.g. `num__amount` or `cat__country_NG`
    pub feature: String,
    pub shap_value: f64, // signed; > 0 pushes toward fraud
    pub value: Option<serde_json::Value>,
    pub raw_value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub transaction_id: String,
    pub score: Option<f64>,
    pub contributions: Vec<FeatureContribution>,
    /// True when the backend could not be reached and canned values are shown
    pub is_fallback: bool,
}
