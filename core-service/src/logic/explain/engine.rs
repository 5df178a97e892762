use serde_json::Value;

use super::types::{Explanation, FeatureContribution};
use crate::logic::backend::ApiError;

// Backend versions disagree on field names; first present non-null wins.
const FEATURE_KEYS: [&str; 2] = ["feature", "feature_name"];
const SHAP_KEYS: [&str; 2] = ["shap_value", "shapValue"];
const VALUE_KEYS: [&str; 2] = ["value", "feature_value"];

// Shown when the explain endpoint fails
static FALLBACK_CONTRIBUTIONS: [(&str, f64); 4] = [
    ("num__amount", 0.31),
    ("cat__country_NG", 0.12),
    ("num__hour", -0.08),
    ("cat__device_mobile", 0.04),
];

/// Canonicalize an explain payload: `{ score?, explanations: [...] }`
pub fn normalize_payload(transaction_id: &str, body: &Value) -> Result<Explanation, ApiError> {
    let entries = body
        .get("explanations")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::Parse("explain payload has no `explanations` list".to_string()))?;

    let mut contributions = Vec::with_capacity(entries.len());
    for entry in entries {
        let feature = first_present(entry, &FEATURE_KEYS).and_then(Value::as_str);
        let shap_value = first_present(entry, &SHAP_KEYS).and_then(Value::as_f64);

        match (feature, shap_value) {
            (Some(feature), Some(shap_value)) => contributions.push(FeatureContribution {
                feature: feature.to_string(),
                shap_value,
                value: first_present(entry, &VALUE_KEYS).cloned(),
                raw_value: first_present(entry, &["raw_value"]).cloned(),
            }),
            _ => log::debug!("Skipping malformed explanation entry for {}: {}", transaction_id, entry),
        }
    }

    Ok(Explanation {
        transaction_id: transaction_id.to_string(),
        score: body.get("score").and_then(Value::as_f64),
        contributions,
        is_fallback: false,
    })
}

fn first_present<'a>(entry: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| entry.get(*key))
        .find(|v| !v.is_null())
}

pub fn fallback_explanation(transaction_id: &str) -> Explanation {
    Explanation {
        transaction_id: transaction_id.to_string(),
        score: None,
        contributions: FALLBACK_CONTRIBUTIONS
            .iter()
            .map(|(feature, shap_value)| FeatureContribution {
                feature: feature.to_string(),
                shap_value: *shap_value,
                value: None,
                raw_value: None,
            })
            .collect(),
        is_fallback: true,
    }
}

/// Largest contribution by magnitude
pub fn top_contribution(explanation: &Explanation) -> Option<&FeatureContribution> {
    explanation.contributions.iter().max_by(|a, b| {
        a.shap_value
            .abs()
            .partial_cmp(&b.shap_value.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// One sentence on what drove the score
pub fn summarize(explanation: &Explanation) -> String {
    let Some(top) = top_contribution(explanation) else {
        return "No feature contributions are available for this transaction.".to_string();
    };

    let name = humanize_feature(&top.feature);
    if top.shap_value > 0.0 {
        format!("{} increased the fraud score the most ({:+.3}).", name, top.shap_value)
    } else if top.shap_value < 0.0 {
        format!("{} decreased the fraud score the most ({:+.3}).", name, top.shap_value)
    } else {
        format!("{} had no measurable effect on the fraud score.", name)
    }
}

/// `num__avg_user_amount` -> `Avg user amount`, `cat__country_NG` -> `Country: NG`
pub fn humanize_feature(name: &str) -> String {
    if let Some(numeric) = name.strip_prefix("num__") {
        return sentence_case(numeric);
    }
    if let Some(categorical) = name.strip_prefix("cat__") {
        // Split at the last underscore; column names may contain underscores
        return match categorical.rsplit_once('_') {
            Some((column, value)) if !column.is_empty() && !value.is_empty() => {
                format!("{}: {}", sentence_case(column), value)
            }
            _ => sentence_case(categorical),
        };
    }
    sentence_case(name)
}

fn sentence_case(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
