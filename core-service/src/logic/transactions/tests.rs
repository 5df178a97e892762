use super::types::{Device, FraudSplit, ScoredTransaction, Summary};

#[test]
fn test_deserialize_backend_record() {
    let json = serde_json::json!({
        "tx": {
            "transaction_id": "TXN-000042",
            "user_id": "U1042",
            "amount": 250.5,
            "country": "US",
            "device": "mobile",
            "merchant": "grocery",
            "timestamp": "2024-05-01T10:15:00Z"
        },
        "score": 0.12,
        "label": false
    });

    let record: ScoredTransaction = serde_json::from_value(json).unwrap();
    assert_eq!(record.id(), "TXN-000042");
    assert_eq!(record.tx.device, Some(Device::Mobile));
    assert!(!record.label);
}

#[test]
fn test_numeric_ids_and_integer_label_are_normalized() {
    let json = serde_json::json!({
        "tx": {
            "transaction_id": 7,
            "user_id": 311,
            "amount": 80.0,
            "country": "NG",
            "merchant": "gaming",
            "timestamp": "2024-05-01T23:59:59Z"
        },
        "score": 0.91,
        "label": 1
    });

    let record: ScoredTransaction = serde_json::from_value(json).unwrap();
    assert_eq!(record.tx.transaction_id, "7");
    assert_eq!(record.tx.user_id, "311");
    assert_eq!(record.tx.device, None);
    assert!(record.label);
}

#[test]
fn test_unknown_device_maps_to_other() {
    let device: Device = serde_json::from_str("\"smartwatch\"").unwrap();
    assert_eq!(device, Device::Other);
}

#[test]
fn test_high_risk_requires_label_and_score() {
    let json = serde_json::json!({
        "tx": {
            "transaction_id": "a", "user_id": "u", "amount": 1.0, "country": "US",
            "merchant": "travel", "timestamp": "2024-01-01T00:00:00Z"
        },
        "score": 0.7,
        "label": true
    });
    let mut record: ScoredTransaction = serde_json::from_value(json).unwrap();

    // Threshold is exclusive
    assert!(!record.is_high_risk(0.7));
    record.score = 0.85;
    assert!(record.is_high_risk(0.7));
    record.label = false;
    assert!(!record.is_high_risk(0.7));
}

#[test]
fn test_summary_percentage_falls_back_to_counts() {
    let json = serde_json::json!({
        "fraud_vs_nonfraud": { "fraud": 25, "nonfraud": 75 },
        "total_transactions": 100
    });

    let summary: Summary = serde_json::from_value(json).unwrap();
    assert!(summary.fraud_percentage.is_none());
    assert!((summary.fraud_percentage() - 25.0).abs() < 1e-9);
    assert!(summary.top_5_fraud_merchants.is_empty());
}

#[test]
fn test_empty_split_has_zero_percentage() {
    let summary = Summary::from_split(FraudSplit::default());
    assert_eq!(summary.total_transactions, 0);
    assert_eq!(summary.fraud_percentage(), 0.0);
}
