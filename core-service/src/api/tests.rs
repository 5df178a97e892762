//! End-to-end tests of the dashboard surface against a wiremock backend.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::commands::Dashboard;
use super::console::ConsoleCommand;
use crate::logic::config::DashboardConfig;
use crate::logic::events::testing::RecordingSink;
use crate::logic::events::NotificationKind;
use crate::logic::filter::{AmountRange, FilterSpec};
use crate::logic::refresh::RefreshOutcome;

fn tx(id: &str, amount: f64, country: &str, score: f64, label: bool) -> serde_json::Value {
    json!({
        "tx": {
            "transaction_id": id,
            "user_id": format!("u-{}", id),
            "amount": amount,
            "country": country,
            "device": "desktop",
            "merchant": "travel",
            "timestamp": "2024-06-01T09:30:00Z"
        },
        "score": score,
        "label": label
    })
}

async fn backend(results: Vec<serde_json::Value>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transactions/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/transactions/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fraud_vs_nonfraud": { "fraud": 1, "nonfraud": 2 },
            "total_transactions": 3,
            "fraud_percentage": 33.3
        })))
        .mount(&server)
        .await;
    server
}

fn dashboard(server: &MockServer, page_size: usize) -> (Dashboard, Arc<RecordingSink>) {
    let config = DashboardConfig {
        page_size,
        refresh_interval: Duration::from_secs(3600),
        ..DashboardConfig::with_api_url(server.uri())
    };
    let sink = Arc::new(RecordingSink::default());
    (Dashboard::new(config, sink.clone()).unwrap(), sink)
}

#[tokio::test]
async fn test_amount_filter_excludes_outlier_end_to_end() {
    let server = backend(vec![
        tx("1", 120.0, "US", 0.1, false),
        tx("2", 6000.0, "NG", 0.95, true),
        tx("3", 4200.0, "GB", 0.3, false),
    ])
    .await;
    let (mut dash, _sink) = dashboard(&server, 10);

    assert_eq!(dash.mount().await, RefreshOutcome::Updated { count: 3, new_high_risk: 0 });
    dash.set_filters(FilterSpec {
        amount: Some(AmountRange::new(0.0, 5000.0)),
        ..Default::default()
    });

    let page = dash.current_page();
    assert_eq!(page.total_matching, 2);
    assert!(page.rows.iter().all(|r| r.transaction_id != "2"));
    assert!(!page.offline);

    dash.unmount().await;
}

#[tokio::test]
async fn test_filter_change_resets_to_first_page() {
    let results: Vec<_> = (0..30).map(|i| tx(&format!("t{}", i), 100.0 + i as f64, "US", 0.1, false)).collect();
    let server = backend(results).await;
    let (mut dash, _sink) = dashboard(&server, 10);
    dash.mount().await;

    dash.set_page(3);
    assert_eq!(dash.current_page().page, 3);

    dash.set_search("t2");
    let page = dash.current_page();
    assert_eq!(page.page, 1);
    // u-t2 and u-t20..u-t29
    assert_eq!(page.total_matching, 11);

    dash.set_page(99);
    assert_eq!(dash.current_page().page, 2);

    dash.unmount().await;
}

#[tokio::test]
async fn test_rows_flag_high_risk() {
    let server = backend(vec![tx("1", 10.0, "US", 0.9, true), tx("2", 10.0, "US", 0.9, false)]).await;
    let (mut dash, _sink) = dashboard(&server, 10);
    dash.mount().await;

    let page = dash.current_page();
    assert!(page.rows[0].high_risk);
    assert!(!page.rows[1].high_risk);
    assert_eq!(page.rows[0].device.as_deref(), Some("desktop"));

    dash.unmount().await;
}

#[tokio::test]
async fn test_charts_follow_filters() {
    let server = backend(vec![
        tx("1", 100.0, "US", 0.1, false),
        tx("2", 300.0, "US", 0.9, true),
        tx("3", 500.0, "GB", 0.2, false),
    ])
    .await;
    let (mut dash, _sink) = dashboard(&server, 10);
    dash.mount().await;

    let charts = dash.charts();
    assert_eq!(charts.fraud_split.fraud + charts.fraud_split.nonfraud, 3);
    assert_eq!(charts.by_country.iter().map(|c| c.total).sum::<f64>(), 900.0);

    dash.set_filters(FilterSpec {
        countries: ["US".to_string()].into_iter().collect(),
        ..Default::default()
    });
    let charts = dash.charts();
    assert_eq!(charts.by_country.len(), 1);
    assert_eq!(charts.by_country[0].fraud, 300.0);
    assert_eq!(charts.top_merchants[0].count, 2);

    dash.unmount().await;
}

#[tokio::test]
async fn test_mount_loads_summary_and_starts_loop() {
    let server = backend(vec![tx("1", 10.0, "US", 0.1, false)]).await;
    let (mut dash, _sink) = dashboard(&server, 10);

    assert!(!dash.is_mounted());
    dash.mount().await;
    assert!(dash.is_mounted());
    assert_eq!(dash.summary().unwrap().total_transactions, 3);

    let status = dash.status();
    assert_eq!(status.loaded, 1);
    assert!(status.last_refreshed.is_some());

    dash.unmount().await;
    assert!(!dash.is_mounted());
}

#[tokio::test]
async fn test_unreachable_backend_still_shows_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let (mut dash, sink) = dashboard(&server, 10);

    assert!(matches!(dash.mount().await, RefreshOutcome::Offline { .. }));
    let page = dash.current_page();
    assert!(page.offline);
    assert_eq!(page.rows.len(), 10);

    // Summary comes from the synthetic rows
    let summary = dash.summary().unwrap();
    assert_eq!(summary.total_transactions, page.total_matching);

    let seen = sink.take();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, NotificationKind::RefreshFailed);
    assert!(!dash.backend_healthy().await);

    dash.unmount().await;
}

#[tokio::test]
async fn test_explain_view_is_sorted_and_humanized() {
    let server = backend(vec![]).await;
    Mock::given(method("GET"))
        .and(path("/transactions/t9/explain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "score": 0.77,
            "explanations": [
                { "feature": "num__hour", "shap_value": 0.05, "value": 2 },
                { "feature": "cat__country_NG", "shapValue": 0.4, "value": 1.0, "raw_value": "NG" },
                { "feature_name": "num__amount", "shap_value": -0.2, "feature_value": 15.0 }
            ]
        })))
        .mount(&server)
        .await;
    let (dash, _sink) = dashboard(&server, 10);

    let view = dash.explain("t9").await;
    assert!(!view.is_fallback);
    assert_eq!(view.score, Some(0.77));
    assert_eq!(view.top_feature.as_deref(), Some("Country: NG"));
    let labels: Vec<&str> = view.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Country: NG", "Amount", "Hour"]);
    assert_eq!(view.rows[0].value, Some(json!("NG")));
    assert_eq!(view.summary, "Country: NG increased the fraud score the most (+0.400).");
}

#[tokio::test]
async fn test_explain_view_falls_back() {
    let server = backend(vec![]).await;
    let (dash, _sink) = dashboard(&server, 10);

    let view = dash.explain("missing").await;
    assert!(view.is_fallback);
    assert!(!view.rows.is_empty());
    assert!(view.top_feature.is_some());
}

#[tokio::test]
async fn test_console_commands_drive_filters() {
    let server = backend(vec![
        tx("1", 120.0, "US", 0.1, false),
        tx("2", 6000.0, "NG", 0.95, true),
        tx("3", 4200.0, "GB", 0.8, true),
    ])
    .await;
    let (mut dash, _sink) = dashboard(&server, 10);
    dash.mount().await;

    for line in ["fraud-only", "amount 0 5000"] {
        let command = ConsoleCommand::parse(line).unwrap().unwrap();
        let next = command.edit_filters(&dash.filters()).unwrap();
        dash.set_filters(next);
    }

    let page = dash.current_page();
    assert_eq!(page.total_matching, 1);
    assert_eq!(page.rows[0].transaction_id, "3");

    let clear = ConsoleCommand::parse("clear").unwrap().unwrap();
    dash.set_filters(clear.edit_filters(&dash.filters()).unwrap());
    assert_eq!(dash.current_page().total_matching, 3);

    dash.unmount().await;
}
