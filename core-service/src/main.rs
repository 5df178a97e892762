//! Fraud Dashboard - Main Entry Point
//!
//! Headless presentation layer: mounts the dashboard, renders the current
//! table page and chart data to the terminal, prints notifications as they
//! arrive, and takes filter/page/explain commands on stdin.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use fraud_dashboard_core::api::{self, ConsoleCommand, Dashboard, ExplanationView, TransactionPage};
use fraud_dashboard_core::constants;
use fraud_dashboard_core::logic::config::DashboardConfig;
use fraud_dashboard_core::logic::events::{ChannelSink, Notification};
use fraud_dashboard_core::logic::filter::Aggregates;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    let config = DashboardConfig::from_env();
    log::info!("   Backend: {}", config.api_url);
    log::info!("   Refresh: {}s", config.refresh_interval.as_secs());

    let (sink, mut notifications) = ChannelSink::new();
    let mut dashboard = match Dashboard::new(config.clone(), Arc::new(sink)) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            log::error!("Failed to initialize dashboard: {}", e);
            std::process::exit(1);
        }
    };

    if dashboard.backend_healthy().await {
        log::info!("Backend is healthy");
    } else {
        log::warn!("Backend health check failed - offline data will be shown until it recovers");
    }

    let outcome = dashboard.mount().await;
    log::info!("Initial load: {:?}", outcome);
    render(&dashboard);
    println!("Type 'help' for commands.");

    let mut redraw = tokio::time::interval(config.refresh_interval);
    redraw.tick().await;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down...");
                break;
            }
            line = input.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if !run_command(&dashboard, &line).await {
                        break;
                    }
                }
                Ok(None) => {
                    log::debug!("stdin closed; still refreshing until Ctrl-C");
                    stdin_open = false;
                }
                Err(e) => {
                    log::warn!("Failed to read stdin: {}", e);
                    stdin_open = false;
                }
            },
            Some(notification) = notifications.recv() => {
                print_notification(&notification);
                render(&dashboard);
            }
            _ = redraw.tick() => render(&dashboard),
        }
    }

    dashboard.unmount().await;
}

/// Execute one input line; `false` means quit
async fn run_command(dashboard: &Dashboard, line: &str) -> bool {
    let command = match ConsoleCommand::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(message) => {
            println!("{}", message);
            return true;
        }
    };

    if let Some(filters) = command.edit_filters(&dashboard.filters()) {
        dashboard.set_filters(filters);
        render(dashboard);
        return true;
    }

    match command {
        ConsoleCommand::Search(query) => {
            dashboard.set_search(query.as_deref().unwrap_or_default());
            render(dashboard);
        }
        ConsoleCommand::Page(page) => {
            dashboard.set_page(page);
            render(dashboard);
        }
        ConsoleCommand::Refresh => {
            let outcome = dashboard.refresh().await;
            log::info!("Manual refresh: {:?}", outcome);
            render(dashboard);
        }
        ConsoleCommand::Explain(id) => render_explanation(&dashboard.explain(&id).await),
        ConsoleCommand::Help => println!("{}", api::HELP),
        ConsoleCommand::Quit => return false,
        // Filter edits were handled above
        _ => {}
    }
    true
}

// ============================================================================
// RENDERING
// ============================================================================

fn render(dashboard: &Dashboard) {
    let status = dashboard.status();
    let mode = if status.offline { "OFFLINE (sample data)" } else { "live" };
    println!();
    println!(
        "== {} | {} | {} loaded | refreshed {} ==",
        constants::APP_NAME,
        mode,
        status.loaded,
        status.last_refreshed.as_deref().unwrap_or("never"),
    );

    if let Some(summary) = dashboard.summary() {
        println!(
            "Summary: {} transactions, {} fraud ({:.1}%)",
            summary.total_transactions,
            summary.fraud_vs_nonfraud.fraud,
            summary.fraud_percentage(),
        );
    }

    render_page(&dashboard.current_page());
    render_charts(&dashboard.charts());
}

fn render_page(page: &TransactionPage) {
    println!(
        "{:<12} {:<8} {:>10} {:<4} {:<8} {:<12} {:>6}  {}",
        "ID", "USER", "AMOUNT", "CTRY", "DEVICE", "MERCHANT", "SCORE", "FLAG"
    );
    for row in &page.rows {
        let flag = match (row.high_risk, row.label) {
            (true, _) => "HIGH RISK",
            (false, true) => "fraud",
            _ => "",
        };
        println!(
            "{:<12} {:<8} {:>10.2} {:<4} {:<8} {:<12} {:>6.3}  {}",
            row.transaction_id,
            row.user_id,
            row.amount,
            row.country,
            row.device.as_deref().unwrap_or("-"),
            row.merchant,
            row.score,
            flag,
        );
    }
    println!(
        "Page {}/{} ({} matching)",
        page.page, page.page_count, page.total_matching
    );
}

fn render_charts(charts: &Aggregates) {
    println!(
        "Fraud vs legit: {} / {}",
        charts.fraud_split.fraud, charts.fraud_split.nonfraud
    );

    let countries: Vec<String> = charts
        .by_country
        .iter()
        .map(|c| format!("{} {:.0} ({:.0} fraud)", c.country, c.total, c.fraud))
        .collect();
    println!("By country: {}", countries.join(", "));

    let merchants: Vec<String> = charts
        .top_merchants
        .iter()
        .map(|m| format!("{} {}", m.merchant, m.count))
        .collect();
    println!("Top merchants: {}", merchants.join(", "));

    let hours: Vec<String> = charts
        .by_hour
        .iter()
        .map(|h| format!("{:02}h:{}", h.hour, h.count))
        .collect();
    println!("By hour: {}", hours.join(" "));
}

fn print_notification(notification: &Notification) {
    println!(
        "[{}] {}: {}",
        notification.kind.event_name(),
        notification.title,
        notification.message
    );
}

fn render_explanation(view: &ExplanationView) {
    let score = view
        .score
        .map(|s| format!("{:.3}", s))
        .unwrap_or_else(|| "n/a".to_string());
    let source = if view.is_fallback { " (sample explanation, backend unavailable)" } else { "" };

    println!();
    println!("Explanation for {} | score {}{}", view.transaction_id, score, source);
    println!("{}", view.summary);
    for row in &view.rows {
        let value = row.value.as_ref().map(|v| v.to_string()).unwrap_or_default();
        println!("  {:<28} {:>+8.3}  {}", row.label, row.shap_value, value);
    }
}
