//! adsentry command implementations

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use adsentry_agent::{AnalystAgent, ToolDispatcher};
use adsentry_config::{self, Config};
use adsentry_provider::OpenAiProvider;
use adsentry_store::{AirtableSink, AlertStore, ReportStore};

fn alert_store() -> AlertStore {
    AlertStore::new(adsentry_config::alerts_path())
}

fn report_store() -> ReportStore {
    ReportStore::new(adsentry_config::report_path())
}

fn audit_sink(config: &Config) -> AirtableSink {
    if config.airtable_configured() {
        AirtableSink::new(
            &config.airtable.api_key,
            &config.airtable.base_id,
            &config.airtable.table,
        )
    } else {
        AirtableSink::disabled()
    }
}

/// Create config and data directory
pub async fn init_command() -> Result<()> {
    adsentry_config::init()
        .await
        .context("failed to initialize config")?;
    println!("✓ Config ready at {:?}", adsentry_config::config_path());
    println!("  Set provider.api_key before running an analysis.");
    Ok(())
}

/// Run one analysis over a rows file
pub async fn analyze_command(data: PathBuf, json: bool) -> Result<()> {
    let config = Config::load().await.context("failed to load config")?;
    if !config.has_api_key() {
        bail!("no provider api key configured; edit {:?}", adsentry_config::config_path());
    }

    let rows = adsentry_data::load_rows(&data)
        .await
        .with_context(|| format!("failed to load rows from {:?}", data))?;
    if rows.is_empty() {
        bail!("rows file {:?} is empty", data);
    }

    let provider = OpenAiProvider::new(
        &config.provider.api_key,
        config.provider.api_base.clone(),
        Some(config.default_model()),
    );
    let dispatcher = ToolDispatcher::new(alert_store(), report_store(), audit_sink(&config));
    let agent = AnalystAgent::new(provider, dispatcher)
        .with_limits(config.analysis.max_tokens, config.analysis.temperature);

    let record = agent.run(&rows).await.context("analysis run failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("Overall health: {}", record.overall_health);
    println!(
        "Alerts fired: {} ({} rows analysed, {} tool calls)",
        record.alerts_count,
        record.rows_analysed,
        record.tool_calls_log.len(),
    );
    for alert in &record.alerts {
        println!("  [{}] {} - {}", alert.severity, alert.platform, alert.issue);
    }
    if !record.summary.is_empty() {
        println!("\n{}", record.summary);
    }
    if !record.report.is_empty() {
        println!(
            "\nReport saved to {:?}",
            adsentry_config::report_path()
        );
    }

    Ok(())
}

/// List or clear persisted alerts
pub async fn alerts_command(clear: bool) -> Result<()> {
    let store = alert_store();

    if clear {
        store.clear().await.context("failed to clear alerts")?;
        println!("✓ Alerts cleared");
        return Ok(());
    }

    let alerts = store.read().await;
    if alerts.is_empty() {
        println!("No alerts");
    } else {
        for alert in &alerts {
            println!(
                "[{}] {} {} - {}\n    recommendation: {}",
                alert.severity,
                alert.timestamp.format("%Y-%m-%d %H:%M"),
                alert.platform,
                alert.issue,
                alert.recommendation,
            );
        }
        println!("\n{} alerts total", alerts.len());
    }

    Ok(())
}

/// Print the latest report
pub async fn report_command() -> Result<()> {
    match report_store().read().await {
        Some(report) => println!("{}", report),
        None => println!("No report generated yet"),
    }
    Ok(())
}

/// Show configuration status
pub async fn status_command() -> Result<()> {
    let config = Config::load().await.context("failed to load config")?;
    let alerts = alert_store().read().await;

    println!("adsentry status");
    println!("  Config: {:?}", adsentry_config::config_path());
    println!(
        "  Provider key: {}",
        if config.has_api_key() { "[set]" } else { "[not set]" }
    );
    println!("  Model: {}", config.default_model());
    println!(
        "  Airtable audit log: {}",
        if config.airtable_configured() { "enabled" } else { "disabled" }
    );
    println!("  Alerts on disk: {}", alerts.len());
    println!(
        "  Latest report: {}",
        if report_store().read().await.is_some() { "present" } else { "none" }
    );

    Ok(())
}
