//! Airtable audit sink
//!
//! Every fired alert is mirrored as a record in an Airtable table, giving a
//! cloud audit log that clients can query directly. Strictly best-effort:
//! the local write has already succeeded by the time this runs, so failures
//! are logged and swallowed, never propagated.

use adsentry_data::Alert;
use chrono::Local;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded so a slow Airtable can never stall the dispatcher
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AirtableSink {
    client: Client,
    api_key: String,
    base_id: String,
    table: String,
    api_base: String,
}

impl AirtableSink {
    pub fn new(api_key: impl Into<String>, base_id: impl Into<String>, table: impl Into<String>) -> Self {
        Self::with_api_base(api_key, base_id, table, "https://api.airtable.com/v0")
    }

    pub fn with_api_base(
        api_key: impl Into<String>,
        base_id: impl Into<String>,
        table: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key: api_key.into(),
            base_id: base_id.into(),
            table: table.into(),
            api_base: api_base.into(),
        }
    }

    /// Sink with no credentials; every log_alert call is a silent no-op
    pub fn disabled() -> Self {
        Self::new("", "", "Insights")
    }

    /// Credentials present and not placeholders
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
            && !self.base_id.is_empty()
            && self.api_key != "your-key"
            && self.base_id != "your-base-id"
    }

    /// Write one alert record. Returns whether the write landed; never errors.
    pub async fn log_alert(&self, alert: &Alert) -> bool {
        if !self.is_configured() {
            debug!("Airtable sink not configured, skipping audit record");
            return false;
        }

        let url = format!("{}/{}/{}", self.api_base, self.base_id, self.table);
        let payload = json!({
            "records": [{
                "fields": {
                    "Date": Local::now().format("%Y-%m-%d").to_string(),
                    "Platform": alert.platform,
                    "Issue": alert.issue,
                    "Severity": alert.severity.as_str(),
                    "Recommendation": alert.recommendation,
                    "Status": alert.status,
                }
            }]
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                debug!("Alert for {} mirrored to Airtable", alert.platform);
                true
            }
            Ok(resp) => {
                warn!("Airtable rejected alert record: status {}", resp.status());
                false
            }
            Err(e) => {
                warn!("Airtable write failed (local save already succeeded): {}", e);
                false
            }
        }
    }
}
