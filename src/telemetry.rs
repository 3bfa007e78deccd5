//! Consent-gated failure telemetry
//!
//! Reports are built only for failures, sent at most once per failure,
//! and only after an explicit "yes" at an interactive prompt. Delivery is
//! best-effort: a telemetry problem can never change the installer's
//! outcome or exit code.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use inquire::Confirm;
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::InstallRequest;
use crate::error::FailureEvent;
use crate::platform;

/// Fixed ingestion endpoint for installer failure events
pub const TELEMETRY_ENDPOINT: &str = "https://telemetry.orbit.dev/v1/events";

/// Environment opt-out: `ORBIT_COLLECT_TELEMETRY=no` disables reporting
pub const OPT_OUT_ENV_VAR: &str = "ORBIT_COLLECT_TELEMETRY";

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// A single failure report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub properties: BTreeMap<String, String>,
}

/// Check the environment opt-out variable
pub fn env_opt_out() -> bool {
    std::env::var(OPT_OUT_ENV_VAR)
        .map(|value| opt_out_value(&value))
        .unwrap_or(false)
}

fn opt_out_value(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("no") || value.eq_ignore_ascii_case("false") || value == "0"
}

/// Host properties attached to every event
fn default_properties() -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();
    properties.insert("os".to_string(), platform::os_family().to_string());
    properties.insert("osVersion".to_string(), platform::os_version());
    properties.insert("isWsl".to_string(), platform::wsl_flag());
    properties.insert("terminal".to_string(), platform::host_terminal());
    properties.insert(
        "environment".to_string(),
        platform::execution_environment().to_string(),
    );
    properties
}

/// Assemble an event from a failure; caller-supplied properties override
/// the host defaults.
pub fn build_event(name: &str, reason: Option<String>, extra: BTreeMap<String, String>) -> TelemetryEvent {
    let mut properties = default_properties();
    properties.extend(extra);
    TelemetryEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        name: name.to_string(),
        reason,
        properties,
    }
}

/// Report a pipeline failure, honoring opt-out and consent.
///
/// Never returns an error: every way this can go wrong is logged and
/// swallowed so the original failure keeps its exit code.
pub async fn report_failure(request: &InstallRequest, failure: FailureEvent) {
    if request.telemetry_opt_out {
        debug!("telemetry disabled; not reporting {}", failure.name);
        return;
    }
    if !platform::is_interactive() {
        debug!("non-interactive session; not reporting {}", failure.name);
        return;
    }
    if !confirm_consent() {
        info!("telemetry report declined");
        return;
    }

    let event = build_event(failure.name, Some(failure.reason), failure.properties);
    match send(&event).await {
        Ok(()) => info!("failure report sent ({})", event.name),
        Err(e) => warn!("telemetry delivery failed (ignored): {e:#}"),
    }
}

/// Ask for consent; default and every error path mean "no"
fn confirm_consent() -> bool {
    Confirm::new("Send an anonymous failure report to help improve the installer?")
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}

async fn send(event: &TelemetryEvent) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(SEND_TIMEOUT)
        .user_agent(concat!("orbit-install/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let response = client.post(TELEMETRY_ENDPOINT).json(event).send().await?;
    if !response.status().is_success() {
        bail!("telemetry endpoint returned HTTP {}", response.status());
    }
    Ok(())
}
