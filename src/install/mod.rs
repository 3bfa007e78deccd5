//! Linear install pipeline
//!
//! Resolve URL → check host installer → download → verify → install.
//! Each step completes (or fails) before the next begins; the temp
//! workspace is a `TempDir` guard so it is removed on every exit path.

mod download;
mod runner;
mod url;
mod verify;

pub use self::url::{resolve_artifact_url, resolve_bootstrap_url};

use anyhow::Context;
use log::{info, warn};
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::config::InstallRequest;
use crate::error::InstallError;

/// Run the full install pipeline for one request.
///
/// A dry run prints the resolved artifact URL and returns before any
/// network or filesystem action; it is reachable for any requested
/// platform regardless of the host OS.
pub async fn run(request: &InstallRequest) -> Result<(), InstallError> {
    let artifact_url = resolve_artifact_url(&request.base_url, &request.version, request.platform);

    if request.dry_run {
        println!("{artifact_url}");
        return Ok(());
    }

    ensure_installer_available(request)?;

    let client = download::http_client()?;
    let workspace = tempfile::Builder::new()
        .prefix("orbit-install-")
        .tempdir()
        .context("failed to create temporary workspace")?;

    status_line(&format!("📥 Downloading Orbit {} ...", request.version));
    let artifact = download::fetch_to(&client, &artifact_url, workspace.path(), request.timeout)
        .await
        .map_err(|e| InstallError::Download {
            reason: format!("{e:#}"),
        })?;

    if request.skip_verify {
        warn!("publisher signature verification skipped by request");
    } else {
        let signature_url = format!("{artifact_url}.sig");
        let signature_file =
            download::fetch_to(&client, &signature_url, workspace.path(), request.timeout)
                .await
                .map_err(|e| InstallError::SignatureInvalid {
                    reason: format!("publisher signature unavailable: {e:#}"),
                })?;
        let publisher_key = verify::publisher_key()?;
        verify::verify_artifact(&artifact, &signature_file, &publisher_key).map_err(|e| {
            InstallError::SignatureInvalid {
                reason: format!("{e:#}"),
            }
        })?;
        status_line("🔐 Publisher signature verified");
    }

    runner::install_artifact(request, &artifact, workspace.path(), &client).await?;

    info!("removing temporary workspace {}", workspace.path().display());
    drop(workspace);

    runner::print_success(request.platform);
    Ok(())
}

/// Locate the platform's native installer before touching the network.
///
/// A missing host command is immediately fatal and is the one failure
/// that is never reported via telemetry.
fn ensure_installer_available(request: &InstallRequest) -> Result<(), InstallError> {
    let command = request.platform.installer_command();
    which::which(command).map_err(|_| InstallError::MissingDependency {
        command: command.to_string(),
    })?;
    Ok(())
}

fn status_line(message: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Always);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
    let _ = writeln!(stdout, "{message}");
    let _ = stdout.reset();
}
