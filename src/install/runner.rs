//! Native installer invocation
//!
//! Windows hands the MSI to msiexec in quiet mode; Unix-like platforms
//! run the published bootstrap script through `sh`. Either way the child
//! is awaited to completion and a non-zero exit is fatal.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use log::info;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tokio::process::Command;

use super::{download, url};
use crate::config::InstallRequest;
use crate::error::InstallError;
use crate::platform::Platform;

/// Install the downloaded artifact with the platform's native mechanism.
pub async fn install_artifact(
    request: &InstallRequest,
    artifact: &Path,
    workspace: &Path,
    client: &reqwest::Client,
) -> Result<(), InstallError> {
    match request.platform {
        Platform::Windows => install_msi(request, artifact).await,
        Platform::Linux | Platform::Mac => {
            install_with_bootstrap(request, artifact, workspace, client).await
        }
    }
}

/// Quiet MSI install; exit code 1603 gets the "already installed" hint.
async fn install_msi(request: &InstallRequest, artifact: &Path) -> Result<(), InstallError> {
    let mut command = Command::new("msiexec");
    command.arg("/i").arg(artifact).arg("/qn");
    if let Some(folder) = &request.install_folder {
        command.arg(format!("INSTALLDIR={}", folder.display()));
    }

    info!("running msiexec /i {} /qn", artifact.display());
    let status = command
        .status()
        .await
        .context("failed to launch msiexec")?;
    if status.success() {
        return Ok(());
    }
    Err(InstallError::installer(status.code().unwrap_or(-1)))
}

/// Fetch the bootstrap script next to the artifact and run it via `sh`.
async fn install_with_bootstrap(
    request: &InstallRequest,
    artifact: &Path,
    workspace: &Path,
    client: &reqwest::Client,
) -> Result<(), InstallError> {
    let script_url = url::resolve_bootstrap_url(request);
    let script = download::fetch_to(client, &script_url, workspace, request.timeout)
        .await
        .map_err(|e| InstallError::Download {
            reason: format!("bootstrap script unavailable: {e:#}"),
        })?;

    let mut command = Command::new("sh");
    command.arg(&script).arg("--from-package").arg(artifact);
    if let Some(folder) = &request.install_folder {
        command.arg("--install-folder").arg(folder);
    }
    if let Some(folder) = &request.symlink_folder {
        command.arg("--symlink-folder").arg(folder);
    }

    info!("running sh {} --from-package {}", script.display(), artifact.display());
    let status = command
        .status()
        .await
        .context("failed to launch sh")?;
    if status.success() {
        return Ok(());
    }
    Err(InstallError::installer(status.code().unwrap_or(-1)))
}

/// Post-install guidance, platform-appropriate.
pub fn print_success(platform: Platform) {
    let mut stdout = StandardStream::stdout(ColorChoice::Always);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = writeln!(stdout, "\n✅ Orbit CLI installed successfully");
    let _ = stdout.reset();
    match platform {
        Platform::Windows => {
            let _ = writeln!(
                stdout,
                "   Restart your terminal (or open a new one) so PATH changes take effect."
            );
        }
        Platform::Linux | Platform::Mac => {
            let _ = writeln!(
                stdout,
                "   Start a new shell, or run `exec $SHELL`, to pick up the orbit binary."
            );
        }
    }
}
