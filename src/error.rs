//! Failure taxonomy for the install pipeline
//!
//! Every fatal outcome maps to exactly one variant; `main` maps any of
//! them to exit code 1. `MissingDependency` is the one category that is
//! never reported via telemetry.

use std::collections::BTreeMap;
use thiserror::Error;

/// Windows Installer exit code for a fatal, often already-installed, failure
pub const MSI_ERROR_INSTALL_FAILURE: i32 = 1603;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("required command `{command}` was not found on PATH")]
    MissingDependency { command: String },

    #[error("download failed: {reason}")]
    Download { reason: String },

    #[error("signature verification failed: {reason}")]
    SignatureInvalid { reason: String },

    #[error("{reason}")]
    Installer { code: i32, reason: String },

    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

impl InstallError {
    /// Build an installer failure from the platform installer's exit code,
    /// translating the well-known 1603 case into actionable guidance.
    pub fn installer(code: i32) -> Self {
        let reason = if code == MSI_ERROR_INSTALL_FAILURE {
            format!(
                "platform installer exited with code {code}: a newer or older version \
                 of Orbit may already be installed; uninstall it and retry"
            )
        } else {
            format!("platform installer exited with code {code}")
        };
        InstallError::Installer { code, reason }
    }

    /// Telemetry event for this failure, `None` for categories that are
    /// never reported.
    pub fn telemetry_event(&self) -> Option<FailureEvent> {
        let mut properties = BTreeMap::new();
        let name = match self {
            InstallError::MissingDependency { .. } => return None,
            InstallError::Download { .. } => "install.download.failed",
            InstallError::SignatureInvalid { .. } => "install.signature.invalid",
            InstallError::Installer { code, .. } => {
                properties.insert("installerExitCode".to_string(), code.to_string());
                "install.installer.failed"
            }
            InstallError::Unhandled(_) => "install.unhandled.error",
        };
        Some(FailureEvent {
            name,
            reason: format!("{self:#}"),
            properties,
        })
    }
}

/// What a failure contributes to its (at most one) telemetry report
#[derive(Debug)]
pub struct FailureEvent {
    pub name: &'static str,
    pub reason: String,
    pub properties: BTreeMap<String, String>,
}
