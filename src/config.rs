//! Invocation configuration
//!
//! An [`InstallRequest`] is built exactly once from the parsed command
//! line plus the telemetry opt-out environment variable, and is immutable
//! for the rest of the run.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use url::Url;

use crate::cli::Args;
use crate::platform::Platform;
use crate::telemetry;

/// Default release host serving standalone Orbit artifacts
pub const DEFAULT_BASE_URL: &str = "https://releases.orbit.dev/cli/standalone";

/// Version selector understood by the release host.
///
/// The sentinels are literal path segments on the host; only explicit
/// versions are validated locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    Latest,
    Daily,
    Stable,
    Exact(semver::Version),
}

impl FromStr for VersionSelector {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        match input {
            "latest" => Ok(VersionSelector::Latest),
            "daily" => Ok(VersionSelector::Daily),
            "stable" => Ok(VersionSelector::Stable),
            other => {
                let version = semver::Version::parse(other).with_context(|| {
                    format!("`{other}` is not a semantic version or one of latest/daily/stable")
                })?;
                Ok(VersionSelector::Exact(version))
            }
        }
    }
}

impl std::fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionSelector::Latest => f.write_str("latest"),
            VersionSelector::Daily => f.write_str("daily"),
            VersionSelector::Stable => f.write_str("stable"),
            VersionSelector::Exact(version) => write!(f, "{version}"),
        }
    }
}

/// Immutable parameters for one installer invocation
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub base_url: Url,
    pub version: VersionSelector,
    pub platform: Platform,
    pub install_folder: Option<PathBuf>,
    pub symlink_folder: Option<PathBuf>,
    pub bootstrap_url: Option<String>,
    pub skip_verify: bool,
    pub dry_run: bool,
    pub timeout: Duration,
    pub telemetry_opt_out: bool,
}

impl InstallRequest {
    /// Build the request from parsed arguments and the environment.
    pub fn from_args(args: Args) -> Result<Self> {
        let base_url = Url::parse(&args.base_url)
            .with_context(|| format!("invalid base URL `{}`", args.base_url))?;
        let version = args.version.parse()?;

        let platform = match args.platform {
            Some(platform) => platform,
            None => Platform::host().context("could not detect host platform; pass --platform")?,
        };

        if !platform.is_unix() {
            if args.symlink_folder.is_some() {
                bail!("--symlink-folder only applies to Unix-like platforms");
            }
            if args.bootstrap_url.is_some() {
                bail!("--bootstrap-url only applies to Unix-like platforms");
            }
        }

        Ok(InstallRequest {
            base_url,
            version,
            platform,
            install_folder: args.install_folder,
            symlink_folder: args.symlink_folder,
            bootstrap_url: args.bootstrap_url,
            skip_verify: args.skip_verify,
            dry_run: args.dry_run,
            timeout: Duration::from_secs(args.timeout),
            telemetry_opt_out: args.no_telemetry || telemetry::env_opt_out(),
        })
    }
}
