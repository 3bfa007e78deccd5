use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_BASE_URL;
use crate::platform::Platform;

/// Command-line arguments for orbit-install
#[derive(Parser, Debug, Clone)]
#[command(name = "orbit-install")]
#[command(about = "Download, verify and install the Orbit CLI")]
pub struct Args {
    /// Base URL of the release host
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Version to install: a semantic version, or `latest`/`daily`/`stable`
    #[arg(long, default_value = "stable")]
    pub version: String,

    /// Target platform (defaults to the host operating system)
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// Print the resolved artifact URL and exit without installing
    #[arg(long)]
    pub dry_run: bool,

    /// Installation folder, passed through to the platform installer
    #[arg(long)]
    pub install_folder: Option<PathBuf>,

    /// Symlink folder, passed through to the installer (Unix-like only)
    #[arg(long)]
    pub symlink_folder: Option<PathBuf>,

    /// Alternate bootstrap install script URL (Unix-like only)
    #[arg(long)]
    pub bootstrap_url: Option<String>,

    /// Download timeout in seconds
    #[arg(long, default_value_t = 120)]
    pub timeout: u64,

    /// Skip publisher signature verification
    #[arg(long)]
    pub skip_verify: bool,

    /// Disable failure telemetry reporting
    ///
    /// Telemetry is also disabled when ORBIT_COLLECT_TELEMETRY=no is set.
    #[arg(long)]
    pub no_telemetry: bool,

    /// Verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
