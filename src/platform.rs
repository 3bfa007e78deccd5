//! Platform identity and host environment queries
//!
//! Target platform selection drives artifact naming and the choice of
//! native installer. The host queries at the bottom feed telemetry only
//! and degrade to the `"error"` sentinel instead of failing.

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use once_cell::sync::OnceCell;

/// Sentinel returned by host queries when the underlying source is unavailable.
pub const QUERY_ERROR: &str = "error";

/// Target platform for the artifact being installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Windows,
    Linux,
    Mac,
}

/// Global cache for host platform detection (initialized once, used everywhere)
static HOST_PLATFORM: OnceCell<Platform> = OnceCell::new();

impl Platform {
    /// Detect the host platform (cached after first call)
    pub fn host() -> Result<Self> {
        HOST_PLATFORM.get_or_try_init(Self::host_uncached).copied()
    }

    /// Internal uncached detection - called only once
    fn host_uncached() -> Result<Self> {
        match std::env::consts::OS {
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "macos" => Ok(Platform::Mac),
            other => Err(anyhow!("unsupported host platform: {other}")),
        }
    }

    /// Release artifact filename for this platform
    pub fn artifact_filename(&self) -> &'static str {
        match self {
            Platform::Windows => "orbit-windows-amd64.msi",
            Platform::Linux => "orbit-linux-amd64.tar.gz",
            Platform::Mac => "orbit-darwin-amd64.zip",
        }
    }

    /// Host command that performs the actual installation
    pub fn installer_command(&self) -> &'static str {
        match self {
            Platform::Windows => "msiexec",
            Platform::Linux | Platform::Mac => "sh",
        }
    }

    pub fn is_unix(&self) -> bool {
        matches!(self, Platform::Linux | Platform::Mac)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Mac => "mac",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host OS family as reported by the toolchain ("linux", "macos", "windows")
pub fn os_family() -> &'static str {
    std::env::consts::OS
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        /// Host OS version string, `"error"` when it cannot be determined
        pub fn os_version() -> String {
            match std::fs::read_to_string("/proc/sys/kernel/osrelease") {
                Ok(release) => release.trim().to_string(),
                Err(_) => QUERY_ERROR.to_string(),
            }
        }

        /// WSL detection flag for telemetry: `"true"`, `"false"` or `"error"`
        pub fn wsl_flag() -> String {
            match std::fs::read_to_string("/proc/sys/kernel/osrelease") {
                Ok(release) => {
                    if release.to_ascii_lowercase().contains("microsoft") {
                        "true".to_string()
                    } else {
                        "false".to_string()
                    }
                }
                Err(_) => QUERY_ERROR.to_string(),
            }
        }
    } else if #[cfg(target_os = "macos")] {
        /// Host OS version string, `"error"` when it cannot be determined
        pub fn os_version() -> String {
            command_stdout("sw_vers", &["-productVersion"])
        }

        /// WSL only exists atop non-Linux kernels running a Linux userland
        pub fn wsl_flag() -> String {
            "false".to_string()
        }
    } else if #[cfg(target_os = "windows")] {
        /// Host OS version string, `"error"` when it cannot be determined
        pub fn os_version() -> String {
            command_stdout("cmd", &["/c", "ver"])
        }

        /// The installer itself runs on the Windows side, not inside WSL
        pub fn wsl_flag() -> String {
            "false".to_string()
        }
    } else {
        /// Host OS version string, `"error"` when it cannot be determined
        pub fn os_version() -> String {
            QUERY_ERROR.to_string()
        }

        /// WSL detection flag for telemetry
        pub fn wsl_flag() -> String {
            "false".to_string()
        }
    }
}

/// Name of the hosting terminal, `"error"` when no env hint is present
pub fn host_terminal() -> String {
    if let Ok(name) = std::env::var("TERM_PROGRAM") {
        return name;
    }
    if std::env::var_os("WT_SESSION").is_some() {
        return "Windows Terminal".to_string();
    }
    if let Ok(name) = std::env::var("TERM") {
        return name;
    }
    QUERY_ERROR.to_string()
}

/// Execution environment classification for telemetry.
///
/// Reads `GITHUB_ACTIONS` and `TF_BUILD` only - these variables never
/// change control flow anywhere else in the installer.
pub fn execution_environment() -> &'static str {
    classify_execution_environment(
        std::env::var("GITHUB_ACTIONS").ok().as_deref(),
        std::env::var("TF_BUILD").ok().as_deref(),
    )
}

pub(crate) fn classify_execution_environment(
    github_actions: Option<&str>,
    tf_build: Option<&str>,
) -> &'static str {
    if github_actions.is_some_and(|v| v.eq_ignore_ascii_case("true")) {
        "github-actions"
    } else if tf_build.is_some_and(|v| v.eq_ignore_ascii_case("true")) {
        "azure-pipelines"
    } else {
        "desktop"
    }
}

/// Check whether both ends of the console are terminals.
///
/// The consent prompt is only shown in interactive sessions; everything
/// else treats the session as non-interactive and never blocks.
pub fn is_interactive() -> bool {
    use std::io::IsTerminal;
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn command_stdout(program: &str, args: &[&str]) -> String {
    match std::process::Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        _ => QUERY_ERROR.to_string(),
    }
}
