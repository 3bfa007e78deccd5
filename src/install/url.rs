//! Artifact and bootstrap URL resolution
//!
//! Pure string composition: `<base>/<version>/<artifact filename>`.
//! The version sentinels (`latest`/`daily`/`stable`) are path segments
//! understood by the release host.

use url::Url;

use crate::config::{InstallRequest, VersionSelector};
use crate::platform::Platform;

/// Name of the shell bootstrap installer published next to Unix artifacts
const BOOTSTRAP_SCRIPT: &str = "install-orbit.sh";

/// Resolve the download URL for one (base, version, platform) combination.
pub fn resolve_artifact_url(base_url: &Url, version: &VersionSelector, platform: Platform) -> String {
    format!(
        "{}/{}/{}",
        base_url.as_str().trim_end_matches('/'),
        version,
        platform.artifact_filename()
    )
}

/// Resolve the bootstrap script URL for Unix-like installs.
///
/// Defaults to the script published alongside the artifact; the caller
/// may override it wholesale.
pub fn resolve_bootstrap_url(request: &InstallRequest) -> String {
    match &request.bootstrap_url {
        Some(explicit) => explicit.clone(),
        None => format!(
            "{}/{}/{}",
            request.base_url.as_str().trim_end_matches('/'),
            request.version,
            BOOTSTRAP_SCRIPT
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://releases.orbit.dev/cli/standalone").unwrap()
    }

    #[test]
    fn stable_linux_url_matches_contract() {
        let url = resolve_artifact_url(&base(), &VersionSelector::Stable, Platform::Linux);
        assert_eq!(
            url,
            "https://releases.orbit.dev/cli/standalone/stable/orbit-linux-amd64.tar.gz"
        );
    }

    #[test]
    fn every_platform_and_sentinel_resolves() {
        let cases = [
            (VersionSelector::Latest, Platform::Windows, "latest/orbit-windows-amd64.msi"),
            (VersionSelector::Daily, Platform::Mac, "daily/orbit-darwin-amd64.zip"),
            (VersionSelector::Stable, Platform::Linux, "stable/orbit-linux-amd64.tar.gz"),
        ];
        for (version, platform, suffix) in cases {
            let url = resolve_artifact_url(&base(), &version, platform);
            assert_eq!(url, format!("https://releases.orbit.dev/cli/standalone/{suffix}"));
        }
    }

    #[test]
    fn exact_versions_become_path_segments() {
        let version = VersionSelector::Exact(semver::Version::new(1, 4, 2));
        let url = resolve_artifact_url(&base(), &version, Platform::Windows);
        assert_eq!(
            url,
            "https://releases.orbit.dev/cli/standalone/1.4.2/orbit-windows-amd64.msi"
        );
    }

    #[test]
    fn bootstrap_url_defaults_next_to_artifact() {
        let mut request = linux_request();
        assert_eq!(
            resolve_bootstrap_url(&request),
            "https://releases.orbit.dev/cli/standalone/stable/install-orbit.sh"
        );

        request.bootstrap_url = Some("https://mirror.example/install.sh".to_string());
        assert_eq!(resolve_bootstrap_url(&request), "https://mirror.example/install.sh");
    }

    fn linux_request() -> InstallRequest {
        InstallRequest {
            base_url: base(),
            version: VersionSelector::Stable,
            platform: Platform::Linux,
            install_folder: None,
            symlink_folder: None,
            bootstrap_url: None,
            skip_verify: false,
            dry_run: false,
            timeout: std::time::Duration::from_secs(120),
            telemetry_opt_out: false,
        }
    }

    #[test]
    fn trailing_slash_on_base_url_is_tolerated() {
        let base = Url::parse("https://releases.orbit.dev/cli/standalone/").unwrap();
        let url = resolve_artifact_url(&base, &VersionSelector::Stable, Platform::Linux);
        assert_eq!(
            url,
            "https://releases.orbit.dev/cli/standalone/stable/orbit-linux-amd64.tar.gz"
        );
    }
}
