//! Black-box tests against the compiled binary.

use std::process::Command;

fn orbit_install() -> Command {
    Command::new(env!("CARGO_BIN_EXE_orbit-install"))
}

#[test]
fn dry_run_prints_exactly_the_resolved_url() {
    let output = orbit_install()
        .args([
            "--dry-run",
            "--platform",
            "linux",
            "--version",
            "stable",
            "--base-url",
            "https://releases.orbit.dev/cli/standalone",
        ])
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "exit status: {}", output.status);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "https://releases.orbit.dev/cli/standalone/stable/orbit-linux-amd64.tar.gz\n"
    );
}

#[test]
fn dry_run_covers_foreign_platforms() {
    let output = orbit_install()
        .args(["--dry-run", "--platform", "windows", "--version", "1.4.2"])
        .output()
        .expect("binary runs");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "https://releases.orbit.dev/cli/standalone/1.4.2/orbit-windows-amd64.msi\n"
    );
}

#[test]
fn malformed_version_fails_before_any_network_traffic() {
    let output = orbit_install()
        .args(["--dry-run", "--platform", "linux", "--version", "not-a-version"])
        .output()
        .expect("binary runs");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not-a-version"), "stderr was: {stderr}");
}

#[test]
fn unix_only_flags_are_rejected_on_windows_targets() {
    let output = orbit_install()
        .args([
            "--dry-run",
            "--platform",
            "windows",
            "--symlink-folder",
            "/usr/local/bin",
        ])
        .output()
        .expect("binary runs");

    assert_eq!(output.status.code(), Some(1));
}
