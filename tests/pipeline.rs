//! End-to-end pipeline behavior against a local release host stub.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

use orbit_install::config::{InstallRequest, VersionSelector};
use orbit_install::error::InstallError;
use orbit_install::install;
use orbit_install::platform::Platform;

fn request(base_url: &str, platform: Platform) -> InstallRequest {
    InstallRequest {
        base_url: Url::parse(base_url).unwrap(),
        version: VersionSelector::Stable,
        platform,
        install_folder: None,
        symlink_folder: None,
        bootstrap_url: None,
        skip_verify: false,
        dry_run: false,
        timeout: Duration::from_secs(5),
        telemetry_opt_out: true,
    }
}

/// Minimal release-host stub: serves `routes` by exact path, 404 otherwise.
async fn spawn_host(routes: Vec<(&'static str, Vec<u8>)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = vec![0u8; 2048];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let request_line = String::from_utf8_lossy(&buf[..n]);
            let path = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or("/")
                .to_string();
            let body = routes
                .iter()
                .find(|(route, _)| *route == path)
                .map(|(_, body)| body.clone());
            let response = match body {
                Some(body) => {
                    let mut response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                        body.len()
                    )
                    .into_bytes();
                    response.extend_from_slice(&body);
                    response
                }
                None => {
                    b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                        .to_vec()
                }
            };
            let _ = socket.write_all(&response).await;
        }
    });
    format!("http://{addr}")
}

fn workspace_dirs() -> BTreeSet<PathBuf> {
    std::fs::read_dir(std::env::temp_dir())
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.starts_with("orbit-install-"))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn dry_run_resolves_without_side_effects() {
    let mut req = request("https://releases.orbit.dev/cli/standalone", Platform::Linux);
    req.dry_run = true;

    // Reachable for every requested platform, independent of the host OS,
    // and with no release host listening anywhere.
    for platform in [Platform::Windows, Platform::Linux, Platform::Mac] {
        req.platform = platform;
        install::run(&req).await.unwrap();
    }

    assert_eq!(
        install::resolve_artifact_url(&req.base_url, &req.version, Platform::Linux),
        "https://releases.orbit.dev/cli/standalone/stable/orbit-linux-amd64.tar.gz"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn failures_surface_and_remove_the_workspace() {
    // Scenario 1: download fails (empty host) -> Download error, workspace gone.
    let before = workspace_dirs();
    let host = spawn_host(vec![]).await;
    let req = request(&host, Platform::Linux);
    let err = install::run(&req).await.expect_err("404 must fail");
    assert!(
        matches!(err, InstallError::Download { .. }),
        "unexpected error: {err}"
    );
    assert!(
        workspace_dirs().is_subset(&before),
        "temporary workspace leaked"
    );

    // Scenario 2: artifact downloads but its signature is missing ->
    // SignatureInvalid, and the installer is never reached (reaching it
    // would have produced a Download error for the bootstrap script
    // or an Installer error instead).
    let before = workspace_dirs();
    let host = spawn_host(vec![(
        "/stable/orbit-linux-amd64.tar.gz",
        b"artifact bytes".to_vec(),
    )])
    .await;
    let req = request(&host, Platform::Linux);
    let err = install::run(&req).await.expect_err("missing signature must fail");
    assert!(
        matches!(err, InstallError::SignatureInvalid { .. }),
        "unexpected error: {err}"
    );
    assert!(
        workspace_dirs().is_subset(&before),
        "temporary workspace leaked"
    );

    // Scenario 3: signature present but garbage -> SignatureInvalid.
    let host = spawn_host(vec![
        (
            "/stable/orbit-linux-amd64.tar.gz",
            b"artifact bytes".to_vec(),
        ),
        (
            "/stable/orbit-linux-amd64.tar.gz.sig",
            b"not a pem block".to_vec(),
        ),
    ])
    .await;
    let req = request(&host, Platform::Linux);
    let err = install::run(&req).await.expect_err("garbage signature must fail");
    assert!(
        matches!(err, InstallError::SignatureInvalid { .. }),
        "unexpected error: {err}"
    );

    // Scenario 4: with verification skipped and no bootstrap script
    // published, the pipeline must get past the signature step and fail
    // on the script download instead.
    let host = spawn_host(vec![(
        "/stable/orbit-linux-amd64.tar.gz",
        b"artifact bytes".to_vec(),
    )])
    .await;
    let mut req = request(&host, Platform::Linux);
    req.skip_verify = true;

    let err = install::run(&req).await.expect_err("bootstrap fetch must fail");
    match err {
        InstallError::Download { reason } => {
            assert!(reason.contains("bootstrap"), "reason was: {reason}")
        }
        other => panic!("unexpected error: {other}"),
    }
}
