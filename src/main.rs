use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use orbit_install::cli::Args;
use orbit_install::config::InstallRequest;
use orbit_install::{install, telemetry};

fn main() {
    let args = Args::parse();

    // Initialize logger with custom format for the installer
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("FATAL: Failed to create Tokio runtime: {e}");
            std::process::exit(1);
        }
    };
    std::process::exit(rt.block_on(real_main(args)));
}

async fn real_main(args: Args) -> i32 {
    let request = match build_request(args) {
        Ok(request) => request,
        Err(e) => {
            error!("{e:#}");
            return 1;
        }
    };

    match install::run(&request).await {
        Ok(()) => 0,
        Err(err) => {
            error!("{err:#}");
            if let Some(failure) = err.telemetry_event() {
                // Best-effort: the report can never change the exit code.
                telemetry::report_failure(&request, failure).await;
            }
            1
        }
    }
}

fn build_request(args: Args) -> Result<InstallRequest> {
    InstallRequest::from_args(args).context("invalid invocation")
}
