//! orbit-install library
//!
//! Programmatic access to the signed-artifact fetch-and-install pipeline
//! used by the `orbit-install` binary: resolve a release URL, download
//! the artifact, verify the publisher signature, and hand it to the
//! platform's native installer. Failure telemetry is consent-gated and
//! best-effort.

pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod platform;
pub mod telemetry;
