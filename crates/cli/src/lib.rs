//! Process wrappers around [`veritas_db::seed`] and [`veritas_db::verify`].
//!
//! Both binaries read the store settings from the environment (a `.env` file
//! is honoured):
//!
//! | Variable            | Required | Default | Description                       |
//! |---------------------|----------|---------|-----------------------------------|
//! | `KV_BACKEND`        | no       | `rest` when `KV_REST_API_URL` is set | `rest` or `memory` |
//! | `KV_REST_API_URL`   | for rest | --      | Redis REST endpoint               |
//! | `KV_REST_API_TOKEN` | for rest | --      | Bearer token for the endpoint     |
//! | `KV_TIMEOUT_SECS`   | no       | `10`    | Per-request timeout               |
//!
//! Status lines go to the given writer (stdout in the binaries); diagnostics
//! go through `tracing`.

use std::io::Write;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veritas_db::seed::{seed, SeedOutcome};
use veritas_db::verify::verify;
use veritas_db::{DbStore, KvStore, StoreConfig};

/// Install the tracing subscriber used by both binaries.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veritas_cli=info,veritas_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Connect to the store described by the `KV_*` environment variables and
/// make sure it answers.
pub async fn connect_from_env() -> Result<DbStore> {
    let config = StoreConfig::from_env().context("Invalid key-value store configuration")?;
    let store = veritas_db::connect(&config).context("Failed to create key-value store client")?;
    veritas_db::health_check(store.as_ref())
        .await
        .context("Key-value store is unreachable")?;
    Ok(store)
}

/// Seed the store. Returns `true` when the process should exit 0.
///
/// An already populated store is not a failure.
pub async fn run_seed(store: &dyn KvStore, out: &mut impl Write) -> Result<bool> {
    writeln!(out, "Seeding version data...")?;
    match seed(store).await.context("Seeding failed")? {
        SeedOutcome::Seeded {
            documents,
            sections,
        } => {
            writeln!(
                out,
                "Seeded {documents} document version(s) and {sections} section version(s)."
            )?;
        }
        SeedOutcome::Skipped { populated } => {
            writeln!(
                out,
                "Store already contains data ({}); nothing written.",
                populated.join(", ")
            )?;
        }
    }
    Ok(true)
}

/// Check every invariant. Returns `true` when the store is consistent.
pub async fn run_verify(store: &dyn KvStore, out: &mut impl Write) -> Result<bool> {
    writeln!(out, "Verifying version data...")?;
    let report = verify(store).await.context("Verification failed")?;

    writeln!(
        out,
        "Checked {} document version(s) and {} section version(s).",
        report.documents, report.sections
    )?;
    if report.is_consistent() {
        writeln!(out, "OK: all version data is consistent.")?;
        return Ok(true);
    }

    writeln!(out, "FAILED: {} issue(s) found:", report.issues.len())?;
    for issue in &report.issues {
        writeln!(out, "  - {issue}")?;
    }
    Ok(false)
}
