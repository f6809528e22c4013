//! `veritas-verify` -- check the stored version data for consistency.
//!
//! Exits 1 when any issue is found. Never modifies the store.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    veritas_cli::init_tracing();

    let result: anyhow::Result<bool> = async {
        let store = veritas_cli::connect_from_env().await?;
        veritas_cli::run_verify(store.as_ref(), &mut std::io::stdout()).await
    }
    .await;

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = ?e, "Verify aborted");
            println!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
