//! Slotwise bootstrap
//!
//! Loads configuration, installs tracing, opens and migrates the database and
//! checks that it answers. Hosts embed `slotwise_lib` to serve commands.

use std::process::ExitCode;

use slotwise_domain::{Result, SlotwiseError};
use slotwise_lib::utils::logging::{init_tracing, init_tracing_or_fallback};
use slotwise_lib::AppContext;
use tracing::{error, info};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "slotwise bootstrap failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = match slotwise_infra::config::load() {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info")?;
            return Err(err);
        }
    };
    init_tracing_or_fallback(&config.log_level)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| SlotwiseError::Internal(format!("failed to start runtime: {e}")))?;

    runtime.block_on(async {
        let ctx = AppContext::new(config)?;
        ctx.health_check()?;

        let pending = slotwise_lib::list_pending_reconciliations(&ctx).await?;
        info!(
            db_path = %ctx.db.path().display(),
            pending_reconciliations = pending.len(),
            "slotwise ready"
        );
        Ok(())
    })
}
