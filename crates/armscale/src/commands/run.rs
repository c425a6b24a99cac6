//! `run` handler: the full provisioning scenario.
//!
//! Logs are the only output. Failures are logged, not returned, so the
//! process exits normally once cleanup has been attempted.

use miette::Diagnostic;
use tracing::{error, info, warn};

use armscale_core::{Cleanup, ScenarioReport, connect};

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::load_config;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    match execute(global).await {
        Ok(report) => log_summary(&report),
        Err(err) => {
            error!("{err}");
            if let Some(help) = err.help() {
                info!("{help}");
            }
        }
    }
    Ok(())
}

async fn execute(global: &GlobalOpts) -> Result<ScenarioReport, CliError> {
    let config = load_config(global)?;
    let management = config.management_config()?;

    let session = connect(&management).await?;
    let report = armscale_core::run(&session, &config.scenario, &config.policy).await?;
    Ok(report)
}

fn log_summary(report: &ScenarioReport) {
    info!(
        resource_group = %report.resource_group.name,
        web_app = %report.web_site.resource.name,
        plan = %report.plan.name,
        autoscale_setting = %report.autoscale_setting.name,
        "scenario complete"
    );
    match &report.cleanup {
        Cleanup::Failed { id, .. } => {
            warn!(%id, "resource group may still exist; delete it manually");
        }
        Cleanup::Deleted { .. } | Cleanup::NotNeeded => {}
    }
}
