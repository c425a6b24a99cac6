//! Subcommand handlers.

pub mod config_cmd;
pub mod policy;
pub mod run;

use armscale_config::Config;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load configuration and apply global flag overrides.
pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut config = armscale_config::load_config(global.config.as_deref())?;
    if let Some(timeout) = global.timeout {
        config.cloud.timeout = timeout;
    }
    Ok(config)
}
