//! Config subcommand handlers.

use armscale_config::config_path;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::load_config;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = global.config.clone().unwrap_or_else(config_path);
            output::print_output(&path.display().to_string());
            Ok(())
        }
        ConfigCommand::Show => {
            let config = load_config(global)?;
            output::print_output(config.redacted().to_toml()?.trim_end());
            Ok(())
        }
    }
}
