//! Config command - inspect and edit persisted settings

use super::Result;
use crate::VqaError;
use crate::cli::ConfigCommands;
use crate::config::AppConfig;
use colored::Colorize;
use std::path::Path;

/// Execute a config subcommand against the config file at `path`
///
/// # Errors
/// Returns an error if the configuration cannot be loaded, parsed or saved.
pub fn execute(command: &ConfigCommands, path: &Path, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            let config = AppConfig::load_from(path)?;
            let text = toml::to_string_pretty(&config)
                .map_err(|e| VqaError::InvalidInput(format!("Failed to render config: {e}")))?;
            print!("{text}");
        }
        ConfigCommands::Set { key, value } => {
            let mut config = AppConfig::load_from(path)?;
            config.set(key, value)?;
            config.save_to(path)?;
            if !quiet {
                println!("{} {key} = {value}", "✓".green());
            }
        }
    }
    Ok(())
}
