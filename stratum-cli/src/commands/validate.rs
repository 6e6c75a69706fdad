//! Command to validate a stratum settings file.

use crate::error::CliError;
use crate::utils::{shorten_path, GlobalOptions};
use clap::Args;
use std::path::PathBuf;
use stratum::settings::{SettingsLoader, SettingsValidator};

/// Validate a stratum settings file.
#[derive(Args)]
pub struct ValidateCommand {
    /// Settings file to validate
    #[arg(value_name = "SETTINGS_PATH")]
    pub settings_path: PathBuf,
}

impl ValidateCommand {
    /// Execute the validate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Check file exists
        if !self.settings_path.exists() {
            return Err(CliError::InvalidArguments(format!(
                "File not found: {}",
                self.settings_path.display()
            )));
        }

        // 2. Parse the file
        let settings = match SettingsLoader::load_file(&self.settings_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Parse error: {e}");
                return Err(CliError::SemanticFailure(
                    "Settings file is invalid".to_string(),
                ));
            }
        };

        // 3. Validate the settings
        match SettingsValidator::validate(&settings) {
            Ok(()) => {
                global.logger.info(&format!(
                    "Validated {}",
                    shorten_path(&self.settings_path)
                ));
                println!("Settings are valid");
                Ok(())
            }
            Err(e) => {
                eprintln!("Validation error: {e}");
                Err(CliError::SemanticFailure(
                    "Settings validation failed".to_string(),
                ))
            }
        }
    }
}
