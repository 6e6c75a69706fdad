//! Command to print the value of one property.

use crate::error::CliError;
use crate::utils::{resolve_environment, GlobalOptions};
use clap::Args;

/// Print the value of one property.
#[derive(Args)]
pub struct GetCommand {
    /// Property name (e.g. `app.name` or `servers[0]`)
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Bind the property as a list and print one element per line
    #[arg(long)]
    pub list: bool,

    /// Value to print when the property is not set
    #[arg(long, value_name = "VALUE")]
    pub default: Option<String>,
}

impl GetCommand {
    /// Execute the get command.
    ///
    /// Exits with status 1 when the property is not set and no default
    /// was given.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let resolved = resolve_environment(global)?;

        let values = if self.list {
            resolved.get_list(&self.key)?
        } else {
            resolved.get(&self.key)?.map(|value| vec![value])
        };

        match values.or_else(|| self.default.clone().map(|value| vec![value])) {
            Some(values) => {
                for value in values {
                    println!("{value}");
                }
                Ok(())
            }
            None => Err(CliError::SemanticFailure(format!(
                "Property '{}' is not set",
                self.key
            ))),
        }
    }
}
