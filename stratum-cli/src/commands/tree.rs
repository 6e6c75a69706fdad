//! Command to print the contributor tree.

use crate::error::CliError;
use crate::utils::{resolve_environment, GlobalOptions};
use clap::Args;

/// Print the contributor tree of the resolved configuration.
#[derive(Args)]
pub struct TreeCommand {
    /// Also list the final property sources in precedence order
    #[arg(long)]
    pub sources: bool,
}

impl TreeCommand {
    /// Execute the tree command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let resolved = resolve_environment(global)?;

        print!("{}", resolved.render_tree());

        if self.sources {
            println!();
            println!("Property sources (highest precedence first):");
            for (i, source) in resolved.property_sources().iter().enumerate() {
                println!("  {}. {}", i + 1, source.name());
            }
        }

        Ok(())
    }
}
