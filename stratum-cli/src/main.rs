//! Main entry point for the stratum CLI.
//!
//! This is the command-line interface for the stratum configuration
//! resolver. It provides commands for inspecting a resolved configuration:
//! - `resolve`: Print every effective property
//! - `get`: Print one property
//! - `explain`: Show where a property comes from
//! - `tree`: Print the contributor tree
//! - `validate`: Validate a settings file

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let logger = stratum::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        logger,
        settings: cli.settings,
        settings_dir: cli.settings_dir,
        profiles: cli.profiles,
        default_profiles: cli.default_profiles,
        on_not_found: cli.on_not_found,
        set: cli.set,
        imports: cli.imports,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Resolve(cmd) => cmd.execute(&global),
        cli::Command::Get(cmd) => cmd.execute(&global),
        cli::Command::Explain(cmd) => cmd.execute(&global),
        cli::Command::Tree(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
