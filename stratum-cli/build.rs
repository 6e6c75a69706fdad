//! Build script for stratum-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("stratum")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve layered configuration")
        .long_about(
            "Resolve layered configuration files with imports and profile activation, \
             and inspect the result",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("settings")
                .long("settings")
                .help("Use this settings file instead of discovering stratum.yaml")
                .value_name("PATH")
                .global(true)
                .env("STRATUM_SETTINGS"),
        )
        .arg(
            Arg::new("settings-dir")
                .long("settings-dir")
                .help("Override the directory holding user settings")
                .value_name("PATH")
                .global(true)
                .env("STRATUM_SETTINGS_DIR"),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .help("Activate a profile (repeatable)")
                .value_name("PROFILE")
                .global(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("default-profile")
                .long("default-profile")
                .help("Use a default profile (repeatable)")
                .value_name("PROFILE")
                .global(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("on-not-found")
                .long("on-not-found")
                .help("What to do when an import location does not exist")
                .value_name("ACTION")
                .value_parser(["fail", "ignore"])
                .global(true),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .help("Set a property with the highest precedence (repeatable)")
                .value_name("KEY=VALUE")
                .global(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("import")
                .long("import")
                .help("Import a config location (repeatable, replaces configured imports)")
                .value_name("LOCATION")
                .global(true)
                .action(ArgAction::Append),
        )
        .subcommands(vec![
            Command::new("resolve")
                .about("Resolve and print every effective property")
                .long_about("Print every effective property as text, JSON or YAML"),
            Command::new("get")
                .about("Print the value of one property")
                .long_about("Print one property value; exits with status 1 when it is not set"),
            Command::new("explain")
                .about("Show where a property value comes from")
                .long_about(
                    "Show the property source, import location, resource and phase \
                     supplying a property",
                ),
            Command::new("tree")
                .about("Print the contributor tree")
                .long_about("Print the contributor tree built while resolving imports"),
            Command::new("validate")
                .about("Validate a settings file")
                .long_about("Check a stratum settings file for errors"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> std::io::Result<()> {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "OUT_DIR is not set")
    })?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;

    fs::write(man_dir.join("stratum.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
