//! Explain command implementation.
//!
//! Shows which property source supplies a property, the raw and
//! substituted values, and how that source entered the configuration.

use crate::error::CliError;
use crate::utils::{resolve_environment, GlobalOptions};
use clap::Args;
use std::io::Write;
use stratum::Provenance;

/// Show where a property value comes from.
#[derive(Args)]
pub struct ExplainCommand {
    /// Property name
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Print the provenance as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExplainCommand {
    /// Execute the explain command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let resolved = resolve_environment(global)?;
        let provenance = resolved.explain(&self.key)?.ok_or_else(|| {
            CliError::SemanticFailure(format!("Property '{}' is not set", self.key))
        })?;

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();

        if self.json {
            serde_json::to_writer_pretty(&mut handle, &provenance)?;
            writeln!(handle)?;
        } else {
            write_provenance(&mut handle, &provenance)?;
        }

        Ok(())
    }
}

fn write_provenance(out: &mut impl Write, provenance: &Provenance) -> std::io::Result<()> {
    writeln!(out, "property: {}", provenance.property)?;
    writeln!(out, "value:    {}", provenance.value)?;
    if provenance.raw_value != provenance.value {
        writeln!(out, "raw:      {}", provenance.raw_value)?;
    }
    writeln!(out, "source:   {}", provenance.source)?;

    let optional = [
        ("origin", provenance.origin.as_deref()),
        ("location", provenance.location.as_deref()),
        ("resource", provenance.resource.as_deref()),
        ("profile", provenance.profile.as_deref()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            writeln!(out, "{:<10}{value}", format!("{label}:"))?;
        }
    }
    if let Some(phase) = provenance.phase {
        writeln!(out, "phase:    {phase}")?;
    }
    Ok(())
}
