//! Resolve command implementation.
//!
//! This module implements the `resolve` command, which prints every
//! effective property of the resolved configuration in text, JSON or YAML.

use crate::error::CliError;
use crate::utils::{resolve_environment, GlobalOptions};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use stratum::{ProfileSet, ResolvedEnvironment, SourceSummary};

/// Resolve and print every effective property.
#[derive(Args)]
pub struct ResolveCommand {
    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "text",
        env = "STRATUM_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,

    /// Include the raw property sources in JSON and YAML output
    #[arg(long)]
    pub sources: bool,
}

/// Output format for the resolve command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `key=value` lines (human-readable)
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Machine-readable resolution output.
#[derive(Serialize)]
struct ResolveOutput<'a> {
    profiles: &'a ProfileSet,
    properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    property_sources: Option<Vec<SourceSummary<'a>>>,
}

impl ResolveCommand {
    /// Execute the resolve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let resolved = resolve_environment(global)?;

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();

        match self.format {
            OutputFormat::Text => format_as_text(&mut handle, &resolved)?,
            OutputFormat::Json => {
                let output = self.output(&resolved)?;
                serde_json::to_writer_pretty(&mut handle, &output)?;
                writeln!(handle)?;
            }
            OutputFormat::Yaml => {
                let output = self.output(&resolved)?;
                write!(handle, "{}", serde_yaml::to_string(&output)?)?;
            }
        }

        Ok(())
    }

    fn output<'a>(&self, resolved: &'a ResolvedEnvironment) -> Result<ResolveOutput<'a>, CliError> {
        let properties = resolved
            .effective_properties()?
            .into_iter()
            .map(|p| (p.name, p.value))
            .collect();
        let property_sources = self
            .sources
            .then(|| resolved.summary().property_sources);
        Ok(ResolveOutput {
            profiles: resolved.profiles(),
            properties,
            property_sources,
        })
    }
}

/// Write the profiles as a comment followed by `key=value` lines.
fn format_as_text(out: &mut impl Write, resolved: &ResolvedEnvironment) -> Result<(), CliError> {
    writeln!(
        out,
        "# profiles: {}",
        resolved.profiles().accepted().join(", ")
    )?;
    for property in resolved.effective_properties()? {
        writeln!(out, "{}={}", property.name, property.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum::{ConfigEnvironment, ExplicitProfiles, Importer, Logger, NotFoundAction};
    use stratum::PropertySource;

    fn resolved() -> ResolvedEnvironment {
        let source = PropertySource::new("test")
            .with_property("b", "2")
            .with_property("a", "${b}");
        ConfigEnvironment::new(Importer::new(NotFoundAction::Fail, Logger::quiet()))
            .resolve(vec![source], &ExplicitProfiles::default())
            .unwrap()
    }

    #[test]
    fn test_text_output_is_sorted_and_resolved() {
        let mut buffer = Vec::new();
        format_as_text(&mut buffer, &resolved()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "# profiles: default\na=2\nb=2\n");
    }

    #[test]
    fn test_json_output_omits_sources_by_default() {
        let command = ResolveCommand {
            format: OutputFormat::Json,
            sources: false,
        };
        let resolved = resolved();
        let value = serde_json::to_value(command.output(&resolved).unwrap()).unwrap();
        assert_eq!(value["properties"]["a"], "2");
        assert!(value.get("property_sources").is_none());
    }
}
