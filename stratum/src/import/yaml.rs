//! Loader for YAML files.
//!
//! Nested mappings flatten to dotted keys and sequences to `[n]` indices:
//!
//! ```yaml
//! config:
//!   import:
//!     - a.yaml
//!     - b.yaml
//! ```
//!
//! becomes `config.import[0]=a.yaml`, `config.import[1]=b.yaml`. Null
//! values become empty strings. Each `---` document is a separate source.

use serde::Deserialize;
use serde_yaml::Value;

use crate::bundle::ConfigurationBundle;
use crate::error::{Error, Result};
use crate::import::{into_bundle, read_resource, Loader};
use crate::location::ResolvedLocation;

const EXTENSIONS: [&str; 2] = [".yaml", ".yml"];

/// Loads `.yaml` and `.yml` resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlLoader;

impl Loader for YamlLoader {
    fn is_loadable(&self, resource: &ResolvedLocation) -> bool {
        let name = resource.resource().to_ascii_lowercase();
        EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    }

    fn load(&self, resource: &ResolvedLocation) -> Result<ConfigurationBundle> {
        let content = read_resource(resource)?;
        let documents = parse(&content).map_err(|e| Error::Load {
            resource: resource.resource().to_string(),
            message: e.to_string(),
        })?;
        Ok(into_bundle(resource, documents))
    }
}

/// Parse YAML text into flattened documents.
pub(crate) fn parse(
    content: &str,
) -> std::result::Result<Vec<Vec<(String, String)>>, serde_yaml::Error> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(document)?;
        let mut entries = Vec::new();
        flatten(None, &value, &mut entries);
        documents.push(entries);
    }
    Ok(documents)
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let Some(key) = scalar(key) else { continue };
                let path = match prefix {
                    Some(prefix) => format!("{prefix}.{key}"),
                    None => key,
                };
                flatten(Some(path.as_str()), child, out);
            }
        }
        Value::Sequence(items) => {
            let prefix = prefix.unwrap_or_default();
            for (index, child) in items.iter().enumerate() {
                let path = format!("{prefix}[{index}]");
                flatten(Some(path.as_str()), child, out);
            }
        }
        Value::Tagged(tagged) => flatten(prefix, &tagged.value, out),
        scalar_value => {
            if let Some(prefix) = prefix {
                out.push((prefix.to_string(), scalar(scalar_value).unwrap_or_default()));
            }
        }
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
