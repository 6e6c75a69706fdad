//! Loader for `.properties` files.
//!
//! Supports `key=value`, `key: value` and `key value` entries, `#` and `!`
//! comments, `\` line continuations, the usual escapes (`\t`, `\n`, `\uXXXX`)
//! and `#---` / `!---` document separators.

use crate::bundle::ConfigurationBundle;
use crate::error::{Error, Result};
use crate::import::{into_bundle, read_resource, Loader};
use crate::location::ResolvedLocation;

const EXTENSIONS: [&str; 2] = [".properties", ".props"];

/// Loads `.properties` and `.props` resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesLoader;

impl Loader for PropertiesLoader {
    fn is_loadable(&self, resource: &ResolvedLocation) -> bool {
        let name = resource.resource().to_ascii_lowercase();
        EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    }

    fn load(&self, resource: &ResolvedLocation) -> Result<ConfigurationBundle> {
        let content = read_resource(resource)?;
        let documents = parse(&content).map_err(|message| Error::Load {
            resource: resource.resource().to_string(),
            message,
        })?;
        Ok(into_bundle(resource, documents))
    }
}

/// Parse properties text into documents of key/value pairs.
pub(crate) fn parse(content: &str) -> std::result::Result<Vec<Vec<(String, String)>>, String> {
    let mut documents = vec![Vec::new()];
    let mut lines = content.lines().enumerate();

    while let Some((number, line)) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed == "#---" || trimmed == "!---" {
            documents.push(Vec::new());
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        let key = unescape(key).map_err(|e| format!("line {}: {e}", number + 1))?;
        let value = unescape(value).map_err(|e| format!("line {}: {e}", number + 1))?;
        if let Some(document) = documents.last_mut() {
            document.push((key, value));
        }
    }
    Ok(documents)
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split at the first unescaped `=`, `:` or whitespace.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (line[..i].trim_end(), line[i + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest
                    .strip_prefix(['=', ':'])
                    .map_or(rest, str::trim_start);
                return (&line[..i], rest);
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(text: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("malformed \\u escape '\\u{hex}'"))?;
                out.push(code);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}
