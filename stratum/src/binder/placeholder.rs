//! `${name}` and `${name:default}` placeholder substitution.
//!
//! Placeholders may nest (`${a.${suffix}}`, `${a:${b}}`). A placeholder that
//! resolves to nothing and has no default is left in the output verbatim.
//! Resolution keeps an explicit stack of the property names being resolved
//! and fails with [`Error::PlaceholderCycle`] when a name re-enters it.

use crate::error::{Error, Result};
use crate::source::canonical_name;

const PREFIX: &str = "${";
const SUFFIX: char = '}';
const SEPARATOR: char = ':';

/// Raw property lookup used while substituting placeholders.
pub(crate) type Lookup<'l> = dyn Fn(&str) -> Result<Option<String>> + 'l;

/// Substitutes placeholders using a lookup function.
pub(crate) struct PlaceholderResolver<'l> {
    lookup: &'l Lookup<'l>,
    stack: Vec<String>,
}

impl<'l> PlaceholderResolver<'l> {
    pub(crate) fn new(lookup: &'l Lookup<'l>) -> Self {
        Self {
            lookup,
            stack: Vec::new(),
        }
    }

    /// Resolve the raw value of property `name`.
    pub(crate) fn resolve_property(&mut self, name: &str, raw: &str) -> Result<String> {
        self.enter(name)?;
        let resolved = self.resolve_text(raw);
        self.stack.pop();
        resolved
    }

    fn enter(&mut self, name: &str) -> Result<()> {
        let canonical = canonical_name(name);
        if let Some(start) = self
            .stack
            .iter()
            .position(|entry| canonical_name(entry) == canonical)
        {
            let mut chain: Vec<String> = self.stack[start..].to_vec();
            chain.push(name.to_string());
            return Err(Error::PlaceholderCycle { chain });
        }
        self.stack.push(name.to_string());
        Ok(())
    }

    fn resolve_text(&mut self, text: &str) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(PREFIX) {
            out.push_str(&rest[..start]);
            let body = &rest[start + PREFIX.len()..];
            let Some(end) = closing_brace(body) else {
                out.push_str(&rest[start..]);
                return Ok(out);
            };

            let inner = self.resolve_text(&body[..end])?;
            let (key, default) = match inner.split_once(SEPARATOR) {
                Some((key, default)) => (key, Some(default)),
                None => (inner.as_str(), None),
            };

            match (self.lookup)(key)? {
                Some(raw) => {
                    let value = self.resolve_property(key, &raw)?;
                    out.push_str(&value);
                }
                None => match default {
                    Some(default) => out.push_str(default),
                    None => {
                        out.push_str(PREFIX);
                        out.push_str(&inner);
                        out.push(SUFFIX);
                    }
                },
            }
            rest = &body[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Byte offset of the `}` closing a placeholder whose body starts at `body`.
fn closing_brace(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(PREFIX.as_bytes()) {
            depth += 1;
            i += PREFIX.len();
            continue;
        }
        if bytes[i] == SUFFIX as u8 {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(values: &[(&str, &str)], name: &str) -> Result<String> {
        let map: HashMap<String, String> = values
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let lookup = move |key: &str| Ok(map.get(key).cloned());
        let raw = lookup(name)?.unwrap_or_default();
        PlaceholderResolver::new(&lookup).resolve_property(name, &raw)
    }

    #[test]
    fn test_plain_value_untouched() {
        assert_eq!(resolve(&[("a", "hello")], "a").unwrap(), "hello");
    }

    #[test]
    fn test_simple_and_nested_placeholders() {
        let values = [
            ("a", "${b}-${c}"),
            ("b", "x"),
            ("c", "${d}"),
            ("d", "y"),
            ("key", "${name.${suffix}}"),
            ("suffix", "one"),
            ("name.one", "found"),
        ];
        assert_eq!(resolve(&values, "a").unwrap(), "x-y");
        assert_eq!(resolve(&values, "key").unwrap(), "found");
    }

    #[test]
    fn test_default_value() {
        let values = [("a", "${missing:fallback}"), ("b", "${missing:${other}}"), ("other", "o")];
        assert_eq!(resolve(&values, "a").unwrap(), "fallback");
        assert_eq!(resolve(&values, "b").unwrap(), "o");
    }

    #[test]
    fn test_unresolvable_left_verbatim() {
        let values = [("a", "pre ${missing} post"), ("b", "${unterminated")];
        assert_eq!(resolve(&values, "a").unwrap(), "pre ${missing} post");
        assert_eq!(resolve(&values, "b").unwrap(), "${unterminated");
    }

    #[test]
    fn test_cycle_detected_with_chain() {
        let values = [("a", "${b}"), ("b", "${a}")];
        match resolve(&values, "a").unwrap_err() {
            Error::PlaceholderCycle { chain } => assert_eq!(chain, vec!["a", "b", "a"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let err = resolve(&[("a", "x${a}")], "a").unwrap_err();
        assert!(err.is_placeholder_cycle());
    }

    #[test]
    fn test_repeated_reference_is_not_cycle() {
        assert_eq!(resolve(&[("a", "${b}${b}"), ("b", "z")], "a").unwrap(), "zz");
    }
}
