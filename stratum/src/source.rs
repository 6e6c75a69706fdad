//! Property sources and their queryable projection.
//!
//! A [`PropertySource`] is an ordered list of dotted property names and
//! string values with a name and an optional origin. The engine never
//! queries a source by raw key; it goes through a
//! [`ConfigurationPropertySource`], which indexes the keys by their
//! canonical form so that `config.activate.on-profile`,
//! `config.activate.onProfile` and `config.activate.on_profile` are the same
//! property.

use std::collections::HashMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// An ordered mapping from property names to values.
///
/// # Examples
///
/// ```
/// use stratum::PropertySource;
///
/// let source = PropertySource::new("defaults")
///     .with_property("app.name", "demo")
///     .with_property("app.port", "8080");
///
/// assert_eq!(source.get("app.name"), Some("demo"));
/// assert_eq!(source.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySource {
    name: String,
    origin: Option<String>,
    entries: Vec<(String, String)>,
}

impl PropertySource {
    /// Create an empty property source.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: None,
            entries: Vec::new(),
        }
    }

    /// Create a property source from key/value pairs, keeping their order.
    ///
    /// Later duplicates replace the value of earlier keys in place.
    pub fn from_pairs<I, K, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut source = Self::new(name);
        for (key, value) in pairs {
            source.insert(key, value);
        }
        source
    }

    /// Set the origin reported in diagnostics.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Add a property, returning the source.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a property, replacing the value of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// The source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The origin, if one was recorded.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Look up a property by its exact key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the source holds no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PropertySource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Reduce a property name to its canonical form.
///
/// Each dot-separated element is lower-cased and stripped of `-` and `_`.
/// Index suffixes such as `[0]` are kept verbatim.
///
/// # Examples
///
/// ```
/// use stratum::source::canonical_name;
///
/// assert_eq!(canonical_name("config.activate.on-profile"), "config.activate.onprofile");
/// assert_eq!(canonical_name("Config.Import[1]"), "config.import[1]");
/// ```
#[must_use]
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_index = false;
    for c in name.trim().chars() {
        match c {
            '[' => {
                in_index = true;
                out.push(c);
            }
            ']' => {
                in_index = false;
                out.push(c);
            }
            _ if in_index => out.push(c),
            '-' | '_' => {}
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// A queryable projection of a [`PropertySource`] keyed by canonical names.
///
/// When two raw keys collapse to the same canonical name, the first one in
/// source order wins.
#[derive(Debug, Clone)]
pub struct ConfigurationPropertySource {
    values: HashMap<String, String>,
}

impl ConfigurationPropertySource {
    /// Build the projection of a property source.
    #[must_use]
    pub fn from_source(source: &PropertySource) -> Self {
        let mut values = HashMap::with_capacity(source.len());
        for (key, value) in source.iter() {
            values
                .entry(canonical_name(key))
                .or_insert_with(|| value.to_string());
        }
        Self { values }
    }

    /// Look up a property by any relaxed spelling of its name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&canonical_name(name)).map(String::as_str)
    }

    /// Whether the property is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&canonical_name(name))
    }

    /// Look up element `index` of an indexed list property (`name[index]`).
    #[must_use]
    pub fn get_indexed(&self, name: &str, index: usize) -> Option<&str> {
        let key = format!("{}[{index}]", canonical_name(name));
        self.values.get(&key).map(String::as_str)
    }

    /// Whether any `name[n]` element is present.
    #[must_use]
    pub fn has_indexed(&self, name: &str) -> bool {
        let prefix = format!("{}[", canonical_name(name));
        self.values.keys().any(|k| {
            k.strip_prefix(&prefix)
                .and_then(|rest| rest.split_once(']'))
                .is_some_and(|(idx, tail)| tail.is_empty() && idx.parse::<usize>().is_ok())
        })
    }

    /// Number of `name[n]` elements present, contiguous or not.
    #[must_use]
    pub fn indexed_count(&self, name: &str) -> usize {
        let prefix = format!("{}[", canonical_name(name));
        self.values
            .keys()
            .filter(|k| {
                k.strip_prefix(&prefix)
                    .and_then(|rest| rest.split_once(']'))
                    .is_some_and(|(idx, tail)| tail.is_empty() && idx.parse::<usize>().is_ok())
            })
            .count()
    }

    /// Whether the property is present either as a scalar or as list elements.
    #[must_use]
    pub fn contains_any(&self, name: &str) -> bool {
        self.contains(name) || self.has_indexed(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut source = PropertySource::new("s");
        source.insert("a", "1");
        source.insert("b", "2");
        source.insert("a", "3");

        let keys: Vec<_> = source.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(source.get("a"), Some("3"));
    }

    #[test]
    fn test_from_pairs_and_origin() {
        let source = PropertySource::from_pairs("cli", [("x", "1")]).with_origin("command line");
        assert_eq!(source.name(), "cli");
        assert_eq!(source.origin(), Some("command line"));
        assert!(!source.is_empty());
    }

    #[test]
    fn test_canonical_name_relaxed_forms() {
        assert_eq!(canonical_name("profiles.active"), "profiles.active");
        assert_eq!(canonical_name("server.max-http_Header"), "server.maxhttpheader");
        assert_eq!(canonical_name("list[10].Item"), "list[10].item");
    }

    #[test]
    fn test_projection_relaxed_lookup() {
        let source = PropertySource::new("s").with_property("config.activate.onProfile", "prod");
        let view = ConfigurationPropertySource::from_source(&source);
        assert_eq!(view.get("config.activate.on-profile"), Some("prod"));
        assert!(view.contains("CONFIG.ACTIVATE.ON_PROFILE"));
    }

    #[test]
    fn test_projection_first_spelling_wins() {
        let source = PropertySource::new("s")
            .with_property("app.my-name", "first")
            .with_property("app.myName", "second");
        let view = ConfigurationPropertySource::from_source(&source);
        assert_eq!(view.get("app.myname"), Some("first"));
    }

    #[test]
    fn test_indexed_lookup() {
        let source = PropertySource::new("s")
            .with_property("config.import[0]", "a.yaml")
            .with_property("config.import[1]", "b.yaml")
            .with_property("config.imports", "unrelated");
        let view = ConfigurationPropertySource::from_source(&source);

        assert!(view.has_indexed("config.import"));
        assert_eq!(view.indexed_count("config.import"), 2);
        assert_eq!(view.get_indexed("config.import", 1), Some("b.yaml"));
        assert!(!view.contains("config.import"));
        assert!(view.contains_any("config.import"));
        assert!(!view.has_indexed("config"));
    }

    #[test]
    fn test_serialize_as_map() {
        let source = PropertySource::new("s")
            .with_property("b", "2")
            .with_property("a", "1");
        let json = serde_json::to_string(&source).unwrap();
        assert_eq!(json, r#"{"b":"2","a":"1"}"#);
    }
}
