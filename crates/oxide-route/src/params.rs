//! Param value maps.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw captured text per slot name, before decoding.
pub type RawCaptures = HashMap<String, Vec<String>>;

/// Typed param values keyed by param name.
///
/// A `null` value is treated the same as an absent one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: BTreeMap<String, Value>,
}

impl Params {
    /// Creates new empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Gets a value. `null` counts as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    /// Gets a string value.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Deserializes a value into a specific type.
    pub fn parse<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Removes a value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Returns whether a non-null value is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns these values with `overrides` laid over them.
    ///
    /// A `null` override clears the value.
    #[must_use]
    pub fn merged(&self, overrides: &Params) -> Params {
        let mut merged = self.clone();
        for (name, value) in &overrides.values {
            merged.values.insert(name.clone(), value.clone());
        }
        merged
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_access() {
        let params = Params::new().with("id", 42).with("slug", "intro");

        assert_eq!(params.get("id"), Some(&json!(42)));
        assert_eq!(params.parse::<i64>("id"), Some(42));
        assert_eq!(params.get_str("slug"), Some("intro"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_null_is_absent() {
        let params = Params::new().with("id", Value::Null);
        assert!(!params.contains("id"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_merged_overrides() {
        let current: Params = [("id", json!(1)), ("tab", json!("info"))]
            .into_iter()
            .collect();
        let overrides = Params::new().with("id", 2).with("tab", Value::Null);

        let merged = current.merged(&overrides);
        assert_eq!(merged.get("id"), Some(&json!(2)));
        assert!(!merged.contains("tab"));
        assert_eq!(current.get("id"), Some(&json!(1)));
    }
}
