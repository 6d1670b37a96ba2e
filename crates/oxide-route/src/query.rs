//! Query pattern matching and the resolved query accessor.

use std::collections::HashMap;

use serde_json::Value;

use crate::codec::Param;
use crate::encoding;
use crate::error::{InvalidParam, Result, RouteError, SlotError};
use crate::params::{Params, RawCaptures};
use crate::path::{check_param_name, malformed};

/// A named param slot in a query.
#[derive(Debug, Clone)]
pub struct QuerySlot {
    /// Query key the value is read from.
    pub key: String,
    /// Param name.
    pub name: String,
    /// Bound codec.
    pub param: Param,
    /// Whether the slot may be absent.
    pub optional: bool,
    /// Whether every occurrence of the key is collected into an array.
    pub repeated: bool,
}

/// A compiled query pattern.
///
/// Matching ignores entry order and unknown keys.
#[derive(Debug, Clone, Default)]
pub struct QueryPattern {
    template: String,
    statics: Vec<(String, String)>,
    slots: Vec<QuerySlot>,
}

impl QueryPattern {
    /// Parses a query template.
    ///
    /// Template syntax:
    /// - `page=:page` - Required param read from key `page`
    /// - `page=:?page` - Optional param
    /// - `tag=:tags[]` - Repeated param (also implied by a repeated codec)
    /// - `view=grid` - Static entry, must be present to match
    pub fn parse(template: &str, params: &HashMap<String, Param>) -> Result<Self> {
        let mut pattern = Self {
            template: template.to_string(),
            ..Self::default()
        };

        for entry in template.split('&').filter(|e| !e.is_empty()) {
            let Some((key, value)) = entry.split_once('=') else {
                return Err(malformed(template, format!("expected `key=value`, got `{entry}`")));
            };
            if key.is_empty() {
                return Err(malformed(template, format!("missing key in `{entry}`")));
            }

            let Some(rest) = value.strip_prefix(':') else {
                pattern.statics.push((key.to_string(), value.to_string()));
                continue;
            };
            let (rest, optional) = match rest.strip_prefix('?') {
                Some(rest) => (rest, true),
                None => (rest, false),
            };
            let (name, marked_repeated) = match rest.strip_suffix("[]") {
                Some(name) => (name, true),
                None => (rest, false),
            };
            check_param_name(template, name)?;

            if pattern.slots.iter().any(|slot| slot.name == name) {
                return Err(RouteError::DuplicateParam {
                    route: template.to_string(),
                    param: name.to_string(),
                });
            }

            let param = params.get(name).cloned().unwrap_or_default();
            pattern.slots.push(QuerySlot {
                key: key.to_string(),
                name: name.to_string(),
                repeated: marked_repeated || param.is_repeated(),
                param,
                optional,
            });
        }

        Ok(pattern)
    }

    /// Returns the union of this pattern and a child's.
    #[must_use]
    pub fn join(&self, child: &QueryPattern) -> Self {
        let template = [self.template.as_str(), child.template.as_str()]
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("&");

        let mut statics = self.statics.clone();
        statics.extend(child.statics.iter().cloned());
        let mut slots = self.slots.clone();
        slots.extend(child.slots.iter().cloned());

        Self {
            template,
            statics,
            slots,
        }
    }

    /// Returns whether a query matches structurally.
    pub fn is_match(&self, query: &RouteQuery) -> bool {
        self.captures(query).is_some()
    }

    /// Collects the text for every slot present in the query.
    ///
    /// Fails when a static entry or a required slot is missing. Empty values
    /// count as missing.
    pub fn captures(&self, query: &RouteQuery) -> Option<RawCaptures> {
        for (key, value) in &self.statics {
            if !query.get_all(key).contains(&value.as_str()) {
                return None;
            }
        }

        let mut captured = RawCaptures::new();
        for slot in &self.slots {
            let mut values: Vec<String> = query
                .get_all(&slot.key)
                .into_iter()
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();

            if values.is_empty() {
                if slot.optional {
                    continue;
                }
                return None;
            }
            if !slot.repeated {
                values.truncate(1);
            }
            captured.insert(slot.name.clone(), values);
        }

        Some(captured)
    }

    /// Generates a query string (without the leading `?`) from param values.
    pub fn encode(&self, params: &Params) -> std::result::Result<String, SlotError> {
        let mut pairs: Vec<String> = self
            .statics
            .iter()
            .map(|(key, value)| encode_pair(key, value))
            .collect();

        for slot in &self.slots {
            let texts = match params.get(&slot.name) {
                None => Vec::new(),
                Some(Value::Array(items)) if slot.repeated => items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| encode_value(slot, item))
                    .collect::<std::result::Result<Vec<_>, _>>()?,
                Some(Value::Array(_)) => {
                    return Err(SlotError::Invalid {
                        name: slot.name.clone(),
                        source: InvalidParam::new("array given for a param that does not repeat"),
                    });
                }
                Some(value) => vec![encode_value(slot, value)?],
            };

            let texts: Vec<String> = texts.into_iter().filter(|t| !t.is_empty()).collect();
            if texts.is_empty() && !slot.optional {
                return Err(SlotError::Missing(slot.name.clone()));
            }
            pairs.extend(texts.iter().map(|text| encode_pair(&slot.key, text)));
        }

        Ok(pairs.join("&"))
    }

    /// Returns the template string.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the static `key=value` entries.
    pub fn statics(&self) -> &[(String, String)] {
        &self.statics
    }

    /// Returns the param slots.
    pub fn slots(&self) -> &[QuerySlot] {
        &self.slots
    }
}

fn encode_value(slot: &QuerySlot, value: &Value) -> std::result::Result<String, SlotError> {
    slot.param.encode(value).map_err(|source| SlotError::Invalid {
        name: slot.name.clone(),
        source,
    })
}

fn encode_pair(key: &str, value: &str) -> String {
    format!(
        "{}={}",
        encoding::encode_query(key),
        encoding::encode_query(value)
    )
}

/// Read accessor over a location's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteQuery {
    raw: String,
    pairs: Vec<(String, String)>,
}

impl RouteQuery {
    /// Parses a query string, with or without the leading `?`.
    ///
    /// Keys and values are percent-decoded; `+` is kept as is.
    pub fn parse(query: &str) -> Self {
        let raw = query.strip_prefix('?').unwrap_or(query);
        let pairs = raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (encoding::decode(key), encoding::decode(value))
            })
            .collect();

        Self {
            raw: raw.to_string(),
            pairs,
        }
    }

    /// Gets the first value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Gets every value for a key, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Returns an iterator over the decoded pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the raw query string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns whether the query has no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
