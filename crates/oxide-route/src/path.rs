//! Path pattern matching.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::codec::Param;
use crate::encoding;
use crate::error::{Result, RouteError, SlotError};
use crate::params::{Params, RawCaptures};

/// A named param slot in a path.
#[derive(Debug, Clone)]
pub struct PathSlot {
    /// Param name.
    pub name: String,
    /// Bound codec.
    pub param: Param,
    /// Whether the slot may be absent (`:?name`).
    pub optional: bool,
}

/// A segment in a path pattern.
#[derive(Debug, Clone)]
pub enum PathSegment {
    /// A literal string segment.
    Literal(String),
    /// A param segment (e.g., `:id` or `:?id`).
    Param(PathSlot),
}

/// A compiled path pattern for matching locations.
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// The template string.
    template: String,
    /// Parsed segments.
    segments: Vec<PathSegment>,
    /// Compiled regex for matching.
    regex: Regex,
    /// Param names in capture-group order.
    param_names: Vec<String>,
}

impl PathPattern {
    /// Parses a path template.
    ///
    /// Template syntax:
    /// - `/users` - Literal path
    /// - `/users/:id` - Required param
    /// - `/users/:?id` - Optional param, only as the last segment
    ///
    /// Params without an entry in `params` use the string codec.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use oxide_route::{Param, PathPattern};
    ///
    /// let params = HashMap::from([("id".to_string(), Param::number())]);
    /// let pattern = PathPattern::parse("/posts/:id/comments/:?comment", &params).unwrap();
    /// let captures = pattern.captures("/posts/123/comments").unwrap();
    /// assert_eq!(captures["id"], vec!["123".to_string()]);
    /// assert!(!captures.contains_key("comment"));
    /// ```
    pub fn parse(template: &str, params: &HashMap<String, Param>) -> Result<Self> {
        let segments = template
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|part| parse_segment(template, part, params))
            .collect::<Result<Vec<_>>>()?;

        Self::from_segments(template.to_string(), segments)
    }

    fn from_segments(template: String, segments: Vec<PathSegment>) -> Result<Self> {
        let mut param_names = Vec::new();
        let mut regex_str = String::from("^");

        for (index, segment) in segments.iter().enumerate() {
            match segment {
                PathSegment::Literal(s) => {
                    regex_str.push('/');
                    regex_str.push_str(&regex::escape(&encoding::encode_segment(s)));
                }
                PathSegment::Param(slot) => {
                    if param_names.contains(&slot.name) {
                        return Err(RouteError::DuplicateParam {
                            route: template,
                            param: slot.name.clone(),
                        });
                    }
                    if slot.optional && index + 1 != segments.len() {
                        return Err(RouteError::OptionalNotTrailing {
                            template,
                            param: slot.name.clone(),
                        });
                    }

                    // Pattern slots span separators; their own expression is
                    // checked against the decoded text when the slot decodes.
                    let group = param_names.len();
                    let expr = if slot.param.capture_pattern().is_some() {
                        ".+?"
                    } else {
                        "[^/]+"
                    };
                    if slot.optional {
                        regex_str.push_str(&format!("(?:/(?P<p{group}>{expr}))?"));
                    } else {
                        regex_str.push_str(&format!("/(?P<p{group}>{expr})"));
                    }
                    param_names.push(slot.name.clone());
                }
            }
        }

        regex_str.push_str("/?$");

        let regex = Regex::new(&regex_str).map_err(|e| RouteError::MalformedTemplate {
            template: template.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            template,
            segments,
            regex,
            param_names,
        })
    }

    /// Appends a child pattern, with exactly one separator at the join.
    ///
    /// An empty child is the parent's index and matches the same paths.
    pub fn join(&self, child: &PathPattern) -> Result<Self> {
        let mut segments = self.segments.clone();
        segments.extend(child.segments.iter().cloned());
        Self::from_segments(join_templates(&self.template, &child.template), segments)
    }

    /// Returns whether a path matches structurally.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Attempts to match a path against this pattern.
    ///
    /// Returns the percent-decoded text captured per slot. Optional slots
    /// that did not participate are left out.
    pub fn captures(&self, path: &str) -> Option<RawCaptures> {
        let caps = self.regex.captures(path)?;

        let mut captured = RawCaptures::new();
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(value) = caps.name(&format!("p{i}")) {
                captured.insert(name.clone(), vec![encoding::decode(value.as_str())]);
            }
        }

        Some(captured)
    }

    /// Generates a path from param values.
    ///
    /// Absent optional slots are dropped together with their separator.
    pub fn encode(&self, params: &Params) -> std::result::Result<String, SlotError> {
        let mut path = String::new();

        for segment in &self.segments {
            match segment {
                PathSegment::Literal(s) => {
                    path.push('/');
                    path.push_str(&encoding::encode_segment(s));
                }
                PathSegment::Param(slot) => {
                    let Some(value) = params.get(&slot.name) else {
                        if slot.optional {
                            continue;
                        }
                        return Err(SlotError::Missing(slot.name.clone()));
                    };
                    let text = slot.param.encode(value).map_err(|source| SlotError::Invalid {
                        name: slot.name.clone(),
                        source,
                    })?;
                    if text.is_empty() {
                        if slot.optional {
                            continue;
                        }
                        return Err(SlotError::Missing(slot.name.clone()));
                    }
                    path.push('/');
                    if slot.param.capture_pattern().is_some() {
                        path.push_str(&encoding::encode_path(&text));
                    } else {
                        path.push_str(&encoding::encode_segment(&text));
                    }
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }

        Ok(path)
    }

    /// Returns the template string.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the param names.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Returns the param slots in order.
    pub fn slots(&self) -> impl Iterator<Item = &PathSlot> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Param(slot) => Some(slot),
            PathSegment::Literal(_) => None,
        })
    }

    /// Returns the number of literal segments.
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::Literal(_)))
            .count()
    }
}

fn parse_segment(template: &str, part: &str, params: &HashMap<String, Param>) -> Result<PathSegment> {
    let Some(rest) = part.strip_prefix(':') else {
        if part.contains(':') {
            return Err(malformed(template, format!("unexpected `:` in segment `{part}`")));
        }
        return Ok(PathSegment::Literal(part.to_string()));
    };

    let (name, optional) = match rest.strip_prefix('?') {
        Some(name) => (name, true),
        None => (rest, false),
    };
    check_param_name(template, name)?;

    let param = params.get(name).cloned().unwrap_or_default();
    if param.is_repeated() {
        return Err(malformed(
            template,
            format!("path param `{name}` cannot be repeated"),
        ));
    }

    Ok(PathSegment::Param(PathSlot {
        name: name.to_string(),
        param,
        optional,
    }))
}

/// Checks that a param name is non-empty and made of `[A-Za-z0-9_]`.
pub(crate) fn check_param_name(template: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(malformed(template, "`:` without a param name".to_string()));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(malformed(template, format!("invalid param name `{name}`")));
    }
    Ok(())
}

/// Returns the first name that appears more than once.
pub(crate) fn first_duplicate<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    names.into_iter().find(|name| !seen.insert(*name))
}

pub(crate) fn malformed(template: &str, message: String) -> RouteError {
    RouteError::MalformedTemplate {
        template: template.to_string(),
        message,
    }
}

fn join_templates(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let child = child.trim_start_matches('/');
    match (parent.is_empty(), child.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => parent.to_string(),
        (true, false) => format!("/{child}"),
        (false, false) => format!("{parent}/{child}"),
    }
}
