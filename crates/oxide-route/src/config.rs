//! JSON route configuration.
//!
//! ```json
//! {
//!   "routes": [
//!     {
//!       "name": "users",
//!       "path": "/users",
//!       "query": "page=:?page",
//!       "params": { "page": "number" },
//!       "children": [
//!         { "name": "detail", "path": "/:id", "params": { "id": { "pattern": "[0-9a-f]{8}" } } }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::Param;
use crate::error::Result;
use crate::route::{Meta, RouteDefinition};
use crate::routes::Routes;

/// Built-in param types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// String codec.
    String,
    /// Number codec.
    Number,
    /// Boolean codec.
    Boolean,
}

/// Configuration of a single param.
///
/// Mixing the typed and pattern forms is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamConfig {
    /// Shorthand: `"number"`.
    Type(ParamType),
    /// `{ "type": "number", "repeated": true }`.
    Typed(TypedParamConfig),
    /// `{ "pattern": "[a-z]+", "repeated": false }`.
    Pattern(PatternParamConfig),
}

/// A built-in param type with options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypedParamConfig {
    /// Built-in type.
    #[serde(rename = "type")]
    pub kind: ParamType,
    /// Whether the param collects an array.
    #[serde(default)]
    pub repeated: bool,
}

/// A validating pattern param.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternParamConfig {
    /// Validating regular expression.
    pub pattern: String,
    /// Whether the param collects an array.
    #[serde(default)]
    pub repeated: bool,
}

impl ParamConfig {
    /// Builds the param binding.
    pub fn to_param(&self) -> Result<Param> {
        let (param, repeated) = match self {
            Self::Type(kind) => (builtin(*kind), false),
            Self::Typed(typed) => (builtin(typed.kind), typed.repeated),
            Self::Pattern(pattern) => (Param::pattern(&pattern.pattern)?, pattern.repeated),
        };
        Ok(if repeated { param.repeated() } else { param })
    }
}

fn builtin(kind: ParamType) -> Param {
    match kind {
        ParamType::String => Param::string(),
        ParamType::Number => Param::number(),
        ParamType::Boolean => Param::boolean(),
    }
}

/// Configuration of one route and its children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteConfig {
    /// Route name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Path template.
    pub path: String,
    /// Query template.
    pub query: String,
    /// Param codecs.
    pub params: BTreeMap<String, ParamConfig>,
    /// State param shape.
    pub state: BTreeMap<String, ParamConfig>,
    /// Metadata.
    pub meta: Meta,
    /// External origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Nested routes.
    pub children: Vec<RouteConfig>,
}

impl RouteConfig {
    /// Converts this configuration (and its children) into a definition.
    pub fn to_definition(&self) -> Result<RouteDefinition> {
        let mut definition = RouteDefinition::new()
            .path(self.path.as_str())
            .query(self.query.as_str());
        definition.name.clone_from(&self.name);
        definition.host.clone_from(&self.host);
        definition.meta = self.meta.clone();

        for (name, param) in &self.params {
            definition = definition.param(name.as_str(), param.to_param()?);
        }
        for (name, param) in &self.state {
            definition = definition.state(name.as_str(), param.to_param()?);
        }
        for child in &self.children {
            definition = definition.child(child.to_definition()?);
        }

        Ok(definition)
    }
}

/// Top-level route configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutesConfig {
    /// Root routes, in declaration order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl RoutesConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Converts every root route into a definition.
    pub fn definitions(&self) -> Result<Vec<RouteDefinition>> {
        self.routes.iter().map(RouteConfig::to_definition).collect()
    }

    /// Compiles the configured route set.
    pub fn compile(&self) -> Result<Routes> {
        Routes::compile(self.definitions()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteError;
    use serde_json::json;

    const CONFIG: &str = r#"{
        "routes": [
            {
                "name": "users",
                "path": "/users",
                "query": "page=:?page",
                "params": { "page": "number" },
                "meta": { "title": "Users" },
                "children": [
                    {
                        "name": "detail",
                        "path": "/:id",
                        "params": { "id": { "pattern": "[0-9]+" } }
                    }
                ]
            },
            {
                "name": "search",
                "path": "/search",
                "query": "tag=:tags",
                "params": { "tags": { "type": "string", "repeated": true } }
            }
        ]
    }"#;

    #[test]
    fn test_param_config_forms() {
        let params: BTreeMap<String, ParamConfig> = serde_json::from_value(json!({
            "a": "boolean",
            "b": { "type": "number", "repeated": true },
            "c": { "pattern": "[a-z]+" }
        }))
        .unwrap();

        assert_eq!(params["a"], ParamConfig::Type(ParamType::Boolean));
        assert!(params["b"].to_param().unwrap().is_repeated());
        assert_eq!(
            params["c"].to_param().unwrap().capture_pattern(),
            Some("[a-z]+")
        );
    }

    #[test]
    fn test_mixed_param_forms_are_rejected() {
        for param in [
            json!({ "type": "number", "pattern": "[0-9]+" }),
            json!({ "pattern": "[a-z]+", "repeat": true }),
            json!({ "type": "date" }),
        ] {
            assert!(
                serde_json::from_value::<ParamConfig>(param.clone()).is_err(),
                "accepted {param}"
            );
        }

        let err = RoutesConfig::from_json(
            r#"{ "routes": [{ "path": "/:id", "params": { "id": { "type": "number", "pattern": "[0-9]+" } } }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RouteError::Json(_)));
    }

    #[test]
    fn test_compile_from_json() {
        let routes = RoutesConfig::from_json(CONFIG).unwrap().compile().unwrap();
        assert_eq!(routes.len(), 3);

        let resolved = routes.resolve("/users/12?page=3").unwrap();
        assert_eq!(resolved.key(), "users.detail");
        assert_eq!(resolved.params().get("id"), Some(&json!("12")));
        assert_eq!(resolved.params().get("page"), Some(&json!(3)));
        assert_eq!(resolved.route().meta()["title"], json!("Users"));

        let resolved = routes.resolve("/search?tag=a&tag=b").unwrap();
        assert_eq!(resolved.params().get("tags"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = RoutesConfig::from_json(r#"{ "routes": [{ "path": "/", "component": "Home" }] }"#)
            .unwrap_err();
        assert!(matches!(err, RouteError::Json(_)));
    }

    #[test]
    fn test_invalid_pattern_in_config() {
        let config = RoutesConfig::from_json(
            r#"{ "routes": [{ "path": "/:id", "params": { "id": { "pattern": "(" } } }] }"#,
        )
        .unwrap();
        assert!(matches!(
            config.compile().unwrap_err(),
            RouteError::InvalidPattern { .. }
        ));
    }
}
