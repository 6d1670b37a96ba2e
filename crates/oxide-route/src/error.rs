//! Error types for route compilation and assembly.

use thiserror::Error;

/// Route construction and assembly errors.
///
/// Failing to match a location is not an error: resolution returns `None`
/// instead.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A param name appears more than once across a route's path and query.
    #[error("duplicate param `{param}` in route `{route}`")]
    DuplicateParam {
        /// The offending route.
        route: String,
        /// The repeated param name.
        param: String,
    },

    /// A state param is declared by both a parent and a child route.
    #[error("duplicate state param `{param}` in route `{route}`")]
    DuplicateStateParam {
        /// The offending route.
        route: String,
        /// The repeated state param name.
        param: String,
    },

    /// Two named routes produce the same key.
    #[error("duplicate route key: {0}")]
    DuplicateKey(String),

    /// A path or query template could not be parsed.
    #[error("malformed template `{template}`: {message}")]
    MalformedTemplate {
        /// The template as written.
        template: String,
        /// What is wrong with it.
        message: String,
    },

    /// An optional path param is followed by further segments.
    #[error("optional param `{param}` must be the last segment of `{template}`")]
    OptionalNotTrailing {
        /// The (combined) path template.
        template: String,
        /// The optional param.
        param: String,
    },

    /// A custom param pattern is not a valid regular expression.
    #[error("invalid param pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The pattern as written.
        pattern: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// Assembly was asked for a route without one of its required params.
    #[error("missing required param `{param}` for route `{route}`")]
    MissingParam {
        /// The route being assembled.
        route: String,
        /// The missing param.
        param: String,
    },

    /// A param value could not be encoded by its codec.
    #[error("cannot encode param `{param}` for route `{route}`: {source}")]
    Encode {
        /// The route being assembled.
        route: String,
        /// The param being encoded.
        param: String,
        /// The codec's complaint.
        #[source]
        source: InvalidParam,
    },

    /// No route is registered under the requested key.
    #[error("route not found: {0}")]
    UnknownRoute(String),

    /// IO error (reading route configuration files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Route configuration could not be deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Signal raised by a codec when text or a value does not fit its type.
///
/// During matching this only disqualifies the candidate route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvalidParam {
    message: String,
}

impl InvalidParam {
    /// Creates a new signal with an explanatory message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the explanatory message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure to encode a single slot of a compiled pattern.
///
/// Patterns do not know which route they belong to; the assembler attaches
/// that context when turning this into a [`RouteError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// A required slot has no value.
    #[error("missing required param `{0}`")]
    Missing(String),

    /// The slot's codec rejected the value.
    #[error("cannot encode param `{name}`: {source}")]
    Invalid {
        /// The slot name.
        name: String,
        /// The codec's complaint.
        #[source]
        source: InvalidParam,
    },
}

impl SlotError {
    /// Attaches the route label to this slot failure.
    pub(crate) fn for_route(self, route: &str) -> RouteError {
        match self {
            Self::Missing(param) => RouteError::MissingParam {
                route: route.to_string(),
                param,
            },
            Self::Invalid { name, source } => RouteError::Encode {
                route: route.to_string(),
                param: name,
                source,
            },
        }
    }
}

/// Result type alias for route operations.
pub type Result<T> = std::result::Result<T, RouteError>;
