//! Param codecs.
//!
//! A [`Param`] binds one named slot to the way its text is turned into a
//! typed value and back. There are exactly two kinds of binding: a
//! decode/encode pair ([`ParamCodec`]) and a validating regular expression.
//! Values are [`serde_json::Value`]s.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Number, Value};

use crate::error::{InvalidParam, RouteError};

/// Converts a single param between its text form and a typed value.
pub trait ParamCodec: Send + Sync {
    /// Decodes the text captured from a location.
    fn decode(&self, text: &str) -> Result<Value, InvalidParam>;

    /// Encodes a value for use in a location.
    fn encode(&self, value: &Value) -> Result<String, InvalidParam>;
}

/// Codec for plain strings. This is the default for every slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl ParamCodec for StringCodec {
    fn decode(&self, text: &str) -> Result<Value, InvalidParam> {
        Ok(Value::String(text.to_string()))
    }

    fn encode(&self, value: &Value) -> Result<String, InvalidParam> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(InvalidParam::new(format!("expected a string, got {other}"))),
        }
    }
}

/// Codec for numbers. Integer text decodes to an integer value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberCodec;

impl ParamCodec for NumberCodec {
    fn decode(&self, text: &str) -> Result<Value, InvalidParam> {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::from(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Ok(Value::from(n));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| InvalidParam::new(format!("`{text}` is not a number")))
    }

    fn encode(&self, value: &Value) -> Result<String, InvalidParam> {
        match value {
            Value::Number(n) => Ok(n.to_string()),
            other => Err(InvalidParam::new(format!("expected a number, got {other}"))),
        }
    }
}

/// Codec for booleans, spelled `true` or `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanCodec;

impl ParamCodec for BooleanCodec {
    fn decode(&self, text: &str) -> Result<Value, InvalidParam> {
        match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(InvalidParam::new(format!("`{text}` is not a boolean"))),
        }
    }

    fn encode(&self, value: &Value) -> Result<String, InvalidParam> {
        match value {
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(InvalidParam::new(format!("expected a boolean, got {other}"))),
        }
    }
}

/// Codec built from a pair of closures.
pub struct FnCodec<D, E> {
    decode: D,
    encode: E,
}

impl<D, E> ParamCodec for FnCodec<D, E>
where
    D: Fn(&str) -> Result<Value, InvalidParam> + Send + Sync,
    E: Fn(&Value) -> Result<String, InvalidParam> + Send + Sync,
{
    fn decode(&self, text: &str) -> Result<Value, InvalidParam> {
        (self.decode)(text)
    }

    fn encode(&self, value: &Value) -> Result<String, InvalidParam> {
        (self.encode)(value)
    }
}

/// A validating pattern. Decoding keeps the raw text unchanged.
#[derive(Debug, Clone)]
pub struct PatternCodec {
    source: String,
    anchored: Regex,
}

impl PatternCodec {
    /// Compiles a pattern. The whole text must match it.
    pub fn new(pattern: &str) -> crate::Result<Self> {
        let anchored =
            Regex::new(&format!("^(?:{pattern})$")).map_err(|source| RouteError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            source: pattern.to_string(),
            anchored,
        })
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn validate(&self, text: &str) -> Result<(), InvalidParam> {
        if self.anchored.is_match(text) {
            Ok(())
        } else {
            Err(InvalidParam::new(format!(
                "`{text}` does not match `{}`",
                self.source
            )))
        }
    }
}

/// The two kinds of param binding.
#[derive(Clone)]
pub enum ParamKind {
    /// A decode/encode pair.
    Codec(Arc<dyn ParamCodec>),
    /// A validating regular expression.
    Pattern(PatternCodec),
}

/// The codec bound to one named slot, plus whether the slot repeats.
#[derive(Clone)]
pub struct Param {
    kind: ParamKind,
    repeated: bool,
}

impl Param {
    /// Binds any codec.
    pub fn codec(codec: impl ParamCodec + 'static) -> Self {
        Self {
            kind: ParamKind::Codec(Arc::new(codec)),
            repeated: false,
        }
    }

    /// String param (the default).
    pub fn string() -> Self {
        Self::codec(StringCodec)
    }

    /// Number param.
    pub fn number() -> Self {
        Self::codec(NumberCodec)
    }

    /// Boolean param.
    pub fn boolean() -> Self {
        Self::codec(BooleanCodec)
    }

    /// Custom param from a decode/encode closure pair.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_route::{InvalidParam, Param};
    /// use serde_json::Value;
    ///
    /// let upper = Param::custom(
    ///     |text| Ok(Value::String(text.to_uppercase())),
    ///     |value| {
    ///         value
    ///             .as_str()
    ///             .map(str::to_lowercase)
    ///             .ok_or_else(|| InvalidParam::new("expected a string"))
    ///     },
    /// );
    /// assert_eq!(upper.decode("abc").unwrap(), "ABC");
    /// ```
    pub fn custom<D, E>(decode: D, encode: E) -> Self
    where
        D: Fn(&str) -> Result<Value, InvalidParam> + Send + Sync + 'static,
        E: Fn(&Value) -> Result<String, InvalidParam> + Send + Sync + 'static,
    {
        Self::codec(FnCodec { decode, encode })
    }

    /// Validating pattern param.
    ///
    /// Inside a path template the slot may span `/` separators. The
    /// pattern must match the whole percent-decoded text.
    pub fn pattern(pattern: &str) -> crate::Result<Self> {
        Ok(Self {
            kind: ParamKind::Pattern(PatternCodec::new(pattern)?),
            repeated: false,
        })
    }

    /// Marks the param as array-valued (query params only).
    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Returns whether the param is array-valued.
    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    /// Returns the binding.
    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    /// Returns the validating pattern of a pattern param.
    pub fn capture_pattern(&self) -> Option<&str> {
        match &self.kind {
            ParamKind::Pattern(pattern) => Some(pattern.as_str()),
            ParamKind::Codec(_) => None,
        }
    }

    /// Decodes one captured text.
    pub fn decode(&self, text: &str) -> Result<Value, InvalidParam> {
        match &self.kind {
            ParamKind::Codec(codec) => codec.decode(text),
            ParamKind::Pattern(pattern) => {
                pattern.validate(text)?;
                Ok(Value::String(text.to_string()))
            }
        }
    }

    /// Encodes one value.
    pub fn encode(&self, value: &Value) -> Result<String, InvalidParam> {
        match &self.kind {
            ParamKind::Codec(codec) => codec.encode(value),
            ParamKind::Pattern(pattern) => {
                let text = value
                    .as_str()
                    .ok_or_else(|| InvalidParam::new(format!("expected a string, got {value}")))?;
                pattern.validate(text)?;
                Ok(text.to_string())
            }
        }
    }
}

impl Default for Param {
    fn default() -> Self {
        Self::string()
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            ParamKind::Codec(_) => "codec".to_string(),
            ParamKind::Pattern(pattern) => format!("pattern({})", pattern.as_str()),
        };
        f.debug_struct("Param")
            .field("kind", &kind)
            .field("repeated", &self.repeated)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_codec() {
        let param = Param::number();
        assert_eq!(param.decode("42").unwrap(), json!(42));
        assert_eq!(param.decode("-3.5").unwrap(), json!(-3.5));
        assert!(param.decode("abc").is_err());
        assert!(param.decode("").is_err());
        assert!(param.decode("NaN").is_err());
        assert_eq!(param.encode(&json!(42)).unwrap(), "42");
        assert!(param.encode(&json!("42")).is_err());
    }

    #[test]
    fn test_boolean_codec() {
        let param = Param::boolean();
        assert_eq!(param.decode("true").unwrap(), json!(true));
        assert_eq!(param.decode("false").unwrap(), json!(false));
        assert!(param.decode("yes").is_err());
        assert_eq!(param.encode(&json!(false)).unwrap(), "false");
    }

    #[test]
    fn test_string_codec_rejects_non_strings() {
        let param = Param::string();
        assert_eq!(param.decode("abc").unwrap(), json!("abc"));
        assert!(param.encode(&json!(1)).is_err());
    }

    #[test]
    fn test_pattern_validates_whole_text() {
        let param = Param::pattern("[a-z]+").unwrap();
        assert_eq!(param.decode("abc").unwrap(), json!("abc"));
        assert!(param.decode("abc1").is_err());
        assert!(param.encode(&json!("ABC")).is_err());
        assert_eq!(param.capture_pattern(), Some("[a-z]+"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Param::pattern("(unclosed").unwrap_err();
        assert!(matches!(err, RouteError::InvalidPattern { .. }));
    }

    #[test]
    fn test_custom_codec_may_be_lossy() {
        let param = Param::custom(
            |text| Ok(Value::String(text.to_lowercase())),
            |value| {
                value
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| InvalidParam::new("expected a string"))
            },
        );
        let decoded = param.decode("MiXeD").unwrap();
        assert_eq!(decoded, json!("mixed"));
        let encoded = param.encode(&decoded).unwrap();
        assert_eq!(param.decode(&encoded).unwrap(), decoded);
    }

    #[test]
    fn test_repeated_flag() {
        assert!(!Param::number().is_repeated());
        assert!(Param::number().repeated().is_repeated());
    }
}
