//! # Scalar Values and Dynamic Keys
//!
//! This module provides the two leaf-level building blocks of a template
//! descriptor:
//!
//! - **[`ScalarValue`]**: a closed union over the four primitive leaf kinds a
//!   descriptor may carry (boolean, integer, float, string), with the
//!   format's coercion rules applied on decode. Keeping this a small closed
//!   enum (rather than an open "any" type) keeps encoding total and
//!   exhaustive.
//! - **[`Key`]**: a validated non-empty string used wherever a dynamic,
//!   schema-less mapping key must be round-tripped (definition names).
//!
//! ## Coercion rules
//!
//! Descriptors authored by hand frequently store numbers and booleans as
//! strings (`"YES"`, `"20"`). Decoding therefore tries, in order: boolean,
//! integer, float, then string — where the literal strings `"YES"` and
//! `"NO"` become booleans and numeric strings become numbers before the
//! plain-string fallback. Encoding performs no coercion: it is the direct
//! inverse of whichever variant is active.

use std::borrow::Borrow;
use std::fmt;

use serde_json::Value;

use crate::document;
use crate::error::{Error, Result};

/// A primitive leaf value of a template descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    /// Decodes a raw document leaf into a scalar.
    ///
    /// Fails with [`Error::UnrepresentableScalar`] if the leaf is not one of
    /// the four primitive kinds (i.e. it is null, an array, or an object).
    pub fn from_value(value: &Value, context: &str) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(ScalarValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(ScalarValue::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(ScalarValue::Float(f))
                } else {
                    Err(Error::UnrepresentableScalar {
                        context: context.to_string(),
                        found: format!("number {n}"),
                    })
                }
            }
            Value::String(s) => Ok(Self::coerce_str(s)),
            other => Err(Error::UnrepresentableScalar {
                context: context.to_string(),
                found: document::kind_name(other).to_string(),
            }),
        }
    }

    /// Applies the string coercion ladder: `"YES"`/`"NO"`, integer, finite
    /// float, then the string itself.
    fn coerce_str(s: &str) -> Self {
        match s {
            "YES" => return ScalarValue::Bool(true),
            "NO" => return ScalarValue::Bool(false),
            _ => {}
        }
        if let Ok(i) = s.parse::<i64>() {
            return ScalarValue::Int(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return ScalarValue::Float(f);
            }
        }
        ScalarValue::String(s.to_string())
    }

    /// Encodes the scalar back into a raw document leaf. No coercion: the
    /// active variant maps directly to its leaf kind.
    pub fn to_value(&self) -> Value {
        match self {
            ScalarValue::Bool(b) => Value::Bool(*b),
            ScalarValue::Int(i) => Value::from(*i),
            ScalarValue::Float(f) => match serde_json::Number::from_f64(*f) {
                Some(n) => Value::Number(n),
                // Non-finite floats have no JSON representation; decode never
                // produces them, so this only triggers for hand-built values.
                None => Value::String(f.to_string()),
            },
            ScalarValue::String(s) => Value::String(s.clone()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Int(i) => write!(f, "{i}"),
            ScalarValue::Float(v) => write!(f, "{v}"),
            ScalarValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

/// A validated, non-empty dynamic mapping key.
///
/// Ordered maps keyed by `Key` can be queried directly with `&str` thanks to
/// the `Borrow<str>` implementation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(String);

impl Key {
    /// Constructs a key, failing with [`Error::EmptyKey`] on an empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(Error::EmptyKey {
                context: "key construction".to_string(),
            });
        }
        Ok(Key(raw))
    }

    /// Same validation as [`Key::new`], but reports the document location on
    /// failure. Used by decoders.
    pub(crate) fn at(raw: &str, context: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::EmptyKey {
                context: context.to_string(),
            });
        }
        Ok(Key(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_coercion_ladder() {
        let cases = [
            (json!("YES"), ScalarValue::Bool(true)),
            (json!("NO"), ScalarValue::Bool(false)),
            (json!("42"), ScalarValue::Int(42)),
            (json!("-7"), ScalarValue::Int(-7)),
            (json!("3.14"), ScalarValue::Float(3.14)),
            (json!("hello"), ScalarValue::String("hello".to_string())),
            (json!(true), ScalarValue::Bool(true)),
            (json!(20), ScalarValue::Int(20)),
            (json!(2.5), ScalarValue::Float(2.5)),
        ];
        for (raw, expected) in cases {
            let decoded = ScalarValue::from_value(&raw, "test").unwrap();
            assert_eq!(decoded, expected, "decoding {raw}");
        }
    }

    #[test]
    fn test_yes_no_only_exact_literals() {
        // Lowercase and padded spellings stay strings.
        for raw in ["yes", "no", "Yes", " YES"] {
            let decoded = ScalarValue::from_value(&json!(raw), "test").unwrap();
            assert_eq!(decoded, ScalarValue::String(raw.to_string()));
        }
    }

    #[test]
    fn test_non_finite_float_string_stays_string_or_coerces_safely() {
        // "inf" parses as a float but is not finite, so it must remain a string.
        let decoded = ScalarValue::from_value(&json!("inf"), "test").unwrap();
        assert_eq!(decoded, ScalarValue::String("inf".to_string()));
    }

    #[test]
    fn test_unrepresentable_scalars() {
        for raw in [json!(null), json!([1, 2]), json!({"a": 1})] {
            let err = ScalarValue::from_value(&raw, "Settings.FOO").unwrap_err();
            match err {
                Error::UnrepresentableScalar { context, .. } => {
                    assert_eq!(context, "Settings.FOO");
                }
                other => panic!("expected UnrepresentableScalar, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_encode_is_inverse_without_coercion() {
        assert_eq!(ScalarValue::Bool(true).to_value(), json!(true));
        assert_eq!(ScalarValue::Int(42).to_value(), json!(42));
        assert_eq!(ScalarValue::Float(3.14).to_value(), json!(3.14));
        // A string that *looks* numeric still encodes as whatever variant is
        // active; a String("YES") constructed by hand stays a string.
        assert_eq!(
            ScalarValue::String("YES".to_string()).to_value(),
            json!("YES")
        );
    }

    #[test]
    fn test_key_rejects_empty() {
        assert!(matches!(Key::new(""), Err(Error::EmptyKey { .. })));
        let key = Key::new("PRODUCT_NAME").unwrap();
        assert_eq!(key.as_str(), "PRODUCT_NAME");
    }

    #[test]
    fn test_key_borrow_lookup() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(Key::new("Source").unwrap(), 1);
        assert_eq!(map.get("Source"), Some(&1));
        assert_eq!(map.get("Missing"), None);
    }
}
