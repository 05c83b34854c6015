//! # Raw Document Helpers
//!
//! Template descriptors arrive as loosely-typed hierarchical documents
//! (`serde_json::Value`). Every decoder in this crate pulls typed fields out
//! of raw string-keyed maps, and every one of those extractions can fail the
//! same way: the key is present but the value has the wrong primitive kind.
//!
//! This module centralizes that extraction so the decoders read
//! declaratively and every failure carries a document-location context
//! (e.g. `Targets[1].BuildPhases[0].DstPath`).
//!
//! Absent keys are not errors for the `opt_*` helpers; the `req_*` helpers
//! report a missing key as a [`StructuralMismatch`](crate::error::Error) with
//! `found: "nothing"`.

use serde_json::Value;

use crate::error::{Error, Result};

/// A string-keyed raw document map.
pub(crate) type Dict = serde_json::Map<String, Value>;

/// Human-readable name of a raw value's kind, for error messages.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.as_i64().is_some() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Views the value as an object, or reports what it actually was.
pub(crate) fn as_object<'a>(value: &'a Value, context: &str) -> Result<&'a Dict> {
    value
        .as_object()
        .ok_or_else(|| Error::mismatch(context, "object", kind_name(value)))
}

/// Views the value as an array, or reports what it actually was.
pub(crate) fn as_array<'a>(value: &'a Value, context: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::mismatch(context, "array", kind_name(value)))
}

/// Joins a parent context with a field key: `Targets[0]` + `Name` →
/// `Targets[0].Name`.
pub(crate) fn field(context: &str, key: &str) -> String {
    if context.is_empty() {
        key.to_string()
    } else {
        format!("{context}.{key}")
    }
}

/// Joins a parent context with an array index.
pub(crate) fn index(context: &str, idx: usize) -> String {
    format!("{context}[{idx}]")
}

/// Required string field.
pub(crate) fn req_str(dict: &Dict, key: &str, context: &str) -> Result<String> {
    match dict.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(Error::mismatch(
            field(context, key),
            "string",
            kind_name(other),
        )),
        None => Err(Error::mismatch(field(context, key), "string", "nothing")),
    }
}

/// Optional string field; absent keys yield `None`.
pub(crate) fn opt_str(dict: &Dict, key: &str, context: &str) -> Result<Option<String>> {
    match dict.get(key) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::mismatch(
            field(context, key),
            "string",
            kind_name(other),
        )),
        None => Ok(None),
    }
}

/// Required integer field.
pub(crate) fn req_i64(dict: &Dict, key: &str, context: &str) -> Result<i64> {
    match dict.get(key) {
        Some(Value::Number(n)) if n.as_i64().is_some() => Ok(n.as_i64().unwrap()),
        Some(other) => Err(Error::mismatch(
            field(context, key),
            "integer",
            kind_name(other),
        )),
        None => Err(Error::mismatch(field(context, key), "integer", "nothing")),
    }
}

/// Optional integer field.
pub(crate) fn opt_i64(dict: &Dict, key: &str, context: &str) -> Result<Option<i64>> {
    match dict.get(key) {
        Some(Value::Number(n)) if n.as_i64().is_some() => Ok(n.as_i64()),
        Some(other) => Err(Error::mismatch(
            field(context, key),
            "integer",
            kind_name(other),
        )),
        None => Ok(None),
    }
}

/// Optional integer field that also accepts an integer-valued string
/// (descriptors in the wild store `SortOrder` both ways).
pub(crate) fn opt_i64_lenient(dict: &Dict, key: &str, context: &str) -> Result<Option<i64>> {
    match dict.get(key) {
        Some(Value::Number(n)) if n.as_i64().is_some() => Ok(n.as_i64()),
        Some(Value::String(s)) => match s.parse::<i64>() {
            Ok(i) => Ok(Some(i)),
            Err(_) => Err(Error::mismatch(
                field(context, key),
                "integer",
                format!("string {s:?}"),
            )),
        },
        Some(other) => Err(Error::mismatch(
            field(context, key),
            "integer",
            kind_name(other),
        )),
        None => Ok(None),
    }
}

/// Optional boolean field with a caller-supplied default.
pub(crate) fn bool_or(dict: &Dict, key: &str, context: &str, default: bool) -> Result<bool> {
    match dict.get(key) {
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(Error::mismatch(
            field(context, key),
            "boolean",
            kind_name(other),
        )),
        None => Ok(default),
    }
}

/// Optional array-of-strings field; absent keys yield an empty vector.
pub(crate) fn str_array(dict: &Dict, key: &str, context: &str) -> Result<Vec<String>> {
    let Some(value) = dict.get(key) else {
        return Ok(Vec::new());
    };
    let ctx = field(context, key);
    let array = as_array(value, &ctx)?;
    let mut out = Vec::with_capacity(array.len());
    for (i, item) in array.iter().enumerate() {
        match item {
            Value::String(s) => out.push(s.clone()),
            other => {
                return Err(Error::mismatch(index(&ctx, i), "string", kind_name(other)));
            }
        }
    }
    Ok(out)
}

/// Inserts a string array into a dict only when non-empty (omit-if-default
/// encoding policy).
pub(crate) fn put_str_array(dict: &mut Dict, key: &str, items: &[String]) {
    if !items.is_empty() {
        dict.insert(
            key.to_string(),
            Value::Array(items.iter().cloned().map(Value::String).collect()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dict(value: Value) -> Dict {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_req_str_reports_missing_and_mistyped() {
        let d = dict(json!({"Name": "App", "Order": 3}));
        assert_eq!(req_str(&d, "Name", "Target").unwrap(), "App");

        let err = req_str(&d, "Order", "Target").unwrap_err();
        assert!(err.to_string().contains("Target.Order"));
        assert!(err.to_string().contains("found integer"));

        let err = req_str(&d, "Missing", "Target").unwrap_err();
        assert!(err.to_string().contains("found nothing"));
    }

    #[test]
    fn test_opt_i64_lenient_accepts_integer_strings() {
        let d = dict(json!({"A": 7, "B": "20", "C": "twenty"}));
        assert_eq!(opt_i64_lenient(&d, "A", "t").unwrap(), Some(7));
        assert_eq!(opt_i64_lenient(&d, "B", "t").unwrap(), Some(20));
        assert_eq!(opt_i64_lenient(&d, "D", "t").unwrap(), None);
        assert!(opt_i64_lenient(&d, "C", "t").is_err());
    }

    #[test]
    fn test_str_array_defaults_empty_and_checks_items() {
        let d = dict(json!({"Tags": ["a", "b"], "Bad": ["a", 1]}));
        assert_eq!(str_array(&d, "Tags", "t").unwrap(), vec!["a", "b"]);
        assert!(str_array(&d, "Absent", "t").unwrap().is_empty());

        let err = str_array(&d, "Bad", "t").unwrap_err();
        assert!(err.to_string().contains("t.Bad[1]"));
    }

    #[test]
    fn test_bool_or_uses_default_only_when_absent() {
        let d = dict(json!({"Flag": false}));
        assert!(!bool_or(&d, "Flag", "t", true).unwrap());
        assert!(bool_or(&d, "Other", "t", true).unwrap());
        assert!(!bool_or(&d, "Other", "t", false).unwrap());
    }

    #[test]
    fn test_put_str_array_omits_empty() {
        let mut d = Dict::new();
        put_str_array(&mut d, "Tags", &[]);
        assert!(d.is_empty());
        put_str_array(&mut d, "Tags", &["x".to_string()]);
        assert_eq!(d.get("Tags"), Some(&json!(["x"])));
    }
}
