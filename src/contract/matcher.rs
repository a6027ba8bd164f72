use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct ShapeMismatch {
    /// JSONPath-style location, `$` is the root
    pub path: String,
    pub reason: String,
}

/// Checks that `actual` has the shape of `expected`.
///
/// Values are not compared, only JSON types. Objects must carry every
/// expected key (extra keys are fine), `null` only matches `null`, and every
/// element of an actual array must match at least one expected element.
pub fn matches_shape(expected: &Value, actual: &Value) -> Result<(), ShapeMismatch> {
    check(expected, actual, "$")
}

fn check(expected: &Value, actual: &Value, path: &str) -> Result<(), ShapeMismatch> {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => {
            for (key, expected) in expected {
                let path = format!("{}.{}", path, key);
                match actual.get(key) {
                    Some(actual) => check(expected, actual, &path)?,
                    None => return Err(mismatch(path, "missing key".to_string())),
                }
            }
            Ok(())
        }
        (Value::Array(expected), Value::Array(actual)) => {
            if actual.is_empty() && !expected.is_empty() {
                return Err(mismatch(path.to_string(), "expected a non-empty array".to_string()));
            }
            for (i, element) in actual.iter().enumerate() {
                let path = format!("{}[{}]", path, i);
                let mut closest = None;
                for candidate in expected {
                    match check(candidate, element, &path) {
                        Ok(()) => {
                            closest = None;
                            break;
                        }
                        Err(e) => closest = Some(e),
                    }
                }
                if let Some(e) = closest {
                    return Err(e);
                }
            }
            Ok(())
        }
        (Value::Null, Value::Null)
        | (Value::Bool(_), Value::Bool(_))
        | (Value::Number(_), Value::Number(_))
        | (Value::String(_), Value::String(_)) => Ok(()),
        _ => Err(mismatch(
            path.to_string(),
            format!("expected {}, found {}", kind(expected), kind(actual)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: String, reason: String) -> ShapeMismatch {
    ShapeMismatch { path, reason }
}
