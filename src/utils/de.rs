// src/utils/de.rs

//! Lenient numeric deserializers for feed columns.
//!
//! The feeds are inconsistent about numbers: some ship `4`, some `"4"`.
//! These accept both and reject anything else instead of coercing it.

use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

/// Number or numeric string; `null`, missing and blank strings become `None`.
pub fn lenient_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("{n} does not fit in f64"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("'{s}' is not a number"))),
        Some(other) => Err(D::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// Integer identifier as a number or numeric string; `null` and missing become `None`.
pub fn lenient_i64_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(id) = n.as_i64() {
                return Ok(Some(id));
            }
            // pandas-style exports write integer ids as 43.0
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                _ => Err(D::Error::custom(format!("{n} is not an integer id"))),
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("'{s}' is not an integer id"))),
        Some(other) => Err(D::Error::custom(format!("expected an id, got {other}"))),
    }
}

/// Required integer identifier, same leniency as [`lenient_i64_opt`].
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_i64_opt(deserializer)?.ok_or_else(|| D::Error::custom("id is null"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_f64_opt")]
        marks: Option<f64>,
        #[serde(default, deserialize_with = "lenient_i64_opt")]
        id: Option<i64>,
    }

    fn row(value: Value) -> Result<Row, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_accepts_numbers_and_numeric_strings() {
        let r = row(json!({"marks": "4", "id": "43"})).unwrap();
        assert_eq!(r.marks, Some(4.0));
        assert_eq!(r.id, Some(43));

        let r = row(json!({"marks": 2.5, "id": 43.0})).unwrap();
        assert_eq!(r.marks, Some(2.5));
        assert_eq!(r.id, Some(43));
    }

    #[test]
    fn test_missing_and_null_become_none() {
        let r = row(json!({"marks": null})).unwrap();
        assert_eq!(r.marks, None);
        assert_eq!(r.id, None);
    }

    #[test]
    fn test_rejects_non_numeric_values() {
        assert!(row(json!({"marks": "four"})).is_err());
        assert!(row(json!({"id": 4.5})).is_err());
        assert!(row(json!({"id": [1]})).is_err());
    }
}
