use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::PayloadShape;
use crate::{FetchError, ValidationError};

/// Strongly-shaped vendor row.
///
/// Deserialization handles field aliasing and value coercion; `validate`
/// enforces the range invariants serde cannot express.
pub trait Record: DeserializeOwned {
    /// Name used in schema-validation errors.
    const NAME: &'static str;

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Decode a sequence payload into records, failing on the first bad row.
pub fn decode_many<R: Record>(payload: Value, sub_key: Option<&str>) -> Result<Vec<R>, FetchError> {
    match select(payload, sub_key) {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| build::<R>(item, Some(index)))
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(FetchError::ShapeMismatch {
            expected: PayloadShape::Sequence,
            found: PayloadShape::of(&other),
        }),
    }
}

/// Decode a mapping payload into exactly one record.
pub fn decode_one<R: Record>(payload: Value, sub_key: Option<&str>) -> Result<R, FetchError> {
    match select(payload, sub_key) {
        item @ Value::Object(_) => build::<R>(item, None),
        other => Err(FetchError::ShapeMismatch {
            expected: PayloadShape::Mapping,
            found: PayloadShape::of(&other),
        }),
    }
}

fn select(payload: Value, sub_key: Option<&str>) -> Value {
    match (sub_key, payload) {
        (Some(key), Value::Object(mut fields)) => {
            fields.remove(key).unwrap_or_else(|| Value::Array(Vec::new()))
        }
        (_, payload) => payload,
    }
}

fn build<R: Record>(item: Value, index: Option<usize>) -> Result<R, FetchError> {
    let location = |message: String| match index {
        Some(index) => format!("row {index}: {message}"),
        None => message,
    };

    let record: R = serde_json::from_value(item)
        .map_err(|error| FetchError::schema_validation(R::NAME, location(error.to_string())))?;
    record
        .validate()
        .map_err(|error| FetchError::schema_validation(R::NAME, location(error.to_string())))?;
    Ok(record)
}
