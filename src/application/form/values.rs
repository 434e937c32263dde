//! Field-level access to typed form values through their serialized object form.

use crate::domain::{FieldName, FormError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub(super) fn to_object<T: Serialize>(values: &T) -> Result<Map<String, Value>, FormError> {
    let value = serde_json::to_value(values).map_err(|e| FormError::InvalidValue {
        field: String::new(),
        reason: e.to_string(),
    })?;
    match value {
        Value::Object(object) => Ok(object),
        other => Err(FormError::NotAnObject(kind_of(&other))),
    }
}

pub(super) fn from_object<T: DeserializeOwned>(
    object: Map<String, Value>,
    field: &str,
) -> Result<T, FormError> {
    serde_json::from_value(Value::Object(object)).map_err(|e| FormError::InvalidValue {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

pub(super) fn field_names<T: Serialize>(values: &T) -> Result<Vec<FieldName>, FormError> {
    Ok(to_object(values)?.into_iter().map(|(key, _)| key).collect())
}

pub(super) fn to_json<V: Serialize>(value: V, field: &str) -> Result<Value, FormError> {
    serde_json::to_value(value).map_err(|e| FormError::InvalidValue {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

/// Overwrite the given keys of `values`, rejecting keys the form does not have.
///
/// Nothing is written unless every key is known and the merged object still
/// deserializes into `T`.
pub(super) fn merge<T>(values: &T, partial: Map<String, Value>) -> Result<T, FormError>
where
    T: Serialize + DeserializeOwned,
{
    let mut object = to_object(values)?;
    if let Some(unknown) = partial.keys().find(|key| !object.contains_key(*key)) {
        return Err(FormError::UnknownField(unknown.clone()));
    }
    let label = partial.keys().cloned().collect::<Vec<_>>().join(", ");
    object.extend(partial);
    from_object(object, &label)
}

pub(super) fn into_partial(value: Value) -> Result<Map<String, Value>, FormError> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(FormError::NotAnObject(kind_of(&other))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
