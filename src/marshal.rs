//! Conversion between JSON documents and the text values exchanged with PostgreSQL.
//!
//! Reads come back as one nullable text column holding JSON (`to_jsonb(row)` or `jsonb_agg(row)`);
//! writes go out as `(column, value)` pairs whose values are bound as JSON text.

use crate::error::AppError;
use crate::sql::Identifier;
use serde_json::{Map, Value};

/// Value destined for one column in a mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Null, bool, number or string, passed through as-is.
    Scalar(Value),
    /// Object or array, already re-serialized to JSON text.
    Nested(String),
}

impl FieldValue {
    /// JSON text bound into the statement. `null` stays JSON `null`, which the row type turns into SQL NULL.
    pub fn to_json_text(&self) -> String {
        match self {
            FieldValue::Scalar(v) => v.to_string(),
            FieldValue::Nested(s) => s.clone(),
        }
    }
}

/// Parse a single-row result. `None` (SQL NULL, no match) is `Ok(None)`.
pub fn to_document(raw: Option<&str>) -> Result<Option<Value>, AppError> {
    let Some(raw) = raw else { return Ok(None) };
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Null => Ok(None),
        Value::Object(_) => Ok(Some(value)),
        other => Err(AppError::MalformedPayload(format!(
            "expected a JSON object row, got {}",
            json_kind(&other)
        ))),
    }
}

/// Parse an aggregated result set. SQL NULL (no rows) is an empty collection.
pub fn to_collection(raw: Option<&str>) -> Result<Vec<Value>, AppError> {
    let Some(raw) = raw else { return Ok(Vec::new()) };
    match serde_json::from_str::<Value>(raw)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(rows) => Ok(rows),
        other => Err(AppError::MalformedPayload(format!(
            "expected a JSON array of rows, got {}",
            json_kind(&other)
        ))),
    }
}

/// Parse a request body that must be a JSON object.
pub fn parse_object(body: &str) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::MalformedPayload("body must be a JSON object".into())),
    }
}

/// Column names of a document, each checked against the identifier whitelist.
pub fn document_columns(document: &Map<String, Value>) -> Result<Vec<Identifier>, AppError> {
    document.keys().map(|k| column(k)).collect()
}

/// Ordered `(column, value)` pairs for an UPDATE. Order follows the map's iteration order.
pub fn field_assignments(document: &Map<String, Value>) -> Result<Vec<(Identifier, FieldValue)>, AppError> {
    document
        .iter()
        .map(|(k, v)| -> Result<_, AppError> {
            let column = column(k)?;
            let value = match v {
                Value::Object(_) | Value::Array(_) => FieldValue::Nested(serde_json::to_string(v)?),
                scalar => FieldValue::Scalar(scalar.clone()),
            };
            Ok((column, value))
        })
        .collect()
}

/// An empty key is a bad column name, not a missing table.
fn column(name: &str) -> Result<Identifier, AppError> {
    if name.is_empty() {
        return Err(AppError::InvalidIdentifier(String::new()));
    }
    Identifier::parse(name)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
