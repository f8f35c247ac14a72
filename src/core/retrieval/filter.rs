//! Metadata equality filter.
//!
//! A filter is a flat mapping of metadata key to expected value. A
//! hit passes when every key's metadata value, rendered as a string,
//! equals the expected value. A key missing on the hit compares as
//! the empty string.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::core::error::{ChunkwiseError, Result};
use crate::core::types::RetrievalHit;

/// Conjunction of `key == value` conditions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFilter {
    conditions: BTreeMap<String, String>,
}

impl MetadataFilter {
    /// Filter from an already flat string mapping
    pub fn from_map(conditions: BTreeMap<String, String>) -> Self {
        Self { conditions }
    }

    /// Parse a filter from JSON text, e.g. `{"filename": "a.docx"}`.
    ///
    /// # Errors
    ///
    /// `InputError` if the text is not JSON or not a flat object.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ChunkwiseError::InputError(format!("Filter is not valid JSON: {e}")))?;
        Self::from_value(&value)
    }

    /// Build a filter from a JSON value.
    ///
    /// Values must be strings, numbers or booleans. Numbers compare by
    /// their JSON text (`3`, `0.5`); booleans compare as `True` and
    /// `False`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            ChunkwiseError::InputError(format!(
                "Filter must be a JSON object of key/value pairs, got {}",
                json_kind(value)
            ))
        })?;

        let mut conditions = BTreeMap::new();
        for (key, v) in object {
            let expected = match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(true) => "True".to_string(),
                Value::Bool(false) => "False".to_string(),
                other => {
                    return Err(ChunkwiseError::InputError(format!(
                        "Filter value for '{key}' must be a string, number or boolean, got {}",
                        json_kind(other)
                    )))
                }
            };
            conditions.insert(key.clone(), expected);
        }

        Ok(Self { conditions })
    }

    /// True if the filter has no conditions
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Iterate over `(key, expected)` pairs
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.conditions.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check every condition against the hit's metadata
    pub fn matches(&self, hit: &RetrievalHit) -> bool {
        self.conditions
            .iter()
            .all(|(key, expected)| hit.meta_string(key) == *expected)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
