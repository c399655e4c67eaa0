//! Data transaction entries: typed key/value writes and key deletions.
//!
//! On the wire a write is `{"key", "type", "value"}` with `type` one of
//! `integer`, `boolean`, `string`, `binary`. A deletion is
//! `{"key": k, "value": null}`; an input `type` of `null` is tolerated and
//! dropped, so deletions always re-encode without it.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::catalog;
use super::error::{SchemaError, ValidationError};
use super::types::{json_type_name, Base64, Long};
use super::validation::{index, join, malformed, Checker, FieldValue, Fields};
use crate::config::{CodecConfig, MAX_DATA_ENTRIES};

/// The value half of a data entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValue {
    Integer(Long),
    Boolean(bool),
    String(String),
    Binary(Base64),
    /// Removes the key from the account's data storage.
    Delete,
}

impl DataValue {
    /// The wire `type` tag. Deletions carry none.
    pub fn type_tag(&self) -> Option<&'static str> {
        match self {
            Self::Integer(_) => Some("integer"),
            Self::Boolean(_) => Some("boolean"),
            Self::String(_) => Some("string"),
            Self::Binary(_) => Some("binary"),
            Self::Delete => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Integer(n) => n.to_json(),
            Self::Boolean(b) => Value::Bool(*b),
            Self::String(s) => Value::String(s.clone()),
            Self::Binary(bytes) => Value::String(bytes.to_string()),
            Self::Delete => Value::Null,
        }
    }
}

/// One entry of a data transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataEntry {
    pub key: String,
    pub value: DataValue,
}

impl DataEntry {
    pub fn new(key: impl Into<String>, value: DataValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// A deletion request for `key`.
    pub fn delete(key: impl Into<String>) -> Self {
        Self::new(key, DataValue::Delete)
    }

    pub fn is_delete(&self) -> bool {
        self.value == DataValue::Delete
    }

    /// Decodes a single entry on its own. Error paths are relative to the
    /// entry, e.g. `value`.
    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        super::validation::run_nested(&CodecConfig::default(), false, |checker| {
            check_entry(checker, value, "")
        })
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("key".into(), Value::String(self.key.clone()));
        if let Some(tag) = self.value.type_tag() {
            map.insert("type".into(), Value::String(tag.into()));
        }
        map.insert("value".into(), self.value.to_json());
        Value::Object(map)
    }
}

// ---------------------------------------------------------------------------
// Checking
// ---------------------------------------------------------------------------

pub(crate) fn check_entry(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &str,
) -> Option<DataEntry> {
    let obj = checker.as_object(value, path)?;
    let tag = match obj.get("type") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            checker.fail(malformed(
                path,
                format!("entry type must be a string, got {}", json_type_name(other)),
            ));
            return None;
        }
    };
    let Some(specs) = catalog::lookup_data_entry(tag) else {
        checker.fail(malformed(
            path,
            format!("unknown data entry type '{}'", tag.unwrap_or_default()),
        ));
        return None;
    };

    // A delete may carry `type: null`; it is dropped rather than reported.
    let reserved: &[&str] = if tag.is_none() { &["type"] } else { &[] };
    let mut fields = checker.closed_object(specs.iter(), obj, path, reserved)?;
    checker.materialize(|| entry_from_fields(tag, &mut fields, path))
}

fn entry_from_fields(
    tag: Option<&str>,
    fields: &mut Fields,
    path: &str,
) -> Result<DataEntry, ValidationError> {
    let key = fields.take("key", FieldValue::into_string)?;
    let value = match tag {
        None => DataValue::Delete,
        Some("integer") => DataValue::Integer(fields.take("value", FieldValue::into_long)?),
        Some("boolean") => DataValue::Boolean(fields.take("value", FieldValue::into_bool)?),
        Some("string") => DataValue::String(fields.take("value", FieldValue::into_string)?),
        Some("binary") => DataValue::Binary(fields.take("value", FieldValue::into_base64)?),
        Some(other) => return Err(malformed(path, format!("unknown data entry type '{}'", other))),
    };
    Ok(DataEntry { key, value })
}

/// Checks the `data` array: entry shapes, the entry limit, and key
/// uniqueness.
pub(crate) fn check_entries(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &str,
) -> Option<Vec<DataEntry>> {
    let items = checker.as_array(value, path)?;
    let mark = checker.mark();
    if items.len() > MAX_DATA_ENTRIES {
        checker.fail(ValidationError::field(
            path,
            format!(
                "at most {} entries allowed, got {}",
                MAX_DATA_ENTRIES,
                items.len()
            ),
        ));
    }

    let entries: Vec<DataEntry> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| check_entry(checker, item, &index(path, i)))
        .collect();

    // Keys are compared as written, so a malformed entry elsewhere does not
    // hide a duplicate.
    let mut seen = HashSet::new();
    for (i, item) in items.iter().enumerate() {
        let Some(key) = item.get("key").and_then(Value::as_str) else {
            continue;
        };
        if !seen.insert(key) {
            checker.fail(ValidationError::field(
                join(&index(path, i), "key"),
                format!("duplicate key '{}'", key),
            ));
        }
    }

    if checker.failed_since(mark) {
        None
    } else {
        Some(entries)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
