//! Structured (JSON) record source.
//!
//! Expected input is a top-level object whose `data` key holds an array of objects with scalar
//! values:
//!
//! ```json
//! {"data": [{"Country": "Denmark", "Happiness Score": 7.526}, {"Country": "Chad"}]}
//! ```
//!
//! JSON `null` decodes to [`Cell::Empty`], the same marker normalization uses for missing keys.

use std::fs;
use std::path::Path;

use crate::error::{SourceRole, SummaryError, SummaryResult};
use crate::types::{Cell, Record, Schema, Value};

/// Load records from a JSON file.
///
/// Fails with [`SummaryError::NotFound`] before reading if `path` does not exist.
pub fn load_records_from_path(path: impl AsRef<Path>) -> SummaryResult<Vec<Record>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SummaryError::NotFound {
            role: SourceRole::Data,
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)?;
    parse_records_str(&text)
}

/// Parse records from in-memory JSON text.
pub fn parse_records_str(input: &str) -> SummaryResult<Vec<Record>> {
    let mut root = match serde_json::from_str::<serde_json::Value>(input)? {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(SummaryError::format(format!(
                "record source must be an object with a 'data' key, got {}",
                json_kind(&other)
            )));
        }
    };

    let items = match root.remove("data") {
        Some(serde_json::Value::Array(items)) => items,
        Some(other) => {
            return Err(SummaryError::format(format!(
                "'data' must be an array of objects, got {}",
                json_kind(&other)
            )));
        }
        None => return Err(SummaryError::format("missing top-level 'data' key")),
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| convert_record(idx, item))
        .collect()
}

/// Add [`Cell::Empty`] for every schema field each record lacks.
///
/// Returns, per schema field in schema order, how many records had it filled in.
pub fn normalize_records(records: &mut [Record], schema: &Schema) -> Vec<(String, usize)> {
    let mut filled: Vec<(String, usize)> = schema.field_names().map(|n| (n.to_string(), 0)).collect();
    for record in records.iter_mut() {
        for (name, n) in filled.iter_mut() {
            if !record.contains_key(name) {
                record.insert(name.as_str(), Cell::Empty);
                *n += 1;
            }
        }
    }
    filled
}

/// Keys carried by records that the schema does not name, in first-seen order, together with the
/// number of records carrying at least one of them.
pub fn unknown_keys(records: &[Record], schema: &Schema) -> (Vec<String>, usize) {
    let mut keys: Vec<String> = Vec::new();
    let mut carriers = 0;
    for record in records {
        let mut carries = false;
        for key in record.keys().filter(|k| !schema.contains(k)) {
            carries = true;
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        carriers += usize::from(carries);
    }
    (keys, carriers)
}

fn convert_record(idx: usize, item: &serde_json::Value) -> SummaryResult<Record> {
    let obj = item.as_object().ok_or_else(|| {
        SummaryError::format(format!(
            "record {idx} is not a json object ({})",
            json_kind(item)
        ))
    })?;

    let mut record = Record::new();
    for (key, jv) in obj {
        record.insert(key.as_str(), convert_json_value(idx, key, jv)?);
    }
    Ok(record)
}

fn convert_json_value(idx: usize, key: &str, v: &serde_json::Value) -> SummaryResult<Cell> {
    let value = match v {
        serde_json::Value::Null => return Ok(Cell::Empty),
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).ok_or_else(|| {
                SummaryError::format(format!("record {idx} field '{key}': unrepresentable number {n}"))
            })?,
        },
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            return Err(SummaryError::format(format!(
                "record {idx} field '{key}' is not a scalar ({})",
                json_kind(v)
            )));
        }
    };
    Ok(Cell::Present(value))
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
