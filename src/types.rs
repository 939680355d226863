//! Core data model types.
//!
//! A [`crate::dataset::DataSet`] holds [`Record`]s aligned against a [`Schema`] (an ordered list of
//! [`Field`]s read from the metadata file). Every field a record carries is a [`Cell`]: either a
//! present [`Value`] or the explicit [`Cell::Empty`] marker.

use std::cmp::Ordering;
use std::fmt;

/// Per-field type classification read from the metadata file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Labels; not valid input for `min`/`max`.
    Categorical,
    /// Numeric measurements.
    Quantitative,
}

impl FieldClass {
    /// Parse a class tag (case-insensitive, surrounding whitespace ignored).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "categorical" => Some(Self::Categorical),
            "quantitative" => Some(Self::Quantitative),
            _ => None,
        }
    }
}

/// A single named field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name, as it appears in the metadata header.
    pub name: String,
    /// Classification, if the metadata file carries one for this field.
    pub class: Option<FieldClass>,
}

impl Field {
    /// Create an unclassified field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: None,
        }
    }

    /// Create a field with a known classification.
    pub fn with_class(name: impl Into<String>, class: FieldClass) -> Self {
        Self {
            name: name.into(),
            class: Some(class),
        }
    }
}

/// Ordered, duplicate-free list of the fields a record may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns the field named `name`, if present.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A present scalar value decoded from the record source.
///
/// Equality and ordering treat [`Value::Int64`] and [`Value::Float64`] as one numeric kind, so
/// `Int64(1) == Float64(1.0)`. Values of different kinds (number vs string vs bool) are unequal
/// and unordered.
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Numeric view of this value without string parsing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Coerce to a number: numbers as-is, strings parsed after trimming, booleans as 1/0.
    pub fn coerce_f64(&self) -> Result<f64, String> {
        match self {
            Value::Int64(v) => Ok(*v as f64),
            Value::Float64(v) => Ok(*v),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Utf8(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("could not convert string to number: {e}")),
        }
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int64(_) | Value::Float64(_) => "number",
            Value::Bool(_) => "bool",
            Value::Utf8(_) => "string",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Utf8(a), Value::Utf8(b)) => a == b,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Utf8(a), Value::Utf8(b)) => Some(a.cmp(b)),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

/// A field slot in a [`Record`]: a present value or the empty marker.
///
/// [`Cell::Empty`] is distinct from `Present(Utf8(""))`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Present(Value),
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Cell::Present(v) => Some(v),
            Cell::Empty => None,
        }
    }
}

/// One record: field name → [`Cell`] pairs, in source key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, Cell)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `cell`, replacing an existing entry in place or appending a new one.
    pub fn insert(&mut self, name: impl Into<String>, cell: Cell) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = cell,
            None => self.entries.push((name, cell)),
        }
    }

    /// Returns the cell for `name`, if the record has that key.
    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, c)| c)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate `(name, cell)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append [`Cell::Empty`] for every schema field this record lacks.
    ///
    /// Returns the number of fields added.
    pub fn normalize(&mut self, schema: &Schema) -> usize {
        let mut added = 0;
        for name in schema.field_names() {
            if !self.contains_key(name) {
                self.entries.push((name.to_string(), Cell::Empty));
                added += 1;
            }
        }
        added
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Cell)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, c) in iter {
            record.insert(k, c);
        }
        record
    }
}
