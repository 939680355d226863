//! Frequency-based operations: `mode` and `unique`.
//!
//! Values are compared with [`Value`]'s equality, so `1` and `1.0` count as the same value.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::dataset::DataSet;
use crate::error::{SummaryError, SummaryResult};
use crate::types::Value;

/// Hashable stand-in for a [`Value`]: equal values map to equal keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ValueKey<'a> {
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(&'a str),
}

impl<'a> ValueKey<'a> {
    fn of(v: &'a Value) -> Self {
        match v {
            Value::Int64(i) => ValueKey::Int(*i),
            // Integral floats share the integer key; this also folds -0.0 into 0.
            Value::Float64(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
                ValueKey::Int(*f as i64)
            }
            Value::Float64(f) => ValueKey::Float(f.to_bits()),
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Utf8(s) => ValueKey::Text(s),
        }
    }
}

/// Every value reaching the highest occurrence count among present values of `feature`.
///
/// Ties are all returned, in order of first occurrence. Fails with [`SummaryError::EmptyData`]
/// when `feature` has no present values.
pub fn mode(dataset: &DataSet, feature: &str) -> SummaryResult<Vec<Value>> {
    // `slots` maps a key to its position in `counts`, which stays in first-occurrence order.
    let mut slots: HashMap<ValueKey<'_>, usize> = HashMap::new();
    let mut counts: Vec<(&Value, usize)> = Vec::new();
    for (_, v) in dataset.present_values(feature)? {
        match slots.entry(ValueKey::of(v)) {
            Entry::Occupied(slot) => counts[*slot.get()].1 += 1,
            Entry::Vacant(slot) => {
                slot.insert(counts.len());
                counts.push((v, 1));
            }
        }
    }

    let max = counts
        .iter()
        .map(|(_, n)| *n)
        .max()
        .ok_or_else(|| SummaryError::EmptyData {
            feature: feature.to_string(),
        })?;

    tracing::debug!(feature, distinct = counts.len(), max, "mode");
    Ok(counts
        .into_iter()
        .filter(|(_, n)| *n == max)
        .map(|(v, _)| v.clone())
        .collect())
}

/// Distinct present values of `feature`, sorted ascending.
///
/// Numbers sort numerically, strings lexicographically, `false` before `true`. A feature that
/// mixes kinds (e.g. strings and numbers) fails with [`SummaryError::Type`].
pub fn unique(dataset: &DataSet, feature: &str) -> SummaryResult<Vec<Value>> {
    let mut seen: HashSet<ValueKey<'_>> = HashSet::new();
    let mut out: Vec<Value> = Vec::new();
    for (_, v) in dataset.present_values(feature)? {
        if seen.insert(ValueKey::of(v)) {
            out.push(v.clone());
        }
    }

    if let Some(first) = out.first() {
        if let Some(other) = out.iter().find(|v| v.kind() != first.kind()) {
            return Err(SummaryError::Type {
                message: format!(
                    "feature '{feature}' mixes {} and {} values",
                    first.kind(),
                    other.kind()
                ),
            });
        }
    }

    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{mode, unique};
    use crate::dataset::DataSet;
    use crate::error::SummaryError;
    use crate::ingestion::metadata::MetadataFile;
    use crate::ingestion::pipeline::KeyLookup;
    use crate::types::{Cell, Field, Record, Schema, Value};

    fn dataset(values: Vec<Cell>) -> DataSet {
        let schema = Schema::new(vec![Field::new("v")]);
        let records: Vec<Record> = values.into_iter().map(|c| [("v", c)].into_iter().collect()).collect();
        DataSet::from_parts(
            PathBuf::new(),
            MetadataFile::in_memory(schema),
            records,
            KeyLookup::MetadataRow,
        )
    }

    fn s(v: &str) -> Cell {
        Cell::Present(Value::Utf8(v.to_string()))
    }

    #[test]
    fn mode_keeps_ties_and_skips_empty() {
        let ds = dataset(vec![s("x"), Cell::Empty, Cell::Empty, s("y"), Cell::Empty, s("y"), s("x")]);
        assert_eq!(mode(&ds, "v").unwrap(), vec![Value::from("x"), Value::from("y")]);
    }

    #[test]
    fn empty_string_is_a_value() {
        let ds = dataset(vec![s(""), s(""), s("x")]);
        assert_eq!(mode(&ds, "v").unwrap(), vec![Value::from("")]);
        assert_eq!(unique(&ds, "v").unwrap(), vec![Value::from(""), Value::from("x")]);
    }

    #[test]
    fn mode_of_all_empty_is_empty_data() {
        let ds = dataset(vec![Cell::Empty, Cell::Empty]);
        assert!(matches!(mode(&ds, "v").unwrap_err(), SummaryError::EmptyData { .. }));
    }

    #[test]
    fn integral_floats_count_with_integers() {
        let n = |v: Value| Cell::Present(v);
        let ds = dataset(vec![
            n(Value::Float64(2.0)),
            n(Value::Int64(1)),
            n(Value::Int64(2)),
            n(Value::Float64(1.0)),
            n(Value::Float64(0.5)),
            n(Value::Float64(-0.0)),
            n(Value::Int64(0)),
        ]);
        assert_eq!(
            mode(&ds, "v").unwrap(),
            vec![Value::Float64(2.0), Value::Int64(1), Value::Float64(-0.0)]
        );
        assert_eq!(
            unique(&ds, "v").unwrap(),
            vec![Value::Float64(-0.0), Value::Float64(0.5), Value::Int64(1), Value::Float64(2.0)]
        );
    }

    #[test]
    fn mode_scales_to_many_distinct_values() {
        let mut values: Vec<Cell> = (0..20_000).map(|i| Cell::Present(Value::Int64(i))).collect();
        values.push(Cell::Present(Value::Float64(19_999.0)));
        let ds = dataset(values);
        assert_eq!(mode(&ds, "v").unwrap(), vec![Value::Int64(19_999)]);
        assert_eq!(unique(&ds, "v").unwrap().len(), 20_000);
    }

    #[test]
    fn unique_sorts_bools() {
        let ds = dataset(vec![
            Cell::Present(Value::Bool(true)),
            Cell::Present(Value::Bool(false)),
            Cell::Present(Value::Bool(true)),
        ]);
        assert_eq!(
            unique(&ds, "v").unwrap(),
            vec![Value::Bool(false), Value::Bool(true)]
        );
    }
}
