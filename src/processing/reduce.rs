//! Numeric reductions and presence counts over one [`crate::dataset::DataSet`] feature.

use std::fmt;

use crate::dataset::DataSet;
use crate::error::{SummaryError, SummaryResult};
use crate::types::{Cell, FieldClass};

/// Built-in numeric reductions over a single feature. Empty markers are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Total of numeric-coerced values. Coercion failures are [`SummaryError::Value`].
    Sum,
    /// `Sum / count`. Zero present values is [`SummaryError::Division`].
    Mean,
    /// Smallest value; numeric features only.
    Min,
    /// Largest value; numeric features only.
    Max,
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReduceOp::Sum => "sum",
            ReduceOp::Mean => "mean",
            ReduceOp::Min => "min",
            ReduceOp::Max => "max",
        };
        f.write_str(name)
    }
}

/// Reduce `feature` using a built-in [`ReduceOp`].
///
/// - Returns [`SummaryError::KeyNotFound`] if `feature` is not in the schema.
/// - `Min`/`Max` return [`SummaryError::Type`] on a categorical feature or on any value that
///   cannot be read as a number, and [`SummaryError::EmptyData`] when nothing is present.
pub fn reduce(dataset: &DataSet, feature: &str, op: ReduceOp) -> SummaryResult<f64> {
    let out = match op {
        ReduceOp::Sum => sum(dataset, feature),
        ReduceOp::Mean => mean(dataset, feature),
        ReduceOp::Min | ReduceOp::Max => extreme(dataset, feature, op),
    };
    if let Ok(v) = &out {
        tracing::debug!(feature, %op, result = v, "reduce");
    }
    out
}

/// Number of records where `feature` is present.
pub fn count(dataset: &DataSet, feature: &str) -> SummaryResult<usize> {
    Ok(dataset.present_values(feature)?.count())
}

/// Number of records holding the empty marker for `feature`.
pub fn empty(dataset: &DataSet, feature: &str) -> SummaryResult<usize> {
    dataset.require_feature(feature)?;
    Ok(dataset
        .records()
        .filter(|r| r.get(feature).is_none_or(Cell::is_empty))
        .count())
}

fn sum(dataset: &DataSet, feature: &str) -> SummaryResult<f64> {
    let mut total = 0.0;
    for (record, v) in dataset.present_values(feature)? {
        total += v.coerce_f64().map_err(|message| SummaryError::Value {
            feature: feature.to_string(),
            record,
            raw: v.to_string(),
            message,
        })?;
    }
    Ok(total)
}

fn mean(dataset: &DataSet, feature: &str) -> SummaryResult<f64> {
    let n = count(dataset, feature)?;
    if n == 0 {
        return Err(SummaryError::Division {
            feature: feature.to_string(),
        });
    }
    Ok(sum(dataset, feature)? / n as f64)
}

fn extreme(dataset: &DataSet, feature: &str, op: ReduceOp) -> SummaryResult<f64> {
    let field = dataset
        .schema()
        .field(feature)
        .ok_or_else(|| SummaryError::key_not_found(feature))?;
    if field.class == Some(FieldClass::Categorical) {
        return Err(SummaryError::Type {
            message: format!("{op} is not defined for categorical feature '{feature}'"),
        });
    }

    let mut acc: Option<f64> = None;
    for (record, v) in dataset.present_values(feature)? {
        let x = v.coerce_f64().map_err(|_| SummaryError::Type {
            message: format!(
                "{op} requires a numeric feature; '{feature}' has {} value '{v}' at record {record}",
                v.kind()
            ),
        })?;
        acc = Some(match (op, acc) {
            (_, None) => x,
            (ReduceOp::Min, Some(a)) => a.min(x),
            (_, Some(a)) => a.max(x),
        });
    }

    acc.ok_or_else(|| SummaryError::EmptyData {
        feature: feature.to_string(),
    })
}
