//! Dataset construction pipeline.
//!
//! [`load_dataset`] runs the whole construction sequence:
//!
//! 1. check that both files exist (data file first, then metadata file)
//! 2. read the schema from the metadata header
//! 3. read the records from the JSON `data` array
//! 4. normalize every record against the schema
//!
//! If a [`LoadObserver`] is configured in [`SummaryOptions`], every [`LoadEvent`] of the attempt is
//! reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::dataset::DataSet;
use crate::error::{SourceRole, SummaryError, SummaryResult};

use super::metadata::MetadataFile;
use super::observability::{FieldFill, LoadContext, LoadEvent, LoadObserver, LoadSeverity, LoadStats};
use super::records::{load_records_from_path, normalize_records, unknown_keys};

/// Where `DataSet::lookup` reads keyed values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyLookup {
    /// The metadata file's first data row, re-read on every lookup.
    #[default]
    MetadataRow,
    /// The dataset's first record.
    FirstRecord,
}

/// Options controlling dataset construction and keyed lookup.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct SummaryOptions {
    /// Source of keyed (`&str`) lookups.
    pub key_lookup: KeyLookup,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Events at or above this severity are also passed to `on_alert`.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for SummaryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryOptions")
            .field("key_lookup", &self.key_lookup)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            key_lookup: KeyLookup::default(),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Build a [`DataSet`] from a JSON record file and a CSV metadata file.
///
/// When an observer is configured, this function reports:
///
/// - [`LoadEvent::UnknownKeys`] when records carry keys outside the schema
/// - [`LoadEvent::Loaded`] with [`LoadStats`] once the dataset is built
/// - [`LoadEvent::Failed`] when construction fails
///
/// Each event is also passed to `on_alert` when its severity is >= `options.alert_at_or_above`.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use data_summary::ingestion::{load_dataset, JsonLinesObserver, SummaryOptions};
///
/// # fn main() -> Result<(), data_summary::SummaryError> {
/// let opts = SummaryOptions {
///     observer: Some(Arc::new(JsonLinesObserver::create("load.jsonl")?)),
///     ..Default::default()
/// };
/// let ds = load_dataset("happiness.json", "happiness_metadata.csv", &opts)?;
/// println!("records={}", ds.len());
/// # Ok(())
/// # }
/// ```
pub fn load_dataset(
    data_path: impl AsRef<Path>,
    metadata_path: impl AsRef<Path>,
    options: &SummaryOptions,
) -> SummaryResult<DataSet> {
    let data_path = data_path.as_ref();
    let metadata_path = metadata_path.as_ref();
    let ctx = LoadContext {
        data_path: data_path.to_path_buf(),
        metadata_path: metadata_path.to_path_buf(),
    };

    let result = build(data_path, metadata_path, options);

    match &result {
        Ok((_, stats)) => {
            if stats.records_with_unknown_keys > 0 {
                tracing::warn!(
                    data = %data_path.display(),
                    keys = ?stats.unknown_keys,
                    records = stats.records_with_unknown_keys,
                    "records carry keys outside the schema"
                );
                let event = LoadEvent::UnknownKeys {
                    keys: &stats.unknown_keys,
                    records: stats.records_with_unknown_keys,
                };
                report(options, &ctx, &event);
            }
            tracing::info!(
                data = %data_path.display(),
                meta = %metadata_path.display(),
                records = stats.records,
                fields = stats.fields,
                filled = stats.total_filled(),
                "dataset loaded"
            );
            report(options, &ctx, &LoadEvent::Loaded { stats });
        }
        Err(error) => {
            let event = LoadEvent::Failed { error };
            tracing::debug!(severity = ?event.severity(), %error, "dataset load failed");
            report(options, &ctx, &event);
        }
    }

    result.map(|(ds, _)| ds)
}

fn report(options: &SummaryOptions, ctx: &LoadContext, event: &LoadEvent<'_>) {
    if let Some(obs) = options.observer.as_ref() {
        obs.on_event(ctx, event);
        if event.severity() >= options.alert_at_or_above {
            obs.on_alert(ctx, event);
        }
    }
}

fn build(
    data_path: &Path,
    metadata_path: &Path,
    options: &SummaryOptions,
) -> SummaryResult<(DataSet, LoadStats)> {
    // Both existence checks run before either file is parsed.
    if !data_path.exists() {
        return Err(SummaryError::NotFound {
            role: SourceRole::Data,
            path: data_path.to_path_buf(),
        });
    }
    if !metadata_path.exists() {
        return Err(SummaryError::NotFound {
            role: SourceRole::Metadata,
            path: metadata_path.to_path_buf(),
        });
    }

    let metadata = MetadataFile::open(metadata_path)?;
    let mut records = load_records_from_path(data_path)?;
    let (unknown_keys, records_with_unknown_keys) = unknown_keys(&records, metadata.schema());
    let filled = normalize_records(&mut records, metadata.schema())
        .into_iter()
        .map(|(field, records)| FieldFill { field, records })
        .collect();

    let stats = LoadStats {
        records: records.len(),
        fields: metadata.schema().len(),
        filled,
        unknown_keys,
        records_with_unknown_keys,
    };
    let ds = DataSet::from_parts(data_path.to_path_buf(), metadata, records, options.key_lookup);
    Ok((ds, stats))
}
