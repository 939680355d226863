//! Load reporting.
//!
//! A load attempt produces one or more [`LoadEvent`]s. Each event has a [`LoadSeverity`]; the
//! pipeline hands every event to [`LoadObserver::on_event`] and additionally calls
//! [`LoadObserver::on_alert`] when the severity meets the configured threshold.
//!
//! | event | severity |
//! |---|---|
//! | [`LoadEvent::Loaded`] | `Info` |
//! | [`LoadEvent::UnknownKeys`] | `Warning` |
//! | [`LoadEvent::Failed`] | `Error`, or `Critical` for missing files and I/O failures |

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Serialize, Serializer};

use crate::error::{SummaryError, SummaryResult};

/// Severity of a [`LoadEvent`], ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSeverity {
    /// The dataset was built.
    Info,
    /// The dataset was built, but some records carry keys the schema does not name.
    Warning,
    /// Construction failed on bad content.
    Error,
    /// Construction failed on a missing file or an I/O failure.
    Critical,
}

impl LoadSeverity {
    /// Severity of a construction failure.
    pub fn for_error(e: &SummaryError) -> Self {
        match e {
            SummaryError::NotFound { .. } | SummaryError::Io(_) => LoadSeverity::Critical,
            SummaryError::Csv(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                LoadSeverity::Critical
            }
            SummaryError::Json(err) if err.is_io() => LoadSeverity::Critical,
            _ => LoadSeverity::Error,
        }
    }
}

/// The two source files a load attempt reads.
#[derive(Debug, Clone, Serialize)]
pub struct LoadContext {
    #[serde(rename = "data")]
    pub data_path: PathBuf,
    #[serde(rename = "meta")]
    pub metadata_path: PathBuf,
}

/// How many records had `field` filled with the empty marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFill {
    pub field: String,
    pub records: usize,
}

/// What a successful load produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Number of loaded records.
    pub records: usize,
    /// Number of schema fields.
    pub fields: usize,
    /// Per schema field, in schema order.
    pub filled: Vec<FieldFill>,
    /// Record keys outside the schema, in first-seen order.
    pub unknown_keys: Vec<String>,
    /// Records carrying at least one of `unknown_keys`.
    pub records_with_unknown_keys: usize,
}

impl LoadStats {
    /// Total number of empty markers added by normalization.
    pub fn total_filled(&self) -> usize {
        self.filled.iter().map(|f| f.records).sum()
    }

    /// Number of records that lacked `field`, if it is a schema field.
    pub fn filled_for(&self, field: &str) -> Option<usize> {
        self.filled.iter().find(|f| f.field == field).map(|f| f.records)
    }
}

/// One reportable outcome of a load attempt.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LoadEvent<'a> {
    /// The dataset was built.
    Loaded { stats: &'a LoadStats },
    /// Some records carry keys the schema does not name. They are kept as loaded.
    UnknownKeys { keys: &'a [String], records: usize },
    /// Construction failed; the error is also returned to the caller.
    Failed {
        #[serde(serialize_with = "display")]
        error: &'a SummaryError,
    },
}

impl LoadEvent<'_> {
    pub fn severity(&self) -> LoadSeverity {
        match self {
            LoadEvent::Loaded { .. } => LoadSeverity::Info,
            LoadEvent::UnknownKeys { .. } => LoadSeverity::Warning,
            LoadEvent::Failed { error } => LoadSeverity::for_error(error),
        }
    }
}

fn display<S: Serializer>(error: &&SummaryError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

/// Receives load events.
pub trait LoadObserver: Send + Sync {
    /// Called for every event of a load attempt.
    fn on_event(&self, ctx: &LoadContext, event: &LoadEvent<'_>);

    /// Called, after [`Self::on_event`], for events at or above the alert threshold.
    fn on_alert(&self, _ctx: &LoadContext, _event: &LoadEvent<'_>) {}
}

/// Fans out events to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_event(&self, ctx: &LoadContext, event: &LoadEvent<'_>) {
        for o in &self.observers {
            o.on_event(ctx, event);
        }
    }

    fn on_alert(&self, ctx: &LoadContext, event: &LoadEvent<'_>) {
        for o in &self.observers {
            o.on_alert(ctx, event);
        }
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    severity: LoadSeverity,
    alert: bool,
    #[serde(flatten)]
    ctx: &'a LoadContext,
    #[serde(flatten)]
    event: &'a LoadEvent<'a>,
}

/// Appends one JSON object per event to a log file.
///
/// ```text
/// {"severity":"info","alert":false,"data":"a.json","meta":"a.csv","event":"loaded","stats":{...}}
/// ```
///
/// Alerts are written as a second line with `"alert":true`. Write failures are reported through
/// `tracing` and otherwise ignored.
#[derive(Debug)]
pub struct JsonLinesObserver {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesObserver {
    /// Open `path` for appending, creating it if needed.
    pub fn create(path: impl AsRef<Path>) -> SummaryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, ctx: &LoadContext, event: &LoadEvent<'_>, alert: bool) {
        let line = JsonLine {
            severity: event.severity(),
            alert,
            ctx,
            event,
        };
        let written = serde_json::to_string(&line)
            .map_err(SummaryError::from)
            .and_then(|text| {
                let mut file = self.file.lock().unwrap_or_else(|p| p.into_inner());
                writeln!(file, "{text}").map_err(SummaryError::from)
            });
        if let Err(e) = written {
            tracing::warn!(path = %self.path.display(), error = %e, "load log write failed");
        }
    }
}

impl LoadObserver for JsonLinesObserver {
    fn on_event(&self, ctx: &LoadContext, event: &LoadEvent<'_>) {
        self.append(ctx, event, false);
    }

    fn on_alert(&self, ctx: &LoadContext, event: &LoadEvent<'_>) {
        self.append(ctx, event, true);
    }
}
