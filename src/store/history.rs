//! Capped import history log backing `import_history.json`.

// self
use crate::{
	_prelude::*,
	store::{self, StoreError},
};

/// Maximum number of records retained on disk; older entries fall off the end.
const HISTORY_CAP: usize = 50;
/// Number of records surfaced in the stats summary.
const RECENT_COUNT: usize = 5;

/// One finished import attempt, newest first in the log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
	/// Product URL the import was started for.
	pub url: String,
	/// Whether the import completed successfully.
	pub success: bool,
	/// Outcome message for successful imports.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Failure description for unsuccessful imports.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Instant the record was appended.
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
}
impl ImportRecord {
	/// Builds a success record stamped with the current clock.
	pub fn success(url: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			success: true,
			message: Some(message.into()),
			error: None,
			timestamp: OffsetDateTime::now_utc(),
		}
	}

	/// Builds a failure record stamped with the current clock.
	pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			success: false,
			message: None,
			error: Some(error.into()),
			timestamp: OffsetDateTime::now_utc(),
		}
	}
}

/// Aggregated history figures served by the stats endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
	/// Total number of retained records.
	pub total_imports: usize,
	/// Number of successful imports.
	pub success_count: usize,
	/// Number of failed imports.
	pub failed_count: usize,
	/// Success percentage rounded to one decimal; `0.0` when the log is empty.
	pub success_rate: f64,
	/// The most recent records, newest first.
	pub recent_imports: Vec<ImportRecord>,
}

/// Persists the import log to a JSON file after each append.
#[derive(Clone, Debug)]
pub struct HistoryStore {
	path: PathBuf,
	inner: Arc<RwLock<Vec<ImportRecord>>>,
}
impl HistoryStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		store::ensure_parent_exists(&path)?;

		let snapshot = store::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Prepends a record, truncates to the retention cap, and persists.
	pub fn push(&self, record: ImportRecord) -> Result<(), StoreError> {
		let mut guard = self.inner.write();

		guard.insert(0, record);
		guard.truncate(HISTORY_CAP);

		store::persist_snapshot(&self.path, &*guard)
	}

	/// Returns a clone of the full log, newest first.
	pub fn snapshot(&self) -> Vec<ImportRecord> {
		self.inner.read().clone()
	}

	/// Computes the aggregate figures for the stats endpoint.
	pub fn summary(&self) -> ImportSummary {
		let guard = self.inner.read();
		let total = guard.len();
		let success = guard.iter().filter(|record| record.success).count();
		let rate = if total == 0 {
			0.0
		} else {
			(success as f64 / total as f64 * 1000.0).round() / 10.0
		};

		ImportSummary {
			total_imports: total,
			success_count: success,
			failed_count: total - success,
			success_rate: rate,
			recent_imports: guard.iter().take(RECENT_COUNT).cloned().collect(),
		}
	}
}
