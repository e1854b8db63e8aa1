//! Background import worker and its pollable status.
//!
//! The import pipeline itself is simulated: the worker walks the status through
//! the same stages a real extraction would, then logs the outcome to the
//! history store. Polling clients observe progress via `GET /api/import/status`.

// crates.io
use tokio::{task::JoinHandle, time};
// self
use crate::{
	_prelude::*,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::{HistoryStore, ImportRecord},
};

/// Wall-clock time the simulated extraction stage takes.
pub const SIMULATED_IMPORT_DELAY: std::time::Duration = std::time::Duration::from_secs(2);

/// Pollable state of the most recent import; overwritten by each new attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatus {
	/// Product URL currently (or last) being imported.
	pub current: Option<String>,
	/// Progress percentage, `0..=100`.
	pub progress: u8,
	/// Human-readable stage description.
	pub message: String,
	/// Failure description, set when the attempt errored.
	pub error: Option<String>,
}

/// Shared handle over the process-wide [`ImportStatus`].
#[derive(Clone, Debug, Default)]
pub struct ImportTracker(Arc<RwLock<ImportStatus>>);
impl ImportTracker {
	/// Resets the status for a fresh attempt on `url`.
	pub fn begin(&self, url: &str) {
		*self.0.write() = ImportStatus {
			current: Some(url.to_owned()),
			progress: 0,
			message: "Starting import.".into(),
			error: None,
		};
	}

	/// Advances the progress and stage message.
	pub fn update(&self, progress: u8, message: &str) {
		let mut guard = self.0.write();

		guard.progress = progress;
		guard.message = message.to_owned();
	}

	/// Marks the attempt as finished successfully.
	pub fn complete(&self, message: &str) {
		let mut guard = self.0.write();

		guard.progress = 100;
		guard.message = message.to_owned();
	}

	/// Marks the attempt as failed.
	pub fn fail(&self, error: &str) {
		let mut guard = self.0.write();

		guard.error = Some(error.to_owned());
		guard.message = format!("Error: {error}");
	}

	/// Returns a clone of the current status.
	pub fn status(&self) -> ImportStatus {
		self.0.read().clone()
	}
}

/// Spawns the simulated import task for `url` and returns its handle.
///
/// The tracker is reset synchronously before the task is spawned, so a status
/// poll issued immediately after the triggering request already sees the new
/// attempt.
pub fn spawn_simulated_import(
	tracker: ImportTracker,
	history: HistoryStore,
	url: String,
	delay: std::time::Duration,
) -> JoinHandle<()> {
	const KIND: FlowKind = FlowKind::Import;

	tracker.begin(&url);
	obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

	let span = FlowSpan::new(KIND, "simulated_import");

	tokio::spawn(span.instrument(async move {
		tracker.update(10, "Extracting product data.");
		time::sleep(delay).await;

		match history.push(ImportRecord::success(&url, "Simulated import")) {
			Ok(()) => {
				tracker.complete("Import finished.");
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				tracing::info!(url = %url, "Simulated import finished.");
			},
			Err(e) => {
				let reason = e.to_string();

				if let Err(e) = history.push(ImportRecord::failure(&url, &reason)) {
					tracing::warn!(error = %e, "Failed to log the import failure.");
				}

				tracker.fail(&reason);
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				tracing::warn!(url = %url, error = %reason, "Simulated import failed.");
			},
		}
	}))
}

#[cfg(test)]
mod tests {
	// std
	use std::fs;
	// self
	use super::*;
	use crate::store::test_support::temp_path;

	#[test]
	fn tracker_walks_through_the_stages() {
		let tracker = ImportTracker::default();

		tracker.begin("https://example.com/item/1");

		let status = tracker.status();

		assert_eq!(status.current.as_deref(), Some("https://example.com/item/1"));
		assert_eq!(status.progress, 0);
		assert!(status.error.is_none());

		tracker.update(10, "Extracting product data.");

		assert_eq!(tracker.status().progress, 10);

		tracker.complete("Import finished.");

		let status = tracker.status();

		assert_eq!(status.progress, 100);
		assert_eq!(status.message, "Import finished.");
	}

	#[test]
	fn begin_clears_a_previous_failure() {
		let tracker = ImportTracker::default();

		tracker.begin("https://example.com/item/1");
		tracker.fail("extraction failed");

		assert!(tracker.status().error.is_some());

		tracker.begin("https://example.com/item/2");

		let status = tracker.status();

		assert!(status.error.is_none());
		assert_eq!(status.current.as_deref(), Some("https://example.com/item/2"));
	}

	#[tokio::test]
	async fn simulated_import_completes_and_logs_history() {
		let path = temp_path("import_worker");
		let history = HistoryStore::open(&path).expect("Failed to open history store.");
		let tracker = ImportTracker::default();
		let handle = spawn_simulated_import(
			tracker.clone(),
			history.clone(),
			"https://example.com/item/42".into(),
			std::time::Duration::ZERO,
		);

		handle.await.expect("Import task should not panic.");

		let status = tracker.status();

		assert_eq!(status.progress, 100);
		assert!(status.error.is_none());

		let snapshot = history.snapshot();

		assert_eq!(snapshot.len(), 1);
		assert!(snapshot[0].success);
		assert_eq!(snapshot[0].url, "https://example.com/item/42");

		fs::remove_file(&path).expect("Failed to remove temporary history snapshot.");
	}
}
