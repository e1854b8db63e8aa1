//! File-backed JSON stores for the config document and the import history.

pub mod config;
pub mod history;

pub use config::ConfigStore;
pub use history::{HistoryStore, ImportRecord, ImportSummary};

// std
use std::{
	fs::{self, File},
	io::Write,
};
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// Error type produced by the JSON file stores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced while reading or writing a snapshot.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Filesystem-level failure for the storage backend.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Loads a JSON snapshot, treating absent or empty files as the default value.
pub(crate) fn load_snapshot<T>(path: &Path) -> Result<T, StoreError>
where
	T: DeserializeOwned + Default,
{
	if !path.exists() {
		return Ok(T::default());
	}

	let metadata = path.metadata().map_err(|e| StoreError::Backend {
		message: format!("Failed to inspect {}: {e}", path.display()),
	})?;

	if metadata.len() == 0 {
		return Ok(T::default());
	}

	let bytes = fs::read(path).map_err(|e| StoreError::Backend {
		message: format!("Failed to read {}: {e}", path.display()),
	})?;

	serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
		message: format!("Failed to parse {}: {e}", path.display()),
	})
}

/// Replaces the snapshot on disk atomically (write to a sibling, fsync, rename).
pub(crate) fn persist_snapshot<T>(path: &Path, contents: &T) -> Result<(), StoreError>
where
	T: Serialize,
{
	ensure_parent_exists(path)?;

	let serialized = serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
		message: format!("Failed to serialize store snapshot: {e}"),
	})?;
	let mut tmp_path = path.to_path_buf();

	tmp_path.set_extension("tmp");

	{
		let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
			message: format!("Failed to create {}: {e}", tmp_path.display()),
		})?;

		file.write_all(&serialized).map_err(|e| StoreError::Backend {
			message: format!("Failed to write {}: {e}", tmp_path.display()),
		})?;
		file.sync_all().map_err(|e| StoreError::Backend {
			message: format!("Failed to sync {}: {e}", tmp_path.display()),
		})?;
	}

	fs::rename(&tmp_path, path).map_err(|e| StoreError::Backend {
		message: format!("Failed to replace {}: {e}", path.display()),
	})
}

pub(crate) fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
			message: format!("Failed to create store directory {}: {e}", parent.display()),
		})?;
	}
	Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
	// std
	use std::{env, process};
	// self
	use super::*;

	/// Unique throwaway path under the system temp directory.
	pub(crate) fn temp_path(label: &str) -> PathBuf {
		let unique = format!(
			"storefront_bridge_{label}_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::fs;
	// self
	use super::*;

	#[test]
	fn absent_and_empty_snapshots_load_as_default() {
		let path = test_support::temp_path("absent");
		let loaded: Vec<u8> =
			load_snapshot(&path).expect("Absent snapshot should load as the default value.");

		assert!(loaded.is_empty());

		fs::write(&path, b"").expect("Failed to create empty snapshot file.");

		let loaded: Vec<u8> =
			load_snapshot(&path).expect("Empty snapshot should load as the default value.");

		assert!(loaded.is_empty());

		fs::remove_file(&path).expect("Failed to remove temporary snapshot file.");
	}

	#[test]
	fn corrupt_snapshots_surface_serialization_errors() {
		let path = test_support::temp_path("corrupt");

		fs::write(&path, b"{not json").expect("Failed to create corrupt snapshot file.");

		let result: Result<Vec<u8>, _> = load_snapshot(&path);

		assert!(matches!(result, Err(StoreError::Serialization { .. })));

		fs::remove_file(&path).expect("Failed to remove temporary snapshot file.");
	}

	#[test]
	fn persist_replaces_the_snapshot_atomically() {
		let path = test_support::temp_path("persist");

		persist_snapshot(&path, &vec![1_u8, 2, 3])
			.expect("Persisting a fresh snapshot should succeed.");
		persist_snapshot(&path, &vec![4_u8]).expect("Replacing the snapshot should succeed.");

		let loaded: Vec<u8> =
			load_snapshot(&path).expect("Persisted snapshot should load successfully.");

		assert_eq!(loaded, vec![4]);
		assert!(!path.with_extension("tmp").exists());

		fs::remove_file(&path).expect("Failed to remove temporary snapshot file.");
	}
}
