//! Config document store backing `config.json`.

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	store::{self, StoreError},
};

/// JSON object holding the merged service configuration.
pub type ConfigDocument = serde_json::Map<String, JsonValue>;

const ACCESS_TOKEN_KEY: &str = "marketplace_access_token";
const REFRESH_TOKEN_KEY: &str = "marketplace_refresh_token";

/// Persists a single JSON config document to disk after each mutation.
///
/// The document is an open key/value object: the config API merges arbitrary
/// keys into it, and the token exchange writes the token pair under fixed keys.
#[derive(Clone, Debug)]
pub struct ConfigStore {
	path: PathBuf,
	inner: Arc<RwLock<ConfigDocument>>,
}
impl ConfigStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		store::ensure_parent_exists(&path)?;

		let snapshot = store::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Returns a clone of the current document.
	pub fn document(&self) -> ConfigDocument {
		self.inner.read().clone()
	}

	/// Shallow-merges `patch` into the document (last writer wins) and persists.
	pub fn merge(&self, patch: ConfigDocument) -> Result<(), StoreError> {
		let mut guard = self.inner.write();

		for (key, value) in patch {
			guard.insert(key, value);
		}

		store::persist_snapshot(&self.path, &*guard)
	}

	/// Persists a freshly exchanged token pair, overwriting any prior value.
	///
	/// A pair without a refresh token leaves a previously stored refresh token in
	/// place, matching the gateway's rotation behavior.
	pub fn save_token_pair(&self, pair: &TokenPair) -> Result<(), StoreError> {
		let mut guard = self.inner.write();

		guard.insert(
			ACCESS_TOKEN_KEY.to_owned(),
			JsonValue::String(pair.access_token.expose().to_owned()),
		);

		if let Some(refresh) = &pair.refresh_token {
			guard.insert(
				REFRESH_TOKEN_KEY.to_owned(),
				JsonValue::String(refresh.expose().to_owned()),
			);
		}

		store::persist_snapshot(&self.path, &*guard)
	}

	/// Reads the stored token pair, if an access token has been persisted.
	pub fn token_pair(&self) -> Option<TokenPair> {
		let guard = self.inner.read();
		let access = guard.get(ACCESS_TOKEN_KEY)?.as_str()?.to_owned();
		let refresh = guard.get(REFRESH_TOKEN_KEY).and_then(JsonValue::as_str).map(str::to_owned);

		Some(TokenPair::new(access, refresh))
	}
}
