//! High-level OAuth flow orchestrators.

pub mod authorize;
pub mod token_exchange;

pub use authorize::AuthorizationSession;

// self
use crate::{_prelude::*, config::Settings, http::GatewayHttpClient, store::ConfigStore};

/// Coordinates the OAuth flows against the marketplace gateway.
///
/// The exchanger owns the HTTP client, the process settings, and the config
/// store so individual flow implementations can focus on request construction
/// (signing, timestamping) and response interpretation.
#[derive(Clone, Debug)]
pub struct TokenExchanger {
	/// HTTP client wrapper used for every outbound gateway request.
	pub http_client: GatewayHttpClient,
	/// Process-wide settings (credentials, endpoints, sign method).
	pub settings: Arc<Settings>,
	/// Config store that persists exchanged token pairs.
	pub store: ConfigStore,
}
impl TokenExchanger {
	/// Creates an exchanger that provisions its own gateway transport.
	pub fn new(settings: Arc<Settings>, store: ConfigStore) -> Result<Self> {
		Ok(Self::with_http_client(settings, store, GatewayHttpClient::new()?))
	}

	/// Creates an exchanger that reuses the caller-provided transport.
	pub fn with_http_client(
		settings: Arc<Settings>,
		store: ConfigStore,
		http_client: GatewayHttpClient,
	) -> Self {
		Self { http_client, settings, store }
	}
}
