//! Transport primitives for gateway calls.

// std
use std::ops::Deref;
// crates.io
use reqwest::redirect::Policy;
// self
use crate::{_prelude::*, error::ConfigError};

/// Outbound request timeout; the gateway answers well within this in practice.
const GATEWAY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Token requests must not follow redirects; the gateway returns token payloads
/// directly instead of delegating to another URI. Configure any custom
/// [`ReqwestClient`] passed via [`with_client`](GatewayHttpClient::with_client)
/// the same way.
#[derive(Clone, Debug)]
pub struct GatewayHttpClient(pub ReqwestClient);
impl GatewayHttpClient {
	/// Builds the default gateway client (15 s timeout, redirects disabled).
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(GATEWAY_TIMEOUT)
			.redirect(Policy::none())
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for GatewayHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for GatewayHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_client_builds() {
		assert!(GatewayHttpClient::new().is_ok());
	}
}
