//! Signed authorization-code-to-token exchange against the gateway.
//!
//! The gateway's token endpoint is not an RFC 6749 token endpoint: client
//! authentication happens through the request signature rather than a client
//! secret parameter, and the token payload may arrive nested under an opaque
//! envelope key. Failures deliberately carry the raw response body; a
//! signature mismatch is indistinguishable from any other vendor-side
//! rejection, so the payload is the only diagnostic there is.

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	error::{TransportError, VendorError},
	flows::TokenExchanger,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	sign,
};

/// Gateway method selector for the token-creation operation.
pub const TOKEN_CREATE_METHOD: &str = "/auth/token/create";

impl TokenExchanger {
	/// Exchanges a single-use authorization code for a durable token pair.
	///
	/// On success the pair is persisted to the config store before it is
	/// returned. The code has no lifecycle beyond this one attempt; retrying a
	/// consumed code yields a vendor rejection.
	pub async fn exchange_authorization_code(&self, code: &str) -> Result<TokenPair> {
		const KIND: FlowKind = FlowKind::TokenExchange;

		let span = FlowSpan::new(KIND, "exchange_authorization_code");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.exchange_inner(code)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn exchange_inner(&self, code: &str) -> Result<TokenPair> {
		// The gateway rejects stale timestamps; stamp each attempt freshly.
		let timestamp = fresh_timestamp_millis();
		let params = [
			("app_key", self.settings.app_key.as_str()),
			("code", code),
			("sign_method", self.settings.sign_method.as_str()),
			("timestamp", timestamp.as_str()),
		];
		let signature = sign::sign_params(
			self.settings.sign_method,
			self.settings.app_secret.expose(),
			TOKEN_CREATE_METHOD,
			params,
		);
		let mut form: Vec<(&str, &str)> = params.to_vec();

		form.push(("sign", signature.as_str()));

		let url = token_endpoint(&self.settings.gateway);
		let response = self
			.http_client
			.post(url)
			.form(&form)
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let bytes = response.bytes().await.map_err(TransportError::from)?;
		let body = String::from_utf8_lossy(&bytes).into_owned();
		let deserializer = &mut serde_json::Deserializer::from_slice(&bytes);
		let payload: JsonValue =
			serde_path_to_error::deserialize(deserializer).map_err(|source| {
				VendorError::ResponseParse { source, status, body: body.clone() }
			})?;
		let pair = extract_token_pair(&payload)
			.ok_or_else(|| VendorError::MissingToken { status, body })?;

		self.store.save_token_pair(&pair)?;

		tracing::info!(status, "Access token persisted after code exchange.");

		Ok(pair)
	}
}

/// Token-creation endpoint derived from the gateway base URL.
///
/// The method selector stays in the URL query (outside the signed set); the
/// signed parameters travel in the form body.
fn token_endpoint(gateway: &Url) -> Url {
	let mut url = gateway.clone();

	url.set_path("/sync");
	url.set_query(Some(&format!("method={TOKEN_CREATE_METHOD}")));

	url
}

/// Locates the token pair at the top level or nested one level deep.
///
/// The gateway wraps successful payloads in an envelope object whose key
/// varies by API generation, so both shapes must be searched.
fn extract_token_pair(payload: &JsonValue) -> Option<TokenPair> {
	let root = payload.as_object()?;

	if let Some(pair) = pair_from_object(root) {
		return Some(pair);
	}

	root.values().find_map(|nested| nested.as_object().and_then(pair_from_object))
}

fn pair_from_object(object: &serde_json::Map<String, JsonValue>) -> Option<TokenPair> {
	let access = object.get("access_token")?.as_str()?;
	let refresh = object.get("refresh_token").and_then(JsonValue::as_str).map(str::to_owned);

	Some(TokenPair::new(access, refresh))
}

/// Epoch milliseconds rendered the way the gateway expects them.
fn fresh_timestamp_millis() -> String {
	(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).to_string()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_endpoint_keeps_the_method_selector_readable() {
		let gateway =
			Url::parse("https://api-sg.aliexpress.com").expect("Gateway fixture should parse.");
		let endpoint = token_endpoint(&gateway);

		assert_eq!(
			endpoint.as_str(),
			"https://api-sg.aliexpress.com/sync?method=/auth/token/create"
		);
	}

	#[test]
	fn extracts_a_top_level_token() {
		let payload = serde_json::json!({
			"access_token": "top-access",
			"refresh_token": "top-refresh",
			"expires_in": 86_400,
		});
		let pair = extract_token_pair(&payload).expect("Top-level token should be found.");

		assert_eq!(pair.access_token.expose(), "top-access");
		assert_eq!(pair.refresh_token.as_ref().map(|s| s.expose()), Some("top-refresh"));
	}

	#[test]
	fn extracts_a_nested_token_under_an_opaque_key() {
		let payload = serde_json::json!({
			"request_id": "0b4f",
			"auth_token_create_response": {
				"access_token": "nested-access",
			},
		});
		let pair = extract_token_pair(&payload).expect("Nested token should be found.");

		assert_eq!(pair.access_token.expose(), "nested-access");
		assert!(pair.refresh_token.is_none());
	}

	#[test]
	fn missing_token_yields_none() {
		let payload = serde_json::json!({
			"error_response": { "code": 25, "msg": "IncompleteSignature" },
		});

		assert!(extract_token_pair(&payload).is_none());
		assert!(extract_token_pair(&serde_json::json!([1, 2, 3])).is_none());
	}

	#[test]
	fn timestamps_are_epoch_milliseconds() {
		let stamp: i128 =
			fresh_timestamp_millis().parse().expect("Timestamp should parse as an integer.");

		// 2020-01-01T00:00:00Z in milliseconds; anything earlier means seconds.
		assert!(stamp > 1_577_836_800_000);
	}
}
