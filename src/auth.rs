//! Auth-domain token models and secret redaction helpers.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping sensitive material out of logs.
///
/// Serializes transparently as a plain string so stored documents stay readable;
/// only `Debug`/`Display` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretString(String);
impl SecretString {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` if the secret is the empty string (unconfigured).
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for SecretString {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SecretString {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SecretString").field(&"<redacted>").finish()
	}
}
impl Display for SecretString {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Durable credential pair issued by a successful authorization-code exchange.
///
/// The access token is always present; the gateway only sometimes issues a
/// refresh token alongside it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Access token secret; callers must avoid logging it.
	pub access_token: SecretString,
	/// Refresh token secret, if the gateway issued one.
	pub refresh_token: Option<SecretString>,
}
impl TokenPair {
	/// Creates a pair from raw token strings.
	pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
		Self {
			access_token: SecretString::new(access_token),
			refresh_token: refresh_token.map(SecretString::new),
		}
	}
}
impl Debug for TokenPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenPair")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = SecretString::new("super-secret");

		assert_eq!(format!("{secret:?}"), "SecretString(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn secret_serializes_transparently() {
		let secret = SecretString::new("plain");
		let payload =
			serde_json::to_string(&secret).expect("Secret should serialize to a JSON string.");

		assert_eq!(payload, "\"plain\"");

		let round_trip: SecretString =
			serde_json::from_str(&payload).expect("Secret should deserialize from JSON.");

		assert_eq!(round_trip.expose(), "plain");
	}

	#[test]
	fn token_pair_debug_redacts_both_secrets() {
		let pair = TokenPair::new("50000500b3a", Some("50001501c4d".into()));
		let rendered = format!("{pair:?}");

		assert!(!rendered.contains("50000500b3a"));
		assert!(!rendered.contains("50001501c4d"));
		assert!(rendered.contains("<redacted>"));
	}
}
