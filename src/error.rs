//! Service-level error types shared across flows, stores, and the HTTP surface.

// self
use crate::_prelude::*;

/// Service-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical bridge error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Gateway answered, but the response did not contain a usable token.
	#[error(transparent)]
	Vendor(#[from] VendorError),
}

/// Configuration and validation failures raised at startup or while building requests.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required environment variable is absent.
	#[error("Environment variable `{key}` must be set.")]
	MissingEnv {
		/// Name of the missing variable.
		key: &'static str,
	},
	/// Environment variable is present but cannot be parsed.
	#[error("Environment variable `{key}` is invalid: {message}.")]
	InvalidEnv {
		/// Name of the offending variable.
		key: &'static str,
		/// Human-readable description of the parse failure.
		message: String,
	},
	/// Configured endpoint is not a valid URL.
	#[error("Configured endpoint `{key}` is not a valid URL.")]
	InvalidEndpoint {
		/// Name of the offending variable.
		key: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the gateway.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the gateway.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures attributable to the gateway's token endpoint response.
///
/// Both variants carry the raw response body so operators can diagnose rejections
/// (a signature mismatch is indistinguishable from any other vendor-side refusal).
#[derive(Debug, ThisError)]
pub enum VendorError {
	/// Response parsed as JSON but contained no access token anywhere.
	#[error("Gateway returned no access token (HTTP {status}): {body}")]
	MissingToken {
		/// HTTP status code of the response.
		status: u16,
		/// Raw response body, verbatim.
		body: String,
	},
	/// Response body was not valid JSON.
	#[error("Gateway returned malformed JSON (HTTP {status}): {body}")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
		/// Raw response body, verbatim.
		body: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn vendor_errors_surface_the_raw_body() {
		let err = VendorError::MissingToken {
			status: 400,
			body: "{\"error_response\":{\"msg\":\"IncompleteSignature\"}}".into(),
		};

		assert!(err.to_string().contains("IncompleteSignature"));
		assert!(err.to_string().contains("400"));
	}

	#[test]
	fn store_error_converts_into_bridge_error_with_source() {
		use std::error::Error as StdError;

		let store_error =
			crate::store::StoreError::Backend { message: "disk unreachable".into() };
		let bridge_error: Error = store_error.clone().into();

		assert!(matches!(bridge_error, Error::Storage(_)));
		assert!(bridge_error.to_string().contains("disk unreachable"));

		let source = StdError::source(&bridge_error)
			.expect("Bridge error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
