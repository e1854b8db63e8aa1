//! Gateway request signing.
//!
//! Every call to the gateway carries a `sign` field proving possession of the
//! shared app secret. The gateway accepts two digest variants depending on the
//! endpoint generation: a wrapped one-way MD5 hash, and an HMAC-SHA256 over a
//! path-prefixed canonical string. Both canonicalize parameters the same way:
//! sort keys lexicographically, concatenate `key + value` pairs with no
//! separators, and leave `sign` (and the URL-level `method` selector) out of
//! the signed set.

// crates.io
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;
// self
use crate::_prelude::*;

/// Keys never included in the canonical parameter string.
///
/// `sign` is the output field itself; `method` travels in the URL query rather
/// than the form body, so the gateway does not expect it in the signed set.
const EXCLUDED_KEYS: [&str; 2] = ["method", "sign"];

/// Digest variant attached to outbound gateway requests via `sign_method`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignMethod {
	/// Wrapped one-way hash: `MD5(secret + canonical + secret)`.
	#[default]
	Md5,
	/// Keyed digest: `HMAC-SHA256(secret, api_path + canonical)`.
	HmacSha256,
}
impl SignMethod {
	/// Returns the wire value sent as the `sign_method` parameter.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignMethod::Md5 => "md5",
			SignMethod::HmacSha256 => "sha256",
		}
	}
}
impl std::str::FromStr for SignMethod {
	type Err = UnknownSignMethod;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"md5" => Ok(SignMethod::Md5),
			"sha256" => Ok(SignMethod::HmacSha256),
			_ => Err(UnknownSignMethod { value: s.to_owned() }),
		}
	}
}
impl Display for SignMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error returned when a `sign_method` label is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown sign method `{value}`; expected `md5` or `sha256`.")]
pub struct UnknownSignMethod {
	/// The rejected label.
	pub value: String,
}

/// Computes the uppercase hexadecimal signature for a parameter set.
///
/// `api_path` is only consulted by the HMAC variant, which prefixes it to the
/// canonical string. The parameter iterator may arrive in any order; duplicate
/// keys keep the last value seen.
pub fn sign_params<'a, I>(method: SignMethod, secret: &str, api_path: &str, params: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let canonical = canonical_concat(params);

	match method {
		SignMethod::Md5 => {
			let mut hasher = Md5::new();

			hasher.update(secret.as_bytes());
			hasher.update(canonical.as_bytes());
			hasher.update(secret.as_bytes());

			hex::encode_upper(hasher.finalize())
		},
		SignMethod::HmacSha256 => {
			let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
				.expect("HMAC-SHA256 accepts keys of any length.");

			mac.update(api_path.as_bytes());
			mac.update(canonical.as_bytes());

			hex::encode_upper(mac.finalize().into_bytes())
		},
	}
}

/// Builds the sorted `key + value` concatenation shared by both variants.
fn canonical_concat<'a, I>(params: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let sorted: BTreeMap<&str, &str> =
		params.into_iter().filter(|(key, _)| !EXCLUDED_KEYS.contains(key)).collect();

	sorted.into_iter().fold(String::new(), |mut buf, (key, value)| {
		buf.push_str(key);
		buf.push_str(value);

		buf
	})
}

#[cfg(test)]
mod tests {
	// std
	use std::str::FromStr;
	// self
	use super::*;

	const FIXTURE: [(&str, &str); 4] =
		[("app_key", "1"), ("code", "2"), ("sign_method", "md5"), ("timestamp", "3")];

	#[test]
	fn canonical_concat_sorts_and_joins_without_separators() {
		let shuffled =
			[("timestamp", "3"), ("app_key", "1"), ("sign_method", "md5"), ("code", "2")];

		assert_eq!(canonical_concat(shuffled), "app_key1code2sign_methodmd5timestamp3");
	}

	#[test]
	fn canonical_concat_excludes_sign_and_method() {
		let params = [("app_key", "1"), ("sign", "FEEDBEEF"), ("method", "/auth/token/create")];

		assert_eq!(canonical_concat(params), "app_key1");
	}

	#[test]
	fn wrapped_md5_matches_known_vector() {
		// MD5("S" + "app_key1code2sign_methodmd5timestamp3" + "S").
		let signature = sign_params(SignMethod::Md5, "S", "/auth/token/create", FIXTURE);

		assert_eq!(signature, "55C3F835BDF1ADF26E53B361EA6737CC");
	}

	#[test]
	fn hmac_sha256_matches_known_vector() {
		// HMAC-SHA256("S", "/auth/token/create" + "app_key1code2sign_methodsha256timestamp3").
		let params =
			[("app_key", "1"), ("code", "2"), ("sign_method", "sha256"), ("timestamp", "3")];
		let signature = sign_params(SignMethod::HmacSha256, "S", "/auth/token/create", params);

		assert_eq!(
			signature,
			"B231F6FA0ACA39CDADC0E1AF6C5E4A573BA0FF2A6796ABD8F5D0EC461975B093"
		);
	}

	#[test]
	fn signature_is_order_independent() {
		let reordered =
			[("sign_method", "md5"), ("timestamp", "3"), ("code", "2"), ("app_key", "1")];

		assert_eq!(
			sign_params(SignMethod::Md5, "S", "/auth/token/create", FIXTURE),
			sign_params(SignMethod::Md5, "S", "/auth/token/create", reordered),
		);
	}

	#[test]
	fn signature_is_deterministic_across_calls() {
		let first = sign_params(SignMethod::Md5, "secret", "/auth/token/create", FIXTURE);
		let second = sign_params(SignMethod::Md5, "secret", "/auth/token/create", FIXTURE);

		assert_eq!(first, second);
		assert!(first.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
		assert_eq!(first.len(), 32);
	}

	#[test]
	fn sign_method_labels_round_trip() {
		assert_eq!(SignMethod::from_str("md5"), Ok(SignMethod::Md5));
		assert_eq!(SignMethod::from_str("sha256"), Ok(SignMethod::HmacSha256));
		assert_eq!(SignMethod::Md5.as_str(), "md5");
		assert_eq!(SignMethod::HmacSha256.as_str(), "sha256");
		assert!(SignMethod::from_str("sha512").is_err());
	}
}
