//! Process-wide settings loaded from the environment at startup.

// std
use std::env;
// self
use crate::{_prelude::*, auth::SecretString, error::ConfigError, sign::SignMethod};

const DEFAULT_APP_KEY: &str = "522122";
const DEFAULT_GATEWAY: &str = "https://api-sg.aliexpress.com";
const DEFAULT_AUTHORIZE_URL: &str = "https://api-sg.aliexpress.com/oauth/authorize";
const DEFAULT_DOMAIN: &str = "http://localhost:5000";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CONFIG_FILE: &str = "config.json";
const DEFAULT_HISTORY_FILE: &str = "import_history.json";

/// Immutable settings resolved once for the process lifetime.
#[derive(Clone, Debug)]
pub struct Settings {
	/// App key identifying this application to the marketplace.
	pub app_key: String,
	/// Shared app secret used for request signing; empty means unconfigured.
	pub app_secret: SecretString,
	/// Gateway base URL hosting the token endpoint.
	pub gateway: Url,
	/// Consent-screen URL the OAuth start redirect points at.
	pub authorize_url: Url,
	/// Digest variant attached to signed gateway requests.
	pub sign_method: SignMethod,
	/// Public base URL this service is reachable at (used for the redirect URI).
	pub domain: Url,
	/// TCP port the server binds to.
	pub port: u16,
	/// Path of the JSON config document.
	pub config_file: PathBuf,
	/// Path of the JSON import history log.
	pub history_file: PathBuf,
}
impl Settings {
	/// Loads settings from the environment, honoring a `.env` file when present.
	pub fn from_env() -> Result<Self, ConfigError> {
		dotenv::dotenv().ok();

		let app_key = env_or("MARKETPLACE_APP_KEY", DEFAULT_APP_KEY);
		let app_secret = SecretString::new(env_or("MARKETPLACE_APP_SECRET", ""));
		let gateway =
			parse_url("MARKETPLACE_GATEWAY", &env_or("MARKETPLACE_GATEWAY", DEFAULT_GATEWAY))?;
		let authorize_url = parse_url(
			"MARKETPLACE_AUTHORIZE_URL",
			&env_or("MARKETPLACE_AUTHORIZE_URL", DEFAULT_AUTHORIZE_URL),
		)?;
		let sign_method = match env::var("MARKETPLACE_SIGN_METHOD") {
			Ok(raw) => raw.parse::<SignMethod>().map_err(|e| ConfigError::InvalidEnv {
				key: "MARKETPLACE_SIGN_METHOD",
				message: e.to_string(),
			})?,
			Err(_) => SignMethod::default(),
		};
		let domain = parse_url("DOMAIN", &env_or("DOMAIN", DEFAULT_DOMAIN))?;
		let port = match env::var("PORT") {
			Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidEnv {
				key: "PORT",
				message: format!("`{raw}` is not a valid port number"),
			})?,
			Err(_) => DEFAULT_PORT,
		};
		let config_file = PathBuf::from(env_or("CONFIG_FILE", DEFAULT_CONFIG_FILE));
		let history_file = PathBuf::from(env_or("HISTORY_FILE", DEFAULT_HISTORY_FILE));

		Ok(Self {
			app_key,
			app_secret,
			gateway,
			authorize_url,
			sign_method,
			domain,
			port,
			config_file,
			history_file,
		})
	}

	/// Redirect URI the marketplace sends the authorization code back to.
	pub fn callback_url(&self) -> Result<Url, ConfigError> {
		self.domain
			.join("/callback")
			.map_err(|source| ConfigError::InvalidEndpoint { key: "DOMAIN", source })
	}

	/// Returns `true` once an app secret has been configured.
	pub fn has_app_secret(&self) -> bool {
		!self.app_secret.is_empty()
	}
}

fn env_or(key: &'static str, default: &str) -> String {
	env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { key, source })
}


#[cfg(test)]
mod tests {
	// self
	use super::{test_support::fixture, *};

	#[test]
	fn callback_url_joins_the_domain() {
		let settings = fixture();
		let callback =
			settings.callback_url().expect("Callback URL should join the default domain.");

		assert_eq!(callback.as_str(), "http://localhost:5000/callback");
	}

	#[test]
	fn app_secret_presence_tracks_configuration() {
		let mut settings = fixture();

		assert!(settings.has_app_secret());

		settings.app_secret = SecretString::new("");

		assert!(!settings.has_app_secret());
	}
}
