//! Authorization start: consent-screen URL construction.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	flows::TokenExchanger,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const STATE_LEN: usize = 32;
/// The shared consent portal serves several marketplaces; `ae` selects this one.
const SERVICE_PROVIDER_HINT: (&str, &str) = ("sp", "ae");

/// Authorization handshake metadata returned by [`TokenExchanger::start_authorization`].
///
/// The state value is freshly generated per session. The gateway echoes it on
/// the redirect, but no server-side session store retains it, so the callback
/// does not round-trip validate it.
#[derive(Clone, Debug)]
pub struct AuthorizationSession {
	/// Fully-formed authorize URL that callers should send end-users to.
	pub authorize_url: Url,
	/// Opaque state value embedded in the authorize URL.
	pub state: String,
}

impl TokenExchanger {
	/// Builds the consent-screen URL for this deployment's credentials.
	pub fn start_authorization(&self) -> Result<AuthorizationSession> {
		const KIND: FlowKind = FlowKind::Authorize;

		let _guard = FlowSpan::new(KIND, "start_authorization").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let redirect_uri = self.settings.callback_url().inspect_err(|_| {
			obs::record_flow_outcome(KIND, FlowOutcome::Failure);
		})?;
		let state = random_string(STATE_LEN);
		let mut authorize_url = self.settings.authorize_url.clone();

		{
			let mut pairs = authorize_url.query_pairs_mut();

			pairs.append_pair("response_type", "code");
			pairs.append_pair("client_id", &self.settings.app_key);
			pairs.append_pair("redirect_uri", redirect_uri.as_str());
			pairs.append_pair("state", &state);
			pairs.append_pair(SERVICE_PROVIDER_HINT.0, SERVICE_PROVIDER_HINT.1);
		}

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		Ok(AuthorizationSession { authorize_url, state })
	}
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}
