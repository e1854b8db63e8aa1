//! Request handlers for the bridge's HTTP surface.

// crates.io
use axum::{
	Json,
	extract::{Query, State},
	http::StatusCode,
	response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::json;
// self
use crate::{
	_prelude::*,
	import::{self, ImportStatus},
	server::{AppState, html},
	store::{ImportRecord, ImportSummary, config::ConfigDocument},
};

/// `GET /` — HTML landing page with configuration status and action links.
pub async fn index(State(state): State<AppState>) -> Html<String> {
	Html(html::landing_page(&state.settings))
}

/// `GET /oauth/start` — redirects the operator to the marketplace consent screen.
pub async fn oauth_start(State(state): State<AppState>) -> Response {
	match state.exchanger.start_authorization() {
		Ok(session) => {
			tracing::info!(url = %session.authorize_url, "Redirecting to the consent screen.");

			Redirect::to(session.authorize_url.as_str()).into_response()
		},
		Err(e) => {
			tracing::error!(error = %e, "Failed to build the authorize URL.");

			(StatusCode::INTERNAL_SERVER_ERROR, Html(html::exchange_error_page(&e.to_string())))
				.into_response()
		},
	}
}

/// Query parameters delivered by the OAuth redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
	/// Single-use authorization code; absent when the consent screen errored.
	#[serde(default)]
	pub code: Option<String>,
}

/// `GET /callback` — exchanges the authorization code for a token pair.
///
/// A missing or blank code short-circuits with a 400 page before any outbound
/// call is attempted.
pub async fn oauth_callback(
	State(state): State<AppState>,
	Query(query): Query<CallbackQuery>,
) -> Response {
	let Some(code) = query.code.as_deref().map(str::trim).filter(|code| !code.is_empty())
	else {
		return (StatusCode::BAD_REQUEST, Html(html::missing_code_page())).into_response();
	};

	tracing::info!("Authorization code received.");

	match state.exchanger.exchange_authorization_code(code).await {
		Ok(pair) => Html(html::token_success_page(&pair)).into_response(),
		Err(e) => {
			tracing::warn!(error = %e, "Token exchange failed.");

			(error_status(&e), Html(html::exchange_error_page(&e.to_string()))).into_response()
		},
	}
}

/// `GET /api/config` — the full config document.
pub async fn config_get(State(state): State<AppState>) -> Json<JsonValue> {
	Json(JsonValue::Object(state.config_store().document()))
}

/// `POST /api/config` — shallow-merges the JSON body into the config document.
pub async fn config_set(
	State(state): State<AppState>,
	Json(patch): Json<ConfigDocument>,
) -> Response {
	match state.config_store().merge(patch) {
		Ok(()) => Json(json!({ "success": true })).into_response(),
		Err(e) => (
			StatusCode::INTERNAL_SERVER_ERROR,
			Json(json!({ "success": false, "error": e.to_string() })),
		)
			.into_response(),
	}
}

/// Body of `POST /api/import/single`.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
	/// Product URL to import.
	#[serde(default)]
	pub url: Option<String>,
}

/// `POST /api/import/single` — starts a (simulated) import in the background.
pub async fn import_single(
	State(state): State<AppState>,
	Json(request): Json<ImportRequest>,
) -> Response {
	let url = request.url.as_deref().map(str::trim).unwrap_or_default();

	if url.is_empty() {
		return (
			StatusCode::BAD_REQUEST,
			Json(json!({ "success": false, "error": "Missing product URL." })),
		)
			.into_response();
	}

	import::spawn_simulated_import(
		state.import_tracker.clone(),
		state.history.clone(),
		url.to_owned(),
		state.import_delay,
	);

	Json(json!({ "success": true })).into_response()
}

/// `GET /api/import/status` — pollable status of the most recent import.
pub async fn import_status(State(state): State<AppState>) -> Json<ImportStatus> {
	Json(state.import_tracker.status())
}

/// `GET /api/history` — full import history, newest first.
pub async fn history(State(state): State<AppState>) -> Json<Vec<ImportRecord>> {
	Json(state.history.snapshot())
}

/// `GET /api/stats` — aggregate history figures.
pub async fn stats(State(state): State<AppState>) -> Json<ImportSummary> {
	Json(state.history.summary())
}

/// Health payload served to deployment probes.
#[derive(Debug, Serialize)]
pub struct Health {
	/// Always `"ok"` when the service can answer at all.
	pub status: &'static str,
	/// Instant the probe was answered.
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
}

/// `GET /health` — liveness probe.
pub async fn health() -> Json<Health> {
	Json(Health { status: "ok", timestamp: OffsetDateTime::now_utc() })
}

/// Maps bridge errors onto response statuses for the callback page.
fn error_status(error: &Error) -> StatusCode {
	match error {
		Error::Transport(_) | Error::Vendor(_) => StatusCode::BAD_GATEWAY,
		Error::Storage(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{TransportError, VendorError};

	#[test]
	fn gateway_side_failures_map_to_bad_gateway() {
		let vendor: Error =
			VendorError::MissingToken { status: 400, body: "{}".into() }.into();
		let transport: Error = TransportError::Io(std::io::Error::other("down")).into();

		assert_eq!(error_status(&vendor), StatusCode::BAD_GATEWAY);
		assert_eq!(error_status(&transport), StatusCode::BAD_GATEWAY);
	}

	#[test]
	fn local_failures_map_to_internal_server_error() {
		let storage: Error =
			crate::store::StoreError::Backend { message: "disk".into() }.into();

		assert_eq!(error_status(&storage), StatusCode::INTERNAL_SERVER_ERROR);
	}
}
