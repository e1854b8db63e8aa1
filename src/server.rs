//! HTTP surface: application state, router assembly, and serving.

pub mod html;
pub mod routes;

// crates.io
use axum::{
	Router,
	routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
// self
use crate::{
	_prelude::*,
	config::Settings,
	error::TransportError,
	flows::TokenExchanger,
	import::{self, ImportTracker},
	store::{ConfigStore, HistoryStore},
};

/// Shared state cloned into every handler.
#[derive(Clone, Debug)]
pub struct AppState {
	/// Process-wide settings.
	pub settings: Arc<Settings>,
	/// OAuth flow orchestrator (owns the config store).
	pub exchanger: TokenExchanger,
	/// Import history log.
	pub history: HistoryStore,
	/// Shared status of the most recent import.
	pub import_tracker: ImportTracker,
	/// Simulated extraction delay; tests shrink this to zero.
	pub import_delay: std::time::Duration,
}
impl AppState {
	/// Opens the stores and builds the exchanger for the provided settings.
	pub fn new(settings: Settings) -> Result<Self> {
		let settings = Arc::new(settings);
		let config_store = ConfigStore::open(settings.config_file.clone())?;
		let history = HistoryStore::open(settings.history_file.clone())?;
		let exchanger = TokenExchanger::new(settings.clone(), config_store)?;

		Ok(Self {
			settings,
			exchanger,
			history,
			import_tracker: ImportTracker::default(),
			import_delay: import::SIMULATED_IMPORT_DELAY,
		})
	}

	/// Overrides the simulated import delay.
	pub fn with_import_delay(mut self, delay: std::time::Duration) -> Self {
		self.import_delay = delay;

		self
	}

	/// Config document store shared with the exchanger.
	pub fn config_store(&self) -> &ConfigStore {
		&self.exchanger.store
	}
}

/// Assembles the service router over the provided state.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(routes::index))
		.route("/oauth/start", get(routes::oauth_start))
		.route("/callback", get(routes::oauth_callback))
		.route("/api/config", get(routes::config_get).post(routes::config_set))
		.route("/api/import/single", post(routes::import_single))
		.route("/api/import/status", get(routes::import_status))
		.route("/api/history", get(routes::history))
		.route("/api/stats", get(routes::stats))
		.route("/health", get(routes::health))
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(state)
}

/// Binds the listener and serves until interrupted.
pub async fn serve(state: AppState) -> Result<()> {
	let addr = format!("0.0.0.0:{}", state.settings.port);
	let listener = TcpListener::bind(&addr).await.map_err(TransportError::from)?;

	tracing::info!(
		%addr,
		domain = %state.settings.domain,
		app_key = %state.settings.app_key,
		secret_configured = state.settings.has_app_secret(),
		"Bridge server started."
	);

	axum::serve(listener, router(state))
		.with_graceful_shutdown(shutdown_signal())
		.await
		.map_err(TransportError::from)?;

	Ok(())
}

async fn shutdown_signal() {
	let _ = tokio::signal::ctrl_c().await;

	tracing::info!("Shutdown signal received.");
}
