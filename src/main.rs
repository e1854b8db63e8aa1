//! Bridge service entry point.

use storefront_bridge::{
	config::Settings,
	error::Result,
	obs,
	server::{self, AppState},
};

#[tokio::main]
async fn main() {
	obs::init_tracing();

	if let Err(e) = run().await {
		tracing::error!(error = %e, "Bridge exited with an error.");
		std::process::exit(1);
	}
}

async fn run() -> Result<()> {
	let settings = Settings::from_env()?;
	let state = AppState::new(settings)?;

	server::serve(state).await
}
