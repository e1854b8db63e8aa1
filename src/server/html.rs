//! Minimal HTML pages served to the operator.
//!
//! The bridge is operated from a browser exactly twice: once to kick off the
//! consent flow and once to read the callback result, so the pages stay
//! deliberately small. Vendor payloads are escaped before rendering; the
//! gateway's error bodies are untrusted input.

// self
use crate::{auth::TokenPair, config::Settings};

const PAGE_STYLE: &str = "body{font-family:Arial,sans-serif;padding:50px;background:#f5f5f5}\
.container{background:#fff;padding:40px;border-radius:10px;max-width:800px;margin:0 auto;\
box-shadow:0 2px 10px rgba(0,0,0,.1)}\
.status{padding:20px;border-radius:5px;margin:20px 0}\
.status.ok{background:#e8f5e9;border-left:4px solid #4caf50}\
.status.warning{background:#fff3cd;border-left:4px solid #ffc107}\
.status.error{background:#f8d7da;border-left:4px solid #dc3545}\
.btn{display:inline-block;padding:15px 30px;background:#007bff;color:#fff;\
text-decoration:none;border-radius:5px;margin:10px 5px}\
code,pre{background:#f4f4f4;padding:2px 6px;border-radius:3px;overflow-x:auto}\
pre{padding:15px}code{word-break:break-all}";

/// Landing page summarizing configuration state and available actions.
pub fn landing_page(settings: &Settings) -> String {
	let secret_class = if settings.has_app_secret() { "ok" } else { "warning" };
	let secret_label = if settings.has_app_secret() { "configured" } else { "not configured" };

	page(
		"Storefront Bridge",
		&format!(
			"<h1>Storefront Bridge</h1>\
			<p>Marketplace product import bridge</p>\
			<div class=\"status {secret_class}\">\
			<h3>Marketplace API</h3>\
			<p><strong>App key:</strong> {app_key}</p>\
			<p><strong>App secret:</strong> {secret_label}</p>\
			</div>\
			<h3>Actions</h3>\
			<a href=\"/oauth/start\" class=\"btn\">Obtain access token</a>\
			<a href=\"/api/stats\" class=\"btn\">Statistics</a>\
			<a href=\"/api/history\" class=\"btn\">History</a>\
			<div class=\"status\">\
			<h3>Endpoints</h3>\
			<p><strong>Base URL:</strong> <code>{domain}</code></p>\
			<ul>\
			<li><code>GET /oauth/start</code> - start the OAuth flow</li>\
			<li><code>GET /callback</code> - OAuth redirect target</li>\
			<li><code>POST /api/import/single</code> - import one product</li>\
			<li><code>GET /api/import/status</code> - poll import progress</li>\
			<li><code>GET /api/stats</code> - import statistics</li>\
			<li><code>GET /api/history</code> - import history</li>\
			<li><code>GET /health</code> - liveness probe</li>\
			</ul>\
			</div>",
			app_key = escape_html(&settings.app_key),
			domain = escape_html(settings.domain.as_str()),
		),
	)
}

/// Success page rendered after a completed token exchange.
///
/// The tokens are displayed on purpose: the operator copies them into the
/// deployment environment. This page is the delivery mechanism.
pub fn token_success_page(pair: &TokenPair) -> String {
	let refresh_block = pair
		.refresh_token
		.as_ref()
		.map(|refresh| {
			format!(
				"<div class=\"status ok\"><h3>Refresh token</h3><code>{}</code></div>",
				escape_html(refresh.expose()),
			)
		})
		.unwrap_or_default();

	page(
		"Token obtained",
		&format!(
			"<h1>Token obtained</h1>\
			<div class=\"status ok\"><h3>Access token</h3><code>{access}</code></div>\
			{refresh_block}\
			<div class=\"status warning\"><h3>Next step</h3>\
			<p>The token pair has been saved to the config store and is ready for API calls.</p>\
			</div>\
			<a href=\"/\" class=\"btn\">Back</a>",
			access = escape_html(pair.access_token.expose()),
		),
	)
}

/// Error page rendered when the exchange fails; shows the raw failure detail.
pub fn exchange_error_page(detail: &str) -> String {
	page(
		"Token exchange failed",
		&format!(
			"<h1>Token exchange failed</h1>\
			<div class=\"status error\"><h3>Gateway response</h3><pre>{}</pre></div>\
			<a href=\"/oauth/start\" class=\"btn\">Retry</a>",
			escape_html(detail),
		),
	)
}

/// Error page rendered when the redirect arrived without an authorization code.
pub fn missing_code_page() -> String {
	page(
		"No authorization code",
		"<h1>No authorization code</h1>\
		<div class=\"status error\">\
		<p>The redirect did not include a <code>code</code> parameter. \
		Restart the flow from the beginning.</p>\
		</div>\
		<a href=\"/oauth/start\" class=\"btn\">Restart</a>",
	)
}

fn page(title: &str, body: &str) -> String {
	format!(
		"<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title>\
		<style>{PAGE_STYLE}</style></head>\
		<body><div class=\"container\">{body}</div></body></html>",
		escape_html(title),
	)
}

fn escape_html(raw: &str) -> String {
	let mut escaped = String::with_capacity(raw.len());

	for c in raw.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}

	escaped
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config;

	#[test]
	fn landing_page_reflects_missing_secret() {
		let mut settings = config::test_support::fixture();

		settings.app_secret = crate::auth::SecretString::new("");

		let rendered = landing_page(&settings);

		assert!(rendered.contains("not configured"));
		assert!(rendered.contains("/oauth/start"));
	}

	#[test]
	fn success_page_shows_both_tokens() {
		let pair = TokenPair::new("access-123", Some("refresh-456".into()));
		let rendered = token_success_page(&pair);

		assert!(rendered.contains("access-123"));
		assert!(rendered.contains("refresh-456"));
	}

	#[test]
	fn success_page_omits_the_refresh_block_when_absent() {
		let pair = TokenPair::new("access-123", None);
		let rendered = token_success_page(&pair);

		assert!(!rendered.contains("Refresh token"));
	}

	#[test]
	fn error_page_escapes_the_vendor_payload() {
		let rendered = exchange_error_page("<script>alert(1)</script>");

		assert!(!rendered.contains("<script>"));
		assert!(rendered.contains("&lt;script&gt;"));
	}
}
