//! Web layer serving the embed page.
//!
//! A single `GET /` route runs the handshake and injects the resulting bundle into a
//! handlebars page that loads the Power BI client script. Any handshake failure maps
//! uniformly to `500` with an `{"error": "..."}` JSON envelope; nothing is retried and
//! no partial page is rendered.

// crates.io
use actix_web::{HttpResponse, Responder, web};
use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde_json::json;
// self
use crate::{
	_prelude::*,
	handshake::{EmbedHandshake, EmbedResult},
};

/// A lazily-initialized, global instance of the handlebars templating engine.
static ENGINE: Lazy<Handlebars<'static>> = Lazy::new(new_engine);

const EMBED_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1.0">
<title>Report {{report_id}}</title>
<script src="https://cdn.jsdelivr.net/npm/powerbi-client@2/dist/powerbi.min.js"></script>
</head>
<body style="margin:0;">
<div id="report-container" style="height:100vh;"></div>
<script>
const models = window["powerbi-client"].models;
const accessToken = "{{access_token}}";
const config = {
	type: "report",
	tokenType: models.TokenType.Embed,
	accessToken: "{{embed_token}}",
	embedUrl: "{{{embed_url}}}",
	id: "{{report_id}}",
	settings: { panes: { filters: { visible: false } } }
};
powerbi.embed(document.getElementById("report-container"), config);
</script>
</body>
</html>"#;

/// Creates and configures the handlebars engine with the single embed page template.
fn new_engine() -> Handlebars<'static> {
	let mut handlebars = Handlebars::new();

	handlebars
		.register_template_string("embed", EMBED_PAGE)
		.expect("Embed page template should always compile.");

	handlebars
}

/// Registers the embed page route on an actix application.
pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.route("/", web::get().to(index));
}

/// Handles `GET /`: runs the handshake and renders the embed page.
pub async fn index(handshake: web::Data<EmbedHandshake>) -> impl Responder {
	match handshake.build_embed_result().await {
		Ok(result) => page_response(&result),
		Err(e) => error_response(&e),
	}
}

/// Renders the embed page for a completed handshake.
fn render_page(result: &EmbedResult) -> Result<String, handlebars::RenderError> {
	ENGINE.render(
		"embed",
		&json!({
			"embed_url": result.embed_url.as_str(),
			"embed_token": result.embed_token.expose(),
			"access_token": result.access_token.expose(),
			"report_id": result.report_id,
		}),
	)
}

fn page_response(result: &EmbedResult) -> HttpResponse {
	match render_page(result) {
		Ok(body) =>
			HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body),
		Err(e) => HttpResponse::InternalServerError().json(json!({ "error": e.to_string() })),
	}
}

/// Converts any handshake failure into the uniform 500 JSON envelope.
fn error_response(error: &Error) -> HttpResponse {
	tracing::warn!(error = %error, "Embed handshake failed.");

	HttpResponse::InternalServerError().json(json!({ "error": error.to_string() }))
}
