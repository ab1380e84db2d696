//! Binary entry point: load configuration, install tracing, serve the embed page.

// std
use std::io;
// crates.io
use actix_web::{App, HttpServer, web};
// self
use pbi_embed::{config::AppConfig, handshake::EmbedHandshake, http::ApiClient, obs, www};

#[actix_web::main]
async fn main() -> io::Result<()> {
	obs::init_tracing();

	let config = match AppConfig::from_env() {
		Ok(config) => config,
		Err(e) => {
			tracing::error!(error = %e, "Configuration is incomplete.");

			return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
		},
	};
	let bind = (config.bind_address.clone(), config.port);
	let handshake = match EmbedHandshake::new(
		ApiClient::default(),
		config.credential,
		config.report,
		config.endpoints,
	) {
		Ok(handshake) => handshake,
		Err(e) => {
			tracing::error!(error = %e, "Report endpoints could not be assembled.");

			return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
		},
	};

	tracing::info!(
		address = %bind.0,
		port = bind.1,
		report_id = %handshake.report_id(),
		"Starting embed server.",
	);

	HttpServer::new(move || {
		App::new().app_data(web::Data::new(handshake.clone())).configure(www::configure)
	})
	.bind(bind)?
	.run()
	.await
}
