//! Environment-driven application configuration.
//!
//! All values are read once at startup (`CLIENT_ID`, `CLIENT_SECRET`, `TENANT_ID`,
//! `WORKSPACE_ID`, `REPORT_ID`, plus optional endpoint and listener overrides) and
//! validated into immutable configuration objects. A local `.env` file is honored but
//! never required.

// std
use std::env;
// self
use crate::{
	_prelude::*,
	auth::{ClientCredential, ReportReference},
	error::ConfigError,
};

const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
const DEFAULT_API_BASE: &str = "https://api.powerbi.com/v1.0/myorg";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Validated endpoint set targeted by the handshake.
///
/// Endpoints are overridable (`AUTHORITY_URL`, `POWER_BI_API`) so tests can point the
/// handshake at a local mock server.
#[derive(Clone, Debug)]
pub struct ApiEndpoints {
	/// Identity-provider token endpoint for the configured tenant.
	pub token_endpoint: Url,
	/// Reporting API base URL.
	pub api_base: Url,
}
impl ApiEndpoints {
	/// Derives the token endpoint from an authority base and validates the API base.
	pub fn new(authority: &str, api_base: &str) -> Result<Self, ConfigError> {
		let token_endpoint =
			Url::parse(&format!("{}/oauth2/v2.0/token", authority.trim_end_matches('/')))
				.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "authority", source })?;
		let api_base = Url::parse(api_base.trim_end_matches('/'))
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "reporting API", source })?;

		Ok(Self { token_endpoint, api_base })
	}
}

/// Application configuration assembled once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
	/// Client identity used for the client-credential grant.
	pub credential: ClientCredential,
	/// Workspace/report pair served by the embed page.
	pub report: ReportReference,
	/// Identity-provider and reporting API endpoints.
	pub endpoints: ApiEndpoints,
	/// Listener address for the inbound HTTP server.
	pub bind_address: String,
	/// Listener port for the inbound HTTP server.
	pub port: u16,
}
impl AppConfig {
	/// Loads configuration from the process environment, honoring a local `.env` file.
	pub fn from_env() -> Result<Self, ConfigError> {
		// A missing .env file is not an error; the process environment wins either way.
		dotenvy::dotenv().ok();

		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Assembles configuration from an arbitrary variable lookup.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let client_id = require(&lookup, "CLIENT_ID")?;
		let client_secret = require(&lookup, "CLIENT_SECRET")?;
		let tenant_id = require(&lookup, "TENANT_ID")?;
		let workspace_id = require(&lookup, "WORKSPACE_ID")?;
		let report_id = require(&lookup, "REPORT_ID")?;
		let authority =
			lookup("AUTHORITY_URL").unwrap_or_else(|| format!("{DEFAULT_AUTHORITY}/{tenant_id}"));
		let api_base = lookup("POWER_BI_API").unwrap_or_else(|| DEFAULT_API_BASE.into());
		let bind_address =
			lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.into());
		let port = lookup("PORT")
			.map(|raw| raw.parse().map_err(|source| ConfigError::InvalidPort { source }))
			.transpose()?
			.unwrap_or(DEFAULT_PORT);

		Ok(Self {
			credential: ClientCredential::new(client_id, client_secret, tenant_id),
			report: ReportReference::new(workspace_id, report_id),
			endpoints: ApiEndpoints::new(&authority, &api_base)?,
			bind_address,
			port,
		})
	}
}

fn require(
	lookup: &impl Fn(&str) -> Option<String>,
	name: &'static str,
) -> Result<String, ConfigError> {
	lookup(name)
		.filter(|value| !value.trim().is_empty())
		.ok_or(ConfigError::MissingVar { name })
}
