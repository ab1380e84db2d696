//! Embed handshake orchestration: access token, embed token, and report metadata.
//!
//! [`EmbedHandshake`] performs the three strictly ordered external calls needed to
//! render one report: a client-credential grant against the identity provider, a
//! viewer-scoped `GenerateToken` call, and a metadata fetch for the report's embed URL.
//! Every render re-acquires its tokens; nothing is cached across requests and no step
//! is retried. Any failure short-circuits the sequence, so a partial
//! [`EmbedResult`] can never be observed.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientCredential, EmbedToken, ReportReference},
	config::ApiEndpoints,
	error::{
		AuthenticationError, ConfigError, EmbedTokenError, ReportFetchError, TransportError,
	},
	http::{self, ApiClient},
	obs::{StageKind, StageSpan},
};

/// Scope string identifying the reporting API's default permission.
pub const REPORTING_API_SCOPE: &str = "https://analysis.windows.net/powerbi/api/.default";

const EMBED_ACCESS_LEVEL: &str = "view";

/// Output bundle handed to the view layer once every step succeeded.
#[derive(Clone, Debug)]
pub struct EmbedResult {
	/// Embed URL reported by the metadata endpoint.
	pub embed_url: Url,
	/// Viewer-scoped embed token for the configured report.
	pub embed_token: EmbedToken,
	/// Access token backing the metadata fetch.
	pub access_token: AccessToken,
	/// Report identifier the bundle was assembled for.
	pub report_id: String,
}

/// Coordinates the three-call embed handshake for one configured report.
///
/// Constructed once at startup from validated configuration and shared immutably
/// across requests; repeated invocations are independent and produce fresh tokens.
#[derive(Clone, Debug)]
pub struct EmbedHandshake {
	client: ApiClient,
	credential: ClientCredential,
	report: ReportReference,
	token_endpoint: Url,
	generate_token_url: Url,
	metadata_url: Url,
}
impl EmbedHandshake {
	/// Creates a handshake bound to one credential, report, and endpoint set.
	///
	/// The reporting API URLs are assembled and validated here, so request handling
	/// can no longer fail on URL assembly.
	pub fn new(
		client: ApiClient,
		credential: ClientCredential,
		report: ReportReference,
		endpoints: ApiEndpoints,
	) -> Result<Self, ConfigError> {
		let generate_token_url = report_url(&endpoints.api_base, &report, "/GenerateToken")?;
		let metadata_url = report_url(&endpoints.api_base, &report, "")?;

		Ok(Self {
			client,
			credential,
			report,
			token_endpoint: endpoints.token_endpoint,
			generate_token_url,
			metadata_url,
		})
	}

	/// Returns the report identifier this handshake serves.
	pub fn report_id(&self) -> &str {
		&self.report.report_id
	}

	/// Exchanges the client credential for a reporting-API access token.
	pub async fn acquire_access_token(&self) -> Result<AccessToken> {
		let span = StageSpan::new(StageKind::AccessToken);

		span.instrument(async move {
			let form = [
				("grant_type", "client_credentials"),
				("client_id", self.credential.client_id.as_str()),
				("client_secret", self.credential.client_secret.expose()),
				("scope", REPORTING_API_SCOPE),
			];
			let response = self
				.client
				.post(self.token_endpoint.clone())
				.form(&form)
				.send()
				.await
				.map_err(|e| TransportError::network("identity provider token endpoint", e))?;
			let status = response.status();
			let body = response
				.text()
				.await
				.map_err(|e| TransportError::network("identity provider token endpoint", e))?;

			if !status.is_success() {
				return Err(
					AuthenticationError::Rejected { status: status.as_u16(), body }.into()
				);
			}

			let json = http::parse_json(&body)
				.map_err(|source| AuthenticationError::ResponseParse { source })?;

			match json.get("access_token").and_then(Json::as_str) {
				Some(token) => {
					tracing::debug!("Issued reporting-API access token.");

					Ok(AccessToken::new(token))
				},
				None => Err(AuthenticationError::MissingAccessToken { body: json }.into()),
			}
		})
		.await
	}

	/// Requests a viewer-scoped embed token for the configured report.
	pub async fn acquire_embed_token(&self, access_token: &AccessToken) -> Result<EmbedToken> {
		let span = StageSpan::new(StageKind::EmbedToken);

		span.instrument(async move {
			let response = self
				.client
				.post(self.generate_token_url.clone())
				.bearer_auth(access_token.expose())
				.json(&serde_json::json!({ "accessLevel": EMBED_ACCESS_LEVEL }))
				.send()
				.await
				.map_err(|e| TransportError::network("reporting API token endpoint", e))?;
			let status = response.status();
			let body = response
				.text()
				.await
				.map_err(|e| TransportError::network("reporting API token endpoint", e))?;

			if !status.is_success() {
				return Err(EmbedTokenError::Status { status: status.as_u16(), body }.into());
			}

			let json = http::parse_json(&body)
				.map_err(|source| EmbedTokenError::ResponseParse { source })?;

			match json.get("token").and_then(Json::as_str) {
				Some(token) => {
					tracing::debug!("Issued viewer-scoped embed token.");

					Ok(EmbedToken::new(token))
				},
				None => Err(EmbedTokenError::MissingToken { body: json }.into()),
			}
		})
		.await
	}

	/// Fetches the configured report's metadata and extracts its embed URL.
	pub async fn fetch_report_metadata(&self, access_token: &AccessToken) -> Result<Url> {
		let span = StageSpan::new(StageKind::ReportMetadata);

		span.instrument(async move {
			let response = self
				.client
				.get(self.metadata_url.clone())
				.bearer_auth(access_token.expose())
				.send()
				.await
				.map_err(|e| TransportError::network("reporting API metadata endpoint", e))?;
			let status = response.status();
			let body = response
				.text()
				.await
				.map_err(|e| TransportError::network("reporting API metadata endpoint", e))?;

			if !status.is_success() {
				return Err(ReportFetchError::Status { status: status.as_u16(), body }.into());
			}

			let json = http::parse_json(&body)
				.map_err(|source| ReportFetchError::ResponseParse { source })?;

			match json.get("embedUrl").and_then(Json::as_str) {
				Some(raw) => {
					let embed_url = Url::parse(raw)
						.map_err(|source| ReportFetchError::InvalidEmbedUrl { source })?;

					tracing::debug!(embed_url = %embed_url, "Fetched report embed URL.");

					Ok(embed_url)
				},
				None => Err(ReportFetchError::MissingEmbedUrl { body: json }.into()),
			}
		})
		.await
	}

	/// Runs the full handshake and assembles the render bundle.
	///
	/// The metadata fetch runs on its own freshly issued access token instead of reusing
	/// the one behind the embed-token call; [`EmbedResult::access_token`] carries that
	/// second token.
	pub async fn build_embed_result(&self) -> Result<EmbedResult> {
		let first = self.acquire_access_token().await?;
		let embed_token = self.acquire_embed_token(&first).await?;
		let access_token = self.acquire_access_token().await?;
		let embed_url = self.fetch_report_metadata(&access_token).await?;

		tracing::info!(report_id = %self.report.report_id, "Assembled embed result.");

		Ok(EmbedResult {
			embed_url,
			embed_token,
			access_token,
			report_id: self.report.report_id.clone(),
		})
	}
}

fn report_url(api_base: &Url, report: &ReportReference, suffix: &str) -> Result<Url, ConfigError> {
	let raw = format!(
		"{}/groups/{}/reports/{}{}",
		api_base.as_str().trim_end_matches('/'),
		report.workspace_id,
		report.report_id,
		suffix,
	);

	Url::parse(&raw)
		.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "reporting API", source })
}
