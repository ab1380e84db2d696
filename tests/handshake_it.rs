// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use pbi_embed::{
	_preludet::*,
	auth::AccessToken,
	error::{AuthenticationError, EmbedTokenError, ReportFetchError},
};

const TOKEN_PATH: &str = "/oauth2/v2.0/token";

fn generate_token_path() -> String {
	format!("/v1.0/myorg/groups/{TEST_WORKSPACE_ID}/reports/{TEST_REPORT_ID}/GenerateToken")
}

fn metadata_path() -> String {
	format!("/v1.0/myorg/groups/{TEST_WORKSPACE_ID}/reports/{TEST_REPORT_ID}")
}

fn handshake_against(server: &MockServer) -> pbi_embed::handshake::EmbedHandshake {
	build_test_handshake(&server.url(""), &server.url("/v1.0/myorg"))
}

#[tokio::test]
async fn acquire_access_token_returns_provider_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"AT1\",\"token_type\":\"Bearer\",\"expires_in\":3599}",
			);
		})
		.await;
	let token = handshake_against(&server)
		.acquire_access_token()
		.await
		.expect("Access token acquisition should succeed.");

	assert!(!token.expose().is_empty());
	assert_eq!(token.expose(), "AT1");

	mock.assert_async().await;
}

#[tokio::test]
async fn acquire_access_token_rejects_missing_token_field() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"error_description\":\"AADSTS7000215: invalid client secret\"}");
		})
		.await;
	let err = handshake_against(&server)
		.acquire_access_token()
		.await
		.expect_err("Responses without `access_token` should fail.");

	assert!(matches!(
		err,
		Error::Authentication(AuthenticationError::MissingAccessToken { .. })
	));
	assert!(err.to_string().contains("AADSTS7000215"));
}

#[tokio::test]
async fn acquire_access_token_rejects_malformed_success_body() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "text/html")
				.body("<html>503 Service Unavailable</html>");
		})
		.await;
	let err = handshake_against(&server)
		.acquire_access_token()
		.await
		.expect_err("Non-JSON success bodies should fail.");

	assert!(matches!(
		err,
		Error::Authentication(AuthenticationError::ResponseParse { .. })
	));
}

#[tokio::test]
async fn acquire_access_token_surfaces_provider_rejection() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\"}");
		})
		.await;
	let err = handshake_against(&server)
		.acquire_access_token()
		.await
		.expect_err("Provider rejections should surface to the caller.");

	assert!(matches!(
		err,
		Error::Authentication(AuthenticationError::Rejected { status: 401, .. })
	));
}

#[tokio::test]
async fn acquire_embed_token_returns_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(generate_token_path())
				.header("authorization", "Bearer AT1")
				.json_body(json!({ "accessLevel": "view" }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"abc\",\"tokenId\":\"id-1\",\"expiration\":\"2026-01-01T00:00:00Z\"}");
		})
		.await;
	let token = handshake_against(&server)
		.acquire_embed_token(&AccessToken::new("AT1"))
		.await
		.expect("Embed token generation should succeed.");

	assert_eq!(token.expose(), "abc");

	mock.assert_async().await;
}

#[tokio::test]
async fn acquire_embed_token_requires_token_field() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(generate_token_path());
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let err = handshake_against(&server)
		.acquire_embed_token(&AccessToken::new("AT1"))
		.await
		.expect_err("Responses without `token` should fail.");

	assert!(matches!(err, Error::EmbedToken(EmbedTokenError::MissingToken { .. })));
}

#[tokio::test]
async fn acquire_embed_token_rejects_malformed_success_body() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(generate_token_path());
			then.status(200)
				.header("content-type", "text/html")
				.body("<html>504 Gateway Timeout</html>");
		})
		.await;
	let err = handshake_against(&server)
		.acquire_embed_token(&AccessToken::new("AT1"))
		.await
		.expect_err("Non-JSON success bodies should fail.");

	assert!(matches!(err, Error::EmbedToken(EmbedTokenError::ResponseParse { .. })));
}

#[tokio::test]
async fn acquire_embed_token_carries_rejection_status() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(generate_token_path());
			then.status(403)
				.header("content-type", "application/json")
				.body("{\"error\":{\"code\":\"PowerBINotAuthorizedException\"}}");
		})
		.await;
	let err = handshake_against(&server)
		.acquire_embed_token(&AccessToken::new("AT1"))
		.await
		.expect_err("Token endpoint rejections should surface to the caller.");

	match err {
		Error::EmbedToken(EmbedTokenError::Status { status, body }) => {
			assert_eq!(status, 403);
			assert!(body.contains("PowerBINotAuthorizedException"));
		},
		other => panic!("Expected an embed token status error, got: {other:?}."),
	}
}

#[tokio::test]
async fn fetch_report_metadata_returns_embed_url() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(metadata_path()).header("authorization", "Bearer AT1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"rpt-embed\",\"embedUrl\":\"https://x\"}");
		})
		.await;
	let embed_url = handshake_against(&server)
		.fetch_report_metadata(&AccessToken::new("AT1"))
		.await
		.expect("Metadata fetch should succeed.");

	assert_eq!(embed_url, Url::parse("https://x").expect("Literal URL should parse."));

	mock.assert_async().await;
}

#[tokio::test]
async fn fetch_report_metadata_requires_embed_url_field() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(metadata_path());
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"rpt-embed\",\"name\":\"Quarterly\"}");
		})
		.await;
	let err = handshake_against(&server)
		.fetch_report_metadata(&AccessToken::new("AT1"))
		.await
		.expect_err("Metadata without `embedUrl` should fail.");

	assert!(matches!(err, Error::ReportFetch(ReportFetchError::MissingEmbedUrl { .. })));
}

#[tokio::test]
async fn fetch_report_metadata_rejects_invalid_embed_url() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(metadata_path());
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"embedUrl\":\"not a url\"}");
		})
		.await;
	let err = handshake_against(&server)
		.fetch_report_metadata(&AccessToken::new("AT1"))
		.await
		.expect_err("Metadata with an unparseable `embedUrl` should fail.");

	assert!(matches!(err, Error::ReportFetch(ReportFetchError::InvalidEmbedUrl { .. })));
}

#[tokio::test]
async fn fetch_report_metadata_rejects_malformed_success_body() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(metadata_path());
			then.status(200)
				.header("content-type", "text/html")
				.body("<html>502 Bad Gateway</html>");
		})
		.await;
	let err = handshake_against(&server)
		.fetch_report_metadata(&AccessToken::new("AT1"))
		.await
		.expect_err("Non-JSON success bodies should fail.");

	assert!(matches!(err, Error::ReportFetch(ReportFetchError::ResponseParse { .. })));
}

#[tokio::test]
async fn fetch_report_metadata_surfaces_rejection() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(metadata_path());
			then.status(404)
				.header("content-type", "application/json")
				.body("{\"error\":{\"code\":\"ItemNotFound\"}}");
		})
		.await;
	let err = handshake_against(&server)
		.fetch_report_metadata(&AccessToken::new("AT1"))
		.await
		.expect_err("Metadata rejections should surface to the caller.");

	assert!(matches!(err, Error::ReportFetch(ReportFetchError::Status { status: 404, .. })));
}

#[tokio::test]
async fn build_embed_result_assembles_bundle() {
	let server = MockServer::start_async().await;
	let provider = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"AT1\",\"token_type\":\"Bearer\",\"expires_in\":3599}");
		})
		.await;
	let generate = server
		.mock_async(|when, then| {
			when.method(POST).path(generate_token_path()).header("authorization", "Bearer AT1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"ET1\"}");
		})
		.await;
	let metadata = server
		.mock_async(|when, then| {
			when.method(GET).path(metadata_path()).header("authorization", "Bearer AT1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"embedUrl\":\"https://report/1\"}");
		})
		.await;
	let result = handshake_against(&server)
		.build_embed_result()
		.await
		.expect("Full handshake should succeed.");

	assert_eq!(result.embed_url.as_str(), "https://report/1");
	assert_eq!(result.embed_token.expose(), "ET1");
	assert_eq!(result.access_token.expose(), "AT1");
	assert_eq!(result.report_id, TEST_REPORT_ID);

	// The access token is acquired twice: once for the embed-token call and once for the
	// metadata fetch.
	provider.assert_calls_async(2).await;
	generate.assert_async().await;
	metadata.assert_async().await;
}

#[tokio::test]
async fn build_embed_result_short_circuits_on_auth_failure() {
	let server = MockServer::start_async().await;
	let _provider = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let generate = server
		.mock_async(|when, then| {
			when.method(POST).path(generate_token_path());
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"ET1\"}");
		})
		.await;
	let metadata = server
		.mock_async(|when, then| {
			when.method(GET).path(metadata_path());
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"embedUrl\":\"https://report/1\"}");
		})
		.await;
	let err = handshake_against(&server)
		.build_embed_result()
		.await
		.expect_err("An authentication failure should abort the sequence.");

	assert!(matches!(err, Error::Authentication(_)));

	generate.assert_calls_async(0).await;
	metadata.assert_calls_async(0).await;
}
