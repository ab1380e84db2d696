//! Transport primitives shared by the embed handshake.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::JsonParseError};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The handshake performs three short, strictly ordered calls per render and reuses one
/// connection pool across all of them. Timeouts stay at the transport defaults.
#[derive(Clone, Debug, Default)]
pub struct ApiClient(pub ReqwestClient);
impl ApiClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ApiClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ApiClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Parses a JSON response body while preserving the path to the first offending element.
pub(crate) fn parse_json(body: &str) -> Result<Json, JsonParseError> {
	let mut deserializer = serde_json::Deserializer::from_str(body);

	serde_path_to_error::deserialize(&mut deserializer)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parse_json_reports_offending_path() {
		let parsed = parse_json("{\"token\":\"abc\"}").expect("Valid JSON should parse.");

		assert_eq!(parsed.get("token").and_then(Json::as_str), Some("abc"));

		let err = parse_json("<html>503</html>").expect_err("HTML bodies should not parse.");

		assert!(!err.to_string().is_empty());
	}
}
