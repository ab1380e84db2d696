//! Server-side Power BI embed handshake—exchange a client credential for viewer-scoped embed
//! tokens and render a single report page with structured, diagnosable failures.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handshake;
pub mod http;
pub mod obs;
pub mod www;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ClientCredential, ReportReference},
		config::ApiEndpoints,
		handshake::EmbedHandshake,
		http::ApiClient,
	};

	/// Workspace identifier used across integration tests.
	pub const TEST_WORKSPACE_ID: &str = "ws-embed";
	/// Report identifier used across integration tests.
	pub const TEST_REPORT_ID: &str = "rpt-embed";

	/// Builds a handshake pointed at a mock identity provider and reporting API.
	///
	/// The authority URL receives the `oauth2/v2.0/token` suffix the same way production
	/// configuration does, so mocks should expect requests on that path.
	pub fn build_test_handshake(authority_url: &str, api_url: &str) -> EmbedHandshake {
		let credential = ClientCredential::new("client-embed", "secret-embed", "tenant-embed");
		let report = ReportReference::new(TEST_WORKSPACE_ID, TEST_REPORT_ID);
		let endpoints = ApiEndpoints::new(authority_url, api_url)
			.expect("Mock endpoints should build successfully.");

		EmbedHandshake::new(ApiClient::default(), credential, report, endpoints)
			.expect("Mock handshake should build successfully.")
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as Json;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, pbi_embed as _};
