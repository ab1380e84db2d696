//! Error types shared across configuration, transport, and the embed handshake.
//!
//! The taxonomy is deliberately closed: every external call owns one error kind with
//! structured diagnostic fields (HTTP status, response body) instead of pre-formatted
//! strings, so callers can branch on the failing step.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// JSON parse failure preserving the path to the first offending element.
pub type JsonParseError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Identity provider rejected the grant or answered without a token.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// Reporting API refused or malformed the embed-token exchange.
	#[error(transparent)]
	EmbedToken(#[from] EmbedTokenError),
	/// Reporting API refused or malformed the report metadata fetch.
	#[error(transparent)]
	ReportFetch(#[from] ReportFetchError),
}

/// Configuration and validation failures raised at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required environment variable is absent or empty.
	#[error("Environment variable `{name}` is missing.")]
	MissingVar {
		/// Name of the absent variable.
		name: &'static str,
	},
	/// Configured endpoint cannot be parsed as a URL.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Endpoint label for diagnostics.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Listener port cannot be parsed as a number.
	#[error("The `PORT` variable is not a valid port number.")]
	InvalidPort {
		/// Underlying parsing failure.
		#[source]
		source: std::num::ParseIntError,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint}.")]
	Network {
		/// Endpoint label for diagnostics.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: ReqwestError,
	},
}
impl TransportError {
	/// Wraps a transport failure raised while calling the labeled endpoint.
	pub fn network(endpoint: &'static str, source: ReqwestError) -> Self {
		Self::Network { endpoint, source }
	}
}

/// Identity-provider failures raised while acquiring an access token.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Provider answered the client-credential grant with a non-success status.
	#[error("Identity provider rejected the client-credential grant with status {status}: {body}")]
	Rejected {
		/// HTTP status code returned by the provider.
		status: u16,
		/// Raw response body for diagnostics.
		body: String,
	},
	/// Provider answered successfully but without an `access_token` field.
	#[error("Identity provider response is missing `access_token`: {body}")]
	MissingAccessToken {
		/// Parsed provider response for diagnostics.
		body: Json,
	},
	/// Provider returned malformed JSON on a success status.
	#[error("Identity provider returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: JsonParseError,
	},
}

/// Reporting API failures raised while generating an embed token.
#[derive(Debug, ThisError)]
pub enum EmbedTokenError {
	/// Token endpoint answered with a non-success status.
	#[error("Embed token request failed with status {status}: {body}")]
	Status {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Raw response body for diagnostics.
		body: String,
	},
	/// Token endpoint answered successfully but without a `token` field.
	#[error("Embed token response is missing `token`: {body}")]
	MissingToken {
		/// Parsed token endpoint response for diagnostics.
		body: Json,
	},
	/// Token endpoint returned malformed JSON on a success status.
	#[error("Embed token endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: JsonParseError,
	},
}

/// Reporting API failures raised while fetching report metadata.
#[derive(Debug, ThisError)]
pub enum ReportFetchError {
	/// Metadata endpoint answered with a non-success status.
	#[error("Report metadata request failed with status {status}: {body}")]
	Status {
		/// HTTP status code returned by the metadata endpoint.
		status: u16,
		/// Raw response body for diagnostics.
		body: String,
	},
	/// Metadata endpoint answered successfully but without an `embedUrl` field.
	#[error("Report metadata is missing `embedUrl`: {body}")]
	MissingEmbedUrl {
		/// Parsed metadata response for diagnostics.
		body: Json,
	},
	/// Metadata contained an `embedUrl` that is not a valid URL.
	#[error("Report metadata carries an invalid `embedUrl`.")]
	InvalidEmbedUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Metadata endpoint returned malformed JSON on a success status.
	#[error("Report metadata endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: JsonParseError,
	},
}
