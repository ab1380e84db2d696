//! Credential material and report addressing shared across the handshake.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Opaque bearer credential proving the application's identity to the reporting API.
///
/// Re-acquired on every render; expiry is never tracked locally.
#[derive(Clone, Debug)]
pub struct AccessToken(TokenSecret);
impl AccessToken {
	/// Wraps a freshly issued access token.
	pub fn new(value: impl Into<String>) -> Self {
		Self(TokenSecret::new(value))
	}

	/// Returns the inner token value for `Authorization` headers and the view layer.
	pub fn expose(&self) -> &str {
		self.0.expose()
	}
}

/// Short-lived bearer credential granting a client permission to render one specific
/// report at `view` access level.
#[derive(Clone, Debug)]
pub struct EmbedToken(TokenSecret);
impl EmbedToken {
	/// Wraps a freshly issued embed token.
	pub fn new(value: impl Into<String>) -> Self {
		Self(TokenSecret::new(value))
	}

	/// Returns the inner token value for the view layer.
	pub fn expose(&self) -> &str {
		self.0.expose()
	}
}

/// Immutable client identity used for every client-credential grant.
#[derive(Clone, Debug)]
pub struct ClientCredential {
	/// OAuth 2.0 client identifier registered with the identity provider.
	pub client_id: String,
	/// Confidential client secret.
	pub client_secret: TokenSecret,
	/// Directory tenant the application authenticates against.
	pub tenant_id: String,
}
impl ClientCredential {
	/// Assembles a credential from its raw parts.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		tenant_id: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			tenant_id: tenant_id.into(),
		}
	}
}

/// Immutable workspace/report pair addressing one report in the reporting service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportReference {
	/// Workspace (group) containing the report.
	pub workspace_id: String,
	/// Report to embed.
	pub report_id: String,
}
impl ReportReference {
	/// Assembles a reference from its raw parts.
	pub fn new(workspace_id: impl Into<String>, report_id: impl Into<String>) -> Self {
		Self { workspace_id: workspace_id.into(), report_id: report_id.into() }
	}
}
