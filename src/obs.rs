//! Observability helpers for the embed handshake.
//!
//! Spans are named `pbi_embed.handshake` with a `stage` field identifying the external
//! call in flight. Token material never reaches the logs; the secret wrappers redact
//! themselves in `Debug` and `Display` output.

// crates.io
use tracing::{Span, instrument::Instrumented};
use tracing_subscriber::EnvFilter;
// self
use crate::_prelude::*;

/// External calls observed by the handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
	/// Client-credential grant against the identity provider.
	AccessToken,
	/// Viewer-scoped token generation against the reporting API.
	EmbedToken,
	/// Report metadata fetch against the reporting API.
	ReportMetadata,
}
impl StageKind {
	/// Returns a stable label suitable for span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageKind::AccessToken => "access_token",
			StageKind::EmbedToken => "embed_token",
			StageKind::ReportMetadata => "report_metadata",
		}
	}
}
impl Display for StageKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A span builder used by handshake stages.
#[derive(Clone, Debug)]
pub struct StageSpan {
	span: Span,
}
impl StageSpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: StageKind) -> Self {
		let span = tracing::info_span!("pbi_embed.handshake", stage = stage.as_str());

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		// Trait kept out of module scope so it cannot shadow this inherent method.
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}

/// Installs the process-wide tracing subscriber, honoring `RUST_LOG`.
///
/// Repeated calls are ignored so tests can invoke it freely.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}
