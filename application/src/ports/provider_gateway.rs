//! Provider gateway port
//!
//! Defines the interface the orchestrators use to invoke one external
//! model. Implementations (the HTTP adapters) live in the
//! infrastructure layer and are responsible for normalizing each
//! vendor's response shape; the orchestrator only ever sees a
//! [`ProviderReply`] or a [`ProviderError`].

use async_trait::async_trait;
use biodraft_domain::{ProviderSpec, SourceAttribution};
use thiserror::Error;

/// Errors a provider invocation can surface.
///
/// These never propagate past the orchestrator loop: each one becomes a
/// `status=Error` result attributed to the provider that failed.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Authentication failed: {0}. Check the API key for this provider.")]
    Auth(String),

    #[error("Rate limit exceeded: {0}. Try again later or check your usage limits.")]
    RateLimited(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Capability not supported: {0}")]
    Unsupported(String),

    #[error("Provider not configured: {0}")]
    Unconfigured(String),
}

/// Normalized output of one drafter invocation, before it is stamped
/// with timing and turned into a `DraftResult`.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub text: String,
    pub sources: SourceAttribution,
    /// True when the plain-completion fallback produced this reply.
    pub fallback: bool,
}

impl ProviderReply {
    pub fn new(text: impl Into<String>, sources: SourceAttribution) -> Self {
        Self {
            text: text.into(),
            sources,
            fallback: false,
        }
    }

    /// A reply produced by the fallback path; sources are unreliable.
    pub fn from_fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: SourceAttribution::FallbackTrainingData,
            fallback: true,
        }
    }
}

/// Gateway for drafter and editor invocations.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Whether the backing client for this spec was built at startup.
    fn is_configured(&self, spec: &ProviderSpec) -> bool;

    /// Run one drafter against the rendered biography prompt.
    async fn draft(&self, spec: &ProviderSpec, prompt: &str)
        -> Result<ProviderReply, ProviderError>;

    /// Run one editor against the synthesis prompt. Editors are plain
    /// completions; only text comes back.
    async fn synthesize(&self, spec: &ProviderSpec, prompt: &str)
        -> Result<String, ProviderError>;
}
