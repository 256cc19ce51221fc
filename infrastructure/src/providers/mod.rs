//! HTTP provider adapters
//!
//! One client per vendor, each normalizing its own response shape into
//! a [`ProviderReply`]. The [`HttpProviderGateway`] owns the clients,
//! built once at startup from configuration, and routes each
//! invocation by the spec's vendor and adapter kind.

pub mod anthropic;
pub mod google;
pub mod openai;
pub mod perplexity;

pub use anthropic::AnthropicClient;
pub use google::GoogleClient;
pub use openai::OpenAiClient;
pub use perplexity::PerplexityClient;

use crate::config::FileConfig;
use async_trait::async_trait;
use biodraft_application::ports::provider_gateway::{
    ProviderError, ProviderGateway, ProviderReply,
};
use biodraft_domain::{AdapterKind, ProviderSpec, SourceAttribution, Vendor};
use reqwest::StatusCode;

/// Map a non-2xx HTTP status to a typed provider error.
pub(crate) fn status_error(status: StatusCode, body: &str) -> ProviderError {
    let detail = format!("HTTP {}: {}", status.as_u16(), body.trim());
    match status.as_u16() {
        401 | 403 => ProviderError::Auth(detail),
        429 => ProviderError::RateLimited(detail),
        _ => ProviderError::RequestFailed(detail),
    }
}

/// Gateway over the per-vendor HTTP clients.
///
/// A client is present exactly when its vendor's credential resolved at
/// startup; `is_configured` reports that presence and nothing else.
pub struct HttpProviderGateway {
    perplexity: Option<PerplexityClient>,
    openai: Option<OpenAiClient>,
    google: Option<GoogleClient>,
    anthropic: Option<AnthropicClient>,
}

impl HttpProviderGateway {
    /// Build all clients whose credentials are available.
    pub fn from_config(config: &FileConfig) -> Self {
        Self {
            perplexity: PerplexityClient::new(&config.providers.perplexity, &config.generation),
            openai: OpenAiClient::new(&config.providers.openai, &config.generation),
            google: GoogleClient::new(&config.providers.google, &config.generation),
            anthropic: AnthropicClient::new(&config.providers.anthropic),
        }
    }

    fn perplexity(&self, spec: &ProviderSpec) -> Result<&PerplexityClient, ProviderError> {
        self.perplexity
            .as_ref()
            .ok_or_else(|| ProviderError::Unconfigured(spec.name.clone()))
    }

    fn openai(&self, spec: &ProviderSpec) -> Result<&OpenAiClient, ProviderError> {
        self.openai
            .as_ref()
            .ok_or_else(|| ProviderError::Unconfigured(spec.name.clone()))
    }

    fn google(&self, spec: &ProviderSpec) -> Result<&GoogleClient, ProviderError> {
        self.google
            .as_ref()
            .ok_or_else(|| ProviderError::Unconfigured(spec.name.clone()))
    }

    fn anthropic(&self, spec: &ProviderSpec) -> Result<&AnthropicClient, ProviderError> {
        self.anthropic
            .as_ref()
            .ok_or_else(|| ProviderError::Unconfigured(spec.name.clone()))
    }
}

#[async_trait]
impl ProviderGateway for HttpProviderGateway {
    fn is_configured(&self, spec: &ProviderSpec) -> bool {
        match spec.vendor {
            Vendor::Perplexity => self.perplexity.is_some(),
            Vendor::OpenAi => self.openai.is_some(),
            Vendor::Google => self.google.is_some(),
            Vendor::Anthropic => self.anthropic.is_some(),
        }
    }

    async fn draft(
        &self,
        spec: &ProviderSpec,
        prompt: &str,
    ) -> Result<ProviderReply, ProviderError> {
        match spec.kind {
            AdapterKind::SearchCompletion => {
                self.perplexity(spec)?
                    .search_draft(&spec.model_id, prompt)
                    .await
            }
            AdapterKind::GroundedGeneration => {
                self.google(spec)?
                    .grounded_draft(&spec.model_id, prompt)
                    .await
            }
            AdapterKind::ResponsesWebSearch => {
                self.openai(spec)?
                    .web_search_draft(&spec.model_id, prompt)
                    .await
            }
            AdapterKind::ToolUseCitations => {
                self.anthropic(spec)?
                    .cited_draft(&spec.model_id, prompt)
                    .await
            }
            AdapterKind::PlainCompletion => {
                let text = self.plain_completion(spec, prompt).await?;
                Ok(ProviderReply::new(text, SourceAttribution::NotApplicable))
            }
        }
    }

    async fn synthesize(
        &self,
        spec: &ProviderSpec,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        self.plain_completion(spec, prompt).await
    }
}

impl HttpProviderGateway {
    /// Plain completion routed by vendor; only the vendors with an
    /// editor in the catalog are integrated.
    async fn plain_completion(
        &self,
        spec: &ProviderSpec,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        match spec.vendor {
            Vendor::OpenAi => {
                self.openai(spec)?
                    .chat_completion(&spec.model_id, prompt, None)
                    .await
            }
            Vendor::Google => {
                self.google(spec)?
                    .plain_completion(&spec.model_id, prompt)
                    .await
            }
            Vendor::Perplexity | Vendor::Anthropic => Err(ProviderError::Unsupported(format!(
                "no plain-completion integration for {}",
                spec.name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "bad key"),
            ProviderError::Auth(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "no access"),
            ProviderError::Auth(_)
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            ProviderError::RateLimited(_)
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "oops"),
            ProviderError::RequestFailed(_)
        ));
    }

    #[test]
    fn test_gateway_without_credentials_reports_unconfigured() {
        let mut config = FileConfig::default();
        let disable = "BIODRAFT_TEST_NO_SUCH_VAR".to_string();
        config.providers.perplexity.api_key_env = disable.clone();
        config.providers.openai.api_key_env = disable.clone();
        config.providers.google.api_key_env = disable.clone();
        config.providers.anthropic.api_key_env = disable;

        let gateway = HttpProviderGateway::from_config(&config);
        for spec in [
            ProviderSpec::for_drafter(biodraft_domain::DrafterId::Sonar, false),
            ProviderSpec::for_drafter(biodraft_domain::DrafterId::Gemini, false),
            ProviderSpec::for_editor(biodraft_domain::EditorId::Oscar, false),
        ] {
            assert!(!gateway.is_configured(&spec));
        }
    }
}
