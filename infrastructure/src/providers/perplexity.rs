//! Perplexity adapter (search-augmented chat completions)
//!
//! Perplexity speaks the OpenAI-compatible chat completions protocol
//! with a `web_search_options` extension. Citations have moved between
//! API revisions: sometimes a top-level `citations` array, sometimes
//! nested under a metadata bag, with entries that are either bare URL
//! strings or `{title, url}` objects. The response contract declares
//! every location as an explicit optional field and tolerates all of
//! them being absent.

use crate::config::{GenerationConfig, PerplexityConfig};
use crate::providers::status_error;
use biodraft_application::ports::provider_gateway::{ProviderError, ProviderReply};
use biodraft_domain::{Source, SourceAttribution};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct PerplexityClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    temperature: f32,
    search_context_size: String,
}

impl PerplexityClient {
    pub fn new(config: &PerplexityConfig, generation: &GenerationConfig) -> Option<Self> {
        let api_key = config.resolve_key()?;
        Some(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: config.base_url.clone(),
            temperature: generation.temperature,
            search_context_size: generation.search_context_size.clone(),
        })
    }

    /// Run one search-augmented draft.
    pub async fn search_draft(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> Result<ProviderReply, ProviderError> {
        let request = ChatRequest {
            model: model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            web_search_options: Some(WebSearchOptions {
                search_context_size: &self.search_context_size,
            }),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let raw: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        debug!(model = model_id, "Perplexity completion received");
        parse_reply(raw)
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_search_options: Option<WebSearchOptions<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WebSearchOptions<'a> {
    search_context_size: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    choices: Vec<ChatChoice>,
    /// Citation location 1: top-level field.
    #[serde(default)]
    citations: Option<Vec<RawCitation>>,
    /// Citation location 2: extension/metadata bag.
    #[serde(default)]
    metadata: Option<CitationBag>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct CitationBag {
    #[serde(default)]
    citations: Option<Vec<RawCitation>>,
}

/// One citation entry, in any of the shapes Perplexity has shipped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCitation {
    Titled { title: String, url: String },
    UrlObject { url: String },
    Url(String),
    // Anything else is dropped rather than failing the whole response.
    Other(serde_json::Value),
}

impl RawCitation {
    fn into_source(self) -> Option<Source> {
        match self {
            RawCitation::Titled { title, url } => Some(Source::new(title, url)),
            RawCitation::UrlObject { url } => Some(Source::new("N/A", url)),
            RawCitation::Url(url) => {
                let title = url.clone();
                Some(Source::new(title, url))
            }
            RawCitation::Other(_) => None,
        }
    }
}

// ==================== Normalization ====================

pub(crate) fn parse_reply(response: ChatResponse) -> Result<ProviderReply, ProviderError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| ProviderError::MalformedResponse("no choices in completion".to_string()))?;

    let raw = response
        .citations
        .or(response.metadata.and_then(|m| m.citations))
        .unwrap_or_default();
    let sources: Vec<Source> = raw.into_iter().filter_map(RawCitation::into_source).collect();

    Ok(ProviderReply::new(
        text,
        SourceAttribution::cited(sources),
    ))
}
