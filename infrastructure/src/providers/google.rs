//! Google Gemini adapter (grounded generation)
//!
//! Drafts run with a `google_search` tool attached; grounding metadata
//! comes back nested under the first candidate, as a chunk list where
//! each chunk optionally carries a web reference. Editors use the same
//! endpoint without tools.

use crate::config::{GenerationConfig, GoogleConfig};
use crate::providers::status_error;
use biodraft_application::ports::provider_gateway::{ProviderError, ProviderReply};
use biodraft_domain::{Source, SourceAttribution};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct GoogleClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    temperature: f32,
    editor_temperature: f32,
}

impl GoogleClient {
    pub fn new(config: &GoogleConfig, generation: &GenerationConfig) -> Option<Self> {
        let api_key = config.resolve_key()?;
        Some(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: config.base_url.clone(),
            temperature: generation.temperature,
            editor_temperature: generation.editor_temperature,
        })
    }

    /// Run one grounded draft: search tool attached, sources from
    /// grounding metadata.
    pub async fn grounded_draft(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> Result<ProviderReply, ProviderError> {
        let raw = self.generate(model_id, prompt, true, self.temperature).await?;
        parse_grounded_reply(raw)
    }

    /// Run one plain generation (synthesis / editor path), no tools.
    pub async fn plain_completion(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let raw = self
            .generate(model_id, prompt, false, self.editor_temperature)
            .await?;
        Ok(candidate_text(&raw)
            .ok_or_else(|| ProviderError::MalformedResponse("no candidate text".to_string()))?)
    }

    async fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        grounded: bool,
        temperature: f32,
    ) -> Result<GenerateResponse, ProviderError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: RequestGenerationConfig {
                candidate_count: 1,
                temperature,
            },
            tools: grounded.then(|| vec![SearchTool::default()]),
        };

        let response = self
            .http
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, model_id
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        debug!(model = model_id, grounded, "Gemini generation received");
        response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: RequestGenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<SearchTool>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestGenerationConfig {
    candidate_count: u8,
    temperature: f32,
}

#[derive(Debug, Default, Serialize)]
struct SearchTool {
    google_search: EmptyTool,
}

#[derive(Debug, Default, Serialize)]
struct EmptyTool {}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebReference>,
}

#[derive(Debug, Deserialize)]
struct WebReference {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

// ==================== Normalization ====================

/// Concatenated text parts of the first candidate.
fn candidate_text(response: &GenerateResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    let parts = &candidate.content.as_ref()?.parts;
    let text: String = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("");
    if text.is_empty() { None } else { Some(text) }
}

pub(crate) fn parse_grounded_reply(
    response: GenerateResponse,
) -> Result<ProviderReply, ProviderError> {
    let text = candidate_text(&response)
        .ok_or_else(|| ProviderError::MalformedResponse("no candidate text".to_string()))?;

    // Chunks lacking a web reference, or one missing uri/title, are
    // skipped rather than treated as errors.
    let sources: Vec<Source> = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.grounding_metadata)
        .map(|gm| {
            gm.grounding_chunks
                .into_iter()
                .filter_map(|chunk| {
                    let web = chunk.web?;
                    Some(Source::new(web.title?, web.uri?))
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ProviderReply::new(text, SourceAttribution::cited(sources)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_grounded_reply_with_chunks() {
        let reply = parse_grounded_reply(response(json!({
            "candidates": [{
                "content": {"parts": [{"text": "NAME: Jane"}, {"text": " Doe"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://example.org/a", "title": "Profile"}},
                        {"web": {"uri": "https://example.org/b", "title": "News"}}
                    ]
                }
            }]
        })))
        .unwrap();

        assert_eq!(reply.text, "NAME: Jane Doe");
        assert_eq!(
            reply.sources,
            SourceAttribution::Cited(vec![
                Source::new("Profile", "https://example.org/a"),
                Source::new("News", "https://example.org/b"),
            ])
        );
    }

    #[test]
    fn test_chunks_missing_fields_are_skipped() {
        let reply = parse_grounded_reply(response(json!({
            "candidates": [{
                "content": {"parts": [{"text": "CV"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://example.org/a"}},
                        {"web": {"title": "No link"}},
                        {},
                        {"web": {"uri": "https://example.org/ok", "title": "Kept"}}
                    ]
                }
            }]
        })))
        .unwrap();

        assert_eq!(
            reply.sources,
            SourceAttribution::Cited(vec![Source::new("Kept", "https://example.org/ok")])
        );
    }

    #[test]
    fn test_missing_grounding_metadata_is_no_citations() {
        let reply = parse_grounded_reply(response(json!({
            "candidates": [{"content": {"parts": [{"text": "CV"}]}}]
        })))
        .unwrap();
        assert_eq!(reply.sources, SourceAttribution::SearchNoCitations);
    }

    #[test]
    fn test_no_candidates_is_malformed() {
        let result = parse_grounded_reply(response(json!({"candidates": []})));
        assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    }
}
