//! OpenAI adapter (Responses API web search, plain chat completions)
//!
//! Drafts go through the Responses API with a `web_search_preview`
//! tool; the response is a sequence of heterogeneous output items, and
//! citations are `url_citation` annotations on message items. Whether
//! the configured account supports the Responses API is decided once
//! at startup by the `responses_api` config flag; when it is off, the
//! drafter runs a plain chat completion instead and the reply is
//! labeled as a fallback so consumers know the sources are unreliable.
//!
//! Editors (and the fallback path) use plain chat completions.

use crate::config::{GenerationConfig, OpenAiConfig};
use crate::providers::status_error;
use biodraft_application::ports::provider_gateway::{ProviderError, ProviderReply};
use biodraft_domain::{Source, SourceAttribution};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    temperature: f32,
    search_context_size: String,
    responses_api: bool,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig, generation: &GenerationConfig) -> Option<Self> {
        let api_key = config.resolve_key()?;
        Some(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: config.base_url.clone(),
            temperature: generation.temperature,
            search_context_size: generation.search_context_size.clone(),
            responses_api: config.responses_api,
        })
    }

    /// Run one web-search draft, or the plain-completion fallback when
    /// the Responses API capability is not available.
    pub async fn web_search_draft(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> Result<ProviderReply, ProviderError> {
        if !self.responses_api {
            warn!(
                model = model_id,
                "Responses API not available for this client, falling back to chat completion"
            );
            let text = self
                .chat_completion(model_id, prompt, Some(self.temperature))
                .await?;
            return Ok(ProviderReply::from_fallback(text));
        }

        let request = ResponsesRequest {
            model: model_id,
            input: prompt,
            tools: vec![ResponsesTool {
                kind: "web_search_preview",
                search_context_size: &self.search_context_size,
            }],
        };

        let response = self
            .http
            .post(format!("{}/responses", self.base_url))
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

        let raw: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        debug!(model = model_id, "OpenAI response received");
        parse_responses_reply(raw)
    }

    /// Plain chat completion. `temperature` is omitted for reasoning
    /// models that reject it (the editor path passes `None`).
    pub async fn chat_completion(
        &self,
        model_id: &str,
        prompt: &str,
        temperature: Option<f32>,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
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

        raw.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::MalformedResponse("no choices in completion".to_string()))
    }
}

// ==================== Wire types: Responses API ====================

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    tools: Vec<ResponsesTool<'a>>,
}

#[derive(Debug, Serialize)]
struct ResponsesTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    search_context_size: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

/// One item in the heterogeneous output sequence.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum OutputItem {
    #[serde(rename = "message")]
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    #[serde(rename = "web_search_call")]
    WebSearchCall,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "output_text")]
    OutputText {
        #[serde(default)]
        text: String,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Annotation {
    #[serde(rename = "url_citation")]
    UrlCitation {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
    #[serde(other)]
    Other,
}

// ==================== Wire types: chat completions ====================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

// ==================== Normalization ====================

pub(crate) fn parse_responses_reply(
    response: ResponsesResponse,
) -> Result<ProviderReply, ProviderError> {
    let mut text = String::new();
    let mut sources = Vec::new();
    let mut web_search_called = false;

    for item in response.output {
        match item {
            OutputItem::Message { content } => {
                for part in content {
                    if let ContentPart::OutputText { text: t, annotations } = part {
                        text.push_str(&t);
                        for annotation in annotations {
                            if let Annotation::UrlCitation {
                                title: Some(title),
                                url: Some(url),
                            } = annotation
                            {
                                sources.push(Source::new(title, url));
                            }
                        }
                    }
                }
            }
            OutputItem::WebSearchCall => web_search_called = true,
            OutputItem::Other => {}
        }
    }

    if text.is_empty() {
        return Err(ProviderError::MalformedResponse(
            "no output text in response".to_string(),
        ));
    }

    let attribution = if !sources.is_empty() {
        SourceAttribution::cited(sources)
    } else if web_search_called {
        SourceAttribution::ToolUsedNoCitations
    } else {
        SourceAttribution::SearchNoCitations
    };

    Ok(ProviderReply::new(text, attribution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> ResponsesResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_message_text_and_citations_extracted() {
        let reply = parse_responses_reply(response(json!({
            "output": [
                {"type": "web_search_call", "id": "ws_1"},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "NAME: Jane Doe", "annotations": [
                        {"type": "url_citation", "title": "Profile", "url": "https://example.org/p"},
                        {"type": "url_citation", "title": "Profile", "url": "https://example.org/p"}
                    ]}
                ]}
            ]
        })))
        .unwrap();

        assert_eq!(reply.text, "NAME: Jane Doe");
        // Duplicate annotations collapse to one source.
        assert_eq!(
            reply.sources,
            SourceAttribution::Cited(vec![Source::new("Profile", "https://example.org/p")])
        );
    }

    #[test]
    fn test_web_search_call_without_citations_is_flagged() {
        let reply = parse_responses_reply(response(json!({
            "output": [
                {"type": "web_search_call", "id": "ws_1"},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "CV text", "annotations": []}
                ]}
            ]
        })))
        .unwrap();
        assert_eq!(reply.sources, SourceAttribution::ToolUsedNoCitations);
    }

    #[test]
    fn test_no_tool_call_and_no_citations() {
        let reply = parse_responses_reply(response(json!({
            "output": [
                {"type": "message", "content": [
                    {"type": "output_text", "text": "CV text"}
                ]}
            ]
        })))
        .unwrap();
        assert_eq!(reply.sources, SourceAttribution::SearchNoCitations);
    }

    #[test]
    fn test_unknown_items_and_parts_are_tolerated() {
        let reply = parse_responses_reply(response(json!({
            "output": [
                {"type": "reasoning", "id": "rs_1"},
                {"type": "message", "content": [
                    {"type": "refusal", "refusal": "no"},
                    {"type": "output_text", "text": "CV text"}
                ]}
            ]
        })))
        .unwrap();
        assert_eq!(reply.text, "CV text");
    }

    #[test]
    fn test_multiple_text_parts_concatenate_in_order() {
        let reply = parse_responses_reply(response(json!({
            "output": [
                {"type": "message", "content": [
                    {"type": "output_text", "text": "NAME: "},
                    {"type": "output_text", "text": "Jane Doe"}
                ]}
            ]
        })))
        .unwrap();
        assert_eq!(reply.text, "NAME: Jane Doe");
    }

    #[test]
    fn test_empty_output_is_malformed() {
        let result = parse_responses_reply(response(json!({"output": []})));
        assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    }

    #[test]
    fn test_annotation_missing_url_is_dropped() {
        let reply = parse_responses_reply(response(json!({
            "output": [
                {"type": "message", "content": [
                    {"type": "output_text", "text": "CV", "annotations": [
                        {"type": "url_citation", "title": "No link"}
                    ]}
                ]}
            ]
        })))
        .unwrap();
        assert_eq!(reply.sources, SourceAttribution::SearchNoCitations);
    }
}
