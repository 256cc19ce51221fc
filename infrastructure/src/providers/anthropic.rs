//! Anthropic adapter (tool-augmented generation with inline citations)
//!
//! Drafts run through the Messages API with the web-search tool
//! attached. The response is a sequence of content blocks: all
//! text-typed blocks are concatenated in order, and citation
//! annotations attached to any block are collected. A response that
//! stopped for tool use without producing text yields a sentinel
//! explanatory string rather than an empty draft.
//!
//! The biography prompt's instruction body is lifted into the system
//! prompt; the information/biography frame stays in the user message.

use crate::config::AnthropicConfig;
use crate::providers::status_error;
use biodraft_application::ports::provider_gateway::{ProviderError, ProviderReply};
use biodraft_domain::{BiographyPrompt, Source, SourceAttribution};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Text used when the model stopped for tool use without a text block.
const TOOL_USE_SENTINEL: &str = "Model used web search, but did not provide a direct text \
     response in the first part. This might indicate a multi-step process is expected.";

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    api_version: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(config: &AnthropicConfig) -> Option<Self> {
        let api_key = config.resolve_key()?;
        Some(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: config.base_url.clone(),
            api_version: config.api_version.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Run one draft with the web-search tool and inline citations.
    pub async fn cited_draft(
        &self,
        model_id: &str,
        prompt: &str,
    ) -> Result<ProviderReply, ProviderError> {
        let (system, user) = BiographyPrompt::split_system_user(prompt);

        let request = MessagesRequest {
            model: model_id,
            system: system.as_deref(),
            messages: vec![RequestMessage {
                role: "user",
                content: &user,
            }],
            max_tokens: self.max_tokens,
            tools: vec![WebSearchTool {
                kind: "web_search_20250305",
                name: "web_search",
            }],
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let raw: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        debug!(model = model_id, "Anthropic message received");
        parse_reply(raw)
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<RequestMessage<'a>>,
    max_tokens: u32,
    tools: Vec<WebSearchTool>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WebSearchTool {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: String,
        #[serde(default)]
        citations: Vec<BlockCitation>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct BlockCitation {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

// ==================== Normalization ====================

pub(crate) fn parse_reply(response: MessagesResponse) -> Result<ProviderReply, ProviderError> {
    let mut text_parts = Vec::new();
    let mut sources = Vec::new();

    for block in response.content {
        if let ContentBlock::Text { text, citations } = block {
            text_parts.push(text);
            for citation in citations {
                if let (Some(title), Some(url)) = (citation.title, citation.url) {
                    sources.push(Source::new(title, url));
                }
            }
        }
    }

    let text = text_parts.join("\n").trim().to_string();
    let text = if text.is_empty() {
        if response.stop_reason.as_deref() == Some("tool_use") {
            TOOL_USE_SENTINEL.to_string()
        } else {
            return Err(ProviderError::MalformedResponse(
                "no text content in response".to_string(),
            ));
        }
    } else {
        text
    };

    Ok(ProviderReply::new(text, SourceAttribution::cited(sources)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> MessagesResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_blocks_concatenate_in_order() {
        let reply = parse_reply(response(json!({
            "content": [
                {"type": "text", "text": "NAME: Jane Doe"},
                {"type": "server_tool_use", "id": "tu_1", "name": "web_search"},
                {"type": "text", "text": "BORN: 1970"}
            ],
            "stop_reason": "end_turn"
        })))
        .unwrap();
        assert_eq!(reply.text, "NAME: Jane Doe\nBORN: 1970");
    }

    #[test]
    fn test_block_citations_collected_and_deduplicated() {
        let reply = parse_reply(response(json!({
            "content": [
                {"type": "text", "text": "NAME: Jane Doe", "citations": [
                    {"type": "web_search_result_location", "title": "Profile", "url": "https://example.org/p"}
                ]},
                {"type": "text", "text": "BORN: 1970", "citations": [
                    {"type": "web_search_result_location", "title": "Profile", "url": "https://example.org/p"},
                    {"type": "web_search_result_location", "title": "Registry", "url": "https://example.org/r"}
                ]}
            ],
            "stop_reason": "end_turn"
        })))
        .unwrap();

        assert_eq!(
            reply.sources,
            SourceAttribution::Cited(vec![
                Source::new("Profile", "https://example.org/p"),
                Source::new("Registry", "https://example.org/r"),
            ])
        );
    }

    #[test]
    fn test_tool_use_stop_without_text_yields_sentinel() {
        let reply = parse_reply(response(json!({
            "content": [
                {"type": "server_tool_use", "id": "tu_1", "name": "web_search"}
            ],
            "stop_reason": "tool_use"
        })))
        .unwrap();
        assert_eq!(reply.text, TOOL_USE_SENTINEL);
    }

    #[test]
    fn test_citation_missing_fields_is_dropped() {
        let reply = parse_reply(response(json!({
            "content": [
                {"type": "text", "text": "CV", "citations": [
                    {"type": "web_search_result_location", "title": "No url"}
                ]}
            ],
            "stop_reason": "end_turn"
        })))
        .unwrap();
        assert_eq!(reply.sources, SourceAttribution::SearchNoCitations);
    }

    #[test]
    fn test_missing_citation_container_is_tolerated() {
        let reply = parse_reply(response(json!({
            "content": [{"type": "text", "text": "CV"}],
            "stop_reason": "end_turn"
        })))
        .unwrap();
        assert_eq!(reply.text, "CV");
        assert_eq!(reply.sources, SourceAttribution::SearchNoCitations);
    }

    #[test]
    fn test_empty_response_without_tool_use_is_malformed() {
        let result = parse_reply(response(json!({
            "content": [],
            "stop_reason": "end_turn"
        })));
        assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    }
}
