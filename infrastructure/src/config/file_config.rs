//! Configuration file schema
//!
//! All sections are optional in TOML; every field has a default so a
//! missing config file still yields a working setup driven purely by
//! environment variables.

use serde::{Deserialize, Serialize};

/// Root configuration (`biodraft.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub providers: ProvidersConfig,
    pub generation: GenerationConfig,
    pub notify: NotifyConfig,
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub perplexity: PerplexityConfig,
    pub openai: OpenAiConfig,
    pub google: GoogleConfig,
    pub anthropic: AnthropicConfig,
}

/// Perplexity API settings (`[providers.perplexity]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerplexityConfig {
    /// Environment variable name for the API key.
    pub api_key_env: String,
    /// Direct API key (not recommended; use the env var instead).
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for PerplexityConfig {
    fn default() -> Self {
        Self {
            api_key_env: "PERPLEXITY_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.perplexity.ai".to_string(),
        }
    }
}

impl PerplexityConfig {
    pub fn resolve_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// OpenAI API settings (`[providers.openai]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
    /// Whether the account/client supports the Responses API. Probed
    /// once here; when false the web-search drafter falls back to a
    /// plain chat completion.
    pub responses_api: bool,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            responses_api: true,
        }
    }
}

impl OpenAiConfig {
    pub fn resolve_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// Google Gemini API settings (`[providers.google]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GOOGLE_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl GoogleConfig {
    pub fn resolve_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// Anthropic API settings (`[providers.anthropic]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
    /// Anthropic API version header.
    pub api_version: String,
    /// Max tokens per draft response.
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            max_tokens: 4096,
        }
    }
}

impl AnthropicConfig {
    pub fn resolve_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// Sampling parameters (`[generation]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Temperature for drafter calls.
    pub temperature: f32,
    /// Temperature for editor (synthesis) calls.
    pub editor_temperature: f32,
    /// Search context size for search-augmented drafters.
    pub search_context_size: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            editor_temperature: 0.3,
            search_context_size: "high".to_string(),
        }
    }
}

/// Telegram notification settings (`[notify]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub bot_token_env: String,
    pub chat_id_env: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            bot_token_env: "BOT_TOKEN".to_string(),
            chat_id_env: "RECIPIENT_USER_ID".to_string(),
        }
    }
}

impl NotifyConfig {
    /// Resolve `(bot_token, chat_id)`; notifications are disabled when
    /// either is absent.
    pub fn resolve(&self) -> Option<(String, String)> {
        let token = std::env::var(&self.bot_token_env).ok()?;
        let chat_id = std::env::var(&self.chat_id_env).ok()?;
        Some((token, chat_id))
    }
}

/// Synthesis behavior (`[synthesis]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Conflict-note policy: "named" or "generic".
    pub conflict_notes: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            conflict_notes: "named".to_string(),
        }
    }
}

fn resolve_key(inline: Option<&str>, env_name: &str) -> Option<String> {
    if let Some(key) = inline {
        if !key.is_empty() {
            return Some(key.to_string());
        }
    }
    std::env::var(env_name).ok().filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.providers.perplexity.api_key_env, "PERPLEXITY_API_KEY");
        assert_eq!(config.generation.temperature, 0.5);
        assert_eq!(config.generation.editor_temperature, 0.3);
        assert_eq!(config.providers.anthropic.max_tokens, 4096);
        assert!(config.providers.openai.responses_api);
        assert_eq!(config.synthesis.conflict_notes, "named");
    }

    #[test]
    fn test_inline_key_takes_priority() {
        let config = PerplexityConfig {
            api_key: Some("pplx-inline".to_string()),
            // An env var name that will not exist in the test run.
            api_key_env: "BIODRAFT_TEST_NO_SUCH_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_key().as_deref(), Some("pplx-inline"));
    }

    #[test]
    fn test_missing_key_resolves_to_none() {
        let config = PerplexityConfig {
            api_key: None,
            api_key_env: "BIODRAFT_TEST_NO_SUCH_VAR".to_string(),
            ..Default::default()
        };
        assert!(config.resolve_key().is_none());
    }

    #[test]
    fn test_toml_section_parsing() {
        let config: FileConfig = toml::from_str(
            r#"
            [providers.openai]
            responses_api = false

            [synthesis]
            conflict_notes = "generic"
            "#,
        )
        .unwrap();
        assert!(!config.providers.openai.responses_api);
        assert_eq!(config.synthesis.conflict_notes, "generic");
        // Untouched sections keep their defaults.
        assert_eq!(config.generation.search_context_size, "high");
    }
}
