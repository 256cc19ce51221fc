//! Configuration loading and schema

pub mod file_config;
pub mod loader;

pub use file_config::{
    AnthropicConfig, FileConfig, GenerationConfig, GoogleConfig, NotifyConfig, OpenAiConfig,
    PerplexityConfig, ProvidersConfig, SynthesisConfig,
};
pub use loader::ConfigLoader;
