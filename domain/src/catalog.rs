//! Provider catalog value objects
//!
//! The drafter and editor catalogs are closed sets: every provider the
//! system can deploy is enumerated here, together with the adapter kind
//! that decides how its raw response is normalized. Whether a provider
//! is actually usable at runtime (credential present, client built) is
//! carried by [`ProviderSpec::configured`], resolved once at startup.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Maximum number of drafters that may be deployed in one batch.
pub const MAX_DRAFTERS: usize = 5;

/// Vendor behind a provider integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vendor {
    Perplexity,
    OpenAi,
    Google,
    Anthropic,
}

/// How a provider's raw response is normalized into a draft.
///
/// One variant per response shape; each maps to exactly one
/// normalization function in the infrastructure layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdapterKind {
    /// Single request/response chat completion, no tools. Sources are
    /// never applicable.
    PlainCompletion,
    /// Chat completion with a web-search capability flag; citations may
    /// appear top-level or inside an extension bag.
    SearchCompletion,
    /// Generation with an attached search tool; sources come from
    /// grounding metadata chunks on the first candidate.
    GroundedGeneration,
    /// Content-block response; text blocks are concatenated and
    /// per-block citation annotations collected.
    ToolUseCitations,
    /// Heterogeneous output-item response; citations are url_citation
    /// annotations on message items.
    ResponsesWebSearch,
}

/// CV generation models ("Interns")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrafterId {
    Sonar,
    Deepseek,
    Gemini,
    Optima,
    Claude,
}

impl DrafterId {
    /// All drafters, in catalog order.
    pub fn all() -> [DrafterId; 5] {
        [
            DrafterId::Sonar,
            DrafterId::Deepseek,
            DrafterId::Gemini,
            DrafterId::Optima,
            DrafterId::Claude,
        ]
    }

    /// Display name shown to users and used in export tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            DrafterId::Sonar => "Sonar",
            DrafterId::Deepseek => "Deepseek",
            DrafterId::Gemini => "Gemini",
            DrafterId::Optima => "Optima",
            DrafterId::Claude => "Claude",
        }
    }

    /// Underlying model identifier sent to the vendor API.
    pub fn default_model_id(&self) -> &'static str {
        match self {
            DrafterId::Sonar => "sonar-pro",
            DrafterId::Deepseek => "sonar-reasoning",
            DrafterId::Gemini => "gemini-2.0-flash-001",
            DrafterId::Optima => "gpt-4.1",
            DrafterId::Claude => "claude-3-7-sonnet-20250219",
        }
    }

    pub fn vendor(&self) -> Vendor {
        match self {
            DrafterId::Sonar | DrafterId::Deepseek => Vendor::Perplexity,
            DrafterId::Gemini => Vendor::Google,
            DrafterId::Optima => Vendor::OpenAi,
            DrafterId::Claude => Vendor::Anthropic,
        }
    }

    pub fn kind(&self) -> AdapterKind {
        match self {
            DrafterId::Sonar | DrafterId::Deepseek => AdapterKind::SearchCompletion,
            DrafterId::Gemini => AdapterKind::GroundedGeneration,
            DrafterId::Optima => AdapterKind::ResponsesWebSearch,
            DrafterId::Claude => AdapterKind::ToolUseCitations,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DrafterId::Sonar => "Perplexity model, good for broad research. Search context: high.",
            DrafterId::Deepseek => "Perplexity model, focused on reasoning. Search context: high.",
            DrafterId::Gemini => "Google model with web grounding capabilities.",
            DrafterId::Optima => {
                "OpenAI model with web search capabilities (via Responses API). Search context: high."
            }
            DrafterId::Claude => "Anthropic model with web search capabilities.",
        }
    }
}

impl std::fmt::Display for DrafterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DrafterId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sonar" | "sonar" => Ok(DrafterId::Sonar),
            "Deepseek" | "deepseek" => Ok(DrafterId::Deepseek),
            "Gemini" | "gemini" => Ok(DrafterId::Gemini),
            "Optima" | "optima" => Ok(DrafterId::Optima),
            "Claude" | "claude" => Ok(DrafterId::Claude),
            other => Err(DomainError::UnknownDrafter(other.to_string())),
        }
    }
}

/// Reconciliation models ("Editors")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorId {
    Oscar,
    Graham,
}

impl EditorId {
    /// All editors, in catalog order.
    pub fn all() -> [EditorId; 2] {
        [EditorId::Oscar, EditorId::Graham]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EditorId::Oscar => "Oscar",
            EditorId::Graham => "Graham",
        }
    }

    pub fn default_model_id(&self) -> &'static str {
        match self {
            EditorId::Oscar => "o3",
            EditorId::Graham => "gemini-2.5-pro-preview-05-06",
        }
    }

    pub fn vendor(&self) -> Vendor {
        match self {
            EditorId::Oscar => Vendor::OpenAi,
            EditorId::Graham => Vendor::Google,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EditorId::Oscar => "OpenAI advanced reasoning model.",
            EditorId::Graham => "Google reasoning model, powerful alternative for comparison.",
        }
    }
}

impl std::fmt::Display for EditorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EditorId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Oscar" | "oscar" => Ok(EditorId::Oscar),
            "Graham" | "graham" => Ok(EditorId::Graham),
            other => Err(DomainError::UnknownEditor(other.to_string())),
        }
    }
}

/// Runtime description of one provider: catalog identity plus the
/// configured flag resolved at process start. Read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Display name ("Sonar", "Oscar", ...), unique per catalog.
    pub name: String,
    /// Underlying model identifier sent to the vendor.
    pub model_id: String,
    pub vendor: Vendor,
    pub kind: AdapterKind,
    /// Whether the backing credential/client is available.
    pub configured: bool,
    pub description: String,
}

impl ProviderSpec {
    /// Build the spec for a drafter with its catalog defaults.
    pub fn for_drafter(id: DrafterId, configured: bool) -> Self {
        Self {
            name: id.as_str().to_string(),
            model_id: id.default_model_id().to_string(),
            vendor: id.vendor(),
            kind: id.kind(),
            configured,
            description: id.description().to_string(),
        }
    }

    /// Build the spec for an editor. Editors run plain completions.
    pub fn for_editor(id: EditorId, configured: bool) -> Self {
        Self {
            name: id.as_str().to_string(),
            model_id: id.default_model_id().to_string(),
            vendor: id.vendor(),
            kind: AdapterKind::PlainCompletion,
            configured,
            description: id.description().to_string(),
        }
    }
}
