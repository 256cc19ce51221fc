//! Draft and synthesis result value objects
//!
//! Every provider response, whatever its raw shape, is normalized into a
//! [`DraftResult`]: text, a [`SourceAttribution`], and a status. Results
//! are immutable once created; error results are produced by the
//! `failure` constructor, which maintains the invariant that an `Error`
//! status always comes with an error description in `text` and no
//! usable sources.

use serde::{Deserialize, Serialize};

/// A `(title, url)` pair asserted by a provider as evidence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

impl Source {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Render as a markdown list line.
    pub fn render(&self) -> String {
        format!("- [{}]({})", self.title, self.url)
    }
}

/// What a draft's source list actually contains.
///
/// The non-`Cited` variants replace the sentinel strings providers would
/// otherwise leave behind: no citations is an expected outcome, not an
/// error, and each case renders a fixed explanatory block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceAttribution {
    /// The provider kind never produces sources (plain completion), or
    /// the result is an error entry.
    NotApplicable,
    /// Search was enabled but the response carried no citations.
    SearchNoCitations,
    /// A search tool invocation is visible in the response, but no
    /// citation annotations were attached.
    ToolUsedNoCitations,
    /// The capability fallback ran a plain completion; any facts come
    /// from training data, not live search.
    FallbackTrainingData,
    /// Citations extracted from the response, de-duplicated.
    Cited(Vec<Source>),
}

impl SourceAttribution {
    /// Build a `Cited` attribution, collapsing duplicate `(title, url)`
    /// pairs. First occurrence wins; an empty list degrades to
    /// [`SourceAttribution::SearchNoCitations`].
    pub fn cited(sources: Vec<Source>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let deduped: Vec<Source> = sources
            .into_iter()
            .filter(|s| seen.insert((s.title.clone(), s.url.clone())))
            .collect();
        if deduped.is_empty() {
            SourceAttribution::SearchNoCitations
        } else {
            SourceAttribution::Cited(deduped)
        }
    }

    pub fn is_cited(&self) -> bool {
        matches!(self, SourceAttribution::Cited(_))
    }

    /// Render the human-readable sources block appended to a draft.
    pub fn render(&self) -> String {
        match self {
            SourceAttribution::NotApplicable => {
                "Sources: Not applicable or not provided by the model for this output.".to_string()
            }
            SourceAttribution::SearchNoCitations => {
                "Sources: Web search enabled. Information likely integrated. \
                 No specific citations found."
                    .to_string()
            }
            SourceAttribution::ToolUsedNoCitations => {
                "Sources: Web search tool was utilized. No specific citations \
                 found in annotations."
                    .to_string()
            }
            SourceAttribution::FallbackTrainingData => {
                "Sources: (Fallback to standard chat) Information likely \
                 integrated from training data."
                    .to_string()
            }
            SourceAttribution::Cited(sources) => {
                let lines: Vec<String> = sources.iter().map(Source::render).collect();
                format!("Sources:\n{}", lines.join("\n"))
            }
        }
    }
}

/// Outcome status shared by draft and synthesis results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Success,
    Error,
}

/// Normalized output of one drafter invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftResult {
    /// Display name of the drafter that produced this result.
    pub drafter: String,
    pub status: RunStatus,
    /// The draft text, or an error description when `status` is `Error`.
    pub text: String,
    pub sources: SourceAttribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    /// Wall-clock time of the provider call.
    pub duration_ms: u64,
    /// Whether this draft came from the plain-completion fallback path.
    pub fallback: bool,
}

impl DraftResult {
    /// Creates a successful draft.
    pub fn success(
        drafter: impl Into<String>,
        text: impl Into<String>,
        sources: SourceAttribution,
        duration_ms: u64,
    ) -> Self {
        Self {
            drafter: drafter.into(),
            status: RunStatus::Success,
            text: text.into(),
            sources,
            error_detail: None,
            duration_ms,
            fallback: false,
        }
    }

    /// Creates a successful draft produced by the fallback path.
    ///
    /// Fallback drafts are labeled so downstream consumers know the
    /// sources are unreliable.
    pub fn fallback(drafter: impl Into<String>, text: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            drafter: drafter.into(),
            status: RunStatus::Success,
            text: text.into(),
            sources: SourceAttribution::FallbackTrainingData,
            error_detail: None,
            duration_ms,
            fallback: true,
        }
    }

    /// Creates a failed draft from a provider error.
    pub fn failure(drafter: impl Into<String>, error: impl Into<String>, duration_ms: u64) -> Self {
        let error = error.into();
        Self {
            drafter: drafter.into(),
            status: RunStatus::Error,
            text: format!("Error: {}", error),
            sources: SourceAttribution::NotApplicable,
            error_detail: Some(error),
            duration_ms,
            fallback: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }

    /// Tagged export block for the combined copy blob.
    pub fn export_block(&self) -> String {
        match self.status {
            RunStatus::Success => {
                let framing = if self.fallback {
                    format!("(CV from **{}** - Fallback)", self.drafter)
                } else {
                    format!("(CV from **{}**)", self.drafter)
                };
                format!(
                    "<answer_{name}>\n{framing}\n\n{text}\n\n{sources}\n</answer_{name}>\n\n",
                    name = self.drafter,
                    framing = framing,
                    text = self.text,
                    sources = self.sources.render(),
                )
            }
            RunStatus::Error => format!(
                "<answer_{name}>\n\nError generating CV with {name}: {detail}\n\n</answer_{name}>\n\n",
                name = self.drafter,
                detail = self.error_detail.as_deref().unwrap_or("unknown error"),
            ),
        }
    }
}

/// Output of one editor invocation against the synthesis prompt.
///
/// Editors are never merged further; each result stands alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// Display name of the editor that produced this result.
    pub editor: String,
    pub status: RunStatus,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    pub duration_ms: u64,
}

impl SynthesisResult {
    pub fn success(editor: impl Into<String>, text: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            editor: editor.into(),
            status: RunStatus::Success,
            text: text.into(),
            error_detail: None,
            duration_ms,
        }
    }

    pub fn failure(editor: impl Into<String>, error: impl Into<String>, duration_ms: u64) -> Self {
        let error = error.into();
        Self {
            editor: editor.into(),
            status: RunStatus::Error,
            text: format!("Error: {}", error),
            error_detail: Some(error),
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }

    /// Tagged export block, same format as draft exports.
    pub fn export_block(&self) -> String {
        format!(
            "<answer_{name}>\n(Synthesized CV by **{name}**)\n\n{text}\n</answer_{name}>\n\n",
            name = self.editor,
            text = self.text,
        )
    }
}
