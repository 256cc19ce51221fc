//! Batch run aggregate
//!
//! One [`BatchRun`] holds everything a single user-triggered generation
//! produced. It exists only for the duration of that run and is never
//! persisted.

use crate::core::subject::Subject;
use crate::draft::{DraftResult, SynthesisResult};
use serde::{Deserialize, Serialize};

/// A drafter or editor that was selected but skipped before invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipNotice {
    pub provider: String,
    pub reason: String,
}

impl SkipNotice {
    /// Notice for a provider whose backing client is not configured.
    pub fn unconfigured(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            reason: "client not configured".to_string(),
        }
    }
}

impl std::fmt::Display for SkipNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} is unavailable ({}). Skipping.",
            self.provider, self.reason
        )
    }
}

/// Complete result of one generation batch.
///
/// Drafts appear in drafter selection order, syntheses in editor
/// selection order; skipped providers are recorded separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRun {
    pub subject: Subject,
    /// Display names of the selected drafters, in selection order.
    pub drafters: Vec<String>,
    /// Display names of the selected editors, in selection order.
    pub editors: Vec<String>,
    pub drafts: Vec<DraftResult>,
    pub syntheses: Vec<SynthesisResult>,
    pub skipped: Vec<SkipNotice>,
    pub total_duration_ms: u64,
}

impl BatchRun {
    pub fn new(
        subject: Subject,
        drafters: Vec<String>,
        editors: Vec<String>,
        drafts: Vec<DraftResult>,
        syntheses: Vec<SynthesisResult>,
        skipped: Vec<SkipNotice>,
        total_duration_ms: u64,
    ) -> Self {
        Self {
            subject,
            drafters,
            editors,
            drafts,
            syntheses,
            skipped,
            total_duration_ms,
        }
    }

    /// Iterator over the drafts that completed successfully.
    pub fn successful_drafts(&self) -> impl Iterator<Item = &DraftResult> {
        self.drafts.iter().filter(|d| d.is_success())
    }

    /// Iterator over the drafts that errored.
    pub fn failed_drafts(&self) -> impl Iterator<Item = &DraftResult> {
        self.drafts.iter().filter(|d| !d.is_success())
    }

    /// Whether synthesis ran for this batch.
    pub fn synthesis_attempted(&self) -> bool {
        !self.syntheses.is_empty()
    }

    /// True when not a single draft succeeded: the whole batch is a
    /// terminal informational failure.
    pub fn is_terminal_failure(&self) -> bool {
        self.successful_drafts().next().is_none()
    }

    /// All drafts flattened into one copyable blob of tagged blocks,
    /// error entries included, in selection order.
    pub fn combined_export(&self) -> String {
        self.drafts.iter().map(DraftResult::export_block).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::SourceAttribution;

    fn run_with(drafts: Vec<DraftResult>) -> BatchRun {
        let drafters = drafts.iter().map(|d| d.drafter.clone()).collect();
        BatchRun::new(
            Subject::new("Jane Doe"),
            drafters,
            vec![],
            drafts,
            vec![],
            vec![],
            1000,
        )
    }

    #[test]
    fn test_successful_and_failed_split() {
        let run = run_with(vec![
            DraftResult::success("Sonar", "cv", SourceAttribution::SearchNoCitations, 10),
            DraftResult::failure("Gemini", "boom", 5),
        ]);
        assert_eq!(run.successful_drafts().count(), 1);
        assert_eq!(run.failed_drafts().count(), 1);
        assert!(!run.is_terminal_failure());
    }

    #[test]
    fn test_terminal_failure_when_nothing_succeeded() {
        let run = run_with(vec![
            DraftResult::failure("Sonar", "boom", 5),
            DraftResult::failure("Gemini", "bust", 5),
        ]);
        assert!(run.is_terminal_failure());
    }

    #[test]
    fn test_combined_export_preserves_selection_order() {
        let run = run_with(vec![
            DraftResult::success("Sonar", "first", SourceAttribution::SearchNoCitations, 10),
            DraftResult::failure("Gemini", "boom", 5),
            DraftResult::success("Claude", "third", SourceAttribution::NotApplicable, 10),
        ]);
        let export = run.combined_export();
        let sonar = export.find("<answer_Sonar>").unwrap();
        let gemini = export.find("<answer_Gemini>").unwrap();
        let claude = export.find("<answer_Claude>").unwrap();
        assert!(sonar < gemini && gemini < claude);
        assert!(export.contains("Error generating CV with Gemini"));
    }

    #[test]
    fn test_json_serialization_roundtrip() {
        let run = run_with(vec![DraftResult::success(
            "Sonar",
            "cv",
            SourceAttribution::SearchNoCitations,
            10,
        )]);
        let json = serde_json::to_string(&run).unwrap();
        let back: BatchRun = serde_json::from_str(&json).unwrap();
        assert_eq!(back.drafts.len(), 1);
        assert_eq!(back.subject.name(), "Jane Doe");
    }
}
