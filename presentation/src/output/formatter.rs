//! Output formatter trait

use biodraft_domain::BatchRun;

/// Trait for formatting batch results
pub trait OutputFormatter {
    /// Format the complete batch result
    fn format(&self, run: &BatchRun) -> String;

    /// Format as JSON
    fn format_json(&self, run: &BatchRun) -> String;

    /// Format only the combined draft export blob
    fn format_drafts_only(&self, run: &BatchRun) -> String;

    /// Format only the synthesized CV(s)
    fn format_synthesis_only(&self, run: &BatchRun) -> String;
}
