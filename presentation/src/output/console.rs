//! Console output formatter for batch results

use crate::output::formatter::OutputFormatter;
use biodraft_domain::BatchRun;
use colored::Colorize;

/// Formats batch results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete batch result
    pub fn format(run: &BatchRun) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("CV Drafts & Synthesis"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Subject:".cyan().bold(),
            run.subject
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Drafters:".cyan().bold(),
            run.drafters.join(", ")
        ));
        if !run.editors.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Editors:".cyan().bold(),
                run.editors.join(", ")
            ));
        }
        output.push('\n');

        for notice in &run.skipped {
            output.push_str(&format!("{} {}\n", "!".yellow().bold(), notice));
        }

        output.push_str(&Self::section_header("Draft CVs"));
        for draft in &run.drafts {
            if draft.is_success() {
                let marker = if draft.fallback { " (Fallback)" } else { "" };
                output.push_str(&format!(
                    "\n{}\n{}\n\n{}\n{}\n",
                    format!("── {}{} ──", draft.drafter, marker).yellow().bold(),
                    draft.text,
                    draft.sources.render(),
                    format!("Time to generate: {:.2}s", draft.duration_ms as f64 / 1000.0)
                        .dimmed()
                ));
            } else {
                output.push_str(&format!(
                    "\n{}\nError generating CV with {}: {}\n",
                    format!("── {} ──", draft.drafter).red().bold(),
                    draft.drafter,
                    draft.error_detail.as_deref().unwrap_or("Unknown")
                ));
            }
        }

        if run.is_terminal_failure() {
            output.push_str(&format!(
                "\n{}\n",
                "No CVs were generated. Please check model selections and API keys."
                    .red()
                    .bold()
            ));
        } else if !run.synthesis_attempted() {
            output.push_str(&format!(
                "\n{}\n",
                "One or fewer CVs were successfully generated, so no synthesis was performed."
                    .yellow()
            ));
        }

        if run.synthesis_attempted() {
            output.push_str(&Self::section_header("Synthesized CV(s)"));
            for synthesis in &run.syntheses {
                if synthesis.is_success() {
                    output.push_str(&format!(
                        "\n{}\n{}\n\n{}\n",
                        format!("── Synthesized by {} ──", synthesis.editor)
                            .yellow()
                            .bold(),
                        synthesis.text,
                        format!(
                            "Time to synthesize: {:.2}s",
                            synthesis.duration_ms as f64 / 1000.0
                        )
                        .dimmed()
                    ));
                } else {
                    output.push_str(&format!(
                        "\n{}\nError during synthesis with {}: {}\n",
                        format!("── {} ──", synthesis.editor).red().bold(),
                        synthesis.editor,
                        synthesis.error_detail.as_deref().unwrap_or("Unknown")
                    ));
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(run: &BatchRun) -> String {
        serde_json::to_string_pretty(run).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format only the combined draft export blob (for piping/copying)
    pub fn format_drafts_only(run: &BatchRun) -> String {
        run.combined_export()
    }

    /// Format only the synthesized CV(s) as tagged export blocks
    pub fn format_synthesis_only(run: &BatchRun) -> String {
        if !run.synthesis_attempted() {
            return "No synthesis was performed.\n".to_string();
        }
        run.syntheses
            .iter()
            .filter(|s| s.is_success())
            .map(|s| s.export_block())
            .collect()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, run: &BatchRun) -> String {
        Self::format(run)
    }

    fn format_json(&self, run: &BatchRun) -> String {
        Self::format_json(run)
    }

    fn format_drafts_only(&self, run: &BatchRun) -> String {
        Self::format_drafts_only(run)
    }

    fn format_synthesis_only(&self, run: &BatchRun) -> String {
        Self::format_synthesis_only(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biodraft_domain::{
        DraftResult, SourceAttribution, Subject, SynthesisResult,
    };

    fn sample_run() -> BatchRun {
        BatchRun::new(
            Subject::new("Jane Doe"),
            vec!["Sonar".to_string(), "Gemini".to_string()],
            vec!["Graham".to_string()],
            vec![
                DraftResult::success("Sonar", "CV one", SourceAttribution::SearchNoCitations, 1200),
                DraftResult::success("Gemini", "CV two", SourceAttribution::NotApplicable, 800),
            ],
            vec![SynthesisResult::success("Graham", "Refreshed CV", 3000)],
            vec![],
            5100,
        )
    }

    #[test]
    fn test_full_format_mentions_every_section() {
        let text = ConsoleFormatter::format(&sample_run());
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Sonar"));
        assert!(text.contains("CV one"));
        assert!(text.contains("Synthesized by Graham"));
        assert!(text.contains("Refreshed CV"));
    }

    #[test]
    fn test_drafts_only_is_the_export_blob() {
        let run = sample_run();
        assert_eq!(
            ConsoleFormatter::format_drafts_only(&run),
            run.combined_export()
        );
    }

    #[test]
    fn test_synthesis_only_with_no_synthesis() {
        let mut run = sample_run();
        run.syntheses.clear();
        assert_eq!(
            ConsoleFormatter::format_synthesis_only(&run),
            "No synthesis was performed.\n"
        );
    }

    #[test]
    fn test_json_format_is_valid() {
        let json = ConsoleFormatter::format_json(&sample_run());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["drafts"].as_array().unwrap().len(), 2);
    }
}
