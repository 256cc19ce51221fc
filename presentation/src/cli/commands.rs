//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for batch results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output: drafts, sources, syntheses
    Full,
    /// Only the combined draft export blob
    Drafts,
    /// Only the synthesized CV(s)
    Synthesis,
    /// JSON output
    Json,
}

/// Conflict-note policy for the synthesis prompt
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConflictNotes {
    /// Notes name the drafters on each side of a disagreement
    Named,
    /// Notes use generic phrasing without naming any drafter
    Generic,
}

/// CLI arguments for biodraft
#[derive(Parser, Debug)]
#[command(name = "biodraft")]
#[command(author, version, about = "Draft and reconcile CVs with a pool of LLM drafters")]
#[command(long_about = r#"
biodraft asks several LLM providers ("drafters") to each write a CV for
the same person, then has reasoning models ("editors") reconcile the
drafts into a single document with conflicts flagged inline.

Drafters: Sonar, Deepseek, Gemini, Optima, Claude (select 1-5)
Editors:  Oscar, Graham (required when more than one drafter runs)

Providers whose API keys are missing are skipped with a notice.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./biodraft.toml     Project-level config
3. ~/.config/biodraft/config.toml   Global config

Example:
  biodraft "Dr. Jane Doe, CEO of Tech Innovations Inc."
  biodraft -d Sonar -d Gemini -e Graham "John Roe"
  biodraft -d Claude -o drafts "Jane Doe"
"#)]
pub struct Cli {
    /// Full name of the individual to draft a CV for
    pub subject: Option<String>,

    /// Drafters to deploy, in order (default: all configured; max 5)
    #[arg(short, long, value_name = "DRAFTER")]
    pub drafter: Vec<String>,

    /// Editors to deploy for synthesis (default: Graham, else Oscar)
    #[arg(short, long, value_name = "EDITOR")]
    pub editor: Vec<String>,

    /// How synthesis conflict notes refer to drafters
    #[arg(long, value_enum)]
    pub conflict_notes: Option<ConflictNotes>,

    /// Reference date for age calculation (e.g. "May 2025";
    /// default: current month)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["biodraft", "Jane Doe"]).unwrap();
        assert_eq!(cli.subject.as_deref(), Some("Jane Doe"));
        assert!(cli.drafter.is_empty());
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parse_selection() {
        let cli = Cli::try_parse_from([
            "biodraft",
            "-d",
            "Sonar",
            "-d",
            "Gemini",
            "-e",
            "Graham",
            "--conflict-notes",
            "generic",
            "John Roe",
        ])
        .unwrap();
        assert_eq!(cli.drafter, vec!["Sonar", "Gemini"]);
        assert_eq!(cli.editor, vec!["Graham"]);
        assert!(matches!(cli.conflict_notes, Some(ConflictNotes::Generic)));
    }

    #[test]
    fn test_show_config_needs_no_subject() {
        let cli = Cli::try_parse_from(["biodraft", "--show-config"]).unwrap();
        assert!(cli.subject.is_none());
        assert!(cli.show_config);
    }
}
