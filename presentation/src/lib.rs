//! Presentation layer for biodraft
//!
//! CLI definition, console output formatting, and progress display.

pub mod cli;
pub mod output;
pub mod progress;

pub use cli::{Cli, ConflictNotes, OutputFormat};
pub use output::{ConsoleFormatter, OutputFormatter};
pub use progress::{ProgressReporter, SimpleProgress};
