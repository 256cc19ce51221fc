//! Prompt construction
//!
//! Both builders are pure: no clock, no I/O, byte-identical output for
//! identical inputs.

pub mod biography;
pub mod synthesis;

pub use biography::BiographyPrompt;
pub use synthesis::{ConflictNotePolicy, SynthesisPromptBuilder};
