//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown drafter: {0}")]
    UnknownDrafter(String),

    #[error("Unknown editor: {0}")]
    UnknownEditor(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_drafter_display() {
        let error = DomainError::UnknownDrafter("Hal".to_string());
        assert_eq!(error.to_string(), "Unknown drafter: Hal");
    }

    #[test]
    fn test_unknown_editor_display() {
        let error = DomainError::UnknownEditor("Hal".to_string());
        assert_eq!(error.to_string(), "Unknown editor: Hal");
    }
}
