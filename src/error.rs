//! Error types.
//!
//! `CodeRejection` is what the value store reports when an edit is refused.
//! The widget swallows it (the code simply stays as it was), but keeping it
//! typed lets hosts and tests see why an edit did not land.

use thiserror::Error;

/// Why an edit to the code was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeRejection {
    /// A character outside the configured input class.
    #[error("character {ch:?} at position {position} is not allowed")]
    InvalidCharacter { ch: char, position: usize },

    /// The widget is disabled.
    #[error("input is disabled")]
    Disabled,
}

/// Errors from the presentation helpers (layout and terminal rendering).
#[derive(Debug, Error)]
pub enum OtpError {
    #[error("slot layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = OtpError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        let err = CodeRejection::InvalidCharacter { ch: 'a', position: 2 };
        assert_eq!(err.to_string(), "character 'a' at position 2 is not allowed");
        assert_eq!(CodeRejection::Disabled.to_string(), "input is disabled");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::other("boom");
        let err: OtpError = io.into();
        assert!(matches!(err, OtpError::Io(_)));
        assert!(err.to_string().starts_with("terminal I/O failed"));
    }
}
