use crate::{QuestionId, ValidationReport};

/// Error type for form operations.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The respondent or author cancelled (Esc, closed terminal, etc.)
    #[error("Form cancelled by user")]
    Cancelled,

    /// Submitted answers did not pass validation.
    #[error(transparent)]
    Invalid(#[from] ValidationReport),

    /// Submit was requested while not previewing.
    #[error("Nothing to submit outside the preview")]
    NotPreviewing,

    #[error(transparent)]
    Reorder(#[from] ReorderError),

    #[error(transparent)]
    Record(#[from] RecordError),

    /// Backend-specific failure (I/O, UI framework crash, etc.)
    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl FormError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }

    /// Check if this error represents user cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// A proposed question order that is not a permutation of the current one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error("Reorder has {actual} ids, form has {expected} questions")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Question {0} appears more than once in the new order")]
    DuplicateId(QuestionId),

    #[error("Question {0} is not part of the form")]
    UnknownId(QuestionId),
}

/// A serialized record that cannot be turned back into typed questions.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Question {0} has an unknown kind")]
    UnknownKind(QuestionId),

    #[error("Question id {0} is used more than once")]
    DuplicateId(QuestionId),

    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_wrap_anything() {
        let err = FormError::backend(std::io::Error::other("terminal gone"));
        assert_eq!(err.to_string(), "Backend error: terminal gone");
        assert!(!err.is_cancelled());
        assert!(FormError::Cancelled.is_cancelled());
    }

    #[test]
    fn reorder_errors_are_transparent() {
        let err = FormError::from(ReorderError::LengthMismatch {
            expected: 2,
            actual: 3,
        });
        assert_eq!(err.to_string(), "Reorder has 3 ids, form has 2 questions");
    }
}
