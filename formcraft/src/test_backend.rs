//! Test backend for filling in forms without user interaction.
//!
//! `TestBackend` answers questions from a script, addressed either by question id or by
//! prompt text. This is useful for testing forms end to end.
//!
//! # Example
//!
//! ```rust
//! use formcraft::{FormEditor, QuestionPatch, QuestionType, TestBackend, collect_submission};
//!
//! let mut editor = FormEditor::new();
//! let port = editor.append(QuestionType::Number);
//! editor.update_by_id(&port, QuestionPatch::new().prompt("Port:").required(true));
//!
//! let submission =
//!     collect_submission(&editor.form(), &TestBackend::new().with_answer_to("Port:", 8080))
//!         .unwrap();
//!
//! assert_eq!(submission.responses.get_number(&port).unwrap(), 8080.0);
//! ```

use std::collections::HashMap;

use formcraft_types::{FormDefinition, QuestionId, ResponseValue, Responses, ValidationError};

use crate::{RespondentBackend, Validator};

/// A backend that returns scripted answers.
///
/// Questions without a scripted answer stay untouched.
#[derive(Debug, Clone, Default)]
pub struct TestBackend {
    by_id: HashMap<QuestionId, ResponseValue>,
    by_prompt: HashMap<String, ResponseValue>,
}

/// Error type for TestBackend.
#[derive(Debug, thiserror::Error)]
pub enum TestBackendError {
    #[error("Validation failed for '{prompt}': {error}")]
    ValidationFailed {
        prompt: String,
        error: ValidationError,
    },
}

impl TestBackend {
    /// Create a backend that answers nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the question with this id.
    pub fn with_answer(mut self, id: QuestionId, value: impl Into<ResponseValue>) -> Self {
        self.by_id.insert(id, value.into());
        self
    }

    /// Answer every question whose prompt is exactly `prompt`.
    pub fn with_answer_to(
        mut self,
        prompt: impl Into<String>,
        value: impl Into<ResponseValue>,
    ) -> Self {
        self.by_prompt.insert(prompt.into(), value.into());
        self
    }
}

impl RespondentBackend for TestBackend {
    type Error = TestBackendError;

    fn collect(
        &self,
        form: &FormDefinition,
        validate: Validator<'_>,
    ) -> Result<Responses, Self::Error> {
        let mut responses = Responses::new();

        for question in form.questions() {
            let answer = self
                .by_id
                .get(&question.id())
                .or_else(|| self.by_prompt.get(question.prompt()));

            // Validate before inserting
            if let Err(error) = validate(question, answer) {
                return Err(TestBackendError::ValidationFailed {
                    prompt: question.prompt().to_string(),
                    error,
                });
            }
            if let Some(answer) = answer {
                responses.insert(question.id(), answer.clone());
            }
        }

        Ok(responses)
    }
}
