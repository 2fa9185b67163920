use crate::{FormId, Question, QuestionId};

/// A form: metadata plus questions in respondent order.
///
/// This is a plain value. The editor in the `formcraft` crate owns the live copy and
/// hands out `FormDefinition` snapshots for previewing and serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDefinition {
    pub id: FormId,

    /// Title shown above the form.
    pub title: String,

    /// Optional description shown under the title. Empty means none.
    pub description: String,

    /// All questions, in display order.
    pub questions: Vec<Question>,

    /// Whether the author published the form.
    pub published: bool,
}

impl FormDefinition {
    /// Create an empty, unpublished form.
    pub fn new(id: FormId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            questions: Vec::new(),
            published: false,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the questions.
    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    /// Get the questions.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Look up a question by id.
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id() == *id)
    }

    /// Mark the form as published.
    pub fn publish(&mut self) {
        self.published = true;
    }

    /// Check if the form has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }
}
