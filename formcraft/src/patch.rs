use formcraft_types::{Question, QuestionKind};

/// A partial update to a question.
///
/// Only fields that are `Some` are written. Fields that do not apply to the question's
/// kind (e.g. `options` on a Number question) are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionPatch {
    pub prompt: Option<String>,
    pub required: Option<bool>,
    /// `Some(None)` clears the help text.
    pub help_text: Option<Option<String>>,
    pub options: Option<Vec<String>>,
    pub min: Option<Option<f64>>,
    pub max: Option<Option<f64>>,
    pub max_length: Option<Option<usize>>,
}

impl QuestionPatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn help_text(mut self, help_text: Option<String>) -> Self {
        self.help_text = Some(help_text);
        self
    }

    pub fn options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    /// Set both number bounds.
    pub fn bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Check if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Write the present fields into `question`.
    pub fn apply(&self, question: &mut Question) {
        if let Some(prompt) = &self.prompt {
            question.set_prompt(prompt.clone());
        }
        if let Some(required) = self.required {
            question.set_required(required);
        }
        if let Some(help_text) = &self.help_text {
            question.set_help_text(help_text.clone());
        }

        match question.kind_mut() {
            QuestionKind::SingleSelect(select) => {
                if let Some(options) = &self.options {
                    select.options = options.clone();
                }
            }
            QuestionKind::Number(number) => {
                if let Some(min) = self.min {
                    number.min = min;
                }
                if let Some(max) = self.max {
                    number.max = max;
                }
            }
            QuestionKind::ShortAnswer(short) => {
                if let Some(max_length) = self.max_length {
                    short.max_length = max_length;
                }
            }
            QuestionKind::LongAnswer(_) | QuestionKind::Url(_) => {}
        }
    }
}
