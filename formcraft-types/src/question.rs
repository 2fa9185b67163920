use std::fmt;

use crate::{IdSource, QuestionId};

/// Placeholder option given to a freshly created SingleSelect question.
pub const DEFAULT_OPTION: &str = "Option 1";

/// A single question in a form.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Identifier, fixed for the lifetime of this instance.
    id: QuestionId,

    /// The prompt text shown to the respondent.
    prompt: String,

    /// Whether an answer must be given.
    required: bool,

    /// Optional caption shown under the prompt.
    help_text: Option<String>,

    /// The kind of question and its kind-specific configuration.
    kind: QuestionKind,
}

impl Question {
    /// Create a new optional question without help text.
    pub fn new(id: QuestionId, prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            required: false,
            help_text: None,
            kind,
        }
    }

    /// Create a question with an id drawn from `ids`.
    ///
    /// Never fails: inconsistent configuration such as `min > max` is accepted here and
    /// only shows up when answers are validated.
    pub fn create(
        ids: &mut dyn IdSource,
        kind: QuestionKind,
        prompt: impl Into<String>,
        required: bool,
    ) -> Self {
        Self::new(ids.question_id(), prompt, kind).with_required(required)
    }

    /// Mark the question as required (or not).
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Attach help text.
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    /// Get the question id.
    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// Get the prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Replace the prompt text.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Whether an answer is mandatory.
    pub fn required(&self) -> bool {
        self.required
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Get the help text, if any.
    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    /// Replace the help text. An empty string clears it.
    pub fn set_help_text(&mut self, help_text: Option<String>) {
        self.help_text = help_text.filter(|text| !text.is_empty());
    }

    /// Get the question kind.
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Get a mutable reference to the question kind.
    pub fn kind_mut(&mut self) -> &mut QuestionKind {
        &mut self.kind
    }

    /// Get the field-less type tag.
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    /// Build a default question of `question_type` that keeps this question's prompt,
    /// required flag and help text, under the given id.
    pub fn retyped(&self, id: QuestionId, question_type: QuestionType) -> Self {
        Self {
            id,
            prompt: self.prompt.clone(),
            required: self.required,
            help_text: self.help_text.clone(),
            kind: QuestionKind::default_for(question_type),
        }
    }
}

/// Field-less tag naming one of the five question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    ShortAnswer,
    LongAnswer,
    SingleSelect,
    Number,
    Url,
}

impl QuestionType {
    /// Every type, in the order the type picker lists them.
    pub const ALL: [QuestionType; 5] = [
        Self::ShortAnswer,
        Self::LongAnswer,
        Self::SingleSelect,
        Self::Number,
        Self::Url,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShortAnswer => "Short Answer",
            Self::LongAnswer => "Long Answer",
            Self::SingleSelect => "Single Select",
            Self::Number => "Number",
            Self::Url => "URL",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The kind of question, determining input type and validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Single-line text input.
    ShortAnswer(ShortAnswerQuestion),

    /// Multi-line text input.
    LongAnswer(LongAnswerQuestion),

    /// Pick exactly one of a list of options.
    SingleSelect(SingleSelectQuestion),

    /// Numeric input with optional min/max bounds.
    Number(NumberQuestion),

    /// An absolute URL.
    Url(UrlQuestion),
}

impl QuestionKind {
    /// Default configuration for a freshly appended question of the given type.
    pub fn default_for(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::ShortAnswer => Self::ShortAnswer(ShortAnswerQuestion::new()),
            QuestionType::LongAnswer => Self::LongAnswer(LongAnswerQuestion::new()),
            QuestionType::SingleSelect => {
                Self::SingleSelect(SingleSelectQuestion::new(vec![DEFAULT_OPTION.to_string()]))
            }
            QuestionType::Number => Self::Number(NumberQuestion::new()),
            QuestionType::Url => Self::Url(UrlQuestion),
        }
    }

    /// Get the field-less type tag.
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::ShortAnswer(_) => QuestionType::ShortAnswer,
            Self::LongAnswer(_) => QuestionType::LongAnswer,
            Self::SingleSelect(_) => QuestionType::SingleSelect,
            Self::Number(_) => QuestionType::Number,
            Self::Url(_) => QuestionType::Url,
        }
    }

    /// Check if answers to this kind are free text.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::ShortAnswer(_) | Self::LongAnswer(_) | Self::Url(_))
    }
}

/// Configuration for a short text question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortAnswerQuestion {
    /// Optional maximum length, in characters.
    pub max_length: Option<usize>,
}

impl ShortAnswerQuestion {
    /// Create a new short answer question without a length limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a length limit.
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
        }
    }
}

/// Configuration for a long text question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongAnswerQuestion;

impl LongAnswerQuestion {
    pub fn new() -> Self {
        Self
    }
}

/// Configuration for a single-select question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleSelectQuestion {
    /// The options, in display order. Not required to be non-empty.
    pub options: Vec<String>,
}

impl SingleSelectQuestion {
    /// Create with the given options.
    pub fn new(options: Vec<String>) -> Self {
        Self { options }
    }

    /// Append an option.
    pub fn add_option(&mut self, option: impl Into<String>) {
        self.options.push(option.into());
    }

    /// Remove the option at `index`, if it exists.
    pub fn remove_option(&mut self, index: usize) -> Option<String> {
        (index < self.options.len()).then(|| self.options.remove(index))
    }

    /// Check if `value` is one of the options.
    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|option| option == value)
    }
}

/// Configuration for a number question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberQuestion {
    /// Optional minimum value (inclusive).
    pub min: Option<f64>,

    /// Optional maximum value (inclusive).
    pub max: Option<f64>,
}

impl NumberQuestion {
    /// Create a new unbounded number question.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with bounds.
    pub fn with_bounds(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
}

/// Configuration for a URL question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlQuestion;
