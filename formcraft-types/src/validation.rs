//! Per-kind validation rules.
//!
//! Every rule is one arm of an exhaustive match over [`QuestionKind`], so adding a kind
//! cannot compile until it has a rule.

use url::Url;

use crate::{Question, QuestionId, QuestionKind, ResponseValue, Responses};

/// Why an answer was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("This question is required")]
    Required,

    #[error("Must be at most {max} characters")]
    TooLong { max: usize },

    #[error("Must be at least {min}")]
    BelowMin { min: f64 },

    #[error("Must be at most {max}")]
    AboveMax { max: f64 },

    #[error("Not a number")]
    NotANumber,

    #[error("Not a valid URL")]
    InvalidUrl,

    #[error("Not one of the options")]
    NotAnOption,

    #[error("Unexpected answer type")]
    WrongType,
}

impl Question {
    /// Check an answer against this question's rule.
    ///
    /// `None` means the respondent never touched the question.
    pub fn check(&self, value: Option<&ResponseValue>) -> Result<(), ValidationError> {
        match self.kind() {
            QuestionKind::ShortAnswer(short) => {
                let text = self.text_answer(value)?;
                if let (Some(max), Some(text)) = (short.max_length, text)
                    && text.chars().count() > max
                {
                    return Err(ValidationError::TooLong { max });
                }
                Ok(())
            }
            QuestionKind::LongAnswer(_) => self.text_answer(value).map(|_| ()),
            QuestionKind::Url(_) => match self.text_answer(value)? {
                Some(text) if !is_absolute_url(text) => Err(ValidationError::InvalidUrl),
                _ => Ok(()),
            },
            QuestionKind::SingleSelect(select) => match self.text_answer(value)? {
                Some(text) if !select.contains(text) => Err(ValidationError::NotAnOption),
                _ => Ok(()),
            },
            QuestionKind::Number(number) => {
                let n = match value {
                    Some(ResponseValue::Number(n)) => *n,
                    Some(ResponseValue::Text(text)) if !text.is_empty() => {
                        return Err(ValidationError::NotANumber);
                    }
                    _ if self.required() => return Err(ValidationError::Required),
                    _ => return Ok(()),
                };
                if !n.is_finite() {
                    return Err(ValidationError::NotANumber);
                }
                if let Some(min) = number.min
                    && n < min
                {
                    return Err(ValidationError::BelowMin { min });
                }
                if let Some(max) = number.max
                    && n > max
                {
                    return Err(ValidationError::AboveMax { max });
                }
                Ok(())
            }
        }
    }

    /// Check an answer, discarding the reason.
    pub fn validate(&self, value: Option<&ResponseValue>) -> bool {
        self.check(value).is_ok()
    }

    /// Shared required/empty handling for text-valued kinds.
    ///
    /// Returns `Ok(None)` for an acceptable empty answer and `Ok(Some(text))` when there
    /// is text left to check.
    fn text_answer<'a>(
        &self,
        value: Option<&'a ResponseValue>,
    ) -> Result<Option<&'a str>, ValidationError> {
        let text = match value {
            Some(ResponseValue::Text(text)) => text.as_str(),
            Some(ResponseValue::Number(_)) => return Err(ValidationError::WrongType),
            None => "",
        };
        if text.is_empty() {
            if self.required() {
                Err(ValidationError::Required)
            } else {
                Ok(None)
            }
        } else {
            Ok(Some(text))
        }
    }
}

/// An absolute URL with a scheme and an authority, e.g. `https://example.com`.
fn is_absolute_url(text: &str) -> bool {
    Url::parse(text).is_ok_and(|url| !url.cannot_be_a_base() && url.has_host())
}

/// One rejected answer.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFailure {
    pub id: QuestionId,
    pub prompt: String,
    pub error: ValidationError,
}

/// Every rejected answer of a submit attempt, in question order.
#[derive(Debug, Clone, Default, PartialEq, thiserror::Error)]
#[error("{} question(s) need attention", .failures.len())]
pub struct ValidationReport {
    pub failures: Vec<FieldFailure>,
}

impl ValidationReport {
    /// Check if every answer passed.
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Prompts of the offending questions, as shown to the respondent.
    pub fn prompts(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|failure| failure.prompt.as_str())
    }

    /// Ids of the offending questions.
    pub fn ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.failures.iter().map(|failure| failure.id)
    }

    /// The failure recorded for `id`, if any.
    pub fn error_for(&self, id: &QuestionId) -> Option<&ValidationError> {
        self.failures
            .iter()
            .find(|failure| failure.id == *id)
            .map(|failure| &failure.error)
    }
}

/// Validate every question against the response set.
pub fn validate_all<'a>(
    questions: impl IntoIterator<Item = &'a Question>,
    responses: &Responses,
) -> ValidationReport {
    let failures = questions
        .into_iter()
        .filter_map(|question| {
            question
                .check(responses.get(&question.id()))
                .err()
                .map(|error| FieldFailure {
                    id: question.id(),
                    prompt: question.prompt().to_string(),
                    error,
                })
        })
        .collect();
    ValidationReport { failures }
}
