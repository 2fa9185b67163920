//! The flat, serializable shape of questions and forms.
//!
//! Kind-specific configuration is flattened into optional fields: `options` only for
//! SingleSelect, `min`/`max` only for Number (and only when set), `maxLength` only for a
//! limited ShortAnswer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    FormDefinition, FormId, LongAnswerQuestion, NumberQuestion, Question, QuestionId,
    QuestionKind, QuestionType, RecordError, ResponseValue, ShortAnswerQuestion,
    SingleSelectQuestion, UrlQuestion,
};

/// Kind tag as it appears on the wire.
///
/// The short tags used by older records (`short`, `long`, `single`) are accepted as
/// aliases. Anything else becomes `Unknown`, which can be stored but never validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    #[serde(alias = "short")]
    ShortAnswer,
    #[serde(alias = "long")]
    LongAnswer,
    #[serde(alias = "single")]
    SingleSelect,
    Number,
    Url,
    #[serde(other)]
    Unknown,
}

impl From<QuestionType> for RecordKind {
    fn from(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::ShortAnswer => Self::ShortAnswer,
            QuestionType::LongAnswer => Self::LongAnswer,
            QuestionType::SingleSelect => Self::SingleSelect,
            QuestionType::Number => Self::Number,
            QuestionType::Url => Self::Url,
        }
    }
}

/// One question, flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: QuestionId,

    #[serde(alias = "type")]
    pub kind: RecordKind,

    #[serde(alias = "question", default)]
    pub prompt_text: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl QuestionRecord {
    /// Rebuild the typed question this record describes.
    pub fn to_question(&self) -> Result<Question, RecordError> {
        let kind = match self.kind {
            RecordKind::ShortAnswer => QuestionKind::ShortAnswer(ShortAnswerQuestion {
                max_length: self.max_length,
            }),
            RecordKind::LongAnswer => QuestionKind::LongAnswer(LongAnswerQuestion),
            RecordKind::SingleSelect => QuestionKind::SingleSelect(SingleSelectQuestion::new(
                self.options.clone().unwrap_or_default(),
            )),
            RecordKind::Number => {
                QuestionKind::Number(NumberQuestion::with_bounds(self.min, self.max))
            }
            RecordKind::Url => QuestionKind::Url(UrlQuestion),
            RecordKind::Unknown => return Err(RecordError::UnknownKind(self.id)),
        };

        let mut question =
            Question::new(self.id, self.prompt_text.clone(), kind).with_required(self.required);
        question.set_help_text(self.help_text.clone());
        Ok(question)
    }

    /// Validate an answer against the rule for this record's kind.
    ///
    /// Records of an unknown kind reject every answer.
    pub fn validate(&self, value: Option<&ResponseValue>) -> bool {
        self.to_question()
            .is_ok_and(|question| question.validate(value))
    }
}

impl From<&Question> for QuestionRecord {
    fn from(question: &Question) -> Self {
        let mut record = Self {
            id: question.id(),
            kind: question.question_type().into(),
            prompt_text: question.prompt().to_string(),
            required: question.required(),
            help_text: question.help_text().map(str::to_string),
            options: None,
            min: None,
            max: None,
            max_length: None,
        };
        match question.kind() {
            QuestionKind::ShortAnswer(short) => record.max_length = short.max_length,
            QuestionKind::SingleSelect(select) => record.options = Some(select.options.clone()),
            QuestionKind::Number(number) => {
                record.min = number.min;
                record.max = number.max;
            }
            QuestionKind::LongAnswer(_) | QuestionKind::Url(_) => {}
        }
        record
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = RecordError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        record.to_question()
    }
}

/// A whole form, flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    pub id: FormId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub questions: Vec<QuestionRecord>,

    #[serde(default)]
    pub published: bool,
}

impl FormRecord {
    /// Parse a form record from JSON.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&FormDefinition> for FormRecord {
    fn from(form: &FormDefinition) -> Self {
        Self {
            id: form.id,
            title: form.title.clone(),
            description: form.description.clone(),
            questions: form.questions.iter().map(QuestionRecord::from).collect(),
            published: form.published,
        }
    }
}

impl TryFrom<FormRecord> for FormDefinition {
    type Error = RecordError;

    fn try_from(record: FormRecord) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        let mut questions = Vec::with_capacity(record.questions.len());
        for question in record.questions {
            if !seen.insert(question.id) {
                return Err(RecordError::DuplicateId(question.id));
            }
            questions.push(Question::try_from(question)?);
        }
        Ok(Self {
            id: record.id,
            title: record.title,
            description: record.description,
            questions,
            published: record.published,
        })
    }
}
