//! Core types for formcraft.
//!
//! This crate provides the question model, independent of any editor or UI:
//! - `Question` and `QuestionKind` - The five question kinds and their configuration
//! - `Question::validate` / `validate_all` - Per-kind answer validation
//! - `Responses` and `ResponseValue` - Answers keyed by `QuestionId`
//! - `completion_percentage` - Live completion feedback
//! - `QuestionRecord` and `FormRecord` - The flat serialized shape

mod question_id;
pub use question_id::{FormId, IdSource, QuestionId, SequentialIds, UuidSource};

mod response_value;
pub use response_value::ResponseValue;

mod responses;
pub use responses::{ResponseError, Responses};

mod question;
pub use question::{
    DEFAULT_OPTION, LongAnswerQuestion, NumberQuestion, Question, QuestionKind, QuestionType,
    ShortAnswerQuestion, SingleSelectQuestion, UrlQuestion,
};

mod validation;
pub use validation::{FieldFailure, ValidationError, ValidationReport, validate_all};

mod completion;
pub use completion::{CompletionBasis, completion_percentage};

mod form_definition;
pub use form_definition::FormDefinition;

mod record;
pub use record::{FormRecord, QuestionRecord, RecordKind};

mod error;
pub use error::{FormError, RecordError, ReorderError};
