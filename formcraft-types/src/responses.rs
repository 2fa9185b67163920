use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{QuestionId, ResponseValue};

/// Error type for typed response access.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("No answer for question {0}")]
    Unanswered(QuestionId),

    #[error("Type mismatch for question {id}: expected {expected}, got {actual}")]
    TypeMismatch {
        id: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Answers collected from a respondent, keyed by question id.
///
/// A key is present only once the respondent touched that question. A missing key means
/// "unanswered", which is not the same as an empty string. Iteration and serialization
/// follow insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Responses {
    values: IndexMap<QuestionId, ResponseValue>,
}

impl Responses {
    /// Create a new empty response set.
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Record an answer, replacing any previous one.
    pub fn insert(&mut self, id: QuestionId, value: impl Into<ResponseValue>) {
        self.values.insert(id, value.into());
    }

    /// Get the answer for a question.
    pub fn get(&self, id: &QuestionId) -> Option<&ResponseValue> {
        self.values.get(id)
    }

    /// Check whether the question was touched at all.
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.values.contains_key(id)
    }

    /// Forget the answer for a question.
    pub fn remove(&mut self, id: &QuestionId) -> Option<ResponseValue> {
        self.values.shift_remove(id)
    }

    /// Get an iterator over all id-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &ResponseValue)> {
        self.values.iter()
    }

    /// Get the number of touched questions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing was answered yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop answers whose question no longer exists.
    pub fn retain_questions<'a>(&mut self, ids: impl IntoIterator<Item = &'a QuestionId>) {
        let keep: std::collections::HashSet<&QuestionId> = ids.into_iter().collect();
        self.values.retain(|id, _| keep.contains(id));
    }

    /// Get a text answer.
    pub fn get_text(&self, id: &QuestionId) -> Result<&str, ResponseError> {
        match self.get(id) {
            Some(ResponseValue::Text(s)) => Ok(s),
            Some(other) => Err(ResponseError::TypeMismatch {
                id: *id,
                expected: "Text",
                actual: other.type_name(),
            }),
            None => Err(ResponseError::Unanswered(*id)),
        }
    }

    /// Get a numeric answer.
    pub fn get_number(&self, id: &QuestionId) -> Result<f64, ResponseError> {
        match self.get(id) {
            Some(ResponseValue::Number(n)) => Ok(*n),
            Some(other) => Err(ResponseError::TypeMismatch {
                id: *id,
                expected: "Number",
                actual: other.type_name(),
            }),
            None => Err(ResponseError::Unanswered(*id)),
        }
    }

    /// Copy of the answers to `ids`, in that order. Answers to other questions are dropped.
    pub fn ordered_by<'a>(&self, ids: impl IntoIterator<Item = &'a QuestionId>) -> Self {
        ids.into_iter()
            .filter_map(|id| self.values.get_key_value(id))
            .map(|(id, value)| (*id, value.clone()))
            .collect()
    }

    /// Check if the question has a non-blank answer.
    ///
    /// Missing keys and whitespace-only text are both "no value"; any number counts.
    pub fn has_value(&self, id: &QuestionId) -> bool {
        self.get(id).is_some_and(|value| !value.is_blank())
    }
}

impl IntoIterator for Responses {
    type Item = (QuestionId, ResponseValue);
    type IntoIter = indexmap::map::IntoIter<QuestionId, ResponseValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl FromIterator<(QuestionId, ResponseValue)> for Responses {
    fn from_iter<I: IntoIterator<Item = (QuestionId, ResponseValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Responses {
    type Item = (&'a QuestionId, &'a ResponseValue);
    type IntoIter = indexmap::map::Iter<'a, QuestionId, ResponseValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IdSource, SequentialIds};

    #[test]
    fn insert_and_get() {
        let mut ids = SequentialIds::new();
        let (name, age) = (ids.question_id(), ids.question_id());

        let mut responses = Responses::new();
        responses.insert(name, "Alice");
        responses.insert(age, 30);

        assert_eq!(responses.get_text(&name).unwrap(), "Alice");
        assert_eq!(responses.get_number(&age).unwrap(), 30.0);
    }

    #[test]
    fn absent_is_not_empty_string() {
        let mut ids = SequentialIds::new();
        let (touched, untouched) = (ids.question_id(), ids.question_id());

        let mut responses = Responses::new();
        responses.insert(touched, "");

        assert!(responses.contains(&touched));
        assert!(!responses.has_value(&touched));
        assert!(!responses.contains(&untouched));
        assert!(matches!(
            responses.get_text(&untouched),
            Err(ResponseError::Unanswered(_))
        ));
    }

    #[test]
    fn type_mismatch_error() {
        let id = SequentialIds::new().question_id();
        let mut responses = Responses::new();
        responses.insert(id, 3);

        let result = responses.get_text(&id);
        assert!(matches!(result, Err(ResponseError::TypeMismatch { .. })));
    }

    #[test]
    fn retain_questions_drops_orphans() {
        let mut ids = SequentialIds::new();
        let (kept, gone) = (ids.question_id(), ids.question_id());
        let mut responses = Responses::new();
        responses.insert(kept, "a");
        responses.insert(gone, "b");

        responses.retain_questions([&kept]);
        assert_eq!(responses.len(), 1);
        assert!(responses.contains(&kept));
    }

    #[test]
    fn ordered_by_follows_the_given_ids() {
        let mut ids = SequentialIds::new();
        let (first, second, orphan) = (ids.question_id(), ids.question_id(), ids.question_id());
        let mut responses = Responses::new();
        responses.insert(orphan, "x");
        responses.insert(second, 2);
        responses.insert(first, "one");

        let ordered = responses.ordered_by([&first, &second]);
        let keys: Vec<_> = ordered.iter().map(|(id, _)| *id).collect();
        assert_eq!(keys, [first, second]);

        let json = serde_json::to_string(&ordered).unwrap();
        assert_eq!(json, format!(r#"{{"{first}":"one","{second}":2.0}}"#));
    }
}
