//! The live, mutable form owned by one editing session.

use std::{collections::HashSet, fmt};

use formcraft_types::{
    FormDefinition, FormId, FormRecord, IdSource, Question, QuestionId, QuestionKind,
    QuestionType, ReorderError, UuidSource,
};
use indexmap::IndexMap;

use crate::{QuestionPatch, TypeChangePolicy};

/// Title given to a new form.
pub const UNTITLED: &str = "Untitled form";

/// Owns the questions of one form and applies id-addressed edits to them.
///
/// Questions live in an id-keyed map that keeps insertion order, which is also the order
/// respondents see. Operations on ids that are not in the form are silent no-ops; they
/// are logged because under a single editor they point at a bug elsewhere.
pub struct FormEditor {
    id: FormId,
    title: String,
    description: String,
    published: bool,
    questions: IndexMap<QuestionId, Question>,
    ids: Box<dyn IdSource>,
    type_change: TypeChangePolicy,
}

impl fmt::Debug for FormEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormEditor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("questions", &self.questions.len())
            .field("type_change", &self.type_change)
            .finish_non_exhaustive()
    }
}

impl Default for FormEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormEditor {
    /// Create an empty form with random ids.
    pub fn new() -> Self {
        Self::with_id_source(Box::new(UuidSource))
    }

    /// Create an empty form drawing every id from `ids`.
    pub fn with_id_source(mut ids: Box<dyn IdSource>) -> Self {
        Self {
            id: ids.form_id(),
            title: UNTITLED.to_string(),
            description: String::new(),
            published: false,
            questions: IndexMap::new(),
            ids,
            type_change: TypeChangePolicy::default(),
        }
    }

    /// Continue editing an existing form.
    ///
    /// `FormDefinition` carries no uniqueness guarantee, so a repeated id keeps only its
    /// first question.
    pub fn from_definition(form: FormDefinition, ids: Box<dyn IdSource>) -> Self {
        let mut questions = IndexMap::with_capacity(form.questions.len());
        for question in form.questions {
            if questions.contains_key(&question.id()) {
                tracing::warn!(id = %question.id(), "dropping question with duplicate id");
                continue;
            }
            questions.insert(question.id(), question);
        }
        Self {
            id: form.id,
            title: form.title,
            description: form.description,
            published: form.published,
            questions,
            ids,
            type_change: TypeChangePolicy::default(),
        }
    }

    /// Set how `change_type` treats ids.
    pub fn with_type_change_policy(mut self, policy: TypeChangePolicy) -> Self {
        self.type_change = policy;
        self
    }

    pub fn id(&self) -> FormId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    /// Mark the form as published.
    pub fn publish(&mut self) {
        self.published = true;
        tracing::info!(form = %self.id, "form published");
    }

    pub fn type_change_policy(&self) -> TypeChangePolicy {
        self.type_change
    }

    /// Append a default-configured question of the given type.
    ///
    /// The new question is optional, has an empty prompt and a fresh id.
    pub fn append(&mut self, question_type: QuestionType) -> QuestionId {
        let id = self.fresh_id();
        let question = Question::new(id, "", QuestionKind::default_for(question_type));
        self.questions.insert(id, question);
        tracing::debug!(%id, kind = %question_type, len = self.questions.len(), "appended question");
        id
    }

    /// Apply `patch` to the question with this id.
    ///
    /// Returns `false` without touching anything if the id is not in the form.
    pub fn update_by_id(&mut self, id: &QuestionId, patch: QuestionPatch) -> bool {
        match self.questions.get_mut(id) {
            Some(question) => {
                patch.apply(question);
                tracing::debug!(%id, "updated question");
                true
            }
            None => {
                tracing::warn!(%id, "update for unknown question ignored");
                false
            }
        }
    }

    /// Remove the question with this id, keeping the order of the rest.
    pub fn delete_by_id(&mut self, id: &QuestionId) -> Option<Question> {
        let removed = self.questions.shift_remove(id);
        match &removed {
            Some(_) => tracing::debug!(%id, len = self.questions.len(), "deleted question"),
            None => tracing::warn!(%id, "delete for unknown question ignored"),
        }
        removed
    }

    /// Replace the question order.
    ///
    /// `order` must be a permutation of the current ids. Anything else is rejected and
    /// the current order is kept.
    pub fn reorder(&mut self, order: &[QuestionId]) -> Result<(), ReorderError> {
        if let Err(err) = self.check_permutation(order) {
            tracing::warn!(%err, "rejected reorder");
            return Err(err);
        }

        let mut previous = std::mem::take(&mut self.questions);
        for id in order {
            if let Some(question) = previous.swap_remove(id) {
                self.questions.insert(*id, question);
            }
        }
        tracing::debug!(len = self.questions.len(), "reordered questions");
        Ok(())
    }

    fn check_permutation(&self, order: &[QuestionId]) -> Result<(), ReorderError> {
        let mut seen = HashSet::with_capacity(order.len());
        for id in order {
            if !self.questions.contains_key(id) {
                return Err(ReorderError::UnknownId(*id));
            }
            if !seen.insert(id) {
                return Err(ReorderError::DuplicateId(*id));
            }
        }
        if order.len() != self.questions.len() {
            return Err(ReorderError::LengthMismatch {
                expected: self.questions.len(),
                actual: order.len(),
            });
        }
        Ok(())
    }

    /// Swap a question with the one above it. Returns `false` at the top or for unknown ids.
    pub fn move_up(&mut self, id: &QuestionId) -> bool {
        match self.questions.get_index_of(id) {
            Some(index) if index > 0 => self.swap_positions(index - 1, index),
            _ => false,
        }
    }

    /// Swap a question with the one below it. Returns `false` at the bottom or for unknown ids.
    pub fn move_down(&mut self, id: &QuestionId) -> bool {
        match self.questions.get_index_of(id) {
            Some(index) if index + 1 < self.questions.len() => {
                self.swap_positions(index, index + 1)
            }
            _ => false,
        }
    }

    fn swap_positions(&mut self, a: usize, b: usize) -> bool {
        let mut order = self.ids();
        order.swap(a, b);
        self.reorder(&order).is_ok()
    }

    /// Replace the question with a default one of `question_type`.
    ///
    /// Prompt, required flag and help text carry over; kind-specific configuration does
    /// not. Whether the id survives depends on the [`TypeChangePolicy`]. Returns the id
    /// the question has afterwards, or `None` if `id` is not in the form. Choosing the
    /// type the question already has changes nothing.
    pub fn change_type(
        &mut self,
        id: &QuestionId,
        question_type: QuestionType,
    ) -> Option<QuestionId> {
        let Some(index) = self.questions.get_index_of(id) else {
            tracing::warn!(%id, "type change for unknown question ignored");
            return None;
        };
        if self.questions[index].question_type() == question_type {
            return Some(*id);
        }

        let new_id = match self.type_change {
            TypeChangePolicy::PreserveId => *id,
            TypeChangePolicy::RegenerateId => self.fresh_id(),
        };
        let retyped = self.questions[index].retyped(new_id, question_type);

        if new_id == *id {
            self.questions[index] = retyped;
        } else {
            self.questions.shift_remove_index(index);
            self.questions.shift_insert(index, new_id, retyped);
        }
        tracing::debug!(old = %id, new = %new_id, kind = %question_type, "changed question type");
        Some(new_id)
    }

    /// Draw an id from the source that no question in the form has yet.
    ///
    /// A loaded form may already hold ids the source is about to hand out.
    fn fresh_id(&mut self) -> QuestionId {
        loop {
            let id = self.ids.question_id();
            if !self.questions.contains_key(&id) {
                return id;
            }
            tracing::debug!(%id, "skipping id already in the form");
        }
    }

    /// Look up a question.
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.get(id)
    }

    /// Position of a question in the form.
    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.get_index_of(id)
    }

    /// Question at a position.
    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get_index(index).map(|(_, question)| question)
    }

    /// All questions, in order.
    pub fn questions(&self) -> impl ExactSizeIterator<Item = &Question> {
        self.questions.values()
    }

    /// All ids, in order.
    pub fn ids(&self) -> Vec<QuestionId> {
        self.questions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Snapshot the current form.
    pub fn form(&self) -> FormDefinition {
        FormDefinition {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            questions: self.questions.values().cloned().collect(),
            published: self.published,
        }
    }

    /// Snapshot the current form in its serialized shape.
    pub fn to_record(&self) -> FormRecord {
        FormRecord::from(&self.form())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_types::SequentialIds;

    fn editor() -> FormEditor {
        FormEditor::with_id_source(Box::new(SequentialIds::new()))
    }

    #[test]
    fn new_form_is_untitled_and_empty() {
        let editor = editor();
        assert_eq!(editor.title(), UNTITLED);
        assert!(editor.is_empty());
        assert!(!editor.is_published());
    }

    #[test]
    fn append_uses_defaults() {
        let mut editor = editor();
        let id = editor.append(QuestionType::SingleSelect);

        let question = editor.question(&id).unwrap();
        assert!(!question.required());
        assert_eq!(question.prompt(), "");
        assert_eq!(question.question_type(), QuestionType::SingleSelect);
        assert_eq!(editor.ids(), [id]);
    }

    #[test]
    fn append_then_delete_restores_length() {
        let mut editor = editor();
        editor.append(QuestionType::Url);
        let before = editor.len();

        let id = editor.append(QuestionType::Number);
        assert!(editor.delete_by_id(&id).is_some());
        assert_eq!(editor.len(), before);
    }

    #[test]
    fn stale_ids_are_noops() {
        let mut editor = editor();
        let id = editor.append(QuestionType::ShortAnswer);
        editor.delete_by_id(&id);

        assert!(!editor.update_by_id(&id, QuestionPatch::new().prompt("x")));
        assert!(editor.delete_by_id(&id).is_none());
        assert_eq!(editor.change_type(&id, QuestionType::Url), None);
        assert!(!editor.move_up(&id));
        assert!(editor.is_empty());
    }

    #[test]
    fn update_is_idempotent() {
        let mut editor = editor();
        let id = editor.append(QuestionType::ShortAnswer);

        editor.update_by_id(&id, QuestionPatch::new().prompt("x"));
        let once = editor.form();
        editor.update_by_id(&id, QuestionPatch::new().prompt("x"));
        assert_eq!(editor.form(), once);
    }

    #[test]
    fn delete_keeps_order_of_the_rest() {
        let mut editor = editor();
        let a = editor.append(QuestionType::ShortAnswer);
        let b = editor.append(QuestionType::LongAnswer);
        let c = editor.append(QuestionType::Url);

        editor.delete_by_id(&b);
        assert_eq!(editor.ids(), [a, c]);
    }

    #[test]
    fn reorder_accepts_permutations() {
        let mut editor = editor();
        let a = editor.append(QuestionType::ShortAnswer);
        let b = editor.append(QuestionType::LongAnswer);
        let c = editor.append(QuestionType::Url);

        editor.reorder(&[c, a, b]).unwrap();
        assert_eq!(editor.ids(), [c, a, b]);
        assert_eq!(editor.question_at(0).unwrap().question_type(), QuestionType::Url);
    }

    #[test]
    fn reorder_rejects_non_permutations_and_keeps_order() {
        let mut editor = editor();
        let a = editor.append(QuestionType::ShortAnswer);
        let b = editor.append(QuestionType::LongAnswer);
        // The editor's own source handed this value to the form id, never to a question.
        let stranger = SequentialIds::new().question_id();

        assert_eq!(
            editor.reorder(&[a]),
            Err(ReorderError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(editor.reorder(&[a, a]), Err(ReorderError::DuplicateId(a)));
        assert_eq!(
            editor.reorder(&[b, a, a]),
            Err(ReorderError::DuplicateId(a))
        );
        assert_eq!(
            editor.reorder(&[a, stranger]),
            Err(ReorderError::UnknownId(stranger))
        );
        assert_eq!(editor.ids(), [a, b]);
    }

    #[test]
    fn move_up_and_down() {
        let mut editor = editor();
        let a = editor.append(QuestionType::ShortAnswer);
        let b = editor.append(QuestionType::LongAnswer);

        assert!(!editor.move_up(&a));
        assert!(editor.move_down(&a));
        assert_eq!(editor.ids(), [b, a]);
        assert!(!editor.move_down(&a));
        assert!(editor.move_up(&a));
        assert_eq!(editor.ids(), [a, b]);
    }

    #[test]
    fn change_type_regenerates_id_by_default() {
        let mut editor = editor();
        let first = editor.append(QuestionType::ShortAnswer);
        let id = editor.append(QuestionType::ShortAnswer);
        let last = editor.append(QuestionType::ShortAnswer);
        editor.update_by_id(&id, QuestionPatch::new().prompt("Site").required(true));

        let new_id = editor.change_type(&id, QuestionType::Url).unwrap();
        assert_ne!(new_id, id);
        assert!(editor.question(&id).is_none());
        assert_eq!(editor.ids(), [first, new_id, last]);

        let question = editor.question(&new_id).unwrap();
        assert_eq!(question.prompt(), "Site");
        assert!(question.required());
        assert_eq!(question.question_type(), QuestionType::Url);
    }

    #[test]
    fn change_type_can_preserve_id() {
        let mut editor = editor().with_type_change_policy(TypeChangePolicy::PreserveId);
        let id = editor.append(QuestionType::Number);
        editor.update_by_id(&id, QuestionPatch::new().prompt("Pick"));

        assert_eq!(editor.change_type(&id, QuestionType::SingleSelect), Some(id));
        let question = editor.question(&id).unwrap();
        assert_eq!(question.prompt(), "Pick");
        assert_eq!(question.question_type(), QuestionType::SingleSelect);
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn change_to_same_type_is_a_noop() {
        let mut editor = editor();
        let id = editor.append(QuestionType::SingleSelect);
        editor.update_by_id(&id, QuestionPatch::new().options(vec!["A".into(), "B".into()]));
        let before = editor.form();

        assert_eq!(editor.change_type(&id, QuestionType::SingleSelect), Some(id));
        assert_eq!(editor.form(), before);
    }

    #[test]
    fn from_definition_drops_duplicate_ids() {
        let mut source = editor();
        let id = source.append(QuestionType::Url);
        let mut form = source.form();
        form.questions.push(form.questions[0].clone());

        let editor = FormEditor::from_definition(form, Box::new(SequentialIds::new()));
        assert_eq!(editor.ids(), [id]);
    }

    #[test]
    fn loaded_form_keeps_questions_when_ids_repeat() {
        let mut source = editor();
        let url = source.append(QuestionType::Url);
        let number = source.append(QuestionType::Number);
        source.update_by_id(&url, QuestionPatch::new().prompt("Homepage"));

        // A fresh sequential source hands out the same ids the loaded form already uses.
        let mut editor = FormEditor::from_definition(source.form(), Box::new(SequentialIds::new()));
        let first = editor.append(QuestionType::ShortAnswer);
        let second = editor.append(QuestionType::LongAnswer);

        assert_eq!(editor.len(), 4);
        assert_eq!(editor.ids(), [url, number, first, second]);
        let kept = editor.question(&url).unwrap();
        assert_eq!(kept.question_type(), QuestionType::Url);
        assert_eq!(kept.prompt(), "Homepage");
        assert_eq!(editor.question(&number).unwrap().question_type(), QuestionType::Number);
    }

    #[test]
    fn regenerated_id_never_lands_on_another_question() {
        let mut source = editor();
        let a = source.append(QuestionType::ShortAnswer);
        let b = source.append(QuestionType::Url);

        let mut editor = FormEditor::from_definition(source.form(), Box::new(SequentialIds::new()));
        let c = editor.append(QuestionType::LongAnswer);
        let new_id = editor.change_type(&b, QuestionType::Number).unwrap();

        assert!(![a, b, c].contains(&new_id));
        assert_eq!(editor.ids(), [a, new_id, c]);
        assert_eq!(editor.question(&a).unwrap().question_type(), QuestionType::ShortAnswer);
        assert_eq!(editor.question(&new_id).unwrap().question_type(), QuestionType::Number);
    }

    #[test]
    fn publish_sets_flag() {
        let mut editor = editor();
        editor.publish();
        assert!(editor.is_published());
        assert!(editor.to_record().published);
    }
}
