//! Editing ⇄ previewing flow and the respondent-side preview.

use formcraft_types::{
    CompletionBasis, FormDefinition, FormError, FormId, Question, QuestionId, ResponseValue,
    Responses, ValidationReport, completion_percentage, validate_all,
};
use serde::Serialize;

use crate::{EditorOptions, FormEditor};

/// Accepted answers of one submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub form_id: FormId,
    pub responses: Responses,
}

impl Submission {
    /// Serialize as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A respondent filling in a snapshot of the form.
#[derive(Debug, Clone)]
pub struct Preview {
    form: FormDefinition,
    responses: Responses,
    basis: CompletionBasis,
    report: Option<ValidationReport>,
}

impl Preview {
    /// Start with no answers.
    pub fn new(form: FormDefinition, basis: CompletionBasis) -> Self {
        Self {
            form,
            responses: Responses::new(),
            basis,
            report: None,
        }
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    pub fn response(&self, id: &QuestionId) -> Option<&ResponseValue> {
        self.responses.get(id)
    }

    /// Record an answer. Returns `false` if the question is not part of this form.
    pub fn set_response(&mut self, id: QuestionId, value: impl Into<ResponseValue>) -> bool {
        if self.form.question(&id).is_none() {
            tracing::warn!(%id, "answer for unknown question ignored");
            return false;
        }
        self.responses.insert(id, value);
        true
    }

    /// Forget an answer, making the question untouched again.
    pub fn clear_response(&mut self, id: &QuestionId) -> Option<ResponseValue> {
        self.responses.remove(id)
    }

    /// Live completion percentage.
    pub fn completion(&self) -> u8 {
        completion_percentage(self.form.questions(), &self.responses, self.basis)
    }

    pub fn completion_basis(&self) -> CompletionBasis {
        self.basis
    }

    /// Failures of the last rejected submit, cleared by the next successful one.
    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    /// Validate every answer and, if all pass, log and return them.
    pub fn submit(&mut self) -> Result<Submission, ValidationReport> {
        let report = validate_all(self.form.questions(), &self.responses);
        if !report.is_valid() {
            tracing::debug!(failures = report.failures.len(), "submit rejected");
            self.report = Some(report.clone());
            return Err(report);
        }

        self.report = None;
        let order: Vec<QuestionId> = self.form.questions().iter().map(Question::id).collect();
        let submission = Submission {
            form_id: self.form.id,
            responses: self.responses.ordered_by(&order),
        };
        match submission.to_json() {
            Ok(json) => tracing::info!(form = %self.form.id, responses = %json, "form submitted"),
            Err(err) => tracing::info!(form = %self.form.id, %err, "form submitted"),
        }
        Ok(submission)
    }
}

/// Which screen the session is on.
#[derive(Debug, Clone)]
pub enum Mode {
    Editing,
    Previewing(Preview),
    Submitted(Submission),
}

/// Field-less view of [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Editing,
    Previewing,
    Submitted,
}

/// One editing session: the form being built plus the current mode.
///
/// The editor can only be changed while editing, so a preview never sees edits made
/// behind its back.
#[derive(Debug)]
pub struct Session {
    editor: FormEditor,
    mode: Mode,
    options: EditorOptions,
    last_submission: Option<Submission>,
}

impl Session {
    /// Start editing `editor`. The editor takes its type change policy from `options`.
    pub fn new(editor: FormEditor, options: EditorOptions) -> Self {
        let editor = editor.with_type_change_policy(options.type_change);
        Self {
            editor,
            mode: Mode::Editing,
            options,
            last_submission: None,
        }
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn mode_kind(&self) -> ModeKind {
        match self.mode {
            Mode::Editing => ModeKind::Editing,
            Mode::Previewing(_) => ModeKind::Previewing,
            Mode::Submitted(_) => ModeKind::Submitted,
        }
    }

    pub fn editor(&self) -> &FormEditor {
        &self.editor
    }

    /// The editor, if the session is editing.
    pub fn editor_mut(&mut self) -> Option<&mut FormEditor> {
        match self.mode {
            Mode::Editing => Some(&mut self.editor),
            _ => None,
        }
    }

    /// Switch to previewing a snapshot of the form. Already previewing: unchanged.
    pub fn start_preview(&mut self) -> &mut Preview {
        if !matches!(self.mode, Mode::Previewing(_)) {
            tracing::debug!(questions = self.editor.len(), "entering preview");
            self.mode = Mode::Previewing(Preview::new(self.editor.form(), self.options.completion));
        }
        match &mut self.mode {
            Mode::Previewing(preview) => preview,
            _ => unreachable!("mode was set to previewing above"),
        }
    }

    pub fn preview(&self) -> Option<&Preview> {
        match &self.mode {
            Mode::Previewing(preview) => Some(preview),
            _ => None,
        }
    }

    pub fn preview_mut(&mut self) -> Option<&mut Preview> {
        match &mut self.mode {
            Mode::Previewing(preview) => Some(preview),
            _ => None,
        }
    }

    /// Submit the preview. On success the session moves to `Submitted`.
    pub fn submit(&mut self) -> Result<&Submission, FormError> {
        let preview = self.preview_mut().ok_or(FormError::NotPreviewing)?;
        let submission = preview.submit()?;
        self.mode = Mode::Submitted(submission.clone());
        Ok(self.last_submission.insert(submission))
    }

    /// Return to editing, discarding any preview answers.
    pub fn back(&mut self) {
        if !matches!(self.mode, Mode::Editing) {
            tracing::debug!("back to editing");
        }
        self.mode = Mode::Editing;
    }

    /// The most recent accepted submission of this session.
    pub fn last_submission(&self) -> Option<&Submission> {
        self.last_submission.as_ref()
    }

    /// End the session and hand back the editor.
    pub fn into_editor(self) -> FormEditor {
        self.editor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionPatch;
    use formcraft_types::{IdSource, QuestionType, SequentialIds};

    fn session() -> (Session, QuestionId, QuestionId) {
        let mut editor = FormEditor::with_id_source(Box::new(SequentialIds::new()));
        let required = editor.append(QuestionType::Number);
        let optional = editor.append(QuestionType::ShortAnswer);
        editor.update_by_id(&required, QuestionPatch::new().prompt("Age").required(true));
        editor.update_by_id(&optional, QuestionPatch::new().prompt("Nickname"));
        (Session::new(editor, EditorOptions::new()), required, optional)
    }

    #[test]
    fn starts_editing() {
        let (mut session, _, _) = session();
        assert_eq!(session.mode_kind(), ModeKind::Editing);
        assert!(session.editor_mut().is_some());
        assert!(session.preview().is_none());
    }

    #[test]
    fn editor_is_locked_while_previewing() {
        let (mut session, _, _) = session();
        session.start_preview();
        assert_eq!(session.mode_kind(), ModeKind::Previewing);
        assert!(session.editor_mut().is_none());

        session.back();
        assert!(session.editor_mut().is_some());
    }

    #[test]
    fn start_preview_twice_keeps_answers() {
        let (mut session, required, _) = session();
        session.start_preview().set_response(required, 30);
        assert!(session.start_preview().response(&required).is_some());
    }

    #[test]
    fn back_discards_answers() {
        let (mut session, required, _) = session();
        session.start_preview().set_response(required, 30);
        session.back();
        assert!(session.start_preview().responses().is_empty());
    }

    #[test]
    fn submit_outside_preview() {
        let (mut session, _, _) = session();
        assert!(matches!(session.submit(), Err(FormError::NotPreviewing)));
    }

    #[test]
    fn rejected_submit_stays_in_preview_with_report() {
        let (mut session, required, _) = session();
        session.start_preview();

        let FormError::Invalid(report) = session.submit().unwrap_err() else {
            panic!("Expected validation failure");
        };
        assert_eq!(report.prompts().collect::<Vec<_>>(), ["Age"]);
        assert_eq!(session.mode_kind(), ModeKind::Previewing);
        assert_eq!(
            session.preview().and_then(Preview::report).map(|r| r.ids().collect::<Vec<_>>()),
            Some(vec![required])
        );
    }

    #[test]
    fn accepted_submit_moves_to_submitted() {
        let (mut session, required, _) = session();
        session.start_preview().set_response(required, 0);

        let submission = session.submit().unwrap().clone();
        assert_eq!(submission.responses.get_number(&required).unwrap(), 0.0);
        assert_eq!(session.mode_kind(), ModeKind::Submitted);
        assert_eq!(session.last_submission(), Some(&submission));

        session.back();
        assert_eq!(session.mode_kind(), ModeKind::Editing);
        assert_eq!(session.last_submission(), Some(&submission));
    }

    #[test]
    fn answers_for_unknown_questions_are_ignored() {
        let (mut session, _, _) = session();
        let stranger = SequentialIds::new().question_id();
        assert!(!session.start_preview().set_response(stranger, "x"));
    }

    #[test]
    fn submission_json_shape() {
        let (mut session, required, _) = session();
        session.start_preview().set_response(required, 5);
        let json = session.submit().unwrap().to_json().unwrap();
        assert!(json.contains("\"formId\""));
        assert!(json.contains(&format!("\"{required}\":5.0")));
    }

    #[test]
    fn submission_lists_answers_in_question_order() {
        let (mut session, required, optional) = session();
        let preview = session.start_preview();
        preview.set_response(optional, "Ace");
        preview.set_response(required, 41);

        let submission = session.submit().unwrap();
        let keys: Vec<_> = submission.responses.iter().map(|(id, _)| *id).collect();
        assert_eq!(keys, [required, optional]);
    }

    #[test]
    fn completion_follows_options() {
        let mut editor = FormEditor::with_id_source(Box::new(SequentialIds::new()));
        let a = editor.append(QuestionType::ShortAnswer);
        editor.append(QuestionType::ShortAnswer);
        let mut session = Session::new(
            editor,
            EditorOptions::new().with_completion(CompletionBasis::All),
        );
        let preview = session.start_preview();
        preview.set_response(a, "x");
        assert_eq!(preview.completion(), 50);
    }
}
