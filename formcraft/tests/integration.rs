//! Integration tests for formcraft

use formcraft::{
    CompletionBasis, EditorOptions, FormEditor, FormError, FormRecord, ModeKind, QuestionPatch,
    QuestionType, SequentialIds, Session, TestBackend, TestBackendError, TypeChangePolicy,
    ValidationError, collect_submission,
};

fn editor() -> FormEditor {
    FormEditor::with_id_source(Box::new(SequentialIds::new()))
}

#[test]
fn test_required_select_blocks_submit_until_answered() {
    let mut editor = editor();
    let attend = editor.append(QuestionType::SingleSelect);
    let remarks = editor.append(QuestionType::ShortAnswer);
    editor.update_by_id(
        &attend,
        QuestionPatch::new()
            .prompt("Will you attend?")
            .required(true)
            .options(vec!["Yes".into(), "No".into()]),
    );
    editor.update_by_id(&remarks, QuestionPatch::new().prompt("Remarks"));

    let mut session = Session::new(editor, EditorOptions::new());
    let preview = session.start_preview();
    assert_eq!(preview.completion(), 0);

    preview.set_response(remarks, "vegetarian");
    let err = session.submit().unwrap_err();
    let FormError::Invalid(report) = err else {
        panic!("expected a validation report, got {err:?}");
    };
    assert_eq!(report.prompts().collect::<Vec<_>>(), vec!["Will you attend?"]);
    assert_eq!(report.error_for(&attend), Some(&ValidationError::Required));
    assert_eq!(session.mode_kind(), ModeKind::Previewing);

    let preview = session.preview_mut().unwrap();
    preview.set_response(attend, "Yes");
    assert_eq!(preview.completion(), 100);

    let submission = session.submit().unwrap();
    assert_eq!(submission.responses.get_text(&attend).unwrap(), "Yes");
    assert_eq!(session.mode_kind(), ModeKind::Submitted);
}

#[test]
fn test_completion_over_all_questions() {
    let mut editor = editor();
    let first = editor.append(QuestionType::ShortAnswer);
    editor.append(QuestionType::LongAnswer);
    editor.append(QuestionType::Url);

    let options = EditorOptions::new().with_completion(CompletionBasis::All);
    let mut session = Session::new(editor, options);
    let preview = session.start_preview();
    preview.set_response(first, "hello");
    assert_eq!(preview.completion(), 33);
}

#[test]
fn test_edits_after_back_show_up_in_next_preview() {
    let mut editor = editor();
    let age = editor.append(QuestionType::Number);
    editor.update_by_id(&age, QuestionPatch::new().prompt("Age").required(true));

    let mut session = Session::new(editor, EditorOptions::new());
    session.start_preview().set_response(age, 7);
    session.back();

    let editor = session.editor_mut().unwrap();
    editor.update_by_id(&age, QuestionPatch::new().bounds(Some(18.0), None));

    let preview = session.start_preview();
    assert!(preview.response(&age).is_none());
    preview.set_response(age, 7);
    let err = session.submit().unwrap_err();
    let FormError::Invalid(report) = err else {
        panic!("expected a validation report, got {err:?}");
    };
    assert_eq!(
        report.error_for(&age),
        Some(&ValidationError::BelowMin { min: 18.0 })
    );
}

#[test]
fn test_submit_outside_preview() {
    let mut session = Session::new(editor(), EditorOptions::new());
    assert!(matches!(session.submit(), Err(FormError::NotPreviewing)));
}

#[test]
fn test_change_type_policy_from_options() {
    let mut editor = editor();
    let id = editor.append(QuestionType::ShortAnswer);
    let options = EditorOptions::new().with_type_change_policy(TypeChangePolicy::PreserveId);
    let mut session = Session::new(editor, options);

    let editor = session.editor_mut().unwrap();
    assert_eq!(editor.change_type(&id, QuestionType::Url), Some(id));
    assert_eq!(editor.question(&id).unwrap().question_type(), QuestionType::Url);
}

#[test]
fn test_test_backend_by_prompt_and_id() {
    let mut editor = editor();
    let name = editor.append(QuestionType::ShortAnswer);
    let site = editor.append(QuestionType::Url);
    editor.update_by_id(&name, QuestionPatch::new().prompt("Name").required(true));
    editor.update_by_id(&site, QuestionPatch::new().prompt("Website"));

    let backend = TestBackend::new()
        .with_answer_to("Name", "Alice")
        .with_answer(site, "https://example.com");
    let submission = collect_submission(&editor.form(), &backend).unwrap();

    assert_eq!(submission.form_id, editor.id());
    assert_eq!(submission.responses.get_text(&name).unwrap(), "Alice");
    assert_eq!(
        submission.responses.get_text(&site).unwrap(),
        "https://example.com"
    );
}

#[test]
fn test_test_backend_reports_invalid_answer() {
    let mut editor = editor();
    let site = editor.append(QuestionType::Url);
    editor.update_by_id(&site, QuestionPatch::new().prompt("Website"));

    let backend = TestBackend::new().with_answer(site, "not a url");
    let err = collect_submission(&editor.form(), &backend).unwrap_err();
    let FormError::Backend(err) = err else {
        panic!("expected a backend error, got {err:?}");
    };
    let err = err.downcast::<TestBackendError>().unwrap();
    let TestBackendError::ValidationFailed { prompt, error } = err;
    assert_eq!(prompt, "Website");
    assert_eq!(error, ValidationError::InvalidUrl);
}

#[test]
fn test_test_backend_leaves_required_unanswered() {
    let mut editor = editor();
    let id = editor.append(QuestionType::LongAnswer);
    editor.update_by_id(&id, QuestionPatch::new().required(true));

    let err = collect_submission(&editor.form(), &TestBackend::new()).unwrap_err();
    assert!(matches!(err, FormError::Backend(_)));
}

#[test]
fn test_record_round_trip_through_editor() {
    let mut editor = editor();
    editor.set_title("Signup");
    let plan = editor.append(QuestionType::SingleSelect);
    editor.update_by_id(
        &plan,
        QuestionPatch::new()
            .prompt("Plan")
            .options(vec!["Free".into(), "Pro".into()]),
    );
    editor.append(QuestionType::Number);

    let json = editor.to_record().to_json_pretty().unwrap();
    let record = FormRecord::from_json(&json).unwrap();
    let mut loaded = FormEditor::from_definition(
        record.try_into().unwrap(),
        Box::new(SequentialIds::new()),
    );

    assert_eq!(loaded.title(), "Signup");
    assert_eq!(loaded.ids(), editor.ids());
    assert_eq!(loaded.form().questions, editor.form().questions);

    // Keep editing the loaded form; existing questions must survive new ids.
    let extra = loaded.append(QuestionType::Url);
    assert_eq!(loaded.len(), editor.len() + 1);
    assert!(!editor.ids().contains(&extra));
    assert_eq!(&loaded.form().questions[..editor.len()], editor.form().questions());
}

#[test]
fn test_legacy_record_with_unknown_kind_is_rejected() {
    let json = r#"{
        "id": "00000000-0000-0000-0000-000000000001",
        "title": "Old",
        "questions": [
            { "id": "00000000-0000-0000-0000-000000000002", "type": "short", "question": "Name" },
            { "id": "00000000-0000-0000-0000-000000000003", "type": "checkbox", "question": "Tick" }
        ]
    }"#;
    let record = FormRecord::from_json(json).unwrap();
    assert!(!record.questions[1].validate(Some(&"anything".into())));
    assert!(formcraft::FormDefinition::try_from(record).is_err());
}
