use formcraft_types::{
    FormDefinition, FormError, Question, ResponseValue, Responses, ValidationError,
    validate_all,
};

use crate::Submission;

/// Per-answer validator handed to backends.
pub type Validator<'a> = &'a dyn Fn(&Question, Option<&ResponseValue>) -> Result<(), ValidationError>;

/// Trait for backends that let a respondent fill in a form.
///
/// Backends receive a `FormDefinition` and return `Responses`. They decide how to
/// present the form and may use the validator for immediate per-field feedback.
pub trait RespondentBackend {
    /// The error type for this backend.
    type Error: Into<anyhow::Error>;

    /// Collect answers for `form`.
    ///
    /// # Arguments
    /// * `form` - The form to fill in
    /// * `validate` - Checks one answer (`None` for an untouched question)
    ///
    /// # Returns
    /// * `Ok(responses)` on success
    /// * `Err` on cancellation or backend failure
    fn collect(&self, form: &FormDefinition, validate: Validator<'_>)
    -> Result<Responses, Self::Error>;
}

/// Run `form` through `backend` and validate the result as a submit would.
pub fn collect_submission<B: RespondentBackend>(
    form: &FormDefinition,
    backend: &B,
) -> Result<Submission, FormError> {
    let responses = backend
        .collect(form, &|question, value| question.check(value))
        .map_err(FormError::backend)?;

    let report = validate_all(form.questions(), &responses);
    if !report.is_valid() {
        return Err(FormError::Invalid(report));
    }
    tracing::info!(form = %form.id, answers = responses.len(), "responses collected");
    Ok(Submission {
        form_id: form.id,
        responses,
    })
}
