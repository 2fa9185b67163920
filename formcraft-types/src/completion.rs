use crate::{Question, Responses};

/// Which questions count towards the completion percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionBasis {
    /// Only required questions.
    #[default]
    Required,

    /// Every question.
    All,
}

/// Share of counted questions with a non-blank answer, rounded to the nearest integer.
///
/// Returns 0 when no question is counted.
pub fn completion_percentage<'a>(
    questions: impl IntoIterator<Item = &'a Question>,
    responses: &Responses,
    basis: CompletionBasis,
) -> u8 {
    let (counted, answered) = questions
        .into_iter()
        .filter(|question| basis == CompletionBasis::All || question.required())
        .fold((0usize, 0usize), |(counted, answered), question| {
            let hit = usize::from(responses.has_value(&question.id()));
            (counted + 1, answered + hit)
        });

    if counted == 0 {
        return 0;
    }
    (answered as f64 / counted as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QuestionKind, QuestionType, SequentialIds};

    fn questions(required: &[bool]) -> Vec<Question> {
        let mut ids = SequentialIds::new();
        required
            .iter()
            .map(|&required| {
                Question::create(
                    &mut ids,
                    QuestionKind::default_for(QuestionType::ShortAnswer),
                    "Q",
                    required,
                )
            })
            .collect()
    }

    #[test]
    fn nothing_counted_is_zero() {
        let qs = questions(&[false, false]);
        let none = Responses::new();
        assert_eq!(completion_percentage(&qs, &none, CompletionBasis::Required), 0);
        let empty: Vec<Question> = Vec::new();
        assert_eq!(completion_percentage(&empty, &none, CompletionBasis::All), 0);
    }

    #[test]
    fn required_basis_ignores_optional_questions() {
        let qs = questions(&[true, false]);
        let mut responses = Responses::new();
        responses.insert(qs[0].id(), "done");

        assert_eq!(completion_percentage(&qs, &responses, CompletionBasis::Required), 100);
        assert_eq!(completion_percentage(&qs, &responses, CompletionBasis::All), 50);
    }

    #[test]
    fn blank_answers_do_not_count_and_numbers_do() {
        let qs = questions(&[true, true, true]);
        let mut responses = Responses::new();
        responses.insert(qs[0].id(), "  ");
        responses.insert(qs[1].id(), 0);

        assert_eq!(completion_percentage(&qs, &responses, CompletionBasis::Required), 33);
    }

    #[test]
    fn rounds_to_nearest() {
        let qs = questions(&[true, true, true]);
        let mut responses = Responses::new();
        responses.insert(qs[0].id(), "a");
        responses.insert(qs[1].id(), "b");

        assert_eq!(completion_percentage(&qs, &responses, CompletionBasis::Required), 67);
    }
}
