//! Preview-only run: the terminal as a [`RespondentBackend`].

use crossterm::event::{self, Event, KeyEventKind};
use formcraft::{FormDefinition, Preview, RespondentBackend, Responses, Validator};
use ratatui::{
    style::Style,
    widgets::{Block, Borders},
};

use crate::{
    TuiApp, TuiError,
    form_view::{FormAction, FormView, draw_form},
    terminal::TerminalGuard,
};

/// Check every field with `validate` and mark the ones that fail.
///
/// Returns `true` when all answers pass.
fn validate_fields(view: &mut FormView, preview: &Preview, validate: Validator<'_>) -> bool {
    let form = preview.form();
    let responses = preview.responses();
    view.show_errors(|id| {
        let question = form.question(id)?;
        validate(question, responses.get(id))
            .err()
            .map(|err| err.to_string())
    });
    form.questions()
        .iter()
        .all(|question| view.error(&question.id()).is_none())
}

impl RespondentBackend for TuiApp {
    type Error = TuiError;

    fn collect(
        &self,
        form: &FormDefinition,
        validate: Validator<'_>,
    ) -> Result<Responses, Self::Error> {
        let mut guard = TerminalGuard::enter()?;
        let mut preview = Preview::new(form.clone(), self.completion());
        let mut view = FormView::new(form, preview.responses());
        let theme = self.theme().clone();

        loop {
            guard.terminal().draw(|frame| {
                let outer = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border))
                    .title(format!(" {} ", self.title()));
                let area = outer.inner(frame.area());
                frame.render_widget(outer, frame.area());
                draw_form(frame, area, &mut view, &preview, &theme);
            })?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match view.handle_key(key, &mut preview) {
                FormAction::None => {}
                FormAction::Leave => return Err(TuiError::Cancelled),
                FormAction::Submit => {
                    if validate_fields(&mut view, &preview, validate) {
                        break;
                    }
                }
            }
        }

        Ok(preview.responses().clone())
    }
}
