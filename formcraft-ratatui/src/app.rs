//! The full editor ⇄ preview application.

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use formcraft::{CompletionBasis, FormError, ListenerRegistry, Mode, ModeKind, Point, Session};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    Theme, TuiError,
    editor_view::{EditorAction, EditorView, draw_editor},
    form_view::{FormAction, FormView, draw_form},
    terminal::TerminalGuard,
};

/// Terminal front-end for composing and previewing forms.
#[derive(Debug, Clone)]
pub struct TuiApp {
    /// Title shown in the outer frame.
    title: String,
    /// Color theme for the UI.
    theme: Theme,
    /// Completion basis for preview-only runs (see [`formcraft::RespondentBackend`]).
    completion: CompletionBasis,
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiApp {
    pub fn new() -> Self {
        Self {
            title: "formcraft".to_string(),
            theme: Theme::default(),
            completion: CompletionBasis::default(),
        }
    }

    /// Set the title shown in the outer frame.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set a custom color theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Which questions count towards completion when used as a respondent backend.
    pub fn with_completion(mut self, completion: CompletionBasis) -> Self {
        self.completion = completion;
        self
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn theme(&self) -> &Theme {
        &self.theme
    }

    pub(crate) fn completion(&self) -> CompletionBasis {
        self.completion
    }

    /// Run the editor until the author quits.
    ///
    /// The terminal is restored before this returns, also on error.
    pub fn run(&self, session: &mut Session) -> Result<(), TuiError> {
        let mut guard = TerminalGuard::enter()?;
        let mut app = App::new(session, self.theme.clone(), self.title.clone());
        tracing::info!("editor started");

        while !app.should_quit() {
            guard.terminal().draw(|frame| app.draw(frame))?;
            app.handle_event(event::read()?);
        }

        tracing::info!("editor closed");
        Ok(())
    }
}

/// State of one run: the session plus everything the views need between frames.
pub(crate) struct App<'a> {
    session: &'a mut Session,
    registry: ListenerRegistry,
    editor_view: EditorView,
    form_view: Option<FormView>,
    theme: Theme,
    title: String,
    quit: bool,
}

impl<'a> App<'a> {
    pub(crate) fn new(session: &'a mut Session, theme: Theme, title: String) -> Self {
        Self {
            session,
            registry: ListenerRegistry::new(),
            editor_view: EditorView::new(),
            form_view: None,
            theme,
            title,
            quit: false,
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.quit
    }

    pub(crate) fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        match self.session.mode_kind() {
            ModeKind::Editing => {
                let Some(editor) = self.session.editor_mut() else {
                    return;
                };
                match self.editor_view.handle_key(key, editor, &self.registry) {
                    EditorAction::None => {}
                    EditorAction::Quit => self.quit = true,
                    EditorAction::Preview => self.start_preview(),
                }
            }
            ModeKind::Previewing => {
                let (Some(view), Some(preview)) =
                    (self.form_view.as_mut(), self.session.preview_mut())
                else {
                    return;
                };
                match view.handle_key(key, preview) {
                    FormAction::None => {}
                    FormAction::Leave => self.back_to_editor(),
                    FormAction::Submit => self.submit(),
                }
            }
            ModeKind::Submitted => match key.code {
                KeyCode::Char('q') => self.quit = true,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('b') => self.back_to_editor(),
                KeyCode::Char('p') => self.start_preview(),
                _ => {}
            },
        }
    }

    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let at = Point::new(mouse.column, mouse.row);
        self.registry.dispatch(at);
        if let Some(editor) = self.session.editor_mut() {
            self.editor_view.handle_click(at, editor);
        }
    }

    fn start_preview(&mut self) {
        self.editor_view.close_menus();
        let preview = self.session.start_preview();
        self.form_view = Some(FormView::new(preview.form(), preview.responses()));
    }

    fn back_to_editor(&mut self) {
        self.session.back();
        self.form_view = None;
    }

    fn submit(&mut self) {
        match self.session.submit() {
            Ok(_) => self.form_view = None,
            Err(FormError::Invalid(report)) => {
                if let Some(view) = self.form_view.as_mut() {
                    view.show_errors(|id| report.error_for(id).map(ToString::to_string));
                }
            }
            Err(err) => tracing::warn!(%err, "submit failed"),
        }
    }

    pub(crate) fn editor_view(&self) -> &EditorView {
        &self.editor_view
    }

    pub(crate) fn form_view(&self) -> Option<&FormView> {
        self.form_view.as_ref()
    }

    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let mode_label = match self.session.mode_kind() {
            ModeKind::Editing => "Editing",
            ModeKind::Previewing => "Preview",
            ModeKind::Submitted => "Submitted",
        };
        let outer = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(self.theme.background))
            .border_style(Style::default().fg(self.theme.border))
            .title(format!(" {} · {mode_label} ", self.title))
            .title_style(
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            );
        let area = outer.inner(frame.area());
        frame.render_widget(outer, frame.area());

        match self.session.mode() {
            Mode::Editing => {
                let editor = self.session.editor();
                draw_editor(frame, area, &mut self.editor_view, editor, &self.theme);
            }
            Mode::Previewing(preview) => {
                if let Some(view) = self.form_view.as_mut() {
                    draw_form(frame, area, view, preview, &self.theme);
                }
            }
            Mode::Submitted(submission) => {
                let json = serde_json::to_string_pretty(&submission.responses)
                    .unwrap_or_else(|err| format!("<unprintable: {err}>"));
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(3),
                        Constraint::Length(1),
                    ])
                    .split(area);

                let thanks = Paragraph::new("Thanks! Your responses were recorded.")
                    .style(
                        Style::default()
                            .fg(self.theme.success)
                            .add_modifier(Modifier::BOLD),
                    )
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::BOTTOM));
                frame.render_widget(thanks, chunks[0]);

                let body = Paragraph::new(json)
                    .style(Style::default().fg(self.theme.text))
                    .wrap(Wrap { trim: false })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(self.theme.border))
                            .title(" Responses "),
                    );
                frame.render_widget(body, chunks[1]);

                let help = Paragraph::new("Enter/b: Back to editor  p: Preview again  q: Quit")
                    .style(Style::default().fg(self.theme.border));
                frame.render_widget(help, chunks[2]);
            }
        }
    }
}
