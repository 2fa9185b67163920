//! The respondent's side: every question of the form at once, with live completion.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formcraft::{FormDefinition, Preview, QuestionId, QuestionKind, ResponseValue, Responses};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{
        Block, Borders, Gauge, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState,
    },
};

use crate::{Theme, input::TextInput};

#[derive(Debug, Clone)]
enum FieldInput {
    Text { input: TextInput, multiline: bool },
    Number(TextInput),
    Select { options: Vec<String>, highlight: usize },
}

#[derive(Debug, Clone)]
struct FormField {
    id: QuestionId,
    prompt: String,
    required: bool,
    help_text: Option<String>,
    input: FieldInput,
    error: Option<String>,
}

impl FormField {
    fn text_input_mut(&mut self) -> Option<&mut TextInput> {
        match &mut self.input {
            FieldInput::Text { input, .. } | FieldInput::Number(input) => Some(input),
            FieldInput::Select { .. } => None,
        }
    }

    /// The response this field currently stands for. `None` clears it.
    fn response(&self) -> Option<ResponseValue> {
        match &self.input {
            FieldInput::Text { input, .. } if input.value().is_empty() => None,
            FieldInput::Text { input, .. } => Some(input.value().into()),
            FieldInput::Number(input) => {
                let raw = input.value().trim();
                if raw.is_empty() {
                    None
                } else {
                    // Unparseable text is kept so that submit can say why it is wrong.
                    Some(ResponseValue::parse_number(raw).unwrap_or_else(|| raw.into()))
                }
            }
            FieldInput::Select { .. } => None,
        }
    }

    fn height(&self) -> u16 {
        match &self.input {
            FieldInput::Text {
                multiline: true, ..
            } => 4,
            FieldInput::Select { options, .. } => 2 + options.len().max(1) as u16,
            _ => 3,
        }
    }
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormAction {
    None,
    Submit,
    Leave,
}

/// Input state for a preview of one form.
///
/// Answers live in the [`Preview`]; this only tracks focus, cursors and the errors of
/// the last rejected submit.
#[derive(Debug, Clone)]
pub(crate) struct FormView {
    fields: Vec<FormField>,
    focused: usize,
    submit_focused: bool,
    scroll_offset: u16,
}

impl FormView {
    pub(crate) fn new(form: &FormDefinition, responses: &Responses) -> Self {
        let fields = form
            .questions()
            .iter()
            .map(|question| {
                let id = question.id();
                let existing = responses.get(&id);
                let text =
                    || TextInput::new(existing.and_then(ResponseValue::as_str).unwrap_or(""));
                let input = match question.kind() {
                    QuestionKind::ShortAnswer(_) | QuestionKind::Url(_) => FieldInput::Text {
                        input: text(),
                        multiline: false,
                    },
                    QuestionKind::LongAnswer(_) => FieldInput::Text {
                        input: text(),
                        multiline: true,
                    },
                    QuestionKind::Number(_) => FieldInput::Number(TextInput::new(
                        existing.map(ToString::to_string).unwrap_or_default(),
                    )),
                    QuestionKind::SingleSelect(select) => FieldInput::Select {
                        options: select.options.clone(),
                        highlight: 0,
                    },
                };
                FormField {
                    id,
                    prompt: question.prompt().to_string(),
                    required: question.required(),
                    help_text: question.help_text().map(str::to_string),
                    input,
                    error: None,
                }
            })
            .collect::<Vec<_>>();

        let submit_focused = fields.is_empty();
        Self {
            fields,
            focused: 0,
            submit_focused,
            scroll_offset: 0,
        }
    }

    fn focused_field(&self) -> Option<&FormField> {
        if self.submit_focused {
            return None;
        }
        self.fields.get(self.focused)
    }

    fn focused_field_mut(&mut self) -> Option<&mut FormField> {
        if self.submit_focused {
            return None;
        }
        self.fields.get_mut(self.focused)
    }

    pub(crate) fn focused_id(&self) -> Option<QuestionId> {
        self.focused_field().map(|field| field.id)
    }

    pub(crate) fn is_submit_focused(&self) -> bool {
        self.submit_focused
    }

    fn is_selection_field(&self) -> bool {
        matches!(
            self.focused_field().map(|f| &f.input),
            Some(FieldInput::Select { .. })
        )
    }

    pub(crate) fn next_field(&mut self) {
        if self.submit_focused {
            return;
        }
        if self.focused + 1 < self.fields.len() {
            self.focused += 1;
        } else {
            self.submit_focused = true;
        }
    }

    pub(crate) fn prev_field(&mut self) {
        if self.submit_focused {
            if !self.fields.is_empty() {
                self.submit_focused = false;
                self.focused = self.fields.len() - 1;
            }
            return;
        }
        self.focused = self.focused.saturating_sub(1);
    }

    /// Mark every field `error_for` has a message for and focus the first of them.
    pub(crate) fn show_errors(&mut self, error_for: impl Fn(&QuestionId) -> Option<String>) {
        let mut first = None;
        for (index, field) in self.fields.iter_mut().enumerate() {
            field.error = error_for(&field.id);
            if field.error.is_some() && first.is_none() {
                first = Some(index);
            }
        }
        if let Some(index) = first {
            self.focused = index;
            self.submit_focused = false;
        }
    }

    pub(crate) fn error(&self, id: &QuestionId) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.id == *id)
            .and_then(|field| field.error.as_deref())
    }

    /// Write the focused field's value into the preview.
    fn sync(&mut self, preview: &mut Preview) {
        let Some(field) = self.focused_field_mut() else {
            return;
        };
        field.error = None;
        match field.response() {
            Some(value) => {
                preview.set_response(field.id, value);
            }
            None => {
                preview.clear_response(&field.id);
            }
        }
    }

    fn select_highlighted(&mut self, preview: &mut Preview) {
        if let Some(field) = self.focused_field_mut()
            && let FieldInput::Select { options, highlight } = &field.input
            && let Some(option) = options.get(*highlight)
        {
            preview.set_response(field.id, option.as_str());
            field.error = None;
        }
    }

    fn move_highlight(&mut self, delta: isize) {
        if let Some(field) = self.focused_field_mut()
            && let FieldInput::Select { options, highlight } = &mut field.input
            && !options.is_empty()
        {
            let len = options.len() as isize;
            *highlight = (*highlight as isize + delta).rem_euclid(len) as usize;
        }
    }

    fn edit_text(&mut self, preview: &mut Preview, edit: impl FnOnce(&mut TextInput) -> bool) {
        let changed = self
            .focused_field_mut()
            .and_then(FormField::text_input_mut)
            .is_some_and(edit);
        if changed {
            self.sync(preview);
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, preview: &mut Preview) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Leave,
            KeyCode::F(10) => return FormAction::Submit,
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return FormAction::Submit;
            }
            KeyCode::Enter => {
                if self.submit_focused {
                    return FormAction::Submit;
                } else if self.is_selection_field() {
                    self.select_highlighted(preview);
                } else {
                    self.next_field();
                }
            }
            KeyCode::BackTab => self.prev_field(),
            KeyCode::Tab => self.next_field(),
            KeyCode::Up if self.is_selection_field() => self.move_highlight(-1),
            KeyCode::Down if self.is_selection_field() => self.move_highlight(1),
            KeyCode::Up => self.prev_field(),
            KeyCode::Down => self.next_field(),
            KeyCode::Char(' ') if self.is_selection_field() => self.select_highlighted(preview),
            KeyCode::Backspace | KeyCode::Delete if self.is_selection_field() => {
                if let Some(field) = self.focused_field_mut() {
                    field.error = None;
                    preview.clear_response(&field.id);
                }
            }
            KeyCode::Char(c) => self.edit_text(preview, |input| {
                input.insert(c);
                true
            }),
            KeyCode::Backspace => self.edit_text(preview, TextInput::backspace),
            KeyCode::Delete => self.edit_text(preview, TextInput::delete),
            KeyCode::Left => self.edit_text(preview, |input| {
                input.left();
                false
            }),
            KeyCode::Right => self.edit_text(preview, |input| {
                input.right();
                false
            }),
            KeyCode::Home => self.edit_text(preview, |input| {
                input.home();
                false
            }),
            KeyCode::End => self.edit_text(preview, |input| {
                input.end();
                false
            }),
            _ => {}
        }
        FormAction::None
    }

    fn field_y_position(&self, target: usize) -> u16 {
        self.fields[..target].iter().map(FormField::height).sum()
    }

    fn total_content_height(&self) -> u16 {
        self.fields.iter().map(FormField::height).sum()
    }

    /// Adjust scroll offset so the focused field is visible.
    fn adjust_scroll(&mut self, viewport_height: u16) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let top = self.field_y_position(self.focused);
        let bottom = top + field.height();
        if top < self.scroll_offset {
            self.scroll_offset = top;
        }
        if bottom > self.scroll_offset + viewport_height {
            self.scroll_offset = bottom.saturating_sub(viewport_height);
        }
    }
}

pub(crate) fn draw_form(
    frame: &mut Frame,
    area: Rect,
    view: &mut FormView,
    preview: &Preview,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Completion
            Constraint::Min(5),    // Fields
            Constraint::Length(3), // Submit button
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    let form = preview.form();
    let title_text = if form.description.is_empty() {
        form.title.clone()
    } else {
        format!("{}\n{}", form.title, form.description)
    };
    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        );
    frame.render_widget(title, chunks[0]);

    let percent = preview.completion();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(" Completion "),
        )
        .gauge_style(Style::default().fg(if percent == 100 {
            theme.success
        } else {
            theme.secondary
        }))
        .percent(u16::from(percent))
        .label(format!("{percent}% complete"));
    frame.render_widget(gauge, chunks[1]);

    let form_area = chunks[2];
    let viewport_height = form_area.height;
    view.adjust_scroll(viewport_height);

    if view.fields.is_empty() {
        let empty = Paragraph::new("This form has no questions yet.")
            .style(Style::default().fg(theme.border))
            .alignment(Alignment::Center);
        frame.render_widget(empty, form_area);
    }

    let content_width = form_area.width.saturating_sub(2);
    let mut virtual_y: u16 = 0;
    for (index, field) in view.fields.iter().enumerate() {
        let height = field.height();
        let top = virtual_y;
        virtual_y += height;

        // Fields clipped at the top look odd, skip them
        if top < view.scroll_offset {
            continue;
        }
        let visible_top = top - view.scroll_offset;
        if visible_top >= viewport_height {
            break;
        }
        let field_area = Rect {
            x: form_area.x + 1,
            y: form_area.y + visible_top,
            width: content_width,
            height: height.min(viewport_height - visible_top),
        };
        let is_focused = !view.submit_focused && index == view.focused;
        draw_field(frame, field, preview, field_area, is_focused, theme);
    }

    let total_height = view.total_content_height();
    if total_height > viewport_height {
        let scrollbar_area = Rect {
            x: form_area.x + form_area.width.saturating_sub(1),
            y: form_area.y,
            width: 1,
            height: viewport_height,
        };
        let mut scrollbar_state = ScrollbarState::new(total_height as usize)
            .position(view.scroll_offset as usize)
            .viewport_content_length(viewport_height as usize);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }

    let submit_style = if view.submit_focused {
        Style::default()
            .fg(theme.text)
            .bg(theme.primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD)
    };
    let submit_text = if view.submit_focused {
        "  [ Submit ]  "
    } else {
        "    Submit    "
    };
    let submit_button = Paragraph::new(submit_text)
        .style(submit_style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if view.submit_focused {
                    theme.primary
                } else {
                    theme.border
                })),
        );
    frame.render_widget(submit_button, chunks[3]);

    let help_text = "Tab/↑/↓: Navigate  Space/Enter: Select  F10: Submit  Esc: Back";
    let help = Paragraph::new(help_text).style(Style::default().fg(theme.border));
    frame.render_widget(help, chunks[4]);
}

fn draw_field(
    frame: &mut Frame,
    field: &FormField,
    preview: &Preview,
    area: Rect,
    is_focused: bool,
    theme: &Theme,
) {
    let border_color = if field.error.is_some() {
        theme.error
    } else if is_focused {
        theme.primary
    } else {
        theme.border
    };

    let marker = if field.required { " *" } else { "" };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {}{} ", field.prompt, marker))
        .title_style(Style::default().fg(if is_focused {
            theme.highlight
        } else {
            theme.text
        }));
    if let Some(help) = &field.help_text
        && field.error.is_none()
    {
        block = block
            .title_bottom(Line::from(format!(" {help} ")).style(Style::default().fg(theme.border)));
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &field.input {
        FieldInput::Text { input, multiline } => {
            let width = usize::from(inner.width.max(1));
            let lines: Vec<Line> = if *multiline {
                let chars: Vec<char> = input.value().chars().collect();
                chars
                    .chunks(width)
                    .map(|chunk| Line::from(chunk.iter().collect::<String>()))
                    .collect()
            } else {
                vec![Line::from(input.value().to_string())]
            };
            let text = Paragraph::new(lines).style(Style::default().fg(theme.text));
            frame.render_widget(text, inner);

            if is_focused {
                let (row, col) = if *multiline {
                    (input.cursor() / width, input.cursor() % width)
                } else {
                    (0, input.cursor())
                };
                let cursor_x = inner.x + col as u16;
                let cursor_y = inner.y + row as u16;
                if cursor_x < inner.x + inner.width && cursor_y < inner.y + inner.height {
                    frame.set_cursor_position((cursor_x, cursor_y));
                }
            }
        }
        FieldInput::Number(input) => {
            let text =
                Paragraph::new(input.value().to_string()).style(Style::default().fg(theme.text));
            frame.render_widget(text, inner);

            if is_focused {
                let cursor_x = inner.x + input.cursor() as u16;
                if cursor_x < inner.x + inner.width {
                    frame.set_cursor_position((cursor_x, inner.y));
                }
            }
        }
        FieldInput::Select { options, highlight } => {
            let selected = preview.response(&field.id).and_then(ResponseValue::as_str);
            if options.is_empty() {
                let text = Paragraph::new("(no options)").style(Style::default().fg(theme.border));
                frame.render_widget(text, inner);
            } else {
                let items: Vec<ListItem> = options
                    .iter()
                    .enumerate()
                    .map(|(idx, option)| {
                        let is_selected = selected == Some(option.as_str());
                        let marker = if is_selected { "(●)" } else { "( )" };
                        let style = if is_focused && idx == *highlight {
                            Style::default()
                                .fg(theme.text)
                                .bg(theme.selected_bg)
                                .add_modifier(Modifier::BOLD)
                        } else if is_selected {
                            Style::default().fg(theme.highlight)
                        } else {
                            Style::default().fg(theme.text)
                        };
                        ListItem::new(format!("{marker} {option}")).style(style)
                    })
                    .collect();
                frame.render_widget(List::new(items), inner);
            }
        }
    }

    if let Some(error) = &field.error {
        let error_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        let error_text =
            Paragraph::new(format!("⚠ {error}")).style(Style::default().fg(theme.error));
        frame.render_widget(error_text, error_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft::{
        CompletionBasis, FormEditor, QuestionPatch, QuestionType, SequentialIds, validate_all,
    };

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(view: &mut FormView, preview: &mut Preview, text: &str) {
        for c in text.chars() {
            view.handle_key(key(KeyCode::Char(c)), preview);
        }
    }

    fn preview() -> (Preview, QuestionId, QuestionId) {
        let mut editor = FormEditor::with_id_source(Box::new(SequentialIds::new()));
        let age = editor.append(QuestionType::Number);
        let colour = editor.append(QuestionType::SingleSelect);
        editor.update_by_id(&age, QuestionPatch::new().prompt("Age").required(true));
        editor.update_by_id(
            &colour,
            QuestionPatch::new()
                .prompt("Colour")
                .required(true)
                .options(vec!["Red".into(), "Blue".into()]),
        );
        (Preview::new(editor.form(), CompletionBasis::Required), age, colour)
    }

    #[test]
    fn typing_a_number_sets_a_number_response() {
        let (mut preview, age, _) = preview();
        let mut view = FormView::new(preview.form(), preview.responses());
        type_text(&mut view, &mut preview, "42");
        assert_eq!(preview.response(&age), Some(&ResponseValue::Number(42.0)));
        assert_eq!(preview.completion(), 50);

        view.handle_key(key(KeyCode::Backspace), &mut preview);
        view.handle_key(key(KeyCode::Backspace), &mut preview);
        assert_eq!(preview.response(&age), None);
    }

    #[test]
    fn unparseable_number_is_kept_as_text() {
        let (mut preview, age, _) = preview();
        let mut view = FormView::new(preview.form(), preview.responses());
        type_text(&mut view, &mut preview, "4x");
        assert_eq!(preview.response(&age), Some(&ResponseValue::from("4x")));
    }

    #[test]
    fn select_with_arrows_and_enter() {
        let (mut preview, _, colour) = preview();
        let mut view = FormView::new(preview.form(), preview.responses());
        view.handle_key(key(KeyCode::Tab), &mut preview);
        assert_eq!(view.focused_id(), Some(colour));

        view.handle_key(key(KeyCode::Down), &mut preview);
        view.handle_key(key(KeyCode::Enter), &mut preview);
        assert_eq!(preview.response(&colour), Some(&ResponseValue::from("Blue")));

        view.handle_key(key(KeyCode::Backspace), &mut preview);
        assert_eq!(preview.response(&colour), None);
    }

    #[test]
    fn enter_on_submit_button_submits() {
        let (mut preview, _, _) = preview();
        let mut view = FormView::new(preview.form(), preview.responses());
        view.handle_key(key(KeyCode::Tab), &mut preview);
        view.handle_key(key(KeyCode::Tab), &mut preview);
        assert!(view.is_submit_focused());
        assert_eq!(view.handle_key(key(KeyCode::Enter), &mut preview), FormAction::Submit);
        assert_eq!(view.handle_key(key(KeyCode::Esc), &mut preview), FormAction::Leave);
    }

    #[test]
    fn errors_focus_first_offender_and_clear_on_edit() {
        let (mut preview, age, colour) = preview();
        let mut view = FormView::new(preview.form(), preview.responses());
        view.handle_key(key(KeyCode::Tab), &mut preview);
        view.handle_key(key(KeyCode::Tab), &mut preview);

        let report = validate_all(preview.form().questions(), preview.responses());
        view.show_errors(|id| report.error_for(id).map(ToString::to_string));
        assert_eq!(view.focused_id(), Some(age));
        assert!(view.error(&colour).is_some());

        type_text(&mut view, &mut preview, "3");
        assert_eq!(view.error(&age), None);
        assert!(view.error(&colour).is_some());
    }

    #[test]
    fn reopening_keeps_existing_answers() {
        let (mut preview, age, _) = preview();
        preview.set_response(age, 7);
        let mut view = FormView::new(preview.form(), preview.responses());
        type_text(&mut view, &mut preview, "1");
        assert_eq!(preview.response(&age), Some(&ResponseValue::Number(71.0)));
    }
}
