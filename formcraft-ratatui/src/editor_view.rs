//! The author's side: question blocks, inline text editing and the type dropdown.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formcraft::{
    Dropdown, FormEditor, ListenerRegistry, Point, Question, QuestionId, QuestionKind,
    QuestionPatch, QuestionType, Region,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::{Theme, input::TextInput};

/// Which piece of text the inline editor is changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditTarget {
    Title,
    Description,
    Prompt(QuestionId),
    HelpText(QuestionId),
    Options(QuestionId),
    Bounds(QuestionId),
}

impl EditTarget {
    fn label(&self) -> &'static str {
        match self {
            Self::Title => "form title",
            Self::Description => "form description",
            Self::Prompt(_) => "prompt",
            Self::HelpText(_) => "help text",
            Self::Options(_) => "options (comma separated)",
            Self::Bounds(_) => "range (min..max)",
        }
    }
}

/// What picking an entry in the type menu does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum MenuPurpose {
    /// Retype the selected question.
    #[default]
    ChangeType,
    /// Append a new question of the picked type.
    Add,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditorAction {
    None,
    Preview,
    Quit,
}

#[derive(Debug, Default)]
pub(crate) struct EditorView {
    selected: usize,
    first_visible: usize,
    type_menu: Dropdown,
    menu_purpose: MenuPurpose,
    editing: Option<(EditTarget, TextInput)>,
    status: Option<String>,
    /// Question index and area of every block drawn last frame.
    blocks: Vec<(usize, Rect)>,
    menu_area: Option<Rect>,
}

fn region(rect: Rect) -> Region {
    Region::new(rect.x, rect.y, rect.width, rect.height)
}

/// Parse `min..max`, either side may be blank.
fn parse_bounds(raw: &str) -> Option<(Option<f64>, Option<f64>)> {
    let bound = |side: &str| -> Option<Option<f64>> {
        let side = side.trim();
        if side.is_empty() {
            Some(None)
        } else {
            side.parse::<f64>().ok().filter(|n| n.is_finite()).map(Some)
        }
    };
    if raw.trim().is_empty() {
        return Some((None, None));
    }
    let (min, max) = raw.split_once("..")?;
    Some((bound(min)?, bound(max)?))
}

fn format_bounds(min: Option<f64>, max: Option<f64>) -> String {
    let side = |n: Option<f64>| n.map(|n| n.to_string()).unwrap_or_default();
    format!("{}..{}", side(min), side(max))
}

impl EditorView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn selected_id(&self, editor: &FormEditor) -> Option<QuestionId> {
        editor.question_at(self.selected).map(Question::id)
    }

    pub(crate) fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub(crate) fn is_type_menu_open(&self) -> bool {
        self.type_menu.is_open()
    }

    /// Drop transient UI (type menu, inline editor) before leaving the editor.
    pub(crate) fn close_menus(&mut self) {
        self.type_menu.close();
        self.editing = None;
    }

    fn clamp_selection(&mut self, editor: &FormEditor) {
        self.selected = self.selected.min(editor.len().saturating_sub(1));
    }

    pub(crate) fn handle_key(
        &mut self,
        key: KeyEvent,
        editor: &mut FormEditor,
        registry: &ListenerRegistry,
    ) -> EditorAction {
        if self.editing.is_some() {
            self.handle_edit_key(key, editor);
            return EditorAction::None;
        }
        if self.type_menu.is_open() {
            self.handle_menu_key(key, editor);
            return EditorAction::None;
        }

        self.status = None;
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return EditorAction::Quit,
            KeyCode::Char('p') => {
                self.close_menus();
                return EditorAction::Preview;
            }
            KeyCode::Up if shift => self.move_selected(editor, true),
            KeyCode::Down if shift => self.move_selected(editor, false),
            KeyCode::Char('K') => self.move_selected(editor, true),
            KeyCode::Char('J') => self.move_selected(editor, false),
            KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
                self.selected += 1;
                self.clamp_selection(editor);
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = editor.len().saturating_sub(1),
            KeyCode::Char('a') => self.open_add_menu(registry),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id(editor)
                    && editor.delete_by_id(&id).is_some()
                {
                    self.clamp_selection(editor);
                    self.status = Some("Question deleted".to_string());
                }
            }
            KeyCode::Char('r') => {
                if let Some(question) = editor.question_at(self.selected) {
                    let id = question.id();
                    let required = !question.required();
                    editor.update_by_id(&id, QuestionPatch::new().required(required));
                }
            }
            KeyCode::Char('t') | KeyCode::Enter => self.open_type_menu(editor, registry),
            KeyCode::Char('e') => self.begin_edit(editor, EditTarget::Prompt),
            KeyCode::Char('h') => self.begin_edit(editor, EditTarget::HelpText),
            KeyCode::Char('o') => self.begin_edit(editor, EditTarget::Options),
            KeyCode::Char('b') => self.begin_edit(editor, EditTarget::Bounds),
            KeyCode::Char('T') => {
                self.editing = Some((EditTarget::Title, TextInput::new(editor.title())));
            }
            KeyCode::Char('D') => {
                let description = TextInput::new(editor.description());
                self.editing = Some((EditTarget::Description, description));
            }
            KeyCode::Char('P') => {
                editor.publish();
                self.status = Some("Form published".to_string());
            }
            _ => {}
        }
        EditorAction::None
    }

    fn move_selected(&mut self, editor: &mut FormEditor, up: bool) {
        let Some(id) = self.selected_id(editor) else {
            return;
        };
        let moved = if up {
            editor.move_up(&id)
        } else {
            editor.move_down(&id)
        };
        if let Some(position) = moved.then(|| editor.position(&id)).flatten() {
            self.selected = position;
        }
    }

    fn begin_edit(&mut self, editor: &FormEditor, target: fn(QuestionId) -> EditTarget) {
        let Some(question) = editor.question_at(self.selected) else {
            return;
        };
        let target = target(question.id());
        let seed = match (target, question.kind()) {
            (EditTarget::Prompt(_), _) => question.prompt().to_string(),
            (EditTarget::HelpText(_), _) => question.help_text().unwrap_or_default().to_string(),
            (EditTarget::Options(_), QuestionKind::SingleSelect(select)) => {
                select.options.join(", ")
            }
            (EditTarget::Bounds(_), QuestionKind::Number(number)) => {
                format_bounds(number.min, number.max)
            }
            (EditTarget::Options(_), _) => {
                self.status = Some("Only single select questions have options".to_string());
                return;
            }
            (EditTarget::Bounds(_), _) => {
                self.status = Some("Only number questions have a range".to_string());
                return;
            }
            (EditTarget::Title | EditTarget::Description, _) => return,
        };
        self.editing = Some((target, TextInput::new(seed)));
    }

    fn handle_edit_key(&mut self, key: KeyEvent, editor: &mut FormEditor) {
        let Some((_, input)) = self.editing.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.editing = None,
            KeyCode::Enter => self.commit_edit(editor),
            KeyCode::Char(c) => input.insert(c),
            KeyCode::Backspace => {
                input.backspace();
            }
            KeyCode::Delete => {
                input.delete();
            }
            KeyCode::Left => input.left(),
            KeyCode::Right => input.right(),
            KeyCode::Home => input.home(),
            KeyCode::End => input.end(),
            _ => {}
        }
    }

    fn commit_edit(&mut self, editor: &mut FormEditor) {
        let Some((target, input)) = self.editing.take() else {
            return;
        };
        let value = input.value().trim().to_string();
        match target {
            EditTarget::Title => editor.set_title(value),
            EditTarget::Description => editor.set_description(value),
            EditTarget::Prompt(id) => {
                editor.update_by_id(&id, QuestionPatch::new().prompt(value));
            }
            EditTarget::HelpText(id) => {
                let help_text = Some(value).filter(|text| !text.is_empty());
                editor.update_by_id(&id, QuestionPatch::new().help_text(help_text));
            }
            EditTarget::Options(id) => {
                let options = value
                    .split(',')
                    .map(str::trim)
                    .filter(|option| !option.is_empty())
                    .map(str::to_string)
                    .collect();
                editor.update_by_id(&id, QuestionPatch::new().options(options));
            }
            EditTarget::Bounds(id) => match parse_bounds(&value) {
                Some((min, max)) => {
                    editor.update_by_id(&id, QuestionPatch::new().bounds(min, max));
                }
                None => {
                    self.status =
                        Some("A range looks like 0..100 (either side may be blank)".to_string());
                    self.editing = Some((target, input));
                }
            },
        }
    }

    fn open_type_menu(&mut self, editor: &FormEditor, registry: &ListenerRegistry) {
        let Some(question) = editor.question_at(self.selected) else {
            return;
        };
        let current = QuestionType::ALL
            .iter()
            .position(|t| *t == question.question_type())
            .unwrap_or(0);
        self.menu_purpose = MenuPurpose::ChangeType;
        self.type_menu.set_highlight(current);
        self.type_menu.open(registry);
    }

    fn open_add_menu(&mut self, registry: &ListenerRegistry) {
        self.menu_purpose = MenuPurpose::Add;
        self.type_menu.set_highlight(0);
        self.type_menu.open(registry);
    }

    fn handle_menu_key(&mut self, key: KeyEvent, editor: &mut FormEditor) {
        let len = QuestionType::ALL.len();
        match key.code {
            KeyCode::Esc => self.type_menu.close(),
            KeyCode::Up | KeyCode::Char('k') => self.type_menu.move_highlight(-1, len),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.type_menu.move_highlight(1, len);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.choose_type(self.type_menu.highlight(), editor);
            }
            KeyCode::Char(c) => {
                if let Some(index) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1))
                    && index < len
                {
                    self.choose_type(index, editor);
                }
            }
            _ => {}
        }
    }

    fn choose_type(&mut self, index: usize, editor: &mut FormEditor) {
        self.type_menu.close();
        let Some(question_type) = QuestionType::ALL.get(index).copied() else {
            return;
        };
        match self.menu_purpose {
            MenuPurpose::Add => {
                let id = editor.append(question_type);
                self.selected = editor.len() - 1;
                self.editing = Some((EditTarget::Prompt(id), TextInput::default()));
            }
            MenuPurpose::ChangeType => {
                if let Some(id) = self.selected_id(editor)
                    && editor.change_type(&id, question_type).is_some()
                {
                    self.status = Some(format!("Changed to {question_type}"));
                }
            }
        }
    }

    /// Handle a left click after the listener registry has seen it.
    pub(crate) fn handle_click(&mut self, at: Point, editor: &mut FormEditor) {
        if self.editing.is_some() {
            return;
        }
        if self.type_menu.is_open() {
            if let Some(area) = self.menu_area
                && region(area).contains(at)
            {
                let row = at.y.saturating_sub(area.y + 1) as usize;
                if at.y > area.y && row < QuestionType::ALL.len() {
                    self.choose_type(row, editor);
                }
            }
            return;
        }
        if let Some((index, _)) = self
            .blocks
            .iter()
            .find(|(_, area)| region(*area).contains(at))
        {
            self.selected = *index;
        }
    }

    /// Scroll so the selected block fits into `viewport_height` rows.
    fn ensure_visible(&mut self, heights: &[u16], viewport_height: u16) {
        if self.selected < self.first_visible {
            self.first_visible = self.selected;
        }
        while self.first_visible < self.selected
            && heights[self.first_visible..=self.selected].iter().sum::<u16>() > viewport_height
        {
            self.first_visible += 1;
        }
    }
}

fn detail_lines(question: &Question) -> Vec<String> {
    let mut lines = vec![format!("Type: {} ▾", question.question_type())];
    if let Some(help) = question.help_text() {
        lines.push(format!("Help: {help}"));
    }
    match question.kind() {
        QuestionKind::SingleSelect(select) if select.options.is_empty() => {
            lines.push("Options: (none)".to_string());
        }
        QuestionKind::SingleSelect(select) => {
            lines.push(format!("Options: {}", select.options.join(" · ")));
        }
        QuestionKind::Number(number) if number.min.is_some() || number.max.is_some() => {
            lines.push(format!("Range: {}", format_bounds(number.min, number.max)));
        }
        QuestionKind::ShortAnswer(short) => {
            if let Some(max) = short.max_length {
                lines.push(format!("Max length: {max}"));
            }
        }
        _ => {}
    }
    lines
}

pub(crate) fn draw_editor(
    frame: &mut Frame,
    area: Rect,
    view: &mut EditorView,
    editor: &FormEditor,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Form title
            Constraint::Min(5),    // Questions
            Constraint::Length(3), // Inline editor / status
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    let published = if editor.is_published() {
        "  [published]"
    } else {
        ""
    };
    let count = match editor.len() {
        1 => "1 question".to_string(),
        n => format!("{n} questions"),
    };
    let mut header = vec![Line::from(format!("{}{published}  ({count})", editor.title()))];
    if !editor.description().is_empty() {
        let description = Line::from(editor.description().to_string());
        header.push(description.style(Style::default().fg(theme.text)));
    }
    let title = Paragraph::new(header)
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

    let list_area = chunks[1];
    view.blocks.clear();
    view.menu_area = None;
    if editor.is_empty() {
        let empty = Paragraph::new("No questions yet. Press a to add one.")
            .style(Style::default().fg(theme.border))
            .alignment(Alignment::Center);
        frame.render_widget(empty, list_area);
    } else {
        let details: Vec<Vec<String>> = editor.questions().map(detail_lines).collect();
        let heights: Vec<u16> = details.iter().map(|lines| lines.len() as u16 + 2).collect();
        view.ensure_visible(&heights, list_area.height);

        let mut y = list_area.y;
        let bottom = list_area.y + list_area.height;
        for (index, question) in editor.questions().enumerate().skip(view.first_visible) {
            if y >= bottom {
                break;
            }
            let block_area = Rect {
                x: list_area.x,
                y,
                width: list_area.width,
                height: heights[index].min(bottom - y),
            };
            y += heights[index];
            let is_selected = index == view.selected;
            draw_question(
                frame,
                question,
                index,
                &details[index],
                block_area,
                is_selected,
                theme,
            );
            view.blocks.push((index, block_area));
        }
    }

    let anchor = match view.menu_purpose {
        MenuPurpose::ChangeType => view
            .blocks
            .iter()
            .find(|(index, _)| *index == view.selected)
            .map(|(_, block)| Rect { y: block.y + 2, ..*block }),
        MenuPurpose::Add => Some(list_area),
    };
    if view.type_menu.is_open()
        && let Some(anchor) = anchor
    {
        let (title, current) = match view.menu_purpose {
            MenuPurpose::ChangeType => (
                " Type ",
                editor.question_at(view.selected).map(Question::question_type),
            ),
            MenuPurpose::Add => (" Add question ", None),
        };
        let menu_area = Rect {
            x: anchor.x + 2,
            y: anchor.y,
            width: 22,
            height: QuestionType::ALL.len() as u16 + 2,
        }
        .intersection(area);
        let highlight = view.type_menu.highlight();
        draw_type_menu(frame, menu_area, title, highlight, current, theme);
        view.type_menu.set_region(region(menu_area));
        view.menu_area = Some(menu_area);
    }

    match &view.editing {
        Some((target, input)) => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.highlight))
                .title(format!(" Edit {} (Enter: save, Esc: cancel) ", target.label()));
            let inner = block.inner(chunks[2]);
            frame.render_widget(block, chunks[2]);
            frame.render_widget(
                Paragraph::new(input.value().to_string()).style(Style::default().fg(theme.text)),
                inner,
            );
            let cursor_x = inner.x + input.cursor() as u16;
            if cursor_x < inner.x + inner.width {
                frame.set_cursor_position((cursor_x, inner.y));
            }
        }
        None => {
            let status = Paragraph::new(view.status.clone().unwrap_or_default())
                .style(Style::default().fg(theme.success))
                .block(
                    Block::default()
                        .borders(Borders::TOP)
                        .border_style(Style::default().fg(theme.border)),
                );
            frame.render_widget(status, chunks[2]);
        }
    }

    let help_text = "a: Add  t: Type  e: Prompt  h: Help  o: Options  b: Range  r: Required  \
                     K/J: Move  d: Delete  T/D: Title  P: Publish  p: Preview  q: Quit";
    let help = Paragraph::new(help_text).style(Style::default().fg(theme.border));
    frame.render_widget(help, chunks[3]);
}

fn draw_question(
    frame: &mut Frame,
    question: &Question,
    index: usize,
    details: &[String],
    area: Rect,
    is_selected: bool,
    theme: &Theme,
) {
    let prompt = if question.prompt().is_empty() {
        "(untitled question)"
    } else {
        question.prompt()
    };
    let marker = if question.required() { " *" } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if is_selected {
            theme.primary
        } else {
            theme.border
        }))
        .title(format!(" {}. {prompt}{marker} ", index + 1))
        .title_style(Style::default().fg(if is_selected {
            theme.highlight
        } else {
            theme.text
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = details.iter().map(|line| Line::from(line.as_str())).collect();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(theme.text)),
        inner,
    );
}

fn draw_type_menu(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    highlight: usize,
    current: Option<QuestionType>,
    theme: &Theme,
) {
    let items: Vec<ListItem> = QuestionType::ALL
        .iter()
        .enumerate()
        .map(|(idx, question_type)| {
            let marker = if current == Some(*question_type) {
                "●"
            } else {
                " "
            };
            let style = if idx == highlight {
                Style::default()
                    .fg(theme.text)
                    .bg(theme.selected_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(format!("{marker} {} {question_type}", idx + 1)).style(style)
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(title),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(list, area);
}
