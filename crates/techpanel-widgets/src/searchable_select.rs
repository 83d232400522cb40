//! Searchable single-choice dropdown.
//!
//! Closed, the widget shows the selected label. Activated, the label line
//! turns into a search box and a list of options opens below it (or above,
//! when there is no room). Typing filters the list by case-insensitive
//! substring; picking an option closes the widget again.
//!
//! A select never closes its siblings by itself: put every select of a
//! screen into a [`DropdownGroup`](crate::dropdown_group::DropdownGroup),
//! which keeps at most one of them open.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use techpanel_core::{Command, Component};

use crate::runeutil::truncate_to_width;

/// One entry of the option list. The key is the option's position in the
/// list it was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub key: usize,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownState {
    #[default]
    Closed,
    Open,
}

/// Emitted by notifying selects when the selected label changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Identifier of the select that changed.
    pub source: String,
    /// The newly selected label.
    pub value: String,
}

impl ChangeEvent {
    /// Event name as listeners know it, e.g. `subjectChanged`.
    pub fn name(&self) -> String {
        format!("{}Changed", self.source)
    }
}

/// Messages for the select component.
#[derive(Debug, Clone)]
pub enum Message {
    KeyPress(KeyEvent),
    /// Open the list. Siblings are not touched; see `DropdownGroup`.
    Activate,
    Close,
    Filter(String),
    /// Pick the option with this key.
    Select(usize),
    /// Output: the selection changed on a notifying select.
    Changed(ChangeEvent),
}

#[derive(Debug, Clone)]
pub struct SelectStyle {
    pub label: Style,
    pub placeholder: Style,
    pub option: Style,
    pub highlighted: Style,
    pub border: Style,
    pub open_border: Style,
}

impl Default for SelectStyle {
    fn default() -> Self {
        Self {
            label: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            option: Style::default(),
            highlighted: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            open_border: Style::default().fg(Color::Cyan),
        }
    }
}

/// Cursor over the currently visible options, with scrolling.
#[derive(Debug, Default)]
struct ListCursor {
    cursor: usize,
    offset: usize,
    count: usize,
    rows: usize,
}

impl ListCursor {
    fn reset(&mut self, count: usize) {
        self.cursor = 0;
        self.offset = 0;
        self.count = count;
    }

    fn move_by(&mut self, down: bool) {
        if self.count == 0 {
            return;
        }
        self.cursor = match (down, self.cursor) {
            (true, c) if c + 1 >= self.count => 0,
            (true, c) => c + 1,
            (false, 0) => self.count - 1,
            (false, c) => c - 1,
        };
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.rows > 0 && self.cursor >= self.offset + self.rows {
            self.offset = self.cursor + 1 - self.rows;
        }
    }

    /// First option shown when only `rows` fit on screen. The list can be
    /// shorter than `self.rows` near the screen edge; the highlight stays
    /// in view either way.
    fn first_row(&self, rows: usize) -> usize {
        if rows > 0 && self.cursor >= self.offset + rows {
            self.cursor + 1 - rows
        } else {
            self.offset.min(self.cursor)
        }
    }
}

/// A dropdown whose option list can be narrowed by typing.
///
/// ```ignore
/// let subject = SearchableSelect::new("subject", ["Python", "Scratch"])
///     .with_caption("Subject")
///     .notifying(true);
/// ```
pub struct SearchableSelect {
    id: String,
    caption: String,
    placeholder: String,
    options: Vec<DropdownOption>,
    /// Parallel to `options`.
    shown: Vec<bool>,
    selected: String,
    filter: String,
    state: DropdownState,
    notify: bool,
    focus: bool,
    max_rows: usize,
    cursor: ListCursor,
    style: SelectStyle,
}

impl SearchableSelect {
    pub fn new<I, S>(id: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut select = Self {
            id: id.into(),
            caption: String::new(),
            placeholder: "Select...".to_string(),
            options: Vec::new(),
            shown: Vec::new(),
            selected: String::new(),
            filter: String::new(),
            state: DropdownState::Closed,
            notify: false,
            focus: false,
            max_rows: 8,
            cursor: ListCursor::default(),
            style: SelectStyle::default(),
        };
        select.set_options(labels);
        select.cursor.rows = select.max_rows;
        select
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Whether selection changes are announced with [`Message::Changed`].
    pub fn notifying(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }

    pub fn with_max_rows(mut self, rows: usize) -> Self {
        self.max_rows = rows.max(1);
        self.cursor.rows = self.max_rows;
        self
    }

    pub fn with_style(mut self, style: SelectStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the option list. The selected label is kept even when it is
    /// no longer among the options.
    pub fn set_options<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = labels
            .into_iter()
            .enumerate()
            .map(|(key, label)| DropdownOption {
                key,
                label: label.into(),
            })
            .collect();
        self.apply_filter();
    }

    /// Set the selected label without notifying (restoring a draft).
    pub fn set_selected_label(&mut self, label: impl Into<String>) {
        self.selected = label.into();
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Keyboard focus only changes the border; input is routed by the owner.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn state(&self) -> DropdownState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DropdownState::Open
    }

    pub fn is_notifying(&self) -> bool {
        self.notify
    }

    pub fn selected_label(&self) -> &str {
        &self.selected
    }

    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    /// Options passing the current filter, in their original order.
    pub fn visible_options(&self) -> impl Iterator<Item = &DropdownOption> {
        self.options
            .iter()
            .zip(self.shown.iter())
            .filter_map(|(opt, shown)| shown.then_some(opt))
    }

    pub fn is_shown(&self, key: usize) -> bool {
        self.shown.get(key).copied().unwrap_or(false)
    }

    /// The visible option under the keyboard highlight.
    pub fn highlighted(&self) -> Option<&DropdownOption> {
        self.visible_options().nth(self.cursor.cursor)
    }

    /// Closed → Open. Resets the filter so every option is shown.
    pub fn activate(&mut self) {
        self.state = DropdownState::Open;
        self.filter.clear();
        self.apply_filter();
    }

    /// Open → Closed. The search box is emptied.
    pub fn close(&mut self) {
        self.state = DropdownState::Closed;
        self.filter.clear();
        self.apply_filter();
    }

    /// Show only options whose label contains `substring`, ignoring case.
    /// An empty substring shows everything.
    pub fn filter(&mut self, substring: &str) {
        self.filter = substring.to_string();
        self.apply_filter();
    }

    /// Make `key` the selected option and close. Returns the change event
    /// when the label changed and this select is notifying.
    ///
    /// Hidden or unknown keys are ignored: only visible rows can be picked.
    pub fn select(&mut self, key: usize) -> Option<ChangeEvent> {
        if !self.is_shown(key) {
            return None;
        }
        let label = self.options[key].label.clone();
        let previous = std::mem::replace(&mut self.selected, label);
        self.close();

        if previous == self.selected || !self.notify {
            return None;
        }
        tracing::debug!(select = %self.id, value = %self.selected, "selection changed");
        Some(ChangeEvent {
            source: self.id.clone(),
            value: self.selected.clone(),
        })
    }

    fn apply_filter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.shown = self
            .options
            .iter()
            .map(|opt| needle.is_empty() || opt.label.to_lowercase().contains(&needle))
            .collect();
        let count = self.shown.iter().filter(|s| **s).count();
        self.cursor.reset(count);
    }

    fn change_command(change: Option<ChangeEvent>) -> Command<Message> {
        change.map_or_else(Command::none, |c| Command::message(Message::Changed(c)))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        if !self.is_open() {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.activate();
                    Command::none()
                }
                _ => Command::none(),
            };
        }

        match key.code {
            KeyCode::Esc => self.close(),
            KeyCode::Up => self.cursor.move_by(false),
            KeyCode::Down => self.cursor.move_by(true),
            KeyCode::Enter => {
                let key = self.highlighted().map(|o| o.key);
                return match key {
                    Some(k) => Self::change_command(self.select(k)),
                    None => Command::none(),
                };
            }
            KeyCode::Backspace => {
                let mut text = self.filter.clone();
                text.pop();
                self.filter(&text);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let text = format!("{}{}", self.filter, c);
                self.filter(&text);
            }
            _ => {}
        }
        Command::none()
    }

    // --- Geometry ---

    /// Height of the option list overlay for the current filter, borders
    /// included. Never zero: an empty result still shows "No matches".
    pub fn list_height(&self) -> u16 {
        let visible = self.shown.iter().filter(|s| **s).count();
        visible.clamp(1, self.max_rows) as u16 + 2
    }

    /// Where the option list goes: below the anchor when it fits inside
    /// `bounds`, otherwise above.
    pub fn list_area(&self, anchor: Rect, bounds: Rect) -> Rect {
        let height = self.list_height();
        let below = anchor.y + anchor.height;
        if below + height <= bounds.y + bounds.height || anchor.y < bounds.y + height {
            let height = height.min((bounds.y + bounds.height).saturating_sub(below));
            Rect::new(anchor.x, below, anchor.width, height)
        } else {
            Rect::new(anchor.x, anchor.y - height, anchor.width, height)
        }
    }

    /// Map a click inside the list overlay to an option key.
    pub fn option_at(&self, list_area: Rect, column: u16, row: u16) -> Option<usize> {
        let inner = Block::default().borders(Borders::ALL).inner(list_area);
        let inside = column >= inner.x
            && column < inner.x + inner.width
            && row >= inner.y
            && row < inner.y + inner.height;
        if !inside {
            return None;
        }
        let index = self.cursor.first_row(inner.height as usize) + (row - inner.y) as usize;
        self.visible_options().nth(index).map(|o| o.key)
    }

    /// Render the open list. Call after everything else so it stays on top.
    pub fn view_list(&self, frame: &mut Frame, anchor: Rect, bounds: Rect) {
        if !self.is_open() {
            return;
        }
        let area = self.list_area(anchor, bounds);
        if area.height < 3 || area.width < 4 {
            return;
        }
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.style.open_border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let max_text = inner.width.saturating_sub(2) as usize;
        let mut lines: Vec<Line> = self
            .visible_options()
            .enumerate()
            .skip(self.cursor.first_row(inner.height as usize))
            .take(inner.height as usize)
            .map(|(i, opt)| {
                let (prefix, style) = if i == self.cursor.cursor {
                    ("▸ ", self.style.highlighted)
                } else {
                    ("  ", self.style.option)
                };
                Line::from(Span::styled(
                    format!("{prefix}{}", truncate_to_width(&opt.label, max_text)),
                    style,
                ))
            })
            .collect();
        if lines.is_empty() {
            lines.push(Line::from(Span::styled("  No matches", self.style.placeholder)));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for SearchableSelect {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => self.handle_key(key),
            Message::Activate => {
                self.activate();
                Command::none()
            }
            Message::Close => {
                self.close();
                Command::none()
            }
            Message::Filter(text) => {
                self.filter(&text);
                Command::none()
            }
            Message::Select(key) => Self::change_command(self.select(key)),
            Message::Changed(_) => Command::none(),
        }
    }

    /// Render the trigger box: the selected label when closed, the search
    /// box when open.
    fn view(&self, frame: &mut Frame, area: Rect) {
        let border = if self.is_open() || self.focus {
            self.style.open_border
        } else {
            self.style.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(self.caption.as_str());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let max_text = inner.width.saturating_sub(2) as usize;
        let line = if self.is_open() {
            Line::from(vec![
                Span::styled("/ ", self.style.placeholder),
                Span::styled(truncate_to_width(&self.filter, max_text), self.style.label),
                Span::styled("▏", self.style.highlighted),
            ])
        } else if self.selected.is_empty() {
            Line::from(vec![
                Span::styled(truncate_to_width(&self.placeholder, max_text), self.style.placeholder),
                Span::styled(" ▾", self.style.placeholder),
            ])
        } else {
            Line::from(vec![
                Span::styled(truncate_to_width(&self.selected, max_text), self.style.label),
                Span::styled(" ▾", self.style.placeholder),
            ])
        };
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn focused(&self) -> bool {
        self.focus || self.is_open()
    }
}
