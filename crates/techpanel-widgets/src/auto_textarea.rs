//! Multi-line text box that grows with its content.
//!
//! The box is as tall as its wrapped text, up to `max_rows`. Past that it
//! stops growing and scrolls, showing a scrollbar.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;
use techpanel_core::{Command, Component};

use crate::runeutil::wrap_to_width;

#[derive(Debug, Clone)]
pub enum Message {
    KeyPress(KeyEvent),
    Paste(String),
    /// Emitted when the text changes.
    Changed(String),
}

/// Computed size of the text region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fit {
    /// Visible text rows.
    pub rows: u16,
    /// Content is taller than the box and must scroll.
    pub overflow: bool,
}

pub struct AutoResizeTextArea {
    caption: String,
    value: Vec<char>,
    cursor: usize,
    max_rows: u16,
    focus: bool,
    text_style: Style,
    cursor_style: Style,
    border_style: Style,
    focused_border_style: Style,
}

impl AutoResizeTextArea {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            value: Vec::new(),
            cursor: 0,
            max_rows: 6,
            focus: false,
            text_style: Style::default(),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            border_style: Style::default().fg(Color::DarkGray),
            focused_border_style: Style::default().fg(Color::Cyan),
        }
    }

    pub fn with_max_rows(mut self, rows: u16) -> Self {
        self.max_rows = rows.max(1);
        self
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Load stored text. Surrounding whitespace is trimmed.
    pub fn set_value(&mut self, text: &str) {
        self.value = text.trim().chars().collect();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Text as drawn. A focused cursor past the last character takes one
    /// more cell, which can start a new row.
    fn display_text(&self) -> String {
        let mut text = self.value();
        if self.focus && self.cursor == self.value.len() {
            text.push(' ');
        }
        text
    }

    /// Size for a text region `width` cells wide.
    pub fn fit(&self, width: u16) -> Fit {
        let rows = wrap_to_width(&self.display_text(), usize::from(width)).len();
        let rows = u16::try_from(rows).unwrap_or(u16::MAX);
        if rows > self.max_rows {
            Fit {
                rows: self.max_rows,
                overflow: true,
            }
        } else {
            Fit { rows, overflow: false }
        }
    }

    /// Outer height, borders included, for a box `outer_width` cells wide.
    pub fn height_for(&self, outer_width: u16) -> u16 {
        self.fit(outer_width.saturating_sub(2)).rows + 2
    }

    /// Row holding the cursor cell. A cursor on a newline is drawn at the
    /// end of its line, anywhere else it covers the next character.
    fn cursor_row(&self, width: u16) -> usize {
        let mut upto: String = self.value[..self.cursor].iter().collect();
        match self.value.get(self.cursor) {
            Some('\n') => {}
            Some(c) => upto.push(*c),
            None => upto.push(' '),
        }
        wrap_to_width(&upto, usize::from(width)).len() - 1
    }

    fn insert(&mut self, text: &str) -> Command<Message> {
        let chars: Vec<char> = text
            .chars()
            .filter(|c| *c == '\n' || !c.is_control())
            .collect();
        if chars.is_empty() {
            return Command::none();
        }
        let count = chars.len();
        self.value.splice(self.cursor..self.cursor, chars);
        self.cursor += count;
        Command::message(Message::Changed(self.value()))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert(&c.to_string()),
            (KeyCode::Enter, _) => self.insert("\n"),
            (KeyCode::Backspace, _) if self.cursor > 0 => {
                self.cursor -= 1;
                self.value.remove(self.cursor);
                Command::message(Message::Changed(self.value()))
            }
            (KeyCode::Delete, _) if self.cursor < self.value.len() => {
                self.value.remove(self.cursor);
                Command::message(Message::Changed(self.value()))
            }
            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                Command::none()
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.value.len());
                Command::none()
            }
            (KeyCode::Home, _) => {
                self.cursor = 0;
                Command::none()
            }
            (KeyCode::End, _) => {
                self.cursor = self.value.len();
                Command::none()
            }
            _ => Command::none(),
        }
    }
}

impl Component for AutoResizeTextArea {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        if !self.focus {
            return Command::none();
        }
        match msg {
            Message::KeyPress(key) => self.handle_key(key),
            Message::Paste(text) => self.insert(&text),
            Message::Changed(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.focus {
                self.focused_border_style
            } else {
                self.border_style
            })
            .title(self.caption.as_str());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let display = self.display_text();
        let text: Vec<char> = display.chars().collect();
        let rows = wrap_to_width(&display, usize::from(inner.width));
        let visible = usize::from(inner.height);
        let cursor_row = self.cursor_row(inner.width);
        let offset = (cursor_row + 1).saturating_sub(visible);

        let mut consumed = 0usize;
        let mut lines = Vec::with_capacity(visible);
        for (i, row) in rows.iter().enumerate() {
            let end = consumed + row.chars().count();
            let ends_line = end >= text.len() || text[end] == '\n';
            if i >= offset && i < offset + visible {
                lines.push(self.render_row(row, consumed, ends_line));
            }
            // Rows produced by a newline consume it too.
            consumed = if ends_line { end + 1 } else { end };
        }
        frame.render_widget(Paragraph::new(lines), inner);

        if rows.len() > visible {
            let mut state = ScrollbarState::new(rows.len()).position(offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut state,
            );
        }
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

impl AutoResizeTextArea {
    /// `start` is the char index of the row's first character. A cursor
    /// sitting on a soft wrap belongs to the next row.
    fn render_row(&self, row: &str, start: usize, ends_line: bool) -> Line<'static> {
        let len = row.chars().count();
        let on_row = self.cursor >= start && (self.cursor < start + len || (ends_line && self.cursor == start + len));
        if !self.focus || !on_row {
            return Line::from(Span::styled(row.to_string(), self.text_style));
        }
        let at = self.cursor - start;
        let before: String = row.chars().take(at).collect();
        let cursor: String = row.chars().nth(at).map_or(" ".to_string(), |c| c.to_string());
        let after: String = row.chars().skip(at + 1).collect();
        Line::from(vec![
            Span::styled(before, self.text_style),
            Span::styled(cursor, self.cursor_style),
            Span::styled(after, self.text_style),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_trims_whitespace() {
        let mut area = AutoResizeTextArea::new("Comment");
        area.set_value("  hello \n\n");
        assert_eq!(area.value(), "hello");
    }

    #[test]
    fn grows_with_content() {
        let mut area = AutoResizeTextArea::new("Comment").with_max_rows(4);
        assert_eq!(area.fit(10), Fit { rows: 1, overflow: false });
        area.set_value("line one\nline two");
        assert_eq!(area.fit(10), Fit { rows: 2, overflow: false });
        assert_eq!(area.height_for(12), 4);
    }

    #[test]
    fn clamps_and_scrolls_past_max() {
        let mut area = AutoResizeTextArea::new("Comment").with_max_rows(3);
        area.set_value(&"x".repeat(50));
        assert_eq!(area.fit(10), Fit { rows: 3, overflow: true });
    }

    #[test]
    fn enter_inserts_newline_when_focused() {
        let mut area = AutoResizeTextArea::new("Comment");
        area.focus();
        area.update(Message::KeyPress(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)));
        area.update(Message::KeyPress(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        area.update(Message::Paste("b".into()));
        assert_eq!(area.value(), "a\nb");
        assert_eq!(area.fit(20).rows, 2);
    }

    #[test]
    fn cursor_after_a_full_row_gets_its_own_row() {
        let mut area = AutoResizeTextArea::new("C").with_max_rows(4);
        area.set_value("abcd");
        assert_eq!(area.fit(4), Fit { rows: 1, overflow: false });
        area.focus();
        assert_eq!(area.fit(4), Fit { rows: 2, overflow: false });
        assert_eq!(area.cursor_row(4), 1);

        let outer = Rect::new(0, 0, 6, area.height_for(6));
        let backend = ratatui::backend::TestBackend::new(6, outer.height);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|f| area.view(f, outer)).unwrap();
        let buf = terminal.backend().buffer();
        assert!(buf[(1, 2)].modifier.contains(Modifier::REVERSED));
        assert!(!buf[(4, 1)].modifier.contains(Modifier::REVERSED));
        // No scrollbar over the right border.
        assert_eq!(buf[(5, 1)].symbol(), "│");
        assert_eq!(buf[(5, 2)].symbol(), "│");
    }

    #[test]
    fn cursor_on_soft_wrap_is_on_the_next_row() {
        let mut area = AutoResizeTextArea::new("C");
        area.set_value("abcdef");
        area.focus();
        area.update(Message::KeyPress(KeyEvent::new(KeyCode::Home, KeyModifiers::NONE)));
        for _ in 0..4 {
            area.update(Message::KeyPress(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)));
        }
        assert_eq!(area.cursor_row(4), 1);
    }

    #[test]
    fn cursor_row_tracks_wrapping() {
        let mut area = AutoResizeTextArea::new("Comment");
        area.set_value("abcdefgh\nij");
        assert_eq!(area.cursor_row(4), 2);
        area.update(Message::KeyPress(KeyEvent::new(KeyCode::Home, KeyModifiers::NONE)));
        // unfocused: keys ignored
        assert_eq!(area.cursor_row(4), 2);
    }
}
