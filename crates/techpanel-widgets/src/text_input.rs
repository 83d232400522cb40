//! Single-line text field, optionally masked.
//!
//! Used for short form values (group number, link, dates) and for the admin
//! token, which is shown masked.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use techpanel_core::{Command, Component};

/// How the value is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EchoMode {
    #[default]
    Normal,
    /// Every character shown as the mask character.
    Password(char),
}

#[derive(Debug, Clone)]
pub struct TextInputStyle {
    pub text: Style,
    pub placeholder: Style,
    pub cursor: Style,
    pub border: Style,
    pub focused_border: Style,
}

impl Default for TextInputStyle {
    fn default() -> Self {
        Self {
            text: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            border: Style::default().fg(Color::DarkGray),
            focused_border: Style::default().fg(Color::Cyan),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    KeyPress(KeyEvent),
    Paste(String),
    /// Emitted when the value changes.
    Changed(String),
    /// Emitted on Enter.
    Submit(String),
}

pub struct TextInput {
    value: Vec<char>,
    cursor: usize,
    focus: bool,
    caption: String,
    placeholder: String,
    char_limit: Option<usize>,
    echo_mode: EchoMode,
    style: TextInputStyle,
}

impl TextInput {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            value: Vec::new(),
            cursor: 0,
            focus: false,
            caption: caption.into(),
            placeholder: String::new(),
            char_limit: None,
            echo_mode: EchoMode::Normal,
            style: TextInputStyle::default(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_echo_mode(mut self, mode: EchoMode) -> Self {
        self.echo_mode = mode;
        self
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = Some(limit);
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

    /// Replace the value and move the cursor to the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().collect();
        if let Some(limit) = self.char_limit {
            self.value.truncate(limit);
        }
        self.cursor = self.value.len();
    }

    pub fn reset(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn room(&self) -> usize {
        self.char_limit
            .map_or(usize::MAX, |limit| limit.saturating_sub(self.value.len()))
    }

    fn insert(&mut self, text: &str) -> Command<Message> {
        let chars: Vec<char> = text
            .chars()
            .filter(|c| !c.is_control())
            .take(self.room())
            .collect();
        if chars.is_empty() {
            return Command::none();
        }
        let count = chars.len();
        self.value.splice(self.cursor..self.cursor, chars);
        self.cursor += count;
        Command::message(Message::Changed(self.value()))
    }

    fn display(&self) -> String {
        match self.echo_mode {
            EchoMode::Normal => self.value(),
            EchoMode::Password(mask) => std::iter::repeat_n(mask, self.value.len()).collect(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('u'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.value.drain(..self.cursor);
                self.cursor = 0;
                Command::message(Message::Changed(self.value()))
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert(&c.to_string())
            }
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
            (KeyCode::Enter, _) => Command::message(Message::Submit(self.value())),
            _ => Command::none(),
        }
    }
}

impl Component for TextInput {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        if !self.focus {
            return Command::none();
        }
        match msg {
            Message::KeyPress(key) => self.handle_key(key),
            Message::Paste(text) => self.insert(&text),
            Message::Changed(_) | Message::Submit(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focus {
            self.style.focused_border
        } else {
            self.style.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(self.caption.as_str());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let display: Vec<char> = self.display().chars().collect();
        if display.is_empty() && !self.focus {
            let placeholder = Span::styled(self.placeholder.as_str(), self.style.placeholder);
            frame.render_widget(Paragraph::new(Line::from(placeholder)), inner);
            return;
        }

        // Scroll so the cursor stays inside the box.
        let width = (inner.width as usize).max(1);
        let offset = (self.cursor + 1).saturating_sub(width);
        let visible = &display[offset.min(display.len())..];

        let mut spans = Vec::new();
        let before: String = visible.iter().take(self.cursor - offset).collect();
        spans.push(Span::styled(before, self.style.text));
        if self.focus {
            let at = visible.get(self.cursor - offset).copied().unwrap_or(' ');
            spans.push(Span::styled(at.to_string(), self.style.cursor));
            let after: String = visible.iter().skip(self.cursor - offset + 1).collect();
            spans.push(Span::styled(after, self.style.text));
        } else {
            let rest: String = visible.iter().skip(self.cursor - offset).collect();
            spans.push(Span::styled(rest, self.style.text));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
