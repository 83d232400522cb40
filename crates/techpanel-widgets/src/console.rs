//! Scrollable log of request results, newest entry first.

use std::collections::VecDeque;

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use techpanel_core::{Command, Component};

use crate::runeutil::sanitize;

#[derive(Debug, Clone)]
pub enum Message {
    /// Put an entry above everything logged so far.
    Prepend(String),
    Clear,
    ScrollUp(u16),
    ScrollDown(u16),
}

pub struct ConsoleLog {
    title: String,
    entries: VecDeque<String>,
    max_entries: usize,
    scroll: u16,
    text_style: Style,
    separator_style: Style,
}

impl ConsoleLog {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: VecDeque::new(),
            max_entries: 200,
            scroll: 0,
            text_style: Style::default(),
            separator_style: Style::default().fg(Color::DarkGray),
        }
    }

    /// Oldest entries are dropped past this count.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max.max(1);
        self
    }

    pub fn prepend(&mut self, text: impl Into<String>) {
        self.entries.push_front(sanitize(&text.into()));
        self.entries.truncate(self.max_entries);
        self.scroll = 0;
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Component for ConsoleLog {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Prepend(text) => self.prepend(text),
            Message::Clear => {
                self.entries.clear();
                self.scroll = 0;
            }
            Message::ScrollUp(n) => self.scroll = self.scroll.saturating_sub(n),
            Message::ScrollDown(n) => self.scroll = self.scroll.saturating_add(n),
        }
        Command::none()
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(Span::styled("·", self.separator_style)));
            }
            lines.extend(entry.lines().map(|l| Line::from(Span::styled(l.to_string(), self.text_style))));
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(self.title.as_str()))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first() {
        let mut console = ConsoleLog::new("Console");
        console.prepend("first");
        console.prepend("second");
        assert_eq!(console.entries().collect::<Vec<_>>(), vec!["second", "first"]);
        assert_eq!(console.latest(), Some("second"));
    }

    #[test]
    fn bounded_drops_oldest() {
        let mut console = ConsoleLog::new("Console").with_max_entries(2);
        console.update(Message::Prepend("a".into()));
        console.update(Message::Prepend("b".into()));
        console.update(Message::Prepend("c".into()));
        assert_eq!(console.entries().collect::<Vec<_>>(), vec!["c", "b"]);
    }

    #[test]
    fn clear_empties() {
        let mut console = ConsoleLog::new("Console");
        console.prepend("x");
        console.update(Message::Clear);
        assert!(console.is_empty());
    }
}
