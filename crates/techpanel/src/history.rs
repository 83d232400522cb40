//! History screen: the user's recent requests.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::form::HistoryEntry;

/// What the user asked for on the history screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    Open(HistoryEntry),
    Delete(i64),
    Refresh,
}

/// Each entry takes two lines: summary and timing.
const ENTRY_HEIGHT: u16 = 2;

#[derive(Debug, Default)]
pub struct HistoryPanel {
    entries: Vec<HistoryEntry>,
    selected: usize,
    offset: usize,
    loading: bool,
    area: Rect,
}

impl HistoryPanel {
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.selected)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_entries(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries;
        self.loading = false;
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
        self.scroll_to_selected();
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        self.scroll_to_selected();
    }

    fn rows(&self) -> usize {
        usize::from(self.area.height.saturating_sub(2) / ENTRY_HEIGHT).max(1)
    }

    fn scroll_to_selected(&mut self) {
        let rows = self.rows();
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + rows {
            self.offset = self.selected + 1 - rows;
        }
    }

    pub fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.selected = index;
            self.scroll_to_selected();
        }
    }

    pub fn delete_selected(&self) -> Option<HistoryAction> {
        self.selected()
            .and_then(|e| e.form.id)
            .map(HistoryAction::Delete)
    }

    pub fn open_selected(&self) -> Option<HistoryAction> {
        self.selected().cloned().map(HistoryAction::Open)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<HistoryAction> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select(self.selected.saturating_sub(1));
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select(self.selected + 1);
                None
            }
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('r') => Some(HistoryAction::Refresh),
            _ => None,
        }
    }

    /// Clicking an entry selects it.
    pub fn click(&mut self, column: u16, row: u16) {
        let inner = Block::default().borders(Borders::ALL).inner(self.area);
        if column < inner.x || column >= inner.x + inner.width || row < inner.y || row >= inner.y + inner.height {
            return;
        }
        let index = self.offset + usize::from((row - inner.y) / ENTRY_HEIGHT);
        self.select(index);
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = (self.selected as i64 + i64::from(delta)).max(0) as usize;
        self.select(next.min(self.entries.len().saturating_sub(1)));
    }

    pub fn view(&self, frame: &mut Frame) {
        let title = if self.loading { "History (loading)" } else { "History" };
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.entries.is_empty() {
            let text = if self.loading { "" } else { "No active requests" };
            let empty = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))).block(block);
            frame.render_widget(empty, self.area);
            return;
        }

        let dim = Style::default().fg(Color::DarkGray);
        let lines: Vec<Line> = self
            .entries
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(self.rows())
            .flat_map(|(i, entry)| {
                let style = if i == self.selected {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let marker = if i == self.selected { "▸ " } else { "  " };
                [
                    Line::from(Span::styled(format!("{marker}{}", entry.summary()), style)),
                    Line::from(Span::styled(
                        format!(
                            "    sent {} {}, editable for {}",
                            entry.creation_date, entry.creation_time, entry.remaining_time
                        ),
                        dim,
                    )),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), self.area);
    }
}
