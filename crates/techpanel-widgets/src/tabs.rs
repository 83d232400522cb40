//! Horizontal navigation tabs with click hit-testing.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Tabs as RatatuiTabs};
use ratatui::Frame;
use techpanel_core::{Command, Component};

use crate::runeutil::display_width;

#[derive(Debug, Clone)]
pub enum Message {
    KeyPress(KeyEvent),
    /// A click at a terminal cell.
    Click { column: u16, row: u16 },
    /// Emitted when the user picks a tab.
    Select(usize),
}

#[derive(Debug, Clone)]
pub struct NavTabsStyle {
    pub normal: Style,
    /// The highlighted tab.
    pub selected: Style,
    pub border: Style,
    pub divider: String,
}

impl Default for NavTabsStyle {
    fn default() -> Self {
        Self {
            normal: Style::default().fg(Color::DarkGray),
            selected: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            border: Style::default().fg(Color::DarkGray),
            divider: "|".to_string(),
        }
    }
}

/// A row of tab titles, one of them highlighted. The bar remembers the area
/// it was last laid out in so clicks can be mapped back to a tab.
pub struct NavTabs {
    titles: Vec<String>,
    selected: usize,
    area: Rect,
    style: NavTabsStyle,
}

impl NavTabs {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
            selected: 0,
            area: Rect::default(),
            style: NavTabsStyle::default(),
        }
    }

    pub fn with_style(mut self, style: NavTabsStyle) -> Self {
        self.style = style;
        self
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Highlight a tab. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.titles.len() {
            self.selected = index;
        }
    }

    pub fn set_title(&mut self, index: usize, title: impl Into<String>) {
        if let Some(slot) = self.titles.get_mut(index) {
            *slot = title.into();
        }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// The tab drawn at `column` on the title row.
    ///
    /// Each title occupies one padding cell, its text and another padding
    /// cell, followed by the divider.
    pub fn tab_at(&self, column: u16, row: u16) -> Option<usize> {
        if row != self.area.y || column < self.area.x {
            return None;
        }
        let column = usize::from(column - self.area.x);
        let divider = display_width(&self.style.divider);
        let mut x = 0;
        for (i, title) in self.titles.iter().enumerate() {
            let width = display_width(title) + 2;
            if column < x + width {
                return Some(i);
            }
            x += width + divider;
            if column < x {
                return None;
            }
        }
        None
    }
}

impl Component for NavTabs {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        let count = self.titles.len();
        if count == 0 {
            return Command::none();
        }
        match msg {
            Message::KeyPress(key) => {
                let next = match key.code {
                    KeyCode::Char(c) => c.to_digit(10).map(|d| d as usize),
                    _ => None,
                };
                match next {
                    Some(d) if d >= 1 && d <= count => Command::message(Message::Select(d - 1)),
                    _ => Command::none(),
                }
            }
            Message::Click { column, row } => match self.tab_at(column, row) {
                Some(i) => Command::message(Message::Select(i)),
                None => Command::none(),
            },
            Message::Select(i) => {
                self.select(i);
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = self.titles.iter().map(|t| Line::raw(t.as_str())).collect();
        let tabs = RatatuiTabs::new(titles)
            .block(Block::default().borders(Borders::BOTTOM).border_style(self.style.border))
            .select(self.selected)
            .style(self.style.normal)
            .highlight_style(self.style.selected)
            .divider(self.style.divider.as_str());
        frame.render_widget(tabs, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn tabs() -> NavTabs {
        let mut tabs = NavTabs::new(["New form", "History", "Admin"]);
        tabs.set_area(Rect::new(0, 0, 60, 2));
        tabs
    }

    #[test]
    fn hit_testing_follows_title_widths() {
        let t = tabs();
        // " New form " spans 0..10, divider at 10, " History " 11..20
        assert_eq!(t.tab_at(0, 0), Some(0));
        assert_eq!(t.tab_at(9, 0), Some(0));
        assert_eq!(t.tab_at(10, 0), None);
        assert_eq!(t.tab_at(11, 0), Some(1));
        assert_eq!(t.tab_at(21, 0), Some(2));
        assert_eq!(t.tab_at(50, 0), None);
        assert_eq!(t.tab_at(3, 1), None);
    }

    #[test]
    fn click_emits_select() {
        let mut t = tabs();
        match t.update(Message::Click { column: 12, row: 0 }).into_message() {
            Some(Message::Select(i)) => assert_eq!(i, 1),
            other => panic!("expected Select, got {:?}", other),
        }
    }

    #[test]
    fn digits_pick_tabs() {
        let mut t = tabs();
        let cmd = t.update(Message::KeyPress(KeyEvent::new(KeyCode::Char('3'), KeyModifiers::NONE)));
        assert!(matches!(cmd.into_message(), Some(Message::Select(2))));
        let cmd = t.update(Message::KeyPress(KeyEvent::new(KeyCode::Char('9'), KeyModifiers::NONE)));
        assert!(cmd.is_none());
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut t = tabs();
        t.select(1);
        t.select(7);
        assert_eq!(t.selected(), 1);
        t.set_title(0, "Edit form");
        assert_eq!(t.titles()[0], "Edit form");
    }
}
