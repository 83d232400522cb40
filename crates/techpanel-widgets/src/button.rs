//! Push button that refuses to start twice while its request is running.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use techpanel_core::{Command, Component};

const BUSY_FRAMES: &[&str] = &["|", "/", "-", "\\"];

#[derive(Debug, Clone)]
pub enum Message {
    Press,
    /// Emitted when a press was accepted.
    Started,
    /// The work behind the button finished.
    Finish,
    /// Advance the busy indicator.
    Tick,
}

pub struct GuardedButton {
    label: String,
    in_flight: bool,
    enabled: bool,
    frame: usize,
    area: Rect,
}

impl GuardedButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            in_flight: false,
            enabled: true,
            frame: 0,
            area: Rect::default(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn is_disabled(&self) -> bool {
        self.in_flight || !self.enabled
    }

    /// Claim the button. Returns false while a previous press is in flight.
    pub fn try_begin(&mut self) -> bool {
        if self.is_disabled() {
            tracing::debug!(button = %self.label, "press ignored, already running");
            return false;
        }
        self.in_flight = true;
        self.frame = 0;
        true
    }

    /// Release the button, whatever the outcome of the work was.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        let a = self.area;
        column >= a.x && column < a.x + a.width && row >= a.y && row < a.y + a.height
    }
}

impl Component for GuardedButton {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Press if self.try_begin() => Command::message(Message::Started),
            Message::Press | Message::Started => Command::none(),
            Message::Finish => {
                self.finish();
                Command::none()
            }
            Message::Tick => {
                if self.in_flight {
                    self.frame = (self.frame + 1) % BUSY_FRAMES.len();
                }
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let style = if self.is_disabled() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        };
        let text = if self.in_flight {
            format!("{} {}", BUSY_FRAMES[self.frame], self.label)
        } else {
            self.label.clone()
        };
        let button = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style));
        frame.render_widget(button, area);
    }
}
