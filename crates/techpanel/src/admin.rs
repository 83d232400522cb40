//! Admin screen: token field and the "update select data" command.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::Frame;
use techpanel_core::Component;
use techpanel_widgets::text_input::{self, EchoMode, TextInput};
use techpanel_widgets::{ConsoleLog, FocusRing, GuardedButton};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    UpdateSelectData,
}

const TOKEN: usize = 0;
const BUTTON: usize = 1;

pub struct AdminPanel {
    token: TextInput,
    pub update_button: GuardedButton,
    focus: FocusRing,
    token_area: Rect,
    console_area: Rect,
}

impl AdminPanel {
    pub fn new(token: Option<&str>) -> Self {
        let mut input = TextInput::new("Token").with_echo_mode(EchoMode::Password('•'));
        if let Some(token) = token {
            input.set_value(token);
        }
        input.focus();
        Self {
            token: input,
            update_button: GuardedButton::new("Update select data"),
            focus: FocusRing::new(2),
            token_area: Rect::default(),
            console_area: Rect::default(),
        }
    }

    pub fn token(&self) -> String {
        self.token.value()
    }

    /// `body` holds the token field and the console; the button goes in
    /// the shared button row.
    pub fn set_areas(&mut self, body: Rect, button: Rect) {
        let [token, console] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(body);
        self.token_area = token;
        self.console_area = console;
        self.update_button.set_area(button);
    }

    fn sync_focus(&mut self) {
        if self.focus.is_focused(TOKEN) {
            self.token.focus();
        } else {
            self.token.blur();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AdminAction> {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus.focus_next();
                self.sync_focus();
                None
            }
            KeyCode::Enter => Some(AdminAction::UpdateSelectData),
            _ if self.focus.is_focused(TOKEN) => {
                self.token.update(text_input::Message::KeyPress(key));
                None
            }
            _ => None,
        }
    }

    pub fn paste(&mut self, text: &str) {
        self.token.update(text_input::Message::Paste(text.to_string()));
    }

    pub fn click(&mut self, column: u16, row: u16) -> Option<AdminAction> {
        if self.update_button.contains(column, row) {
            self.focus.focus(BUTTON);
            self.sync_focus();
            return Some(AdminAction::UpdateSelectData);
        }
        let t = self.token_area;
        if column >= t.x && column < t.x + t.width && row >= t.y && row < t.y + t.height {
            self.focus.focus(TOKEN);
            self.sync_focus();
        }
        None
    }

    pub fn view(&self, frame: &mut Frame, console: &ConsoleLog, button: Rect) {
        self.token.view(frame, self.token_area);
        console.view(frame, self.console_area);
        self.update_button.view(frame, button);
    }
}
