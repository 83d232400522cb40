//! A set of [`SearchableSelect`]s sharing one screen.
//!
//! The group enforces that at most one member is open, routes clicks by
//! position (inside the open list, on a trigger, or outside everything) and
//! draws the open list last so it overlays the rest of the screen.

use std::collections::HashMap;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;
use techpanel_core::{Command, Component};

use crate::searchable_select::{self, ChangeEvent, SearchableSelect};

#[derive(Debug, Clone)]
pub enum Message {
    /// A click at a terminal cell.
    Click { column: u16, row: u16 },
    /// A key for the member with this id.
    Key { id: String, key: KeyEvent },
    Activate(String),
    CloseAll,
    /// Output: a notifying member changed its selection.
    Changed(ChangeEvent),
}

/// Owns every dropdown of a screen and their on-screen positions.
#[derive(Default)]
pub struct DropdownGroup {
    members: Vec<SearchableSelect>,
    anchors: HashMap<String, Rect>,
    bounds: Rect,
}

impl DropdownGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, select: SearchableSelect) {
        self.members.push(select);
    }

    pub fn with(mut self, select: SearchableSelect) -> Self {
        self.push(select);
        self
    }

    pub fn get(&self, id: &str) -> Option<&SearchableSelect> {
        self.members.iter().find(|m| m.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut SearchableSelect> {
        self.members.iter_mut().find(|m| m.id() == id)
    }

    pub fn members(&self) -> &[SearchableSelect] {
        &self.members
    }

    /// The id of the open member, if any.
    pub fn open_id(&self) -> Option<&str> {
        self.members.iter().find(|m| m.is_open()).map(|m| m.id())
    }

    /// Record where each member's trigger is drawn. Members without an
    /// anchor are not drawn and cannot be clicked.
    pub fn set_layout(&mut self, anchors: HashMap<String, Rect>, bounds: Rect) {
        self.anchors = anchors;
        self.bounds = bounds;
    }

    pub fn anchor(&self, id: &str) -> Option<Rect> {
        self.anchors.get(id).copied()
    }

    /// Open `id` after closing every other member.
    pub fn activate(&mut self, id: &str) {
        self.close_all();
        if let Some(select) = self.get_mut(id) {
            select.activate();
        }
    }

    pub fn close_all(&mut self) {
        for member in &mut self.members {
            if member.is_open() {
                member.close();
            }
        }
    }

    /// Whether a click here lands on the list of the open member.
    pub fn hits_open_list(&self, column: u16, row: u16) -> bool {
        self.members
            .iter()
            .find(|m| m.is_open())
            .and_then(|m| self.anchor(m.id()).map(|a| m.list_area(a, self.bounds)))
            .is_some_and(|list| contains(list, column, row))
    }

    /// Route a click. Returns the change event when the click picked an
    /// option of a notifying member.
    pub fn click(&mut self, column: u16, row: u16) -> Option<ChangeEvent> {
        let bounds = self.bounds;

        if let Some(open) = self.members.iter().position(|m| m.is_open()) {
            let id = self.members[open].id().to_string();
            if let Some(anchor) = self.anchor(&id) {
                let list = self.members[open].list_area(anchor, bounds);
                if contains(list, column, row) {
                    let key = self.members[open].option_at(list, column, row);
                    return key.and_then(|k| self.members[open].select(k));
                }
                if contains(anchor, column, row) {
                    // The search box of the open member.
                    return None;
                }
            }
        }

        let hit = self
            .anchors
            .iter()
            .find(|(_, rect)| contains(**rect, column, row))
            .map(|(id, _)| id.clone());
        match hit {
            Some(id) => self.activate(&id),
            None => self.close_all(),
        }
        None
    }

    /// Forward a key to one member. Opening a member this way still closes
    /// the others.
    pub fn key(&mut self, id: &str, key: KeyEvent) -> Command<Message> {
        let was_open = self.open_id().map(str::to_string);
        let Some(select) = self.get_mut(id) else {
            return Command::none();
        };
        let cmd = select.update(searchable_select::Message::KeyPress(key));
        if select.is_open() && was_open.as_deref() != Some(id) {
            self.activate(id);
        }
        match cmd.into_message() {
            Some(searchable_select::Message::Changed(change)) => {
                Command::message(Message::Changed(change))
            }
            _ => Command::none(),
        }
    }

    /// Draw every anchored trigger, then the open list on top.
    pub fn view(&self, frame: &mut Frame) {
        for member in &self.members {
            if let Some(anchor) = self.anchor(member.id()) {
                member.view(frame, anchor);
            }
        }
        if let Some(open) = self.members.iter().find(|m| m.is_open()) {
            if let Some(anchor) = self.anchor(open.id()) {
                open.view_list(frame, anchor, self.bounds);
            }
        }
    }

    pub fn update(&mut self, msg: Message) -> Command<Message> {
        let change = match msg {
            Message::Click { column, row } => self.click(column, row),
            Message::Key { id, key } => return self.key(&id, key),
            Message::Activate(id) => {
                self.activate(&id);
                None
            }
            Message::CloseAll => {
                self.close_all();
                None
            }
            Message::Changed(_) => None,
        };
        change.map_or_else(Command::none, |c| Command::message(Message::Changed(c)))
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}
