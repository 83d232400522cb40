//! The new/edit form screen: field widgets, their layout and focus.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;
use techpanel_core::Component;
use techpanel_widgets::dropdown_group;
use techpanel_widgets::{auto_textarea, text_input};
use techpanel_widgets::{AutoResizeTextArea, ChangeEvent, DropdownGroup, FocusRing, SearchableSelect, TextInput};

use crate::form::{FieldKind, FormField, ReplaceForm, SelectData};

/// Fields per screen row. Single-field rows span the full width.
const ROWS: &[&[FormField]] = &[
    &[FormField::LessonDate, FormField::LessonTime],
    &[FormField::ReplaceFormat, FormField::GroupNumber],
    &[FormField::Teacher, FormField::Subject],
    &[FormField::Module, FormField::Lesson],
    &[FormField::ReplaceTransfer, FormField::TransferTime],
    &[FormField::TeamLeader, FormField::Link],
    &[FormField::Reason],
    &[FormField::ImpInfo],
];

const BOX_HEIGHT: u16 = 3;

/// A field placed in form coordinates (row 0 is the top of the form).
#[derive(Debug, Clone, Copy)]
struct Placed {
    field: FormField,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
}

pub struct FormEditor {
    group: DropdownGroup,
    lines: HashMap<FormField, TextInput>,
    texts: HashMap<FormField, AutoResizeTextArea>,
    focus: FocusRing,
    /// Loaded form; supplies the id and fields without widgets.
    base: ReplaceForm,
    viewport: Rect,
    scroll: u16,
    content_height: u16,
    visible: Vec<(FormField, Rect)>,
}

impl FormEditor {
    pub fn new(notify_ids: &[String], textarea_rows: u16) -> Self {
        let mut group = DropdownGroup::new();
        let mut lines = HashMap::new();
        let mut texts = HashMap::new();
        for field in FormField::ALL {
            match field.kind() {
                FieldKind::Select => group.push(
                    SearchableSelect::new(field.key(), Vec::<String>::new())
                        .with_caption(field.caption())
                        .notifying(notify_ids.iter().any(|id| id == field.key())),
                ),
                FieldKind::Line => {
                    lines.insert(field, TextInput::new(field.caption()).with_char_limit(256));
                }
                FieldKind::Multi => {
                    texts.insert(
                        field,
                        AutoResizeTextArea::new(field.caption()).with_max_rows(textarea_rows),
                    );
                }
            }
        }

        let mut editor = Self {
            group,
            lines,
            texts,
            focus: FocusRing::new(FormField::ALL.len()),
            base: ReplaceForm::default(),
            viewport: Rect::default(),
            scroll: 0,
            content_height: 0,
            visible: Vec::new(),
        };
        editor.sync_focus();
        editor
    }

    pub fn set_select_data(&mut self, data: &SelectData) {
        for field in FormField::ALL.iter().filter(|f| f.kind() == FieldKind::Select) {
            if let Some(select) = self.group.get_mut(field.key()) {
                select.set_options(data.options_for(field.key()).iter().cloned());
            }
        }
    }

    /// Fill every widget from `form`. Multi-line values are trimmed.
    pub fn load(&mut self, form: &ReplaceForm) {
        self.base = form.clone();
        self.group.close_all();
        for field in FormField::ALL {
            self.set_field(field, field.get(form));
        }
        self.scroll = 0;
        self.focus.focus(0);
        self.sync_focus();
        self.relayout();
    }

    pub fn clear(&mut self) {
        self.load(&ReplaceForm::default());
    }

    /// Current widget values merged over the loaded form.
    pub fn snapshot(&self) -> ReplaceForm {
        let mut form = self.base.clone();
        for field in FormField::ALL {
            field.set(&mut form, self.field_value(field));
        }
        form
    }

    /// Id of the request being edited, if any.
    pub fn editing_id(&self) -> Option<i64> {
        self.base.id
    }

    pub fn reset_fields(&mut self, fields: &[FormField]) {
        for field in fields {
            self.set_field(*field, "");
        }
        self.relayout();
    }

    pub fn focused_field(&self) -> FormField {
        FormField::ALL[self.focus.focused()]
    }

    pub fn dropdowns(&self) -> &DropdownGroup {
        &self.group
    }

    pub fn close_dropdowns(&mut self) {
        self.group.close_all();
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
        self.reveal_focused();
        self.relayout();
    }

    pub fn field_value(&self, field: FormField) -> String {
        match field.kind() {
            FieldKind::Select => self
                .group
                .get(field.key())
                .map(|s| s.selected_label().to_string())
                .unwrap_or_default(),
            FieldKind::Line => self.lines.get(&field).map(TextInput::value).unwrap_or_default(),
            FieldKind::Multi => self
                .texts
                .get(&field)
                .map(AutoResizeTextArea::value)
                .unwrap_or_default(),
        }
    }

    fn set_field(&mut self, field: FormField, value: &str) {
        match field.kind() {
            FieldKind::Select => {
                if let Some(select) = self.group.get_mut(field.key()) {
                    select.set_selected_label(value);
                }
            }
            FieldKind::Line => {
                if let Some(input) = self.lines.get_mut(&field) {
                    input.set_value(value);
                }
            }
            FieldKind::Multi => {
                if let Some(text) = self.texts.get_mut(&field) {
                    text.set_value(value);
                }
            }
        }
    }

    /// Route a key to the focused field. Tab and Shift-Tab move focus.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ChangeEvent> {
        match key.code {
            KeyCode::Tab => {
                self.group.close_all();
                self.focus.focus_next();
                self.after_focus_change();
                return None;
            }
            KeyCode::BackTab => {
                self.group.close_all();
                self.focus.focus_prev();
                self.after_focus_change();
                return None;
            }
            _ => {}
        }

        let field = self.focused_field();
        let change = match field.kind() {
            FieldKind::Select => match self.group.key(field.key(), key).into_message() {
                Some(dropdown_group::Message::Changed(change)) => Some(change),
                _ => None,
            },
            FieldKind::Line => {
                if let Some(input) = self.lines.get_mut(&field) {
                    input.update(text_input::Message::KeyPress(key));
                }
                None
            }
            FieldKind::Multi => {
                if let Some(text) = self.texts.get_mut(&field) {
                    text.update(auto_textarea::Message::KeyPress(key));
                }
                None
            }
        };
        self.reveal_focused();
        self.relayout();
        change
    }

    pub fn paste(&mut self, text: &str) {
        let field = self.focused_field();
        match field.kind() {
            FieldKind::Select => {}
            FieldKind::Line => {
                if let Some(input) = self.lines.get_mut(&field) {
                    input.update(text_input::Message::Paste(text.to_string()));
                }
            }
            FieldKind::Multi => {
                if let Some(area) = self.texts.get_mut(&field) {
                    area.update(auto_textarea::Message::Paste(text.to_string()));
                }
            }
        }
        self.relayout();
    }

    /// A click inside the form. Dropdowns see it first, so clicking
    /// anywhere else closes an open list.
    pub fn click(&mut self, column: u16, row: u16) -> Option<ChangeEvent> {
        if self.group.hits_open_list(column, row) {
            let change = self.group.click(column, row);
            self.relayout();
            return change;
        }

        self.group.click(column, row);
        let target = match self.group.open_id() {
            Some(id) => FormField::ALL.iter().copied().find(|f| f.key() == id),
            None => self.field_at(column, row),
        };
        if let Some(field) = target {
            if let Some(index) = FormField::ALL.iter().position(|f| *f == field) {
                self.focus.focus(index);
                self.sync_focus();
            }
        }
        self.relayout();
        None
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let max = self.content_height.saturating_sub(self.viewport.height);
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(max));
        self.scroll = next as u16;
        self.group.close_all();
        self.relayout();
    }

    fn field_at(&self, column: u16, row: u16) -> Option<FormField> {
        self.visible
            .iter()
            .find(|(_, r)| column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height)
            .map(|(f, _)| *f)
    }

    fn after_focus_change(&mut self) {
        self.sync_focus();
        self.reveal_focused();
        self.relayout();
    }

    fn sync_focus(&mut self) {
        let focused = self.focused_field();
        for (field, input) in &mut self.lines {
            if *field == focused {
                input.focus();
            } else {
                input.blur();
            }
        }
        for (field, text) in &mut self.texts {
            if *field == focused {
                text.focus();
            } else {
                text.blur();
            }
        }
        for field in FormField::ALL.iter().filter(|f| f.kind() == FieldKind::Select) {
            if let Some(select) = self.group.get_mut(field.key()) {
                if *field == focused {
                    select.focus();
                } else {
                    select.blur();
                }
            }
        }
    }

    fn field_height(&self, field: FormField, width: u16) -> u16 {
        match field.kind() {
            FieldKind::Multi => self
                .texts
                .get(&field)
                .map_or(BOX_HEIGHT, |t| t.height_for(width)),
            _ => BOX_HEIGHT,
        }
    }

    fn place(&self) -> Vec<Placed> {
        let area = self.viewport;
        let mut placed = Vec::with_capacity(FormField::ALL.len());
        let mut y = 0u16;
        for row in ROWS {
            let count = row.len() as u16;
            let column_width = area.width / count.max(1);
            let mut row_height = 0;
            for (i, field) in row.iter().enumerate() {
                let i = i as u16;
                let x = area.x + i * column_width;
                // Last column takes the rounding remainder.
                let width = if i + 1 == count {
                    area.width - i * column_width
                } else {
                    column_width
                };
                let height = self.field_height(*field, width);
                row_height = row_height.max(height);
                placed.push(Placed {
                    field: *field,
                    x,
                    y,
                    width,
                    height,
                });
            }
            y += row_height;
        }
        placed
    }

    fn reveal_focused(&mut self) {
        let focused = self.focused_field();
        let Some(p) = self.place().into_iter().find(|p| p.field == focused) else {
            return;
        };
        if p.y < self.scroll {
            self.scroll = p.y;
        } else if p.y + p.height > self.scroll + self.viewport.height {
            self.scroll = (p.y + p.height).saturating_sub(self.viewport.height);
        }
    }

    /// Recompute on-screen rects and the dropdown anchors.
    fn relayout(&mut self) {
        let placed = self.place();
        self.content_height = placed.iter().map(|p| p.y + p.height).max().unwrap_or(0);
        let max_scroll = self.content_height.saturating_sub(self.viewport.height);
        self.scroll = self.scroll.min(max_scroll);

        let top = self.scroll;
        let bottom = self.scroll + self.viewport.height;
        self.visible = placed
            .iter()
            .filter(|p| p.y >= top && p.y + p.height <= bottom)
            .map(|p| {
                let rect = Rect::new(p.x, self.viewport.y + p.y - top, p.width, p.height);
                (p.field, rect)
            })
            .collect();

        let anchors = self
            .visible
            .iter()
            .filter(|(f, _)| f.kind() == FieldKind::Select)
            .map(|(f, r)| (f.key().to_string(), *r))
            .collect();
        self.group.set_layout(anchors, self.viewport);
    }

    pub fn view(&self, frame: &mut Frame) {
        for (field, rect) in &self.visible {
            match field.kind() {
                FieldKind::Select => {}
                FieldKind::Line => {
                    if let Some(input) = self.lines.get(field) {
                        input.view(frame, *rect);
                    }
                }
                FieldKind::Multi => {
                    if let Some(text) = self.texts.get(field) {
                        text.view(frame, *rect);
                    }
                }
            }
        }
        // Dropdowns last so an open list covers the fields below it.
        self.group.view(frame);

        if self.content_height > self.viewport.height {
            let mut state = ScrollbarState::new(usize::from(self.content_height))
                .position(usize::from(self.scroll));
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                self.viewport,
                &mut state,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn editor() -> FormEditor {
        let mut editor = FormEditor::new(&["subject".to_string(), "replace-format".to_string()], 4);
        editor.set_select_data(&SelectData {
            teachers: vec!["Ivanova".into(), "Petrov".into()],
            objects: vec!["Python".into(), "Scratch".into()],
            replacement_formats: vec!["Online".into(), "Offline".into()],
            transferment_formats: vec!["Replace".into()],
            team_leaders: vec!["Orlov".into()],
        });
        editor.set_viewport(Rect::new(0, 2, 80, 40));
        editor
    }

    fn focus_field(editor: &mut FormEditor, field: FormField) {
        while editor.focused_field() != field {
            editor.handle_key(key(KeyCode::Tab));
        }
    }

    #[test]
    fn load_and_snapshot_round_trip() {
        let mut e = editor();
        let form = ReplaceForm {
            lesson_date: "2024-05-01".into(),
            teacher: "Petrov".into(),
            reason: "  sick  ".into(),
            comment: "kept".into(),
            id: Some(9),
            ..Default::default()
        };
        e.load(&form);
        let snap = e.snapshot();
        assert_eq!(snap.lesson_date, "2024-05-01");
        assert_eq!(snap.teacher, "Petrov");
        assert_eq!(snap.reason, "sick");
        assert_eq!(snap.comment, "kept");
        assert_eq!(e.editing_id(), Some(9));
    }

    #[test]
    fn typing_goes_to_focused_line() {
        let mut e = editor();
        focus_field(&mut e, FormField::GroupNumber);
        for c in "A-12".chars() {
            e.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(e.snapshot().group_number, "A-12");
        assert_eq!(e.snapshot().lesson_date, "");
    }

    #[test]
    fn keyboard_select_emits_subject_change() {
        let mut e = editor();
        focus_field(&mut e, FormField::Subject);
        e.handle_key(key(KeyCode::Enter));
        assert_eq!(e.dropdowns().open_id(), Some("subject"));
        e.handle_key(key(KeyCode::Down));
        let change = e.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(change.name(), "subjectChanged");
        assert_eq!(change.value, "Scratch");
        assert_eq!(e.snapshot().subject, "Scratch");
    }

    #[test]
    fn teacher_select_is_silent() {
        let mut e = editor();
        focus_field(&mut e, FormField::Teacher);
        e.handle_key(key(KeyCode::Enter));
        assert!(e.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(e.snapshot().teacher, "Ivanova");
    }

    #[test]
    fn tab_closes_open_dropdown() {
        let mut e = editor();
        focus_field(&mut e, FormField::Teacher);
        e.handle_key(key(KeyCode::Enter));
        e.handle_key(key(KeyCode::Tab));
        assert_eq!(e.dropdowns().open_id(), None);
    }

    #[test]
    fn click_on_trigger_opens_and_focuses() {
        let mut e = editor();
        // Row 2 of the form: teacher | subject, each 3 tall, starting at y = 2 + 6.
        e.click(45, 9);
        assert_eq!(e.dropdowns().open_id(), Some("subject"));
        assert_eq!(e.focused_field(), FormField::Subject);
        e.click(5, 9);
        assert_eq!(e.dropdowns().open_id(), Some("teacher"));
        e.click(5, 3);
        assert_eq!(e.dropdowns().open_id(), None);
        assert_eq!(e.focused_field(), FormField::LessonDate);
    }

    #[test]
    fn reset_clears_module_and_lesson() {
        let mut e = editor();
        e.load(&ReplaceForm {
            module: "3".into(),
            lesson: "2".into(),
            subject: "Python".into(),
            ..Default::default()
        });
        e.reset_fields(&[FormField::Module, FormField::Lesson]);
        let snap = e.snapshot();
        assert_eq!((snap.module.as_str(), snap.lesson.as_str()), ("", ""));
        assert_eq!(snap.subject, "Python");
    }

    #[test]
    fn small_viewport_scrolls_to_focus() {
        let mut e = editor();
        e.set_viewport(Rect::new(0, 0, 80, 9));
        focus_field(&mut e, FormField::TeamLeader);
        assert!(e.visible.iter().any(|(f, _)| *f == FormField::TeamLeader));
        assert!(!e.visible.iter().any(|(f, _)| *f == FormField::LessonDate));
    }
}
