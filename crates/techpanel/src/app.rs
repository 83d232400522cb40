//! The panel model: screens, swipe navigation and backend round trips.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use techpanel_core::{
    subscribe, terminal_events, Command, Component, Every, Model, PanelEvent, PointerEvent,
    PointerKind, Subscription,
};
use techpanel_widgets::{button, console};
use techpanel_widgets::{CellScale, ChangeEvent, ConsoleLog, GuardedButton, NavTabs, Swipe, SwipeTracker};

use crate::admin::{AdminAction, AdminPanel};
use crate::backend::{SharedBackend, UPDATE_SELECT_DATA};
use crate::config::PanelConfig;
use crate::drafts::{DraftSlot, Drafts};
use crate::editor::FormEditor;
use crate::form::{FormField, HistoryEntry, ReplaceForm, SelectData};
use crate::history::{HistoryAction, HistoryPanel};
use crate::http::{GetOutcome, PostOutcome};
use crate::layout::ScreenLayout;

const FORM_TAB: usize = 0;
const HISTORY_TAB: usize = 1;
const ADMIN_TAB: usize = 2;

const HINTS: &str = "F1 form  F2 history  F3 admin  Ctrl+S send  Ctrl+Q quit";

/// What the main area shows. The admin screen overlays any mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    New,
    Edit,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Form,
    History,
    Admin,
}

/// Screen state and in-flight loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiState {
    pub mode: NavigationMode,
    pub admin_open: bool,
    pub history_loading: bool,
    pub select_data_loading: bool,
}

pub struct PanelFlags {
    pub config: PanelConfig,
    pub backend: SharedBackend,
    pub drafts: Drafts,
    /// Terminal size at startup, (columns, rows).
    pub size: (u16, u16),
}

#[derive(Debug)]
pub enum Msg {
    /// Terminal input stamped with its arrival time.
    Input(PanelEvent, Instant),
    Tick,
    SelectDataLoaded(Result<SelectData, String>),
    HistoryLoaded(Result<Vec<HistoryEntry>, String>),
    /// Reply to a send; `form` is what was sent.
    Submitted {
        edit: bool,
        form: ReplaceForm,
        outcome: PostOutcome,
    },
    Deleted { id: i64, outcome: PostOutcome },
    AdminDone(GetOutcome),
    Navigate(Destination),
    Quit,
}

pub struct PanelApp {
    ui: UiState,
    layout: ScreenLayout,
    tabs: NavTabs,
    editor: FormEditor,
    history: HistoryPanel,
    admin: AdminPanel,
    console: ConsoleLog,
    submit_button: GuardedButton,
    clear_button: GuardedButton,
    open_button: GuardedButton,
    delete_button: GuardedButton,
    drafts: Drafts,
    swipe: SwipeTracker,
    scale: CellScale,
    backend: SharedBackend,
}

impl PanelApp {
    pub fn ui(&self) -> UiState {
        self.ui
    }

    pub fn tabs(&self) -> &NavTabs {
        &self.tabs
    }

    pub fn editor(&self) -> &FormEditor {
        &self.editor
    }

    pub fn history(&self) -> &HistoryPanel {
        &self.history
    }

    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    pub fn drafts(&self) -> &Drafts {
        &self.drafts
    }

    pub fn submit_label(&self) -> &str {
        self.submit_button.label()
    }

    pub fn clear_label(&self) -> &str {
        self.clear_button.label()
    }

    /// Name of the visible screen, shown in the terminal title.
    fn screen_name(&self) -> &'static str {
        if self.ui.admin_open {
            return "admin";
        }
        match self.ui.mode {
            NavigationMode::New => "new form",
            NavigationMode::Edit => "edit form",
            NavigationMode::History => "history",
        }
    }

    fn title_command(&self) -> Command<Msg> {
        Command::set_title(format!("techpanel: {}", self.screen_name()))
    }

    fn is_busy(&self) -> bool {
        self.submit_button.is_busy() || self.delete_button.is_busy() || self.admin.update_button.is_busy()
    }

    fn resize(&mut self, width: u16, height: u16) {
        let layout = ScreenLayout::compute(Rect::new(0, 0, width, height));
        self.layout = layout;
        self.tabs.set_area(layout.tabs);
        self.editor.set_viewport(layout.body);
        self.history.set_area(layout.body);
        self.admin.set_areas(layout.body, layout.buttons[0]);
        self.submit_button.set_area(layout.buttons[0]);
        self.open_button.set_area(layout.buttons[0]);
        self.clear_button.set_area(layout.buttons[1]);
        self.delete_button.set_area(layout.buttons[1]);
    }

    fn refresh_labels(&mut self) {
        let (submit, clear, tab) = match self.ui.mode {
            NavigationMode::Edit => ("Save changes", "Cancel edit", "Edit form"),
            NavigationMode::New | NavigationMode::History => ("Send", "Clear", "New form"),
        };
        self.submit_button.set_label(submit);
        self.clear_button.set_label(clear);
        self.tabs.set_title(FORM_TAB, tab);
    }

    /// Snapshot the editor into the draft slot of the current mode.
    fn save_form(&mut self) {
        let slot = match self.ui.mode {
            NavigationMode::New => DraftSlot::New,
            NavigationMode::Edit => DraftSlot::Edit,
            NavigationMode::History => return,
        };
        self.drafts.save(slot, self.editor.snapshot());
    }

    fn load_form(&mut self) {
        let slot = if self.ui.mode == NavigationMode::Edit {
            DraftSlot::Edit
        } else {
            DraftSlot::New
        };
        let form = self.drafts.load(slot).cloned().unwrap_or_default();
        self.editor.load(&form);
    }

    fn show_form(&mut self, mode: NavigationMode) {
        self.ui.mode = mode;
        self.ui.admin_open = false;
        self.tabs.select(FORM_TAB);
        self.refresh_labels();
        self.load_form();
    }

    fn show_history(&mut self) -> Command<Msg> {
        self.ui.mode = NavigationMode::History;
        self.ui.admin_open = false;
        self.tabs.select(HISTORY_TAB);
        self.refresh_labels();
        self.fetch_history()
    }

    fn navigate(&mut self, to: Destination) -> Command<Msg> {
        self.editor.close_dropdowns();
        match to {
            // Back from the admin screen to the form in progress.
            Destination::Form if self.ui.admin_open && self.ui.mode != NavigationMode::History => {
                self.ui.admin_open = false;
                self.tabs.select(FORM_TAB);
                Command::none()
            }
            Destination::Form => {
                self.save_form();
                self.show_form(NavigationMode::New);
                Command::none()
            }
            Destination::History => {
                self.save_form();
                self.show_history()
            }
            Destination::Admin => {
                self.save_form();
                self.ui.admin_open = true;
                self.tabs.select(ADMIN_TAB);
                Command::none()
            }
        }
    }

    /// Right shows the new form, left shows history. Vertical swipes are
    /// recognized but do not navigate.
    fn swiped(&mut self, direction: Swipe) -> Command<Msg> {
        self.editor.close_dropdowns();
        match direction {
            Swipe::Right => {
                self.save_form();
                self.show_form(NavigationMode::New);
                Command::none()
            }
            Swipe::Left => {
                self.save_form();
                self.show_history()
            }
            Swipe::Up | Swipe::Down => {
                tracing::debug!(?direction, "vertical swipe, no navigation");
                Command::none()
            }
        }
    }

    fn fetch_select_data(&mut self) -> Command<Msg> {
        if self.ui.select_data_loading {
            return Command::none();
        }
        self.ui.select_data_loading = true;
        let backend = self.backend.clone();
        Command::perform(
            async move { backend.select_data().await.map_err(|err| err.to_string()) },
            Msg::SelectDataLoaded,
        )
    }

    fn fetch_history(&mut self) -> Command<Msg> {
        if self.ui.history_loading {
            return Command::none();
        }
        self.ui.history_loading = true;
        self.history.set_loading(true);
        let backend = self.backend.clone();
        Command::perform(
            async move { backend.history().await.map_err(|err| err.to_string()) },
            Msg::HistoryLoaded,
        )
    }

    fn submit(&mut self) -> Command<Msg> {
        if !self.submit_button.try_begin() {
            return Command::none();
        }
        self.editor.close_dropdowns();
        let edit = self.ui.mode == NavigationMode::Edit;
        let form = self.editor.snapshot();
        tracing::info!(edit, id = ?form.id, "submitting form");
        let backend = self.backend.clone();
        let sent = form.clone();
        Command::perform(async move { backend.submit(sent).await }, move |outcome| Msg::Submitted {
            edit,
            form,
            outcome,
        })
    }

    /// Only state still equal to the sent form is cleared. Anything typed or
    /// opened while the request was in flight stays.
    fn submitted(&mut self, edit: bool, form: ReplaceForm, outcome: PostOutcome) -> Command<Msg> {
        self.submit_button.finish();
        if !outcome.success {
            tracing::warn!(edit, response = %outcome.response, "submit rejected");
            self.console.prepend(outcome.response);
            return Command::none();
        }
        if edit {
            self.console.prepend("Changes saved.");
            let on_screen = self.ui.mode == NavigationMode::Edit && self.editor.editing_id() == form.id;
            if on_screen {
                if self.editor.snapshot() == form {
                    self.drafts.discard(DraftSlot::Edit);
                    if !self.ui.admin_open {
                        return self.show_history();
                    }
                }
            } else if self.drafts.load(DraftSlot::Edit) == Some(&form) {
                self.drafts.discard(DraftSlot::Edit);
            }
        } else {
            self.console.prepend("Form sent.");
            if self.ui.mode == NavigationMode::New {
                if self.editor.snapshot() == form {
                    self.editor.clear();
                    self.drafts.discard(DraftSlot::New);
                }
            } else if self.drafts.load(DraftSlot::New) == Some(&form) {
                self.drafts.discard(DraftSlot::New);
            }
        }
        Command::none()
    }

    /// "Clear" empties the new form; "Cancel edit" drops the edit draft.
    fn clear_pressed(&mut self) {
        match self.ui.mode {
            NavigationMode::New => {
                self.editor.clear();
                self.drafts.discard(DraftSlot::New);
            }
            NavigationMode::Edit => {
                self.drafts.discard(DraftSlot::Edit);
                self.show_form(NavigationMode::New);
            }
            NavigationMode::History => {}
        }
    }

    /// Open a history entry for editing. An unsent edit of the same entry
    /// wins over the server copy.
    fn open_entry(&mut self, entry: HistoryEntry) {
        let draft = self
            .drafts
            .load(DraftSlot::Edit)
            .filter(|d| d.id.is_some() && d.id == entry.form.id)
            .cloned();
        let form = draft.unwrap_or(entry.form);
        tracing::info!(id = ?form.id, "editing request");
        self.drafts.save(DraftSlot::Edit, form);
        self.show_form(NavigationMode::Edit);
    }

    fn delete(&mut self, id: i64) -> Command<Msg> {
        if !self.delete_button.try_begin() {
            return Command::none();
        }
        tracing::info!(id, "deleting request");
        let backend = self.backend.clone();
        Command::perform(async move { backend.delete(id).await }, move |outcome| Msg::Deleted {
            id,
            outcome,
        })
    }

    fn deleted(&mut self, id: i64, outcome: PostOutcome) -> Command<Msg> {
        self.delete_button.finish();
        if !outcome.success {
            tracing::warn!(id, response = %outcome.response, "delete rejected");
            self.console.prepend(outcome.response);
            return Command::none();
        }
        self.console.prepend(format!("Request {id} deleted."));
        if self.drafts.load(DraftSlot::Edit).and_then(|d| d.id) == Some(id) {
            self.drafts.discard(DraftSlot::Edit);
        }
        self.fetch_history()
    }

    fn history_action(&mut self, action: HistoryAction) -> Command<Msg> {
        match action {
            HistoryAction::Open(entry) => {
                self.open_entry(entry);
                Command::none()
            }
            HistoryAction::Delete(id) => self.delete(id),
            HistoryAction::Refresh => self.fetch_history(),
        }
    }

    fn run_admin(&mut self) -> Command<Msg> {
        if !self.admin.update_button.try_begin() {
            return Command::none();
        }
        let token = self.admin.token();
        tracing::info!(command = UPDATE_SELECT_DATA, "sending admin command");
        let backend = self.backend.clone();
        Command::perform(
            async move { backend.admin(token, UPDATE_SELECT_DATA.to_string()).await },
            Msg::AdminDone,
        )
    }

    fn admin_done(&mut self, outcome: GetOutcome) -> Command<Msg> {
        self.admin.update_button.finish();
        self.console.prepend(outcome.response.clone());
        if outcome.success {
            self.fetch_select_data()
        } else {
            tracing::warn!(status = outcome.status_code, status_text = %outcome.status_text, "admin command failed");
            Command::none()
        }
    }

    fn selection_changed(&mut self, change: ChangeEvent) -> Command<Msg> {
        tracing::info!(event = %change.name(), value = %change.value, "selection changed");
        match change.source.as_str() {
            "subject" => self.editor.reset_fields(&[FormField::Module, FormField::Lesson]),
            "replace-format" => self.console.prepend(format!("Replace format: {}", change.value)),
            _ => {}
        }
        Command::none()
    }

    fn input(&mut self, event: PanelEvent, at: Instant) -> Command<Msg> {
        match event {
            PanelEvent::Key(key) => self.key(key),
            PanelEvent::Pointer(pointer) => self.pointer(pointer, at),
            PanelEvent::Resize(width, height) => {
                self.resize(width, height);
                Command::none()
            }
            PanelEvent::Paste(text) => {
                if self.ui.admin_open {
                    self.admin.paste(&text);
                } else if self.ui.mode != NavigationMode::History {
                    self.editor.paste(&text);
                }
                Command::none()
            }
        }
    }

    fn key(&mut self, key: KeyEvent) -> Command<Msg> {
        if key.kind == KeyEventKind::Release {
            return Command::none();
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return self.quit(),
            KeyCode::F(1) => return self.navigate(Destination::Form),
            KeyCode::F(2) => return self.navigate(Destination::History),
            KeyCode::F(3) => return self.navigate(Destination::Admin),
            KeyCode::Left if alt => return self.swiped(Swipe::Left),
            KeyCode::Right if alt => return self.swiped(Swipe::Right),
            _ => {}
        }

        if self.ui.admin_open {
            return match self.admin.handle_key(key) {
                Some(AdminAction::UpdateSelectData) => self.run_admin(),
                None => Command::none(),
            };
        }
        match self.ui.mode {
            NavigationMode::New | NavigationMode::Edit => {
                if ctrl && key.code == KeyCode::Char('s') {
                    return self.submit();
                }
                match self.editor.handle_key(key) {
                    Some(change) => self.selection_changed(change),
                    None => Command::none(),
                }
            }
            NavigationMode::History => match self.history.handle_key(key) {
                Some(action) => self.history_action(action),
                None => Command::none(),
            },
        }
    }

    /// Press and release pairs are swipes when they travel far and fast
    /// enough, clicks when they barely move.
    fn pointer(&mut self, pointer: PointerEvent, at: Instant) -> Command<Msg> {
        let point = self.scale.point(pointer.column, pointer.row);
        match pointer.kind {
            PointerKind::Down => {
                self.swipe.touch_start(point, at);
                Command::none()
            }
            PointerKind::Up => {
                let Some(gesture) = self.swipe.touch_end(point, at) else {
                    return Command::none();
                };
                let slop = self.scale.width.max(self.scale.height);
                match gesture.swipe {
                    Some(direction) => self.swiped(direction),
                    None if gesture.is_tap(slop) => self.click(pointer.column, pointer.row),
                    None => Command::none(),
                }
            }
            PointerKind::Drag => Command::none(),
            PointerKind::ScrollUp => {
                self.scroll(-3);
                Command::none()
            }
            PointerKind::ScrollDown => {
                self.scroll(3);
                Command::none()
            }
        }
    }

    fn click(&mut self, column: u16, row: u16) -> Command<Msg> {
        if let Some(index) = self.tabs.tab_at(column, row) {
            let to = match index {
                FORM_TAB => Destination::Form,
                HISTORY_TAB => Destination::History,
                _ => Destination::Admin,
            };
            return self.navigate(to);
        }

        if self.ui.admin_open {
            return match self.admin.click(column, row) {
                Some(AdminAction::UpdateSelectData) => self.run_admin(),
                None => Command::none(),
            };
        }
        match self.ui.mode {
            NavigationMode::New | NavigationMode::Edit => {
                if self.submit_button.contains(column, row) {
                    return self.submit();
                }
                if self.clear_button.contains(column, row) {
                    self.editor.close_dropdowns();
                    self.clear_pressed();
                    return Command::none();
                }
                match self.editor.click(column, row) {
                    Some(change) => self.selection_changed(change),
                    None => Command::none(),
                }
            }
            NavigationMode::History => {
                let action = if self.open_button.contains(column, row) {
                    self.history.open_selected()
                } else if self.delete_button.contains(column, row) {
                    self.history.delete_selected()
                } else {
                    self.history.click(column, row);
                    None
                };
                match action {
                    Some(action) => self.history_action(action),
                    None => Command::none(),
                }
            }
        }
    }

    fn scroll(&mut self, delta: i32) {
        if self.ui.admin_open {
            let n = delta.unsigned_abs() as u16;
            let msg = if delta < 0 {
                console::Message::ScrollUp(n)
            } else {
                console::Message::ScrollDown(n)
            };
            self.console.update(msg);
            return;
        }
        match self.ui.mode {
            NavigationMode::New | NavigationMode::Edit => self.editor.scroll_by(delta),
            NavigationMode::History => self.history.scroll_by(delta.signum()),
        }
    }

    fn dispatch(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Input(event, at) => self.input(event, at),
            Msg::Tick => {
                for busy in [
                    &mut self.submit_button,
                    &mut self.delete_button,
                    &mut self.admin.update_button,
                ] {
                    busy.update(button::Message::Tick);
                }
                Command::none()
            }
            Msg::SelectDataLoaded(result) => {
                self.ui.select_data_loading = false;
                match result {
                    Ok(data) => {
                        tracing::info!(
                            teachers = data.teachers.len(),
                            subjects = data.objects.len(),
                            "select data loaded"
                        );
                        self.editor.set_select_data(&data);
                    }
                    Err(err) => {
                        tracing::warn!(%err, "select data unavailable");
                        self.console.prepend(format!("Cannot load select data: {err}"));
                    }
                }
                Command::none()
            }
            Msg::HistoryLoaded(result) => {
                self.ui.history_loading = false;
                match result {
                    Ok(entries) => {
                        tracing::debug!(count = entries.len(), "history loaded");
                        self.history.set_entries(entries);
                    }
                    Err(err) => {
                        tracing::warn!(%err, "history unavailable");
                        self.history.set_loading(false);
                        self.console.prepend(format!("Cannot load history: {err}"));
                    }
                }
                Command::none()
            }
            Msg::Submitted { edit, form, outcome } => self.submitted(edit, form, outcome),
            Msg::Deleted { id, outcome } => self.deleted(id, outcome),
            Msg::AdminDone(outcome) => self.admin_done(outcome),
            Msg::Navigate(to) => self.navigate(to),
            Msg::Quit => self.quit(),
        }
    }

    fn quit(&mut self) -> Command<Msg> {
        self.save_form();
        tracing::info!("quit requested");
        Command::quit()
    }
}

impl Model for PanelApp {
    type Message = Msg;
    type Flags = PanelFlags;

    fn init(flags: PanelFlags) -> (Self, Command<Msg>) {
        let PanelFlags {
            config,
            backend,
            drafts,
            size,
        } = flags;
        tracing::info!(base_url = %config.backend.base_url, "starting panel");

        let mut app = Self {
            ui: UiState {
                mode: NavigationMode::New,
                admin_open: false,
                history_loading: false,
                select_data_loading: false,
            },
            layout: ScreenLayout::default(),
            tabs: NavTabs::new(["New form", "History", "Admin"]),
            editor: FormEditor::new(&config.ui.notify_selects, config.ui.textarea_max_rows),
            history: HistoryPanel::default(),
            admin: AdminPanel::new(config.admin.token.as_deref()),
            console: ConsoleLog::new("Console").with_max_entries(config.ui.console_max_entries),
            submit_button: GuardedButton::new("Send"),
            clear_button: GuardedButton::new("Clear"),
            open_button: GuardedButton::new("Open"),
            delete_button: GuardedButton::new("Delete"),
            drafts,
            swipe: SwipeTracker::new(config.swipe_config()),
            scale: config.cell_scale(),
            backend,
        };
        app.resize(size.0, size.1);
        app.show_form(NavigationMode::New);
        let cmd = Command::batch([app.title_command(), app.fetch_select_data()]);
        (app, cmd)
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        let screen = self.screen_name();
        let cmd = self.dispatch(msg);
        if self.screen_name() == screen {
            cmd
        } else {
            Command::batch([cmd, self.title_command()])
        }
    }

    fn view(&self, frame: &mut Frame) {
        let layout = self.layout;
        self.tabs.view(frame, layout.tabs);

        if self.ui.admin_open {
            self.admin.view(frame, &self.console, layout.buttons[0]);
        } else {
            match self.ui.mode {
                NavigationMode::New | NavigationMode::Edit => {
                    self.editor.view(frame);
                    self.submit_button.view(frame, layout.buttons[0]);
                    self.clear_button.view(frame, layout.buttons[1]);
                }
                NavigationMode::History => {
                    self.history.view(frame);
                    self.open_button.view(frame, layout.buttons[0]);
                    self.delete_button.view(frame, layout.buttons[1]);
                }
            }
        }

        let status = self
            .console
            .latest()
            .and_then(|entry| entry.lines().next())
            .unwrap_or(HINTS);
        frame.render_widget(
            Paragraph::new(Span::styled(status.to_string(), Style::default().fg(Color::DarkGray))),
            layout.status,
        );
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![terminal_events(|event| Some(Msg::Input(event, Instant::now())))];
        if self.is_busy() {
            subs.push(subscribe(Every::new(Duration::from_millis(120), "busy")).map(|_| Msg::Tick));
        }
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FormBackend;
    use crate::error::PanelError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use techpanel_core::testing::TestProgram;

    struct StubBackend;

    #[async_trait]
    impl FormBackend for StubBackend {
        async fn select_data(&self) -> Result<SelectData, PanelError> {
            Ok(SelectData::default())
        }

        async fn history(&self) -> Result<Vec<HistoryEntry>, PanelError> {
            Ok(Vec::new())
        }

        async fn submit(&self, _form: ReplaceForm) -> PostOutcome {
            ok_post()
        }

        async fn delete(&self, _id: i64) -> PostOutcome {
            ok_post()
        }

        async fn admin(&self, _token: String, _command: String) -> GetOutcome {
            GetOutcome {
                success: true,
                response: "updated".into(),
                status_code: 200,
                status_text: "OK".into(),
                response_body: "updated".into(),
            }
        }
    }

    fn ok_post() -> PostOutcome {
        PostOutcome {
            success: true,
            response: String::new(),
        }
    }

    fn program() -> TestProgram<PanelApp> {
        TestProgram::new(PanelFlags {
            config: PanelConfig::default(),
            backend: Arc::new(StubBackend),
            drafts: Drafts::in_memory(),
            size: (100, 40),
        })
    }

    fn key(code: KeyCode) -> Msg {
        Msg::Input(PanelEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)), Instant::now())
    }

    fn ctrl(c: char) -> Msg {
        Msg::Input(
            PanelEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)),
            Instant::now(),
        )
    }

    fn pointer(kind: PointerKind, column: u16, row: u16, at: Instant) -> Msg {
        Msg::Input(PanelEvent::Pointer(PointerEvent::new(kind, column, row)), at)
    }

    /// Press at (column, row), release `dc`/`dr` cells away after `ms`.
    fn gesture(prog: &mut TestProgram<PanelApp>, column: u16, row: u16, dc: i32, dr: i32, ms: u64) {
        let t0 = Instant::now();
        prog.send_all(pointer(PointerKind::Down, column, row, t0));
        let end_col = (i32::from(column) + dc) as u16;
        let end_row = (i32::from(row) + dr) as u16;
        prog.send_all(pointer(PointerKind::Up, end_col, end_row, t0 + Duration::from_millis(ms)));
    }

    fn type_text(prog: &mut TestProgram<PanelApp>, text: &str) {
        for c in text.chars() {
            prog.send_all(key(KeyCode::Char(c)));
        }
    }

    fn entry(id: i64) -> HistoryEntry {
        HistoryEntry {
            form: ReplaceForm {
                id: Some(id),
                group_number: "G-7".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn starts_on_new_form_and_loads_select_data() {
        let prog = program();
        assert_eq!(prog.model().ui().mode, NavigationMode::New);
        assert_eq!(prog.model().tabs().selected(), FORM_TAB);
        assert_eq!(prog.model().submit_label(), "Send");
        assert_eq!(prog.futures_started(), 1);
    }

    #[test]
    fn terminal_title_follows_screen() {
        let mut prog = program();
        assert_eq!(prog.title(), Some("techpanel: new form"));
        prog.send_all(key(KeyCode::F(3)));
        assert_eq!(prog.title(), Some("techpanel: admin"));
        prog.send_all(key(KeyCode::F(2)));
        assert_eq!(prog.title(), Some("techpanel: history"));
        prog.send_all(Msg::HistoryLoaded(Ok(vec![entry(4)])));
        prog.send_all(key(KeyCode::Enter));
        assert_eq!(prog.title(), Some("techpanel: edit form"));
        // Same screen, no new title.
        type_text(&mut prog, "x");
        assert_eq!(prog.title(), Some("techpanel: edit form"));
    }

    #[test]
    fn left_swipe_saves_and_shows_history() {
        let mut prog = program();
        type_text(&mut prog, "a");
        // 19 columns of 8 units = 152 to the left, no vertical travel.
        gesture(&mut prog, 40, 20, -19, 0, 100);

        let app = prog.model();
        assert_eq!(app.ui().mode, NavigationMode::History);
        assert_eq!(app.tabs().selected(), HISTORY_TAB);
        assert_eq!(app.drafts().load(DraftSlot::New).map(|f| f.lesson_date.as_str()), Some("a"));
        assert_eq!(prog.futures_started(), 2);
    }

    #[test]
    fn right_swipe_saves_edit_and_shows_new_form() {
        let mut prog = program();
        prog.send_all(Msg::Navigate(Destination::History));
        prog.send_all(Msg::HistoryLoaded(Ok(vec![entry(7)])));
        prog.send_all(key(KeyCode::Enter));
        assert_eq!(prog.model().ui().mode, NavigationMode::Edit);
        assert_eq!(prog.model().submit_label(), "Save changes");
        assert_eq!(prog.model().tabs().titles()[FORM_TAB], "Edit form");

        type_text(&mut prog, "x");
        gesture(&mut prog, 20, 20, 19, 0, 200);

        let app = prog.model();
        assert_eq!(app.ui().mode, NavigationMode::New);
        assert_eq!(app.tabs().selected(), FORM_TAB);
        assert_eq!(app.submit_label(), "Send");
        assert_eq!(app.clear_label(), "Clear");
        let edit = app.drafts().load(DraftSlot::Edit);
        assert_eq!(edit.map(|f| (f.id, f.lesson_date.as_str())), Some((Some(7), "x")));
    }

    #[test]
    fn short_diagonal_gesture_does_nothing() {
        let mut prog = program();
        // 24 units across, 16 down: too far for a click, too short for a swipe.
        gesture(&mut prog, 60, 37, 3, 1, 100);
        assert_eq!(prog.model().ui().mode, NavigationMode::New);
        assert_eq!(prog.futures_started(), 1);
    }

    #[test]
    fn slow_swipe_is_ignored() {
        let mut prog = program();
        gesture(&mut prog, 40, 20, -19, 0, 301);
        assert_eq!(prog.model().ui().mode, NavigationMode::New);
        assert_eq!(prog.futures_started(), 1);
    }

    #[test]
    fn vertical_swipe_does_not_navigate() {
        let mut prog = program();
        gesture(&mut prog, 40, 10, 0, 7, 100);
        assert_eq!(prog.model().ui().mode, NavigationMode::New);
    }

    #[test]
    fn tap_on_history_tab_navigates() {
        let mut prog = program();
        gesture(&mut prog, 13, 0, 0, 0, 50);
        assert_eq!(prog.model().ui().mode, NavigationMode::History);
        assert_eq!(prog.futures_started(), 2);
    }

    #[test]
    fn submit_is_guarded_until_reply() {
        let mut prog = program();
        prog.send_all(ctrl('s'));
        prog.send_all(ctrl('s'));
        assert_eq!(prog.futures_started(), 2);

        prog.send_all(Msg::Submitted {
            edit: false,
            form: ReplaceForm::default(),
            outcome: ok_post(),
        });
        assert_eq!(prog.model().console().latest(), Some("Form sent."));
        prog.send_all(ctrl('s'));
        assert_eq!(prog.futures_started(), 3);
    }

    #[test]
    fn rejected_submit_shows_response() {
        let mut prog = program();
        prog.send_all(ctrl('s'));
        prog.send_all(Msg::Submitted {
            edit: false,
            form: ReplaceForm::default(),
            outcome: PostOutcome {
                success: false,
                response: "500 (Internal Server Error)".into(),
            },
        });
        assert_eq!(prog.model().console().latest(), Some("500 (Internal Server Error)"));
    }

    #[test]
    fn saved_edit_returns_to_history() {
        let mut prog = program();
        prog.send_all(Msg::Navigate(Destination::History));
        prog.send_all(Msg::HistoryLoaded(Ok(vec![entry(3)])));
        prog.send_all(key(KeyCode::Enter));
        prog.send_all(ctrl('s'));
        let started = prog.futures_started();
        let sent = prog.model().editor().snapshot();

        prog.send_all(Msg::Submitted {
            edit: true,
            form: sent,
            outcome: ok_post(),
        });
        assert_eq!(prog.model().ui().mode, NavigationMode::History);
        assert!(prog.model().drafts().load(DraftSlot::Edit).is_none());
        assert_eq!(prog.futures_started(), started + 1);
    }

    #[test]
    fn sent_form_is_cleared() {
        let mut prog = program();
        type_text(&mut prog, "a");
        prog.send_all(ctrl('s'));
        let sent = prog.model().editor().snapshot();

        prog.send_all(Msg::Submitted {
            edit: false,
            form: sent,
            outcome: ok_post(),
        });
        assert_eq!(prog.model().editor().field_value(FormField::LessonDate), "");
        assert_eq!(prog.model().drafts().load(DraftSlot::New), Some(&ReplaceForm::default()));
    }

    #[test]
    fn typing_after_send_is_kept() {
        let mut prog = program();
        prog.send_all(ctrl('s'));
        let sent = prog.model().editor().snapshot();
        type_text(&mut prog, "z");

        prog.send_all(Msg::Submitted {
            edit: false,
            form: sent,
            outcome: ok_post(),
        });
        let app = prog.model();
        assert_eq!(app.console().latest(), Some("Form sent."));
        assert_eq!(app.editor().field_value(FormField::LessonDate), "z");
    }

    #[test]
    fn saving_one_entry_keeps_another_open_edit() {
        let mut prog = program();
        prog.send_all(Msg::Navigate(Destination::History));
        prog.send_all(Msg::HistoryLoaded(Ok(vec![entry(3), entry(5)])));
        prog.send_all(key(KeyCode::Enter));
        prog.send_all(ctrl('s'));
        let sent = prog.model().editor().snapshot();
        assert_eq!(sent.id, Some(3));

        prog.send_all(key(KeyCode::F(2)));
        prog.send_all(Msg::HistoryLoaded(Ok(vec![entry(3), entry(5)])));
        prog.send_all(key(KeyCode::Down));
        prog.send_all(key(KeyCode::Enter));
        type_text(&mut prog, "w");

        prog.send_all(Msg::Submitted {
            edit: true,
            form: sent,
            outcome: ok_post(),
        });
        let app = prog.model();
        assert_eq!(app.console().latest(), Some("Changes saved."));
        assert_eq!(app.ui().mode, NavigationMode::Edit);
        assert_eq!(app.editor().editing_id(), Some(5));
        assert_eq!(app.editor().field_value(FormField::LessonDate), "w");
        assert_eq!(app.drafts().load(DraftSlot::Edit).and_then(|f| f.id), Some(5));
    }

    #[test]
    fn delete_refreshes_history() {
        let mut prog = program();
        prog.send_all(Msg::Navigate(Destination::History));
        prog.send_all(Msg::HistoryLoaded(Ok(vec![entry(5)])));
        prog.send_all(key(KeyCode::Char('d')));
        assert_eq!(prog.futures_started(), 3);

        prog.send_all(Msg::Deleted {
            id: 5,
            outcome: ok_post(),
        });
        assert_eq!(prog.model().console().latest(), Some("Request 5 deleted."));
        assert_eq!(prog.futures_started(), 4);
    }

    #[test]
    fn admin_update_is_guarded_and_refetches() {
        let mut prog = program();
        prog.send_all(key(KeyCode::F(3)));
        assert!(prog.model().ui().admin_open);
        assert_eq!(prog.model().tabs().selected(), ADMIN_TAB);

        prog.send_all(Msg::SelectDataLoaded(Ok(SelectData::default())));
        prog.send_all(key(KeyCode::Enter));
        prog.send_all(key(KeyCode::Enter));
        assert_eq!(prog.futures_started(), 2);

        prog.send_all(Msg::AdminDone(GetOutcome {
            success: true,
            response: "select data updated".into(),
            status_code: 200,
            status_text: "OK".into(),
            response_body: "select data updated".into(),
        }));
        assert_eq!(prog.model().console().latest(), Some("select data updated"));
        assert_eq!(prog.futures_started(), 3);
    }

    #[test]
    fn failed_admin_command_only_logs_to_console() {
        let mut prog = program();
        prog.send_all(key(KeyCode::F(3)));
        prog.send_all(key(KeyCode::Enter));
        let started = prog.futures_started();
        prog.send_all(Msg::AdminDone(GetOutcome {
            success: false,
            response: "404 (Not Found): not found".into(),
            status_code: 404,
            status_text: "Not Found".into(),
            response_body: "not found".into(),
        }));
        assert_eq!(prog.model().console().latest(), Some("404 (Not Found): not found"));
        assert_eq!(prog.futures_started(), started);
    }

    #[test]
    fn subject_change_resets_module_and_lesson() {
        let mut prog = program();
        let form = ReplaceForm {
            module: "3".into(),
            lesson: "7".into(),
            teacher: "Ivanova".into(),
            ..Default::default()
        };
        let app = prog.model_mut();
        app.editor.load(&form);
        app.selection_changed(ChangeEvent {
            source: "subject".into(),
            value: "Python".into(),
        });
        assert_eq!(app.editor().field_value(FormField::Module), "");
        assert_eq!(app.editor().field_value(FormField::Lesson), "");
        assert_eq!(app.editor().field_value(FormField::Teacher), "Ivanova");
    }

    #[test]
    fn format_change_is_reported() {
        let mut prog = program();
        let app = prog.model_mut();
        app.selection_changed(ChangeEvent {
            source: "replace-format".into(),
            value: "Online".into(),
        });
        assert_eq!(app.console().latest(), Some("Replace format: Online"));
    }

    #[test]
    fn quit_saves_the_draft() {
        let mut prog = program();
        type_text(&mut prog, "q");
        prog.send_all(ctrl('q'));
        assert!(prog.quit_requested());
        assert_eq!(
            prog.model().drafts().load(DraftSlot::New).map(|f| f.lesson_date.as_str()),
            Some("q")
        );
    }

    #[test]
    fn renders_form_screen() {
        let prog = program();
        let screen = prog.render_string(100, 40);
        assert!(screen.contains("New form"));
        assert!(screen.contains("Send"));
        assert!(screen.contains("Lesson date"));
    }
}
