use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};

/// Events produced by the terminal and delivered through the
/// [`terminal_events`](crate::subscriptions::terminal_events) subscription.
///
/// Mouse input is narrowed to [`PointerEvent`]s: the panel only cares about
/// the primary button (clicks and swipes) and the wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A primary-button or wheel event.
    Pointer(PointerEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Bracketed paste content.
    Paste(String),
}

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Primary button pressed. Starts a click or a swipe.
    Down,
    /// Primary button released. Ends a click or a swipe.
    Up,
    /// Pointer moved while the primary button is held.
    Drag,
    /// Wheel scrolled up.
    ScrollUp,
    /// Wheel scrolled down.
    ScrollDown,
}

/// A pointer event in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub column: u16,
    pub row: u16,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, column: u16, row: u16) -> Self {
        Self { kind, column, row }
    }

    /// Narrow a crossterm mouse event. Non-primary buttons and hover motion
    /// are dropped.
    pub fn from_mouse(mouse: MouseEvent) -> Option<Self> {
        let kind = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
            MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
            MouseEventKind::Drag(MouseButton::Left) => PointerKind::Drag,
            MouseEventKind::ScrollUp => PointerKind::ScrollUp,
            MouseEventKind::ScrollDown => PointerKind::ScrollDown,
            _ => return None,
        };
        Some(Self::new(kind, mouse.column, mouse.row))
    }
}

impl PanelEvent {
    /// Convert a raw crossterm event, dropping the ones the panel ignores.
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        match event {
            crossterm::event::Event::Key(k) => Some(PanelEvent::Key(k)),
            crossterm::event::Event::Mouse(m) => PointerEvent::from_mouse(m).map(PanelEvent::Pointer),
            crossterm::event::Event::Resize(w, h) => Some(PanelEvent::Resize(w, h)),
            crossterm::event::Event::Paste(s) => Some(PanelEvent::Paste(s)),
            crossterm::event::Event::FocusGained | crossterm::event::Event::FocusLost => None,
        }
    }
}
