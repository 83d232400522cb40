use crate::command::Command;
use ratatui::{layout::Rect, Frame};

/// A widget that owns its state and renders into an area chosen by its
/// parent.
///
/// The parent forwards input as the component's own message and reads any
/// immediate reply back out of the returned command:
///
/// ```rust,ignore
/// if let Some(tabs::Message::Select(index)) = self.tabs.update(msg).into_message() {
///     self.switch_to(index);
/// }
/// ```
pub trait Component: Send + 'static {
    type Message: Send + 'static;

    /// Handle a message and return follow-up work.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations must stay inside it, except for
    /// overlays that the parent explicitly lets escape (dropdown lists).
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Routing hint: whether keyboard input should go to this component.
    fn focused(&self) -> bool {
        false
    }
}
