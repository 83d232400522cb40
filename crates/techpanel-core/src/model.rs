use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application, driven as an init → update → view loop.
///
/// 1. [`init`](Model::init) builds the state from `Flags` and may return a
///    startup command (the panel fetches dropdown data here).
/// 2. [`view`](Model::view) draws the state.
/// 3. Events arrive through [`subscriptions`](Model::subscriptions) and
///    command results as messages.
/// 4. [`update`](Model::update) mutates state and returns more commands.
///
/// All of this runs on one task, so `update` never races itself. Async work
/// started from `update` completes later as a separate message; state that
/// must stay consistent across that gap (for example an in-flight request
/// flag) has to be stored on the model explicitly.
pub trait Model: Sized + Send + 'static {
    type Message: Send + 'static;

    /// Startup data handed to [`Model::init`].
    type Flags: Send + 'static;

    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Pure function of `&self`; called after every processed batch of
    /// messages.
    fn view(&self, frame: &mut Frame);

    /// Active event sources for the current state. The runtime diffs the
    /// returned set by id after each update.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
