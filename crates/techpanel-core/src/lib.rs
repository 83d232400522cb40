//! Elm-architecture runtime for the **techpanel** terminal admin panel.
//!
//! The panel is a single [`Model`] whose state is changed only inside
//! [`Model::update`]. Terminal input arrives through a [`Subscription`] as
//! [`PanelEvent`]s; network work is returned from `update` as a
//! [`Command::perform`] future and comes back later as another message.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Application state: init / update / view |
//! | [`Component`] | Widget owning its state, rendered into a `Rect` |
//! | [`Command`] | Side effect requested by `update` |
//! | [`Subscription`] | Long-lived event source, diffed by id |
//! | [`Program`] | Owns the terminal and runs the loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for tests |

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::{Command, TerminalCommand};
pub use component::Component;
pub use event::{PanelEvent, PointerEvent, PointerKind};
pub use model::Model;
pub use runtime::{Program, ProgramError, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{terminal_events, Every};

/// Run a model with the given options until it quits.
pub async fn run_with<M: Model>(flags: M::Flags, options: ProgramOptions) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
