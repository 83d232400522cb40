use futures::future::BoxFuture;
use std::future::Future;

/// A side effect requested by [`Model::update`](crate::Model::update) or
/// [`Model::init`](crate::Model::init).
///
/// Network calls never block the event loop: they are wrapped in
/// [`Command::perform`] and their result comes back as a message.
///
/// ```rust,ignore
/// let cmd = Command::perform(client.send_get(path, query), Msg::AdminReply);
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Action(Action<Msg>),
    Future(BoxFuture<'static, Msg>),
    Batch(Vec<Command<Msg>>),
    Terminal(TerminalCommand),
}

/// Actions the runtime handles without spawning a task.
pub enum Action<Msg> {
    /// Deliver a message on the next loop iteration.
    Message(Msg),
    /// Stop the program.
    Quit,
}

/// Terminal management commands executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    SetTitle(String),
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Run a future on the runtime and map its output to a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command {
            inner: CommandInner::Future(Box::pin(async move { map(future.await) })),
        }
    }

    /// Send a message immediately.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Action(Action::Message(msg)),
        }
    }

    /// Quit the program.
    pub fn quit() -> Self {
        Command {
            inner: CommandInner::Action(Action::Quit),
        }
    }

    /// Run several commands. Empty collapses to `none`, a single command is
    /// returned as-is.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().unwrap_or_else(Command::none),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Replace the terminal window title.
    pub fn set_title(title: impl Into<String>) -> Self {
        Command {
            inner: CommandInner::Terminal(TerminalCommand::SetTitle(title.into())),
        }
    }

    // --- Inspection, mostly for tests ---

    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// If this command is an immediate message, return it.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Action(Action::Message(msg)) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_of_nothing_is_none() {
        let cmd: Command<()> = Command::batch(vec![]);
        assert!(cmd.is_none());

        let cmd: Command<()> = Command::batch(vec![Command::none(), Command::none()]);
        assert!(cmd.is_none());
    }

    #[test]
    fn batch_single_unwraps() {
        let cmd: Command<i32> = Command::batch(vec![Command::none(), Command::message(1)]);
        assert_eq!(cmd.into_message(), Some(1));
    }

    #[test]
    fn batch_multiple_keeps_all() {
        let cmd: Command<i32> = Command::batch(vec![
            Command::message(1),
            Command::set_title("panel"),
            Command::perform(async { 5 }, |n| n),
        ]);
        match cmd.inner {
            CommandInner::Batch(cmds) => {
                assert_eq!(cmds.len(), 3);
                assert!(matches!(
                    &cmds[1].inner,
                    CommandInner::Terminal(TerminalCommand::SetTitle(t)) if t == "panel"
                ));
            }
            _ => panic!("expected a batch"),
        }
    }

    #[test]
    fn nested_batches_stay_nested() {
        let cmd: Command<i32> = Command::batch(vec![
            Command::message(1),
            Command::batch(vec![Command::message(2), Command::message(3)]),
        ]);
        match cmd.inner {
            CommandInner::Batch(cmds) => {
                assert_eq!(cmds.len(), 2);
                assert!(matches!(cmds[1].inner, CommandInner::Batch(_)));
            }
            _ => panic!("expected a batch"),
        }
    }

    #[tokio::test]
    async fn performed_future_maps_output() {
        let cmd: Command<String> = Command::perform(async { 7 }, |n: i32| (n * 2).to_string());
        match cmd.inner {
            CommandInner::Future(fut) => assert_eq!(fut.await, "14"),
            _ => panic!("expected a future"),
        }
    }
}
