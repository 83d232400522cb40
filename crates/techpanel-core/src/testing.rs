use crate::command::{Action, Command, CommandInner, TerminalCommand};
use crate::model::Model;
use ratatui::buffer::Buffer;
use ratatui::Terminal;

/// Headless harness for driving a [`Model`] in plain `#[test]` functions.
///
/// Immediate messages ([`Command::message`]) are queued and flushed by
/// [`drain_messages`](TestProgram::drain_messages). Futures are not run; the
/// harness only counts them so a test can assert that a request was started,
/// then feed the reply back with [`send`](TestProgram::send).
///
/// ```rust,ignore
/// let mut prog = TestProgram::<PanelApp>::new(flags);
/// prog.send(Msg::SwitchTo(Panel::History));
/// assert_eq!(prog.futures_started(), 1);
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending: Vec<M::Message>,
    futures_started: usize,
    quit: bool,
    title: Option<String>,
}

impl<M: Model> TestProgram<M> {
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending: Vec::new(),
            futures_started: 0,
            quit: false,
            title: None,
        };
        program.collect(init_cmd);
        program
    }

    /// Run one update. Follow-up immediate messages stay queued.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Keep updating until no immediate messages remain.
    pub fn drain_messages(&mut self) {
        while !self.pending.is_empty() {
            let messages: Vec<_> = self.pending.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect(cmd);
            }
        }
    }

    /// `send` followed by `drain_messages`.
    pub fn send_all(&mut self, msg: M::Message) {
        self.send(msg);
        self.drain_messages();
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Number of futures the model asked to run so far.
    pub fn futures_started(&self) -> usize {
        self.futures_started
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Last title set through [`Command::set_title`].
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        // TestBackend never fails.
        let mut terminal = Terminal::new(backend).expect("test backend");
        terminal
            .draw(|frame| self.model.view(frame))
            .expect("test backend draw");
        terminal.backend().buffer().clone()
    }

    /// Render and return the screen as text, rows separated by newlines.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        let buf = self.render(width, height);
        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Terminal(TerminalCommand::SetTitle(title)) => self.title = Some(title),
            CommandInner::Action(Action::Message(msg)) => self.pending.push(msg),
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Future(_) => self.futures_started += 1,
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}
