//! Router seam: the shell only issues imperative commands through it.

use homebid_auth::RouteRequest;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterCommand {
    Navigate(RouteRequest),
    Replace(RouteRequest),
    ReloadShell,
}

pub trait Router {
    /// Push a new history entry.
    fn navigate(&mut self, path: &RouteRequest);

    /// Replace the current history entry.
    fn replace(&mut self, path: &RouteRequest);

    /// Hard reload of the application shell.
    fn reload_shell(&mut self);
}

/// Keeps every command in order; used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingRouter {
    pub commands: Vec<RouterCommand>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<RouterCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Router for RecordingRouter {
    fn navigate(&mut self, path: &RouteRequest) {
        self.commands.push(RouterCommand::Navigate(path.clone()));
    }

    fn replace(&mut self, path: &RouteRequest) {
        self.commands.push(RouterCommand::Replace(path.clone()));
    }

    fn reload_shell(&mut self) {
        self.commands.push(RouterCommand::ReloadShell);
    }
}

/// Forwards commands to whatever owns the real router.
#[derive(Debug, Clone)]
pub struct ChannelRouter {
    tx: mpsc::UnboundedSender<RouterCommand>,
}

impl ChannelRouter {
    pub fn new(tx: mpsc::UnboundedSender<RouterCommand>) -> Self {
        Self { tx }
    }

    fn send(&self, command: RouterCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!("router receiver dropped; command discarded");
        }
    }
}

impl Router for ChannelRouter {
    fn navigate(&mut self, path: &RouteRequest) {
        self.send(RouterCommand::Navigate(path.clone()));
    }

    fn replace(&mut self, path: &RouteRequest) {
        self.send(RouterCommand::Replace(path.clone()));
    }

    fn reload_shell(&mut self) {
        self.send(RouterCommand::ReloadShell);
    }
}
