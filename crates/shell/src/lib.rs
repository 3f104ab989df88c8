//! `homebid-shell` — the dashboard shell that hosts the access guard.
//!
//! Owns the denial-redirect and loading-watchdog timers, forwards guard
//! directives to a [`Router`], and provides a tokio driver fed by watch
//! channels from the authentication source and the router.

pub mod cli;
pub mod router;
pub mod runtime;
pub mod shell;

pub use router::{ChannelRouter, RecordingRouter, Router, RouterCommand};
pub use runtime::run_shell;
pub use shell::{DashboardShell, ShellView};
