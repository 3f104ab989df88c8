//! Tokio driver for the dashboard shell.

use std::sync::Arc;

use homebid_auth::{AuthSnapshot, RouteRequest};
use tokio::sync::{Notify, watch};
use tokio::time::Instant;

use crate::router::Router;
use crate::shell::DashboardShell;

/// Current time on the tokio clock, as a std instant.
///
/// Snapshot producers must take their `transitioned_at` from here too so the
/// watchdog and a paused test clock agree.
pub fn now() -> std::time::Instant {
    Instant::now().into_std()
}

/// Drive `shell` from the authentication source and the router until
/// `shutdown` is notified or either source goes away.
///
/// Signal shutdown with `notify_one`, which is remembered even if the loop is
/// busy at that moment. The shell is torn down and handed back on exit.
pub async fn run_shell<R>(
    mut shell: DashboardShell<R>,
    mut auth_rx: watch::Receiver<AuthSnapshot>,
    mut route_rx: watch::Receiver<RouteRequest>,
    shutdown: Arc<Notify>,
) -> DashboardShell<R>
where
    R: Router + Send + 'static,
{
    tracing::info!(route = %shell.route(), "dashboard shell started");

    loop {
        let deadline = shell.next_deadline();
        let timer = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(Instant::from_std(at)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = shutdown.notified() => {
                tracing::info!("dashboard shell received shutdown signal");
                break;
            }
            changed = auth_rx.changed() => {
                if changed.is_err() {
                    tracing::warn!("authentication source closed");
                    break;
                }
                let snapshot = auth_rx.borrow_and_update().clone();
                shell.on_auth_change(snapshot, now());
            }
            changed = route_rx.changed() => {
                if changed.is_err() {
                    tracing::warn!("router closed");
                    break;
                }
                let route = route_rx.borrow_and_update().clone();
                shell.on_navigate(route, now());
            }
            _ = timer => {
                shell.tick(now());
            }
        }
    }

    shell.teardown();
    shell
}
