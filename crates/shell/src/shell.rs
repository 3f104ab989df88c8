//! Dashboard shell: the caller side of the access guard.
//!
//! The shell owns the two timers, re-evaluates on every navigation and
//! principal change, and turns guard directives into router commands.
//! Time is passed in explicitly; see `runtime` for the tokio driver.

use std::time::Instant;

use homebid_auth::{
    AccessDecision, AccessGuard, AuthSnapshot, DenialRedirectTimer, Directive, GuardConfig,
    GuardIncident, GuardVerdict, LoadingWatchdog, RouteRequest,
};

use crate::router::Router;

/// What the shell renders for the current evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellView {
    Loading,
    RedirectingToSignIn,
    Content { route: RouteRequest },
    AccessDenied { message: String },
}

pub struct DashboardShell<R: Router> {
    guard: AccessGuard,
    router: R,
    snapshot: AuthSnapshot,
    route: RouteRequest,
    verdict: GuardVerdict,
    redirect: DenialRedirectTimer,
    watchdog: LoadingWatchdog,
    torn_down: bool,
}

impl<R: Router> DashboardShell<R> {
    pub fn new(
        config: GuardConfig,
        router: R,
        snapshot: AuthSnapshot,
        route: RouteRequest,
        now: Instant,
    ) -> Self {
        let guard = AccessGuard::new(config);
        let watchdog = LoadingWatchdog::new(guard.config().loading_timeout);
        let verdict = guard.plan(&snapshot, &route);

        let mut shell = Self {
            guard,
            router,
            snapshot,
            route,
            verdict,
            redirect: DenialRedirectTimer::new(),
            watchdog,
            torn_down: false,
        };
        shell.apply(now);
        shell
    }

    pub fn route(&self) -> &RouteRequest {
        &self.route
    }

    pub fn decision(&self) -> &AccessDecision {
        &self.verdict.decision
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut R {
        &mut self.router
    }

    pub fn view(&self) -> ShellView {
        match &self.verdict.decision {
            AccessDecision::Pending | AccessDecision::Allowed { canonical: Some(_) } => {
                ShellView::Loading
            }
            AccessDecision::Unauthenticated => ShellView::RedirectingToSignIn,
            AccessDecision::Allowed { canonical: None } => ShellView::Content {
                route: self.route.clone(),
            },
            AccessDecision::Denied { .. } => ShellView::AccessDenied {
                message: self.verdict.message.clone().unwrap_or_default(),
            },
        }
    }

    /// A new snapshot from the authentication source.
    ///
    /// A pending denial redirect survives if the new evaluation denies the same
    /// `(role, scope)` pair; otherwise it becomes a no-op when it fires.
    pub fn on_auth_change(&mut self, snapshot: AuthSnapshot, now: Instant) {
        if self.torn_down {
            return;
        }
        self.snapshot = snapshot;
        self.reevaluate(now);
    }

    /// The router reports a navigation. Any pending denial redirect is cancelled.
    pub fn on_navigate(&mut self, route: RouteRequest, now: Instant) {
        if self.torn_down || route.same_route(&self.route) {
            return;
        }
        self.redirect.cancel();
        self.route = route;
        self.reevaluate(now);
    }

    /// Fire whichever timers are due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }

        if let Some(trip) = self.watchdog.poll(now) {
            let incident = GuardIncident::LoadingTimeout { waited: trip.waited };
            tracing::error!(
                error = %incident,
                severity = ?incident.severity(),
                "authentication stalled; reloading shell"
            );
            self.router.reload_shell();
        }

        let active = self.verdict.decision.redirect_key();
        if let Some(target) = self.redirect.poll(now, active.as_ref()) {
            tracing::info!(
                from = %self.route,
                to = %target,
                "denial grace period over; redirecting"
            );
            self.router.navigate(&target);
            self.route = target;
            self.reevaluate(now);
        }
    }

    /// Earliest instant at which `tick` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.torn_down {
            return None;
        }
        match (self.redirect.deadline(), self.watchdog.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Cancel both timers; later events are ignored.
    pub fn teardown(&mut self) {
        self.redirect.cancel();
        self.watchdog.cancel();
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn reevaluate(&mut self, now: Instant) {
        self.verdict = self.guard.plan(&self.snapshot, &self.route);
        self.apply(now);
    }

    fn apply(&mut self, now: Instant) {
        self.watchdog.observe(self.snapshot.loading, self.snapshot.transitioned_at);

        match self.verdict.directive.clone() {
            Directive::None => {}
            Directive::AwaitAuthentication => {
                tracing::debug!(deadline = ?self.watchdog.deadline(), "waiting for authentication");
            }
            Directive::NavigateToSignIn { path } => {
                self.redirect.cancel();
                if !self.route.same_route(&path) {
                    self.router.navigate(&path);
                    self.route = path;
                }
            }
            Directive::ReplaceWith { target } => {
                self.router.replace(&target);
                self.route = target;
                self.verdict = self.guard.plan(&self.snapshot, &self.route);
            }
            Directive::ScheduleRedirect(plan) => {
                if self.redirect.key() != Some(&plan.key) {
                    self.redirect.schedule(plan, now);
                }
            }
        }
    }
}
