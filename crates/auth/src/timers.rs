//! Caller-owned timers for the guard's side effects.
//!
//! Both timers are plain state machines over `Instant`s supplied by the
//! caller, so the shell decides how time advances (a runtime sleep in
//! production, explicit instants in tests).

use std::time::{Duration, Instant};

use crate::guard::{RedirectKey, RedirectPlan};
use crate::principal::LoadingState;
use crate::route::RouteRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledRedirect {
    key: RedirectKey,
    target: RouteRequest,
    deadline: Instant,
}

/// Single-shot, cancellable redirect that follows a denial.
#[derive(Debug, Clone, Default)]
pub struct DenialRedirectTimer {
    scheduled: Option<ScheduledRedirect>,
}

impl DenialRedirectTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `plan`, replacing whatever was pending.
    pub fn schedule(&mut self, plan: RedirectPlan, now: Instant) {
        if let Some(previous) = self.scheduled.take() {
            tracing::debug!(to = %previous.target, "replacing pending denial redirect");
        }
        self.scheduled = Some(ScheduledRedirect {
            key: plan.key,
            target: plan.target,
            deadline: now + plan.delay,
        });
    }

    pub fn cancel(&mut self) {
        if let Some(previous) = self.scheduled.take() {
            tracing::debug!(to = %previous.target, "cancelled pending denial redirect");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.scheduled.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.scheduled.as_ref().map(|s| s.deadline)
    }

    pub fn key(&self) -> Option<&RedirectKey> {
        self.scheduled.as_ref().map(|s| &s.key)
    }

    /// Fire the redirect if it is due.
    ///
    /// Returns the target at most once per schedule. When `active` no longer
    /// matches the key the redirect was scheduled under, the timer is consumed
    /// without producing a target.
    pub fn poll(&mut self, now: Instant, active: Option<&RedirectKey>) -> Option<RouteRequest> {
        let due = self.scheduled.as_ref().is_some_and(|s| now >= s.deadline);
        if !due {
            return None;
        }

        let scheduled = self.scheduled.take()?;
        if active == Some(&scheduled.key) {
            Some(scheduled.target)
        } else {
            tracing::debug!(to = %scheduled.target, "stale denial redirect dropped");
            None
        }
    }
}

/// Emitted once when authentication stayed pending for the whole timeout.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WatchdogTrip {
    pub waited: Duration,
}

/// Last-resort timer for an authentication source that never resolves.
#[derive(Debug, Clone)]
pub struct LoadingWatchdog {
    timeout: Duration,
    state: Option<LoadingState>,
    pending_since: Option<Instant>,
    tripped: bool,
}

impl LoadingWatchdog {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            state: None,
            pending_since: None,
            tripped: false,
        }
    }

    /// Record the current loading state. A change resets the clock.
    pub fn observe(&mut self, loading: LoadingState, at: Instant) {
        if self.state == Some(loading) {
            return;
        }
        self.state = Some(loading);
        self.tripped = false;
        self.pending_since = match loading {
            LoadingState::Pending => Some(at),
            LoadingState::Resolved => None,
        };
    }

    pub fn deadline(&self) -> Option<Instant> {
        if self.tripped {
            return None;
        }
        self.pending_since.map(|since| since + self.timeout)
    }

    pub fn poll(&mut self, now: Instant) -> Option<WatchdogTrip> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        let pending_since = self.pending_since?;
        self.tripped = true;
        Some(WatchdogTrip {
            waited: now.saturating_duration_since(pending_since),
        })
    }

    /// Disarm for teardown; the next `observe` starts over.
    pub fn cancel(&mut self) {
        self.state = None;
        self.pending_since = None;
        self.tripped = false;
    }
}
