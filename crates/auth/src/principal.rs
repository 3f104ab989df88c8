use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::roles::RoleClaim;

/// Identity of an authenticated principal as issued by the identity provider.
///
/// Opaque to this crate; only compared and logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The authenticated identity and role claim for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub role: RoleClaim,
    pub is_authenticated: bool,
}

impl Principal {
    pub fn authenticated(id: impl Into<PrincipalId>, role: impl Into<RoleClaim>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            is_authenticated: true,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingState {
    /// The authentication source has not answered yet.
    Pending,
    Resolved,
}

/// What the authentication source reported at one point in time.
///
/// Snapshots are never mutated in place: each sign-in, sign-out or role-claim
/// change produces a new one, which is what triggers re-evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub loading: LoadingState,
    pub principal: Option<Principal>,
    /// When `loading` last changed. Callers drive the loading watchdog from it.
    pub transitioned_at: Instant,
}

impl AuthSnapshot {
    pub fn pending(at: Instant) -> Self {
        Self {
            loading: LoadingState::Pending,
            principal: None,
            transitioned_at: at,
        }
    }

    pub fn signed_out(at: Instant) -> Self {
        Self {
            loading: LoadingState::Resolved,
            principal: None,
            transitioned_at: at,
        }
    }

    pub fn resolved(principal: Principal, at: Instant) -> Self {
        Self {
            loading: LoadingState::Resolved,
            principal: Some(principal),
            transitioned_at: at,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.loading == LoadingState::Pending
    }

    pub fn is_authenticated(&self) -> bool {
        !self.is_pending() && self.principal.as_ref().is_some_and(|p| p.is_authenticated)
    }

    /// The principal, but only once resolution finished with a signed-in session.
    pub fn authenticated_principal(&self) -> Option<&Principal> {
        if self.is_authenticated() {
            self.principal.as_ref()
        } else {
            None
        }
    }

    /// Successor snapshot carrying `transitioned_at` forward unless the
    /// loading state actually changes.
    pub fn succeed(
        &self,
        loading: LoadingState,
        principal: Option<Principal>,
        at: Instant,
    ) -> Self {
        let transitioned_at = if loading == self.loading { self.transitioned_at } else { at };
        Self {
            loading,
            principal,
            transitioned_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::roles::Role;

    #[test]
    fn pending_snapshot_is_never_authenticated() {
        let now = Instant::now();
        let mut snapshot = AuthSnapshot::pending(now);
        snapshot.principal = Some(Principal::authenticated("u-1", Role::Admin));

        assert!(!snapshot.is_authenticated());
        assert!(snapshot.authenticated_principal().is_none());
    }

    #[test]
    fn cleared_flag_means_signed_out() {
        let now = Instant::now();
        let mut principal = Principal::authenticated("u-1", Role::Homeowner);
        principal.is_authenticated = false;

        let snapshot = AuthSnapshot::resolved(principal, now);
        assert!(!snapshot.is_authenticated());
        assert!(!AuthSnapshot::signed_out(now).is_authenticated());
    }

    #[test]
    fn succeed_keeps_timestamp_when_loading_state_is_unchanged() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_millis(300);
        let t2 = t0 + Duration::from_millis(900);

        let pending = AuthSnapshot::pending(t0);
        let still_pending = pending.succeed(LoadingState::Pending, None, t1);
        assert_eq!(still_pending.transitioned_at, t0);

        let resolved = still_pending.succeed(
            LoadingState::Resolved,
            Some(Principal::authenticated("u-2", Role::Contractor)),
            t2,
        );
        assert_eq!(resolved.transitioned_at, t2);
    }
}
