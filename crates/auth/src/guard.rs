//! Role-based route access control for the dashboard shell.
//!
//! `evaluate` is a pure function of an auth snapshot and a route. It never
//! fails and never touches a timer; `AccessGuard::plan` additionally returns
//! the instructions the caller needs to drive its own timers and router.

use std::time::Duration;

use serde::Serialize;

use crate::config::GuardConfig;
use crate::error::{GuardIncident, IncidentKind};
use crate::principal::AuthSnapshot;
use crate::roles::{Role, RoleClaim};
use crate::route::RouteRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Authentication is still resolving; render a neutral loading state.
    Pending,

    /// Resolution finished without a signed-in principal.
    Unauthenticated,

    /// The route may be rendered. `canonical` is set when the role-agnostic
    /// dashboard alias must be rewritten to the principal's own dashboard.
    Allowed { canonical: Option<RouteRequest> },

    /// The route belongs to `required_role`; the principal holds `attempted_scope`.
    Denied {
        required_role: Role,
        attempted_scope: RoleClaim,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    Pending,
    Unauthenticated,
    Allowed,
    Canonicalizing,
    Denied,
}

impl AccessDecision {
    pub fn state(&self) -> GuardState {
        match self {
            AccessDecision::Pending => GuardState::Pending,
            AccessDecision::Unauthenticated => GuardState::Unauthenticated,
            AccessDecision::Allowed { canonical: Some(_) } => GuardState::Canonicalizing,
            AccessDecision::Allowed { canonical: None } => GuardState::Allowed,
            AccessDecision::Denied { .. } => GuardState::Denied,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed { .. })
    }

    /// Key a denial redirect scheduled for this decision would carry.
    pub fn redirect_key(&self) -> Option<RedirectKey> {
        match self {
            AccessDecision::Denied {
                required_role,
                attempted_scope,
            } => Some(RedirectKey {
                role: attempted_scope.clone(),
                scope: *required_role,
            }),
            _ => None,
        }
    }

    /// Incident this decision represents, if any. Canonicalization is not one.
    pub fn incident(&self) -> Option<GuardIncident> {
        match self {
            AccessDecision::Unauthenticated => Some(GuardIncident::Unauthenticated),
            AccessDecision::Denied {
                required_role,
                attempted_scope,
            } => Some(GuardIncident::AccessDenied {
                required: *required_role,
                actual: attempted_scope.clone(),
            }),
            AccessDecision::Pending | AccessDecision::Allowed { .. } => None,
        }
    }
}

/// Identifies a scheduled denial redirect: the principal's role and the scope
/// that was denied when the redirect was scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RedirectKey {
    pub role: RoleClaim,
    pub scope: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPlan {
    pub key: RedirectKey,
    pub target: RouteRequest,
    pub delay: Duration,
}

/// What the caller must do after an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    None,
    /// Render a neutral loading state. The caller's watchdog measures from
    /// the snapshot's `transitioned_at`.
    AwaitAuthentication,
    /// Navigate to the sign-in entry point right away.
    NavigateToSignIn { path: RouteRequest },
    /// Replace the current history entry with `target`.
    ReplaceWith { target: RouteRequest },
    /// Show the denial message, then redirect once the delay elapses.
    ScheduleRedirect(RedirectPlan),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardVerdict {
    pub decision: AccessDecision,
    pub directive: Directive,
    /// User-facing explanation, set for denials.
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    config: GuardConfig,
}

impl AccessGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn evaluate(&self, snapshot: &AuthSnapshot, route: &RouteRequest) -> AccessDecision {
        if snapshot.is_pending() {
            return AccessDecision::Pending;
        }

        let Some(principal) = snapshot.authenticated_principal() else {
            return AccessDecision::Unauthenticated;
        };

        if route.is_dashboard_alias() {
            let home = principal.role.home_scope(self.config.default_scope);
            return AccessDecision::Allowed {
                canonical: Some(RouteRequest::role_dashboard(home)),
            };
        }

        let Some(scope) = route.role_scope() else {
            return AccessDecision::Allowed { canonical: None };
        };

        if principal.role.known() == Some(scope) {
            AccessDecision::Allowed { canonical: None }
        } else {
            AccessDecision::Denied {
                required_role: scope,
                attempted_scope: principal.role.clone(),
            }
        }
    }

    /// Evaluate and derive the caller's follow-up.
    pub fn plan(&self, snapshot: &AuthSnapshot, route: &RouteRequest) -> GuardVerdict {
        let decision = self.evaluate(snapshot, route);

        let (directive, message) = match &decision {
            AccessDecision::Pending => (Directive::AwaitAuthentication, None),
            AccessDecision::Unauthenticated => (
                Directive::NavigateToSignIn {
                    path: RouteRequest::new(self.config.sign_in_path.clone()),
                },
                None,
            ),
            AccessDecision::Allowed { canonical: Some(target) } => {
                tracing::debug!(from = %route, to = %target, "canonicalizing dashboard alias");
                (Directive::ReplaceWith { target: target.clone() }, None)
            }
            AccessDecision::Allowed { canonical: None } => (Directive::None, None),
            AccessDecision::Denied {
                required_role,
                attempted_scope,
            } => {
                let home = attempted_scope.home_scope(self.config.default_scope);
                let target = RouteRequest::role_dashboard(home);
                let message = denial_message(*required_role, home);

                tracing::info!(
                    path = %route,
                    required = %required_role,
                    actual = %attempted_scope,
                    "route denied for principal role"
                );

                let directive = match decision.redirect_key() {
                    Some(key) if !target.same_route(route) => {
                        Directive::ScheduleRedirect(RedirectPlan {
                            key,
                            target,
                            delay: self.config.denial_redirect_delay,
                        })
                    }
                    _ => {
                        // Unknown claim asking for the fallback dashboard itself.
                        tracing::warn!(path = %route, "denial redirect would loop; not scheduling");
                        Directive::None
                    }
                };
                (directive, Some(message))
            }
        };

        GuardVerdict {
            decision,
            directive,
            message,
        }
    }
}

/// Evaluate with the default configuration.
pub fn evaluate(snapshot: &AuthSnapshot, route: &RouteRequest) -> AccessDecision {
    AccessGuard::default().evaluate(snapshot, route)
}

pub fn denial_message(required: Role, home: Role) -> String {
    format!(
        "You don't have permission to access the {required} dashboard. \
         Redirecting you to your {home} dashboard..."
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Decision explanation (audit trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Serializable account of why a route was allowed or denied.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub requested_path: String,
    pub state: GuardState,
    pub granted: bool,
    pub reason: String,
    pub principal_id: Option<String>,
    pub role: Option<String>,
    pub role_description: Option<&'static str>,
    pub redirect_to: Option<String>,
    pub incident: Option<IncidentKind>,
}

pub fn explain(
    snapshot: &AuthSnapshot,
    route: &RouteRequest,
    verdict: &GuardVerdict,
) -> AccessExplanation {
    let principal = snapshot.authenticated_principal();

    let reason = match &verdict.decision {
        AccessDecision::Pending => "authentication is still resolving".to_string(),
        AccessDecision::Unauthenticated => "no signed-in principal".to_string(),
        AccessDecision::Allowed { canonical: Some(target) } => {
            format!("role-agnostic dashboard rewritten to {target}")
        }
        AccessDecision::Allowed { canonical: None } => match route.role_scope() {
            Some(scope) => format!("route is scoped to '{scope}', which the principal holds"),
            None => "route is not role-partitioned".to_string(),
        },
        AccessDecision::Denied {
            required_role,
            attempted_scope,
        } => format!(
            "route requires role '{required_role}', principal holds '{attempted_scope}'"
        ),
    };

    let redirect_to = match &verdict.directive {
        Directive::NavigateToSignIn { path } => Some(path.to_string()),
        Directive::ReplaceWith { target } => Some(target.to_string()),
        Directive::ScheduleRedirect(plan) => Some(plan.target.to_string()),
        Directive::None | Directive::AwaitAuthentication => None,
    };

    let unknown_role = principal.is_some_and(|p| p.role.known().is_none());
    let incident = match verdict.decision.incident() {
        Some(incident) => Some(incident.kind()),
        None if unknown_role => Some(IncidentKind::UnknownRole),
        None => None,
    };

    AccessExplanation {
        requested_path: route.to_string(),
        state: verdict.decision.state(),
        granted: verdict.decision.is_allowed(),
        reason,
        principal_id: principal.map(|p| p.id.to_string()),
        role: principal.map(|p| p.role.to_string()),
        role_description: principal.and_then(|p| p.role.known()).map(|r| r.description()),
        redirect_to,
        incident,
    }
}
