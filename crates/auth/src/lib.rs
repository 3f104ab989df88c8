//! `homebid-auth` — role-based route access control for the dashboard shell.
//!
//! This crate is intentionally decoupled from the router, the identity
//! provider and any runtime: the guard is a pure function and the timers are
//! driven by instants the caller supplies.

pub mod claims;
pub mod config;
pub mod error;
pub mod guard;
pub mod principal;
pub mod roles;
pub mod route;
pub mod timers;

pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use config::GuardConfig;
pub use error::{ConfigError, GuardIncident, IncidentKind, Severity, UnknownRole};
pub use guard::{
    AccessDecision, AccessExplanation, AccessGuard, Directive, GuardState, GuardVerdict,
    RedirectKey, RedirectPlan, evaluate, explain,
};
pub use principal::{AuthSnapshot, LoadingState, Principal, PrincipalId};
pub use roles::{Role, RoleClaim};
pub use route::{DASHBOARD_ALIAS, RouteRequest};
pub use timers::{DenialRedirectTimer, LoadingWatchdog, WatchdogTrip};
