//! Guard incident taxonomy.
//!
//! None of these are raised by the guard itself: `evaluate` maps every input
//! to a decision. Incidents classify decisions and timer trips for telemetry
//! and for the caller's choice of recovery.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::roles::{Role, RoleClaim};

/// A role token that is not part of the closed role set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardIncident {
    /// Authentication never resolved; recovered by reloading the shell.
    #[error("authentication did not resolve within {waited:?}")]
    LoadingTimeout { waited: Duration },

    #[error("access denied: '{actual}' may not view the {required} dashboard")]
    AccessDenied { required: Role, actual: RoleClaim },

    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),

    #[error("not signed in")]
    Unauthenticated,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Part of normal operation (redirect to sign-in, denial redirect).
    Expected,
    /// Data integrity issue; continue with a fallback.
    Degraded,
    /// The current view cannot recover on its own.
    Fatal,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    LoadingTimeout,
    AccessDenied,
    UnknownRole,
    Unauthenticated,
}

impl GuardIncident {
    pub fn kind(&self) -> IncidentKind {
        match self {
            GuardIncident::LoadingTimeout { .. } => IncidentKind::LoadingTimeout,
            GuardIncident::AccessDenied { .. } => IncidentKind::AccessDenied,
            GuardIncident::UnknownRole(_) => IncidentKind::UnknownRole,
            GuardIncident::Unauthenticated => IncidentKind::Unauthenticated,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            GuardIncident::LoadingTimeout { .. } => Severity::Fatal,
            GuardIncident::UnknownRole(_) => Severity::Degraded,
            GuardIncident::AccessDenied { .. } | GuardIncident::Unauthenticated => {
                Severity::Expected
            }
        }
    }
}

/// Configuration value that could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: expected a duration in milliseconds, got '{value}'")]
    InvalidMillis { key: &'static str, value: String },

    #[error("{key}: {source}")]
    InvalidRole {
        key: &'static str,
        #[source]
        source: UnknownRole,
    },

    #[error("{key}: sign-in path must start with '/', got '{value}'")]
    InvalidPath { key: &'static str, value: String },
}
