use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::principal::{AuthSnapshot, Principal, PrincipalId};
use crate::roles::RoleClaim;

/// Session claims handed over by the identity provider (transport-agnostic).
///
/// The role stays a raw string here; it is only interpreted when a principal
/// is built from the claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject / principal identifier.
    pub sub: String,

    /// Role claim as stored in the user's metadata.
    pub role: String,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate session claims against `now`.
///
/// Signature verification happens in the identity provider, not here.
pub fn validate_claims(
    claims: &SessionClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

impl Principal {
    pub fn from_claims(claims: &SessionClaims) -> Self {
        Self {
            id: PrincipalId::new(claims.sub.clone()),
            role: RoleClaim::parse(&claims.role),
            is_authenticated: true,
        }
    }
}

impl AuthSnapshot {
    /// Snapshot for a finished resolution.
    ///
    /// Missing or invalid claims resolve to a signed-out session; they are
    /// logged, never surfaced as errors.
    pub fn from_claims(claims: Option<&SessionClaims>, now: DateTime<Utc>, at: Instant) -> Self {
        let Some(claims) = claims else {
            return AuthSnapshot::signed_out(at);
        };

        match validate_claims(claims, now) {
            Ok(()) => AuthSnapshot::resolved(Principal::from_claims(claims), at),
            Err(err) => {
                tracing::info!(sub = %claims.sub, error = %err, "discarding session claims");
                AuthSnapshot::signed_out(at)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::roles::Role;

    fn claims(role: &str, now: DateTime<Utc>) -> SessionClaims {
        SessionClaims {
            sub: "user_42".to_string(),
            role: role.to_string(),
            issued_at: now - Duration::minutes(5),
            expires_at: now + Duration::hours(1),
        }
    }

    #[test]
    fn validation_checks_the_time_window() {
        let now = Utc::now();
        let mut c = claims("homeowner", now);
        assert_eq!(validate_claims(&c, now), Ok(()));

        c.expires_at = now;
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::Expired));

        c.issued_at = now + Duration::minutes(1);
        c.expires_at = now + Duration::minutes(2);
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::NotYetValid));

        c.expires_at = c.issued_at;
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn valid_claims_resolve_an_authenticated_principal() {
        let now = Utc::now();
        let claims = claims("contractor", now);
        let snapshot = AuthSnapshot::from_claims(Some(&claims), now, Instant::now());

        let principal = snapshot.authenticated_principal().unwrap();
        assert_eq!(principal.id.as_str(), "user_42");
        assert_eq!(principal.role, RoleClaim::Known(Role::Contractor));
    }

    #[test]
    fn unknown_role_claim_is_kept_not_rejected() {
        let now = Utc::now();
        let claims = claims("plumber", now);
        let snapshot = AuthSnapshot::from_claims(Some(&claims), now, Instant::now());

        let principal = snapshot.authenticated_principal().unwrap();
        assert_eq!(principal.role, RoleClaim::Unknown("plumber".to_string()));
    }

    #[test]
    fn expired_or_missing_claims_sign_out() {
        let now = Utc::now();
        let mut expired = claims("homeowner", now);
        expired.expires_at = now - Duration::seconds(1);
        expired.issued_at = now - Duration::hours(2);

        assert!(!AuthSnapshot::from_claims(Some(&expired), now, Instant::now()).is_authenticated());
        let missing = AuthSnapshot::from_claims(None, now, Instant::now());
        assert!(!missing.is_authenticated());
        assert!(!missing.is_pending());
    }
}
