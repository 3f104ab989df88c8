//! Argument handling for `guardctl`.

use std::time::Instant;

use anyhow::Context;
use chrono::{DateTime, Utc};
use homebid_auth::{AuthSnapshot, Principal, RoleClaim, SessionClaims};

/// Principal given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalArg {
    /// `-`
    SignedOut,
    /// `@path/to/claims.json`
    ClaimsFile(String),
    /// Any other token is taken as a role claim.
    Role(String),
}

impl PrincipalArg {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "-" => PrincipalArg::SignedOut,
            _ => match raw.strip_prefix('@') {
                Some(path) => PrincipalArg::ClaimsFile(path.to_string()),
                None => PrincipalArg::Role(raw.to_string()),
            },
        }
    }
}

/// Build the snapshot `guardctl` evaluates against.
pub fn snapshot_for(
    arg: &PrincipalArg,
    now: DateTime<Utc>,
    at: Instant,
) -> anyhow::Result<AuthSnapshot> {
    match arg {
        PrincipalArg::SignedOut => Ok(AuthSnapshot::signed_out(at)),
        PrincipalArg::Role(claim) => Ok(AuthSnapshot::resolved(
            Principal::authenticated("guardctl", RoleClaim::parse(claim)),
            at,
        )),
        PrincipalArg::ClaimsFile(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read claims file {path}"))?;
            snapshot_from_claims_json(&json, now, at)
        }
    }
}

/// Snapshot from a session-claims document; expired claims sign the principal out.
pub fn snapshot_from_claims_json(
    json: &str,
    now: DateTime<Utc>,
    at: Instant,
) -> anyhow::Result<AuthSnapshot> {
    let claims: SessionClaims = serde_json::from_str(json).context("malformed session claims")?;
    Ok(AuthSnapshot::from_claims(Some(&claims), now, at))
}
