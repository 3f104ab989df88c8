use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownRole;

/// Role identifier used for route partitioning.
///
/// The set is closed: a path segment is a role token only when it parses into
/// one of these variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Homeowner,
    Contractor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Homeowner, Role::Contractor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Homeowner => "homeowner",
            Role::Contractor => "contractor",
            Role::Admin => "admin",
        }
    }

    /// Whether `segment` names one of the known roles.
    pub fn is_role_token(segment: &str) -> bool {
        segment.parse::<Role>().is_ok()
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Homeowner => "Homeowner posting projects and reviewing proposals",
            Role::Contractor => "Contractor browsing projects and submitting proposals",
            Role::Admin => "Marketplace administrator",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "homeowner" => Ok(Role::Homeowner),
            "contractor" => Ok(Role::Contractor),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The role claim as asserted by the authentication source.
///
/// A claim that does not name a known role is kept verbatim instead of being
/// rejected, so a corrupted claim degrades to the default scope rather than
/// failing the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleClaim {
    Known(Role),
    Unknown(String),
}

impl RoleClaim {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Role>() {
            Ok(role) => RoleClaim::Known(role),
            Err(err) => {
                tracing::warn!(error = %err, "principal carries an unrecognized role claim");
                RoleClaim::Unknown(raw.to_string())
            }
        }
    }

    pub fn known(&self) -> Option<Role> {
        match self {
            RoleClaim::Known(role) => Some(*role),
            RoleClaim::Unknown(_) => None,
        }
    }

    /// Scope whose dashboard is this principal's home.
    pub fn home_scope(&self, default_scope: Role) -> Role {
        self.known().unwrap_or(default_scope)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoleClaim::Known(role) => role.as_str(),
            RoleClaim::Unknown(raw) => raw,
        }
    }
}

impl From<Role> for RoleClaim {
    fn from(value: Role) -> Self {
        RoleClaim::Known(value)
    }
}

impl core::fmt::Display for RoleClaim {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tokens_are_case_sensitive() {
        assert!(Role::is_role_token("contractor"));
        assert!(!Role::is_role_token("Contractor"));
        assert!(!Role::is_role_token("dashboard"));
        assert!(!Role::is_role_token(""));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn unknown_claim_falls_back_to_default_scope() {
        let claim = RoleClaim::parse("superuser");
        assert_eq!(claim, RoleClaim::Unknown("superuser".to_string()));
        assert_eq!(claim.home_scope(Role::Homeowner), Role::Homeowner);
        assert_eq!(RoleClaim::parse("admin").home_scope(Role::Homeowner), Role::Admin);
    }

    #[test]
    fn claims_serialize_as_plain_strings() {
        let known = serde_json::to_string(&RoleClaim::Known(Role::Contractor)).unwrap();
        let unknown = serde_json::to_string(&RoleClaim::Unknown("root".into())).unwrap();
        assert_eq!(known, "\"contractor\"");
        assert_eq!(unknown, "\"root\"");

        let back: RoleClaim = serde_json::from_str("\"homeowner\"").unwrap();
        assert_eq!(back, RoleClaim::Known(Role::Homeowner));
    }
}
