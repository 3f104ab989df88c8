use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// First segment of the role-agnostic dashboard route (`/dashboard`).
pub const DASHBOARD_ALIAS: &str = "dashboard";

/// A requested route, as a slash-delimited path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteRequest {
    path: String,
}

impl RouteRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Non-empty path segments; leading, trailing and doubled slashes are ignored.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// The first segment, if any.
    pub fn scope(&self) -> Option<&str> {
        self.segments().next()
    }

    /// Role partition of this route, when the first segment is a role token.
    pub fn role_scope(&self) -> Option<Role> {
        self.scope().and_then(|s| s.parse().ok())
    }

    pub fn is_dashboard_alias(&self) -> bool {
        self.scope() == Some(DASHBOARD_ALIAS)
    }

    pub fn role_dashboard(role: Role) -> Self {
        Self::new(format!("/{role}/dashboard"))
    }

    pub fn role_profile(role: Role) -> Self {
        Self::new(format!("/{role}/profile"))
    }

    pub fn role_settings(role: Role) -> Self {
        Self::new(format!("/{role}/settings"))
    }

    /// Same route after normalizing slashes, for comparisons.
    pub fn normalized(&self) -> String {
        let mut out = String::with_capacity(self.path.len() + 1);
        for segment in self.segments() {
            out.push('/');
            out.push_str(segment);
        }
        if out.is_empty() {
            out.push('/');
        }
        out
    }

    pub fn same_route(&self, other: &RouteRequest) -> bool {
        self.normalized() == other.normalized()
    }
}

impl core::fmt::Display for RouteRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for RouteRequest {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_skip_empty_parts() {
        let route = RouteRequest::new("//contractor///projects/");
        assert_eq!(route.segments().collect::<Vec<_>>(), vec!["contractor", "projects"]);
        assert_eq!(route.role_scope(), Some(Role::Contractor));
        assert_eq!(route.normalized(), "/contractor/projects");
    }

    #[test]
    fn root_has_no_scope() {
        let route = RouteRequest::new("/");
        assert_eq!(route.scope(), None);
        assert_eq!(route.role_scope(), None);
        assert_eq!(route.normalized(), "/");
    }

    #[test]
    fn role_surface_paths() {
        assert_eq!(RouteRequest::role_dashboard(Role::Homeowner).path(), "/homeowner/dashboard");
        assert_eq!(RouteRequest::role_profile(Role::Contractor).path(), "/contractor/profile");
        assert_eq!(RouteRequest::role_settings(Role::Admin).path(), "/admin/settings");
    }

    #[test]
    fn alias_is_detected_on_first_segment_only() {
        assert!(RouteRequest::new("/dashboard").is_dashboard_alias());
        assert!(RouteRequest::new("/dashboard/").is_dashboard_alias());
        assert!(!RouteRequest::new("/homeowner/dashboard").is_dashboard_alias());
        assert!(
            RouteRequest::new("/homeowner/dashboard/").same_route(&"/homeowner/dashboard".into())
        );
    }
}
