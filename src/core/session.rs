//! Admin session and access policies
//!
//! The session is injected explicitly into each list view instead of being
//! read from ambient state. Views check it before every fetch and mutation.

use serde::{Deserialize, Serialize};

/// The signed-in administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Who is using the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// Signed in with a bearer token
    Admin { admin: Admin, token: String },

    /// Nobody signed in
    #[default]
    Anonymous,
}

impl Session {
    pub fn admin(admin: Admin, token: impl Into<String>) -> Self {
        Session::Admin {
            admin,
            token: token.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Admin { .. })
    }

    pub fn current_admin(&self) -> Option<&Admin> {
        match self {
            Session::Admin { admin, .. } => Some(admin),
            Session::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Admin { token, .. } => Some(token),
            Session::Anonymous => None,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.current_admin()
            .is_some_and(|admin| admin.roles.iter().any(|r| r == role))
    }
}

/// Requirement a session must meet for an operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// No session required
    Public,

    /// Any signed-in admin
    #[default]
    Authenticated,

    /// Signed-in admin with one of these roles
    HasRole(Vec<String>),
}

impl AccessPolicy {
    /// Check if the session satisfies this policy
    pub fn check(&self, session: &Session) -> bool {
        match self {
            AccessPolicy::Public => true,
            AccessPolicy::Authenticated => session.is_authenticated(),
            AccessPolicy::HasRole(required) => required.iter().any(|r| session.has_role(r)),
        }
    }

    /// Parse policy from string (for YAML config)
    pub fn parse_policy(s: &str) -> Self {
        match s {
            "public" => AccessPolicy::Public,
            "authenticated" => AccessPolicy::Authenticated,
            s => match s.strip_prefix("role:") {
                Some(role) => AccessPolicy::HasRole(vec![role.to_string()]),
                None => AccessPolicy::Authenticated,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(roles: &[&str]) -> Session {
        Session::admin(
            Admin {
                id: "a1".to_string(),
                name: "Asha".to_string(),
                email: "asha@example.org".to_string(),
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
            "token-123",
        )
    }

    #[test]
    fn test_anonymous_session() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(session.current_admin().is_none());
        assert!(session.token().is_none());
        assert!(!AccessPolicy::Authenticated.check(&session));
        assert!(AccessPolicy::Public.check(&session));
    }

    #[test]
    fn test_admin_session() {
        let session = admin(&["finance"]);
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("token-123"));
        assert!(AccessPolicy::Authenticated.check(&session));
        assert!(AccessPolicy::parse_policy("role:finance").check(&session));
        assert!(!AccessPolicy::parse_policy("role:events").check(&session));
    }

    #[test]
    fn test_parse_policy_defaults_to_authenticated() {
        assert_eq!(AccessPolicy::parse_policy("public"), AccessPolicy::Public);
        assert_eq!(AccessPolicy::parse_policy("whatever"), AccessPolicy::Authenticated);
    }
}
