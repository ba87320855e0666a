//! Role checks for route-level and handler-level authorization.
//!
//! Routes declare a [`RequiredRoles`] set when they are wired:
//!
//! - empty set: any authenticated identity passes
//! - non-empty set: the identity's `role` claim must be a member (exact match)
//!
//! Handlers that need a finer decision can call [`check_role`] or
//! [`check_any_role`] on the [`Identity`] they extracted.

use std::collections::BTreeSet;
use std::sync::Arc;

use chatgate_auth::Claims;
use chatgate_core::AppError;

use crate::middleware::auth::Identity;

pub const FORBIDDEN_MESSAGE: &str = "Forbidden. You're not allowed for this request.";

/// Set of roles allowed through a route. Cheap to clone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredRoles(Arc<BTreeSet<String>>);

impl RequiredRoles {
    pub fn new<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self(Arc::new(roles.into_iter().map(Into::into).collect()))
    }

    /// No restriction beyond being authenticated.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn permits(&self, role: &str) -> bool {
        self.is_empty() || self.contains(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Fails with `Forbidden` when `claims.role` is not allowed.
    pub fn check(&self, claims: &Claims) -> Result<(), AppError> {
        if self.permits(&claims.role) {
            return Ok(());
        }

        tracing::warn!(
            sub = %claims.sub,
            role = %claims.role,
            required = ?self.0,
            "role not permitted for route"
        );
        Err(AppError::forbidden(FORBIDDEN_MESSAGE))
    }
}

/// Fails unless the identity holds exactly `required_role`.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn purge_channel(identity: Identity) -> Result<Json<Value>, AppError> {
///     check_role(&identity, "super_admin")?;
///     // Handler logic
/// }
/// ```
pub fn check_role(identity: &Identity, required_role: &str) -> Result<(), AppError> {
    if identity.role() != required_role {
        return Err(AppError::forbidden(FORBIDDEN_MESSAGE));
    }

    Ok(())
}

/// Fails unless the identity holds one of `allowed_roles`.
///
/// Unlike [`RequiredRoles`], an empty list allows nobody.
pub fn check_any_role(identity: &Identity, allowed_roles: &[&str]) -> Result<(), AppError> {
    if !identity.has_any_role(allowed_roles) {
        return Err(AppError::forbidden(FORBIDDEN_MESSAGE));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatgate_core::ErrorKind;

    fn claims(role: &str) -> Claims {
        Claims::new("00000000-0000-0000-0000-000000000000", role)
    }

    #[test]
    fn test_empty_set_permits_any_role() {
        let roles = RequiredRoles::any();
        assert!(roles.permits("admin"));
        assert!(roles.permits("user"));
        assert!(roles.permits(""));
        assert!(roles.check(&claims("guest")).is_ok());
    }

    #[test]
    fn test_membership_is_exact() {
        let roles = RequiredRoles::new(["admin", "super_admin"]);
        assert!(roles.permits("admin"));
        assert!(roles.permits("super_admin"));
        assert!(!roles.permits("Admin"));
        assert!(!roles.permits("user"));
    }

    #[test]
    fn test_check_rejects_with_forbidden() {
        let roles = RequiredRoles::new(["admin"]);
        let err = roles.check(&claims("user")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.message, FORBIDDEN_MESSAGE);
    }

    #[test]
    fn test_duplicates_collapse() {
        let roles = RequiredRoles::new(vec!["admin".to_string(), "admin".to_string()]);
        assert_eq!(roles.iter().count(), 1);
    }

    #[test]
    fn test_check_role_helpers() {
        let identity = Identity(claims("admin"));
        assert!(check_role(&identity, "admin").is_ok());
        assert!(check_role(&identity, "user").is_err());
        assert!(check_any_role(&identity, &["user", "admin"]).is_ok());
        assert!(check_any_role(&identity, &[]).is_err());
    }
}
