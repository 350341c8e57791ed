//! Composable per-route authorization.
//!
//! Guards only look at the attributes the request carries. They never touch the
//! identity store or the network.

use std::fmt;

use crate::{
    auth::session::{SessionAttributes, SESSION_ROLE_COOKIE, SESSION_USER_ID_COOKIE},
    errors::AuthorizationDenied,
    models::domain::UserRole,
};

/// Context accumulated by the guards and handed to the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub role: Option<UserRole>,
    pub user_id: Option<String>,
}

pub trait Guard: Send + Sync {
    /// Allow by returning the (possibly enriched) context, or deny.
    fn check(
        &self,
        session: &SessionAttributes,
        context: AuthContext,
    ) -> Result<AuthContext, AuthorizationDenied>;
}

/// Allows sessions whose role ranks at or above `min`.
#[derive(Debug, Clone, Copy)]
pub struct RequireRole {
    min: UserRole,
}

impl RequireRole {
    pub fn new(min: UserRole) -> Self {
        Self { min }
    }
}

impl Guard for RequireRole {
    fn check(
        &self,
        session: &SessionAttributes,
        mut context: AuthContext,
    ) -> Result<AuthContext, AuthorizationDenied> {
        let role = match (&session.role, session.parsed_role()) {
            (None, _) => return Err(AuthorizationDenied::MissingAttribute(SESSION_ROLE_COOKIE)),
            (Some(_), None) => return Err(AuthorizationDenied::InsufficientRole),
            (Some(_), Some(role)) => role,
        };

        if role < self.min {
            return Err(AuthorizationDenied::InsufficientRole);
        }

        context.role = Some(role);
        Ok(context)
    }
}

/// Requires a non-empty user id attribute and exposes it to the handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectUserId;

impl Guard for InjectUserId {
    fn check(
        &self,
        session: &SessionAttributes,
        mut context: AuthContext,
    ) -> Result<AuthContext, AuthorizationDenied> {
        let user_id = session
            .user_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .ok_or(AuthorizationDenied::MissingAttribute(SESSION_USER_ID_COOKIE))?;

        context.user_id = Some(user_id.clone());
        Ok(context)
    }
}

/// Ordered guards; the first denial wins.
#[derive(Default)]
pub struct GuardChain {
    guards: Vec<Box<dyn Guard>>,
}

impl GuardChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, guard: impl Guard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub fn evaluate(&self, session: &SessionAttributes) -> Result<AuthContext, AuthorizationDenied> {
        self.guards
            .iter()
            .try_fold(AuthContext::default(), |context, guard| {
                guard.check(session, context)
            })
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl fmt::Debug for GuardChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardChain")
            .field("guards", &self.guards.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Option<&str>, user_id: Option<&str>) -> SessionAttributes {
        SessionAttributes {
            role: role.map(str::to_string),
            user_id: user_id.map(str::to_string),
            token: None,
        }
    }

    fn dashboard_chain() -> GuardChain {
        GuardChain::new()
            .with(RequireRole::new(UserRole::SuperUser))
            .with(InjectUserId)
    }

    fn admin_chain() -> GuardChain {
        GuardChain::new()
            .with(RequireRole::new(UserRole::Admin))
            .with(InjectUserId)
    }

    #[test]
    fn test_require_role_is_ordered() {
        let guard = RequireRole::new(UserRole::SuperUser);

        assert!(guard
            .check(&session(Some("super_user"), None), AuthContext::default())
            .is_ok());
        assert!(guard
            .check(&session(Some("admin"), None), AuthContext::default())
            .is_ok());
        assert_eq!(
            guard.check(&session(Some("user"), None), AuthContext::default()),
            Err(AuthorizationDenied::InsufficientRole)
        );
    }

    #[test]
    fn test_require_role_missing_or_unknown() {
        let guard = RequireRole::new(UserRole::User);

        assert_eq!(
            guard.check(&session(None, None), AuthContext::default()),
            Err(AuthorizationDenied::MissingAttribute(SESSION_ROLE_COOKIE))
        );
        assert_eq!(
            guard.check(&session(Some("Admin"), None), AuthContext::default()),
            Err(AuthorizationDenied::InsufficientRole)
        );
    }

    #[test]
    fn test_inject_user_id() {
        let context = InjectUserId
            .check(&session(None, Some("u-9")), AuthContext::default())
            .unwrap();
        assert_eq!(context.user_id.as_deref(), Some("u-9"));

        assert_eq!(
            InjectUserId.check(&session(Some("admin"), Some("")), AuthContext::default()),
            Err(AuthorizationDenied::MissingAttribute(SESSION_USER_ID_COOKIE))
        );
    }

    #[test]
    fn test_chain_threads_context() {
        let context = dashboard_chain()
            .evaluate(&session(Some("admin"), Some("u-1")))
            .unwrap();

        assert_eq!(
            context,
            AuthContext {
                role: Some(UserRole::Admin),
                user_id: Some("u-1".to_string()),
            }
        );
    }

    #[test]
    fn test_chain_first_denial_wins() {
        // role fails first even though the user id is missing too
        assert_eq!(
            admin_chain().evaluate(&session(Some("super_user"), None)),
            Err(AuthorizationDenied::InsufficientRole)
        );
    }

    #[test]
    fn test_route_behaviours() {
        // dashboard: super_user or admin
        assert!(dashboard_chain().evaluate(&session(Some("super_user"), Some("u"))).is_ok());
        assert!(dashboard_chain().evaluate(&session(Some("admin"), Some("u"))).is_ok());
        assert!(dashboard_chain().evaluate(&session(Some("user"), Some("u"))).is_err());
        assert!(dashboard_chain().evaluate(&session(None, None)).is_err());

        // promote/demote: admin only
        assert!(admin_chain().evaluate(&session(Some("admin"), Some("u"))).is_ok());
        assert!(admin_chain().evaluate(&session(Some("super_user"), Some("u"))).is_err());
        assert!(admin_chain().evaluate(&session(Some("user"), Some("u"))).is_err());
    }

    #[test]
    fn test_empty_chain_allows_everything() {
        let chain = GuardChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.evaluate(&SessionAttributes::default()), Ok(AuthContext::default()));
    }
}
