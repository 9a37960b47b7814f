//! Route guards.
//!
//! Pure decisions over the session state. A guard never navigates or mutates anything; it returns
//! a [`GuardDecision`] for the routing layer to act on.

use crate::models::Role;
use crate::session::SessionState;

/// Entry point for members without a session.
pub const LOGIN_PATH: &str = "/login";
/// Entry point for administrators without a session.
pub const ADMIN_LOGIN_PATH: &str = "/adminaccess";
/// Landing page, also the target for users lacking the required role.
pub const HOME_PATH: &str = "/";

/// Outcome of checking a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the protected content
    Allow,
    /// Session restoration is still running; show a neutral placeholder
    Loading,
    RedirectTo(&'static str),
}

/// Access requirement attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Any signed-in user
    Authenticated,
    /// Signed in with exactly this role
    RequireRole(Role),
}

impl Guard {
    pub fn check(&self, state: &SessionState) -> GuardDecision {
        match self {
            Guard::Authenticated => require_session(state),
            Guard::RequireRole(role) => require_role(state, *role),
        }
    }
}

/// Gate on any session: wait while loading, send anonymous users to the login page.
pub fn require_session(state: &SessionState) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Loading,
        SessionState::Anonymous => GuardDecision::RedirectTo(LOGIN_PATH),
        SessionState::Authenticated(_) => GuardDecision::Allow,
    }
}

/// Gate on a role: anonymous users go to the admin login, other roles go home.
pub fn require_role(state: &SessionState, required: Role) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Loading,
        SessionState::Anonymous => GuardDecision::RedirectTo(ADMIN_LOGIN_PATH),
        SessionState::Authenticated(session) if session.role == required => GuardDecision::Allow,
        SessionState::Authenticated(_) => GuardDecision::RedirectTo(HOME_PATH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(Session {
            user_id: "u1".into(),
            name: "Test User".into(),
            email: "test@citc.dev".into(),
            role,
            token: "tok".into(),
        })
    }

    const ROLES: [Role; 4] = [Role::Admin, Role::Mentor, Role::Member, Role::Guest];

    #[test]
    fn test_authenticated_guard() {
        let guard = Guard::Authenticated;
        assert_eq!(guard.check(&SessionState::Loading), GuardDecision::Loading);
        assert_eq!(
            guard.check(&SessionState::Anonymous),
            GuardDecision::RedirectTo(LOGIN_PATH)
        );
        for role in ROLES {
            assert_eq!(guard.check(&signed_in(role)), GuardDecision::Allow);
        }
    }

    #[test]
    fn test_admin_guard() {
        let guard = Guard::RequireRole(Role::Admin);
        assert_eq!(guard.check(&SessionState::Loading), GuardDecision::Loading);
        assert_eq!(
            guard.check(&SessionState::Anonymous),
            GuardDecision::RedirectTo("/adminaccess")
        );
        assert_eq!(
            guard.check(&signed_in(Role::Member)),
            GuardDecision::RedirectTo("/")
        );
        assert_eq!(guard.check(&signed_in(Role::Admin)), GuardDecision::Allow);
    }

    #[test]
    fn test_role_guard_only_admits_exact_role() {
        for required in ROLES {
            for actual in ROLES {
                let decision = require_role(&signed_in(actual), required);
                if actual == required {
                    assert_eq!(decision, GuardDecision::Allow);
                } else {
                    assert_eq!(decision, GuardDecision::RedirectTo(HOME_PATH));
                }
            }
        }
    }
}
