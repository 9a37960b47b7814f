//! Route table.
//!
//! Maps paths to pages, attaches guards to the protected ones, and follows guard redirects until a
//! page can be shown.

use std::fmt;

use crate::guards::{Guard, GuardDecision, HOME_PATH};
use crate::models::Role;
use crate::session::SessionState;

/// Redirect chains longer than this are cut off at the home page.
const MAX_REDIRECTS: usize = 4;

/// A page of the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
    Events,
    EventDetails(String),
    Projects,
    Team,
    Contact,
    Join,
    Login,
    Signup,
    AdminAccess,
    Dashboard,
    AdminDashboard,
}

impl Page {
    /// Match a path against the route table. Query strings, fragments and a trailing slash are
    /// ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        let page = match path {
            "/" => Page::Home,
            "/about" => Page::About,
            "/events" => Page::Events,
            "/projects" => Page::Projects,
            "/team" => Page::Team,
            "/contact" => Page::Contact,
            "/join" => Page::Join,
            "/login" => Page::Login,
            "/signup" => Page::Signup,
            "/adminaccess" => Page::AdminAccess,
            "/dashboard" => Page::Dashboard,
            "/admin/dashboard" => Page::AdminDashboard,
            other => {
                let slug = other.strip_prefix("/events/")?;
                if slug.is_empty() || slug.contains('/') {
                    return None;
                }
                Page::EventDetails(slug.to_string())
            }
        };
        Some(page)
    }

    pub fn path(&self) -> String {
        match self {
            Page::Home => "/".to_string(),
            Page::About => "/about".to_string(),
            Page::Events => "/events".to_string(),
            Page::EventDetails(slug) => format!("/events/{}", slug),
            Page::Projects => "/projects".to_string(),
            Page::Team => "/team".to_string(),
            Page::Contact => "/contact".to_string(),
            Page::Join => "/join".to_string(),
            Page::Login => "/login".to_string(),
            Page::Signup => "/signup".to_string(),
            Page::AdminAccess => "/adminaccess".to_string(),
            Page::Dashboard => "/dashboard".to_string(),
            Page::AdminDashboard => "/admin/dashboard".to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About",
            Page::Events => "Events",
            Page::EventDetails(_) => "Event Details",
            Page::Projects => "Projects",
            Page::Team => "Team",
            Page::Contact => "Contact",
            Page::Join => "Join the Club",
            Page::Login => "Sign In",
            Page::Signup => "Create Account",
            Page::AdminAccess => "Admin Access",
            Page::Dashboard => "Dashboard",
            Page::AdminDashboard => "Admin Dashboard",
        }
    }

    pub fn guard(&self) -> Option<Guard> {
        match self {
            Page::Dashboard => Some(Guard::Authenticated),
            Page::AdminDashboard => Some(Guard::RequireRole(Role::Admin)),
            _ => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title(), self.path())
    }
}

/// What the routing layer should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Page),
    /// The page's guard is waiting on session restoration
    Loading(Page),
}

/// Result of navigating to a path: the final outcome and every redirect taken on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Navigation,
    pub redirects: Vec<&'static str>,
}

/// Resolve `path` against the route table and the current session.
pub fn navigate(path: &str, state: &SessionState) -> Resolution {
    let mut redirects = Vec::new();
    let mut current = path.to_string();

    loop {
        let next = match Page::from_path(&current) {
            None => HOME_PATH,
            Some(page) => match page.guard().map(|g| g.check(state)) {
                None | Some(GuardDecision::Allow) => {
                    return Resolution {
                        outcome: Navigation::Render(page),
                        redirects,
                    }
                }
                Some(GuardDecision::Loading) => {
                    return Resolution {
                        outcome: Navigation::Loading(page),
                        redirects,
                    }
                }
                Some(GuardDecision::RedirectTo(target)) => target,
            },
        };

        tracing::debug!("Redirecting {} -> {}", current, next);
        redirects.push(next);
        if redirects.len() > MAX_REDIRECTS {
            tracing::warn!("Redirect loop starting at {}, showing home", path);
            return Resolution {
                outcome: Navigation::Render(Page::Home),
                redirects,
            };
        }
        current = next.to_string();
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

    #[test]
    fn test_path_matching() {
        assert_eq!(Page::from_path("/"), Some(Page::Home));
        assert_eq!(Page::from_path(""), Some(Page::Home));
        assert_eq!(Page::from_path("/team/"), Some(Page::Team));
        assert_eq!(Page::from_path("/events?type=workshop"), Some(Page::Events));
        assert_eq!(
            Page::from_path("/events/intro-to-ai#agenda"),
            Some(Page::EventDetails("intro-to-ai".into()))
        );
        assert_eq!(Page::from_path("/events/a/b"), None);
        assert_eq!(Page::from_path("/nowhere"), None);

        let page = Page::EventDetails("hack-night".into());
        assert_eq!(Page::from_path(&page.path()), Some(page));
    }

    #[test]
    fn test_public_pages_render_for_everyone() {
        for state in [SessionState::Loading, SessionState::Anonymous] {
            let resolution = navigate("/events", &state);
            assert_eq!(resolution.outcome, Navigation::Render(Page::Events));
            assert!(resolution.redirects.is_empty());
        }
    }

    #[test]
    fn test_dashboard_requires_session() {
        let resolution = navigate("/dashboard", &SessionState::Anonymous);
        assert_eq!(resolution.outcome, Navigation::Render(Page::Login));
        assert_eq!(resolution.redirects, vec!["/login"]);

        let resolution = navigate("/dashboard", &SessionState::Loading);
        assert_eq!(resolution.outcome, Navigation::Loading(Page::Dashboard));

        let resolution = navigate("/dashboard", &signed_in(Role::Guest));
        assert_eq!(resolution.outcome, Navigation::Render(Page::Dashboard));
    }

    #[test]
    fn test_admin_dashboard_redirects() {
        let resolution = navigate("/admin/dashboard", &SessionState::Anonymous);
        assert_eq!(resolution.outcome, Navigation::Render(Page::AdminAccess));

        let resolution = navigate("/admin/dashboard", &signed_in(Role::Mentor));
        assert_eq!(resolution.outcome, Navigation::Render(Page::Home));
        assert_eq!(resolution.redirects, vec!["/"]);

        let resolution = navigate("/admin/dashboard", &signed_in(Role::Admin));
        assert_eq!(resolution.outcome, Navigation::Render(Page::AdminDashboard));
    }

    #[test]
    fn test_unknown_paths_go_home() {
        let resolution = navigate("/does/not/exist", &SessionState::Anonymous);
        assert_eq!(resolution.outcome, Navigation::Render(Page::Home));
        assert_eq!(resolution.redirects, vec![HOME_PATH]);
    }
}
