//! Route gate shared by every screen.
//!
//! SYSTEM CONTEXT
//! ==============
//! Screens apply identical redirect behavior: protected routes bounce to the
//! login route without a session, the login route bounces to the dashboard
//! with one, and anything unrecognized lands on the dashboard root (which is
//! then gated again).

use wire::RecordId;

pub const LOGIN_ROUTE: &str = "/admin-dashboard/login";
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Screens addressable by path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Statistics,
    Users,
    Coaches,
    Trainees,
    Slider,
    Topics,
    QuestionGroups,
    Settings,
    Profile,
    CoachesLedger(Option<RecordId>),
    TraineesLedger(Option<RecordId>),
}

impl Route {
    /// Parse a path; `None` for anything unrecognized.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed == LOGIN_ROUTE {
            return Some(Self::Login);
        }
        let rest = trimmed.strip_prefix(DASHBOARD_ROUTE)?;
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Self::Dashboard),
            ["statistics"] => Some(Self::Statistics),
            ["users"] => Some(Self::Users),
            ["coaches"] => Some(Self::Coaches),
            ["trainees"] => Some(Self::Trainees),
            ["slider"] => Some(Self::Slider),
            ["topics"] => Some(Self::Topics),
            ["question-groups"] => Some(Self::QuestionGroups),
            ["settings"] => Some(Self::Settings),
            ["profile"] => Some(Self::Profile),
            ["coaches-ledger"] => Some(Self::CoachesLedger(None)),
            ["coaches-ledger", id] => id.parse().ok().map(|id| Self::CoachesLedger(Some(id))),
            ["trainees-ledger"] => Some(Self::TraineesLedger(None)),
            ["trainees-ledger", id] => id.parse().ok().map(|id| Self::TraineesLedger(Some(id))),
            _ => None,
        }
    }

    #[must_use]
    pub fn path(self) -> String {
        let fixed = match self {
            Self::Login => LOGIN_ROUTE,
            Self::Dashboard => DASHBOARD_ROUTE,
            Self::Statistics => "/dashboard/statistics",
            Self::Users => "/dashboard/users",
            Self::Coaches => "/dashboard/coaches",
            Self::Trainees => "/dashboard/trainees",
            Self::Slider => "/dashboard/slider",
            Self::Topics => "/dashboard/topics",
            Self::QuestionGroups => "/dashboard/question-groups",
            Self::Settings => "/dashboard/settings",
            Self::Profile => "/dashboard/profile",
            Self::CoachesLedger(Some(id)) => return format!("/dashboard/coaches-ledger/{id}"),
            Self::CoachesLedger(None) => "/dashboard/coaches-ledger",
            Self::TraineesLedger(Some(id)) => return format!("/dashboard/trainees-ledger/{id}"),
            Self::TraineesLedger(None) => "/dashboard/trainees-ledger",
        };
        fixed.to_owned()
    }

    #[must_use]
    pub fn is_protected(self) -> bool {
        self != Self::Login
    }
}

/// Outcome of gating one navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Allow(Route),
    Redirect(&'static str),
}

/// Decide whether `path` may be shown for the given session state.
#[must_use]
pub fn gate(path: &str, authenticated: bool) -> GateDecision {
    match Route::parse(path) {
        None => GateDecision::Redirect(DASHBOARD_ROUTE),
        Some(Route::Login) if authenticated => GateDecision::Redirect(DASHBOARD_ROUTE),
        Some(route) if route.is_protected() && !authenticated => GateDecision::Redirect(LOGIN_ROUTE),
        Some(route) => GateDecision::Allow(route),
    }
}

/// Follow redirects until a route is allowed.
#[must_use]
pub fn resolve(path: &str, authenticated: bool) -> Route {
    let mut current = path;
    // Any chain settles within two hops: unknown -> dashboard -> login.
    for _ in 0..3 {
        match gate(current, authenticated) {
            GateDecision::Allow(route) => return route,
            GateDecision::Redirect(next) => current = next,
        }
    }
    if authenticated { Route::Dashboard } else { Route::Login }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
