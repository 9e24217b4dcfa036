//! Route-level session guard
//!
//! Decides, per navigation, whether the request proceeds or is redirected,
//! looking only at the requested URL and whether an access token is present.
//! Token validity is never checked here; an expired-but-present token is
//! caught downstream by the API and recovered by the client's refresh flow.

use url::Url;

/// Sign-in route, also the target of [`RouteDecision::RedirectToLogin`]
pub const LOGIN_ROUTE: &str = "/login";

/// Account creation route
pub const REGISTER_ROUTE: &str = "/register";

/// Landing route for already-authenticated visitors of the auth pages
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Query parameter carrying the originally requested URL through the login flow
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// Path prefixes that require a session before rendering
pub const PROTECTED_PREFIXES: [&str; 6] = [
    "/dashboard",
    "/admin",
    "/folders",
    "/settings",
    "/links",
    "/analytics",
];

/// Outcome of evaluating one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Let the request through unchanged
    Next,
    /// Send the visitor to the login page, remembering where they wanted to go
    RedirectToLogin { location: Url },
    /// Send an already-authenticated visitor off the auth pages
    RedirectToDashboard { location: Url },
}

impl RouteDecision {
    /// The redirect target, if any
    pub fn location(&self) -> Option<&Url> {
        match self {
            RouteDecision::Next => None,
            RouteDecision::RedirectToLogin { location }
            | RouteDecision::RedirectToDashboard { location } => Some(location),
        }
    }
}

/// Whether `path` falls under a prefix that requires a session
pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Evaluate one navigation, first match wins:
///
/// 1. protected prefix without a token: login redirect with `callbackUrl`
/// 2. `/login` or `/register` with a token: dashboard redirect
/// 3. anything else: pass through
pub fn evaluate(requested: &Url, has_access_token: bool) -> RouteDecision {
    let path = requested.path();

    if is_protected(path) && !has_access_token {
        let mut location = requested.clone();
        location.set_path(LOGIN_ROUTE);
        location
            .query_pairs_mut()
            .append_pair(CALLBACK_PARAM, requested.as_str());
        return RouteDecision::RedirectToLogin { location };
    }

    if (path.starts_with(LOGIN_ROUTE) || path.starts_with(REGISTER_ROUTE)) && has_access_token {
        let mut location = requested.clone();
        location.set_path(DASHBOARD_ROUTE);
        location.set_query(None);
        location.set_fragment(None);
        return RouteDecision::RedirectToDashboard { location };
    }

    RouteDecision::Next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(input: &str) -> Url {
        Url::parse(input).unwrap()
    }

    fn callback_of(decision: &RouteDecision) -> Option<String> {
        decision.location().and_then(|location| {
            location
                .query_pairs()
                .find(|(key, _)| key == CALLBACK_PARAM)
                .map(|(_, value)| value.into_owned())
        })
    }

    #[test]
    fn protected_prefixes_redirect_to_login_without_token() {
        for prefix in PROTECTED_PREFIXES {
            let requested = url(&format!("https://app.shortly.app{}", prefix));
            let decision = evaluate(&requested, false);

            let location = match &decision {
                RouteDecision::RedirectToLogin { location } => location,
                other => panic!("expected login redirect for {}, got {:?}", prefix, other),
            };
            assert_eq!(location.path(), LOGIN_ROUTE);
            assert_eq!(callback_of(&decision).as_deref(), Some(requested.as_str()));
        }
    }

    #[test]
    fn callback_preserves_full_requested_url() {
        let requested = url("https://app.shortly.app/links/abc123?tab=analytics");
        let decision = evaluate(&requested, false);
        assert_eq!(
            callback_of(&decision).as_deref(),
            Some("https://app.shortly.app/links/abc123?tab=analytics")
        );
    }

    #[test]
    fn auth_pages_redirect_to_dashboard_with_token() {
        for page in [LOGIN_ROUTE, REGISTER_ROUTE] {
            let requested = url(&format!("https://app.shortly.app{}", page));
            match evaluate(&requested, true) {
                RouteDecision::RedirectToDashboard { location } => {
                    assert_eq!(location.path(), DASHBOARD_ROUTE);
                    assert_eq!(location.query(), None);
                }
                other => panic!("expected dashboard redirect for {}, got {:?}", page, other),
            }
        }
    }

    #[test]
    fn everything_else_passes_through() {
        let cases = [
            ("https://app.shortly.app/", false),
            ("https://app.shortly.app/", true),
            ("https://app.shortly.app/pricing", false),
            ("https://app.shortly.app/login", false),
            ("https://app.shortly.app/register", false),
            ("https://app.shortly.app/dashboard", true),
            ("https://app.shortly.app/links/abc", true),
            ("https://app.shortly.app/stats/abc123", false),
        ];

        for (requested, has_token) in cases {
            assert_eq!(
                evaluate(&url(requested), has_token),
                RouteDecision::Next,
                "expected pass-through for {} (token: {})",
                requested,
                has_token
            );
        }
    }

    #[test]
    fn nested_protected_paths_are_covered() {
        let requested = url("https://app.shortly.app/links/abc123/analytics");
        assert!(matches!(
            evaluate(&requested, false),
            RouteDecision::RedirectToLogin { .. }
        ));
    }
}
