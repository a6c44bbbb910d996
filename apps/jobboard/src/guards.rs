//! Route guards as an explicit state machine.
//!
//! `auth_state` classifies a session against a route, `evaluate` maps that
//! state to a single decision. `Guard` adds the one-redirect-per-state rule
//! for callers that re-check on every session change.

use url::form_urlencoded;

use crate::session::Session;

/// Every destination the client knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Job listing; `query` holds the filter query string without `?`.
    Jobs { query: String },
    JobDetail { id: String },
    Login { redirect: Option<String> },
    VerifyOtp { email: Option<String>, redirect: Option<String> },
    CompleteProfile { redirect: Option<String> },
    Admin,
    AdminCreateJob,
    AdminEditJob { id: String },
}

impl Route {
    pub fn home() -> Self {
        Route::Jobs {
            query: String::new(),
        }
    }

    pub fn login() -> Self {
        Route::Login { redirect: None }
    }

    /// Path plus query, as it would appear in the address bar.
    pub fn path(&self) -> String {
        match self {
            Route::Jobs { query } if query.is_empty() => "/".to_string(),
            Route::Jobs { query } => format!("/?{query}"),
            Route::JobDetail { id } => format!("/jobs/{id}"),
            Route::Login { redirect } => with_params("/login", &[("redirect", redirect)]),
            Route::VerifyOtp { email, redirect } => {
                with_params("/verify-otp", &[("email", email), ("redirect", redirect)])
            }
            Route::CompleteProfile { redirect } => {
                with_params("/complete-profile", &[("redirect", redirect)])
            }
            Route::Admin => "/admin".to_string(),
            Route::AdminCreateJob => "/admin/jobs/create".to_string(),
            Route::AdminEditJob { id } => format!("/admin/jobs/{id}/edit"),
        }
    }

    /// Parses a path produced by `path`. Unknown paths resolve to the listing.
    pub fn from_path(path: &str) -> Self {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let param = |name: &str| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
                .filter(|v| !v.is_empty())
        };
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match segments.as_slice() {
            [""] => Route::Jobs {
                query: query.to_string(),
            },
            ["jobs", id] => Route::JobDetail { id: id.to_string() },
            ["login"] => Route::Login {
                redirect: param("redirect"),
            },
            ["verify-otp"] => Route::VerifyOtp {
                email: param("email"),
                redirect: param("redirect"),
            },
            ["complete-profile"] => Route::CompleteProfile {
                redirect: param("redirect"),
            },
            ["admin"] => Route::Admin,
            ["admin", "jobs", "create"] => Route::AdminCreateJob,
            ["admin", "jobs", id, "edit"] => Route::AdminEditJob { id: id.to_string() },
            _ => Route::home(),
        }
    }

    /// Login, OTP verification and profile completion. Logging out from
    /// one of these never navigates, which keeps redirects from looping.
    pub fn is_auth_flow(&self) -> bool {
        matches!(
            self,
            Route::Login { .. } | Route::VerifyOtp { .. } | Route::CompleteProfile { .. }
        )
    }

    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            Route::Admin | Route::AdminCreateJob | Route::AdminEditJob { .. }
        )
    }

    fn redirect_param(&self) -> Option<&str> {
        match self {
            Route::Login { redirect }
            | Route::VerifyOtp { redirect, .. }
            | Route::CompleteProfile { redirect } => redirect.as_deref(),
            _ => None,
        }
    }

    /// Where an auth-flow page sends the user once it is satisfied.
    pub fn continue_to(&self) -> Route {
        self.redirect_param()
            .map(Route::from_path)
            .filter(|r| !r.is_auth_flow())
            .unwrap_or_else(Route::home)
    }
}

fn with_params(base: &str, params: &[(&str, &Option<String>)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params {
        if let Some(value) = value {
            serializer.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{base}?{}", serializer.finish())
    } else {
        base.to_string()
    }
}

/// Session classified against a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Loading,
    Unauthenticated,
    IncompleteProfile,
    Authenticated,
    NonAdminOnAdminRoute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Session still resolving; show nothing yet.
    Wait,
    Render,
    Redirect(Route),
}

pub fn auth_state(session: &Session, route: &Route) -> AuthState {
    if session.loading {
        AuthState::Loading
    } else if !session.is_authenticated() {
        AuthState::Unauthenticated
    } else if !session.is_profile_complete() {
        AuthState::IncompleteProfile
    } else if route.is_admin_only() && !session.is_admin() {
        AuthState::NonAdminOnAdminRoute
    } else {
        AuthState::Authenticated
    }
}

/// The transition function: what a page does given the session.
pub fn evaluate(session: &Session, route: &Route) -> Decision {
    let state = auth_state(session, route);
    if state == AuthState::Loading {
        return Decision::Wait;
    }

    match route {
        Route::Login { .. } | Route::VerifyOtp { .. } => match state {
            AuthState::IncompleteProfile => Decision::Redirect(Route::CompleteProfile {
                redirect: Some(route.continue_to().path()),
            }),
            AuthState::Authenticated | AuthState::NonAdminOnAdminRoute => {
                Decision::Redirect(route.continue_to())
            }
            _ => Decision::Render,
        },
        Route::CompleteProfile { .. } => match state {
            AuthState::Unauthenticated => Decision::Redirect(Route::login()),
            AuthState::Authenticated | AuthState::NonAdminOnAdminRoute => {
                Decision::Redirect(route.continue_to())
            }
            _ => Decision::Render,
        },
        _ => match state {
            AuthState::Unauthenticated => Decision::Redirect(Route::Login {
                redirect: Some(route.path()),
            }),
            AuthState::IncompleteProfile => Decision::Redirect(Route::CompleteProfile {
                redirect: Some(route.path()),
            }),
            AuthState::NonAdminOnAdminRoute => Decision::Redirect(Route::home()),
            _ => Decision::Render,
        },
    }
}

/// Page-level guard. Re-evaluated on every session change, it issues at
/// most one redirect per resolved state.
#[derive(Debug)]
pub struct Guard {
    route: Route,
    redirected_in: Option<AuthState>,
}

impl Guard {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            redirected_in: None,
        }
    }

    pub fn check(&mut self, session: &Session) -> Decision {
        let state = auth_state(session, &self.route);
        let decision = evaluate(session, &self.route);

        if let Decision::Redirect(_) = decision {
            if self.redirected_in == Some(state) {
                return Decision::Wait;
            }
            self.redirected_in = Some(state);
        } else {
            self.redirected_in = None;
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::sample_user;

    fn session(user: Option<crate::models::User>) -> Session {
        Session {
            token: user.as_ref().map(|_| "t".to_string()),
            user,
            loading: false,
        }
    }

    fn complete(is_admin: bool) -> Session {
        let mut user = sample_user(Some("Ada"), Some("+4915112345678"));
        user.is_admin = is_admin;
        session(Some(user))
    }

    fn incomplete() -> Session {
        session(Some(sample_user(Some("Ada"), None)))
    }

    #[test]
    fn test_loading_waits_everywhere() {
        let loading = Session {
            token: None,
            user: None,
            loading: true,
        };
        for route in [Route::home(), Route::Admin, Route::login()] {
            assert_eq!(evaluate(&loading, &route), Decision::Wait);
        }
    }

    #[test]
    fn test_unauthenticated_goes_to_login_with_redirect() {
        let route = Route::Jobs {
            query: "RoleName=SRE".to_string(),
        };
        let decision = evaluate(&session(None), &route);
        assert_eq!(
            decision,
            Decision::Redirect(Route::Login {
                redirect: Some("/?RoleName=SRE".to_string())
            })
        );
    }

    #[test]
    fn test_incomplete_profile_goes_to_complete_profile() {
        let route = Route::JobDetail { id: "42".into() };
        assert_eq!(
            evaluate(&incomplete(), &route),
            Decision::Redirect(Route::CompleteProfile {
                redirect: Some("/jobs/42".to_string())
            })
        );
    }

    #[test]
    fn test_non_admin_on_admin_route_goes_home() {
        assert_eq!(
            auth_state(&complete(false), &Route::AdminCreateJob),
            AuthState::NonAdminOnAdminRoute
        );
        assert_eq!(
            evaluate(&complete(false), &Route::AdminCreateJob),
            Decision::Redirect(Route::home())
        );
        assert_eq!(evaluate(&complete(true), &Route::Admin), Decision::Render);
    }

    #[test]
    fn test_authenticated_renders_protected_pages() {
        assert_eq!(evaluate(&complete(false), &Route::home()), Decision::Render);
        assert_eq!(
            evaluate(&complete(false), &Route::JobDetail { id: "1".into() }),
            Decision::Render
        );
    }

    #[test]
    fn test_login_page_when_already_authenticated() {
        let route = Route::Login {
            redirect: Some("/jobs/7".to_string()),
        };
        assert_eq!(
            evaluate(&complete(false), &route),
            Decision::Redirect(Route::JobDetail { id: "7".into() })
        );
        assert_eq!(evaluate(&session(None), &route), Decision::Render);
        assert_eq!(
            evaluate(&incomplete(), &route),
            Decision::Redirect(Route::CompleteProfile {
                redirect: Some("/jobs/7".to_string())
            })
        );
    }

    #[test]
    fn test_complete_profile_page() {
        let route = Route::CompleteProfile {
            redirect: Some("/admin".to_string()),
        };
        assert_eq!(
            evaluate(&session(None), &route),
            Decision::Redirect(Route::login())
        );
        assert_eq!(evaluate(&incomplete(), &route), Decision::Render);
        assert_eq!(
            evaluate(&complete(true), &route),
            Decision::Redirect(Route::Admin)
        );
    }

    #[test]
    fn test_redirect_to_auth_page_is_ignored() {
        let route = Route::Login {
            redirect: Some("/login".to_string()),
        };
        assert_eq!(route.continue_to(), Route::home());
    }

    #[test]
    fn test_paths_round_trip() {
        let routes = vec![
            Route::home(),
            Route::Jobs {
                query: "RoleName=Data+Engineer&Location=Berlin".to_string(),
            },
            Route::JobDetail { id: "42".into() },
            Route::login(),
            Route::Login {
                redirect: Some("/?Location=S%C3%A3o+Paulo".to_string()),
            },
            Route::VerifyOtp {
                email: Some("a@b.com".to_string()),
                redirect: Some("/admin".to_string()),
            },
            Route::CompleteProfile { redirect: None },
            Route::Admin,
            Route::AdminCreateJob,
            Route::AdminEditJob { id: "9".into() },
        ];
        for route in routes {
            assert_eq!(Route::from_path(&route.path()), route, "{}", route.path());
        }
    }

    #[test]
    fn test_guard_redirects_once_per_state() {
        let mut guard = Guard::new(Route::Admin);
        let anonymous = session(None);

        assert!(matches!(guard.check(&anonymous), Decision::Redirect(_)));
        assert_eq!(guard.check(&anonymous), Decision::Wait);

        assert!(matches!(guard.check(&incomplete()), Decision::Redirect(_)));
        assert_eq!(guard.check(&incomplete()), Decision::Wait);

        assert_eq!(guard.check(&complete(true)), Decision::Render);
        assert!(matches!(guard.check(&anonymous), Decision::Redirect(_)));
    }
}
