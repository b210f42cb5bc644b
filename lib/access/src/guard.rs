//! Route guards: the render decision for every navigation.
//!
//! A guard wraps a screen. It starts out `Checking` while the viewer's
//! session resolves, then settles exactly once:
//!
//! | guard     | session                      | outcome                             |
//! |-----------|------------------------------|-------------------------------------|
//! | protected | anonymous                    | redirect to sign-in, remember path  |
//! | protected | known role, path allowed     | render                              |
//! | protected | known role, path denied      | redirect to the role's home         |
//! | protected | unrecognized or missing role | forbidden                           |
//! | public    | anonymous                    | render                              |
//! | public    | known role                   | redirect to the role's home         |
//! | public    | unrecognized or missing role | render                              |
//!
//! Viewers whose role the storefront does not recognize are refused every
//! protected screen. They have no home to be sent to, so the refusal is a
//! terminal `Forbidden` rather than a redirect.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::policy::PolicyTable;
use crate::role::RoleClaim;
use crate::session::Session;

/// Which screens a guard protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardKind {
    /// Screens that require a signed-in viewer whose role allows the path.
    Protected,
    /// Screens only meant for anonymous viewers, such as sign-in.
    Public,
}

/// A navigation away from the requested screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    /// Path to navigate to.
    pub to: String,
    /// The originally requested path, handed to the sign-in screen so it can
    /// send the viewer back afterwards.
    pub return_to: Option<String>,
}

impl Redirect {
    /// Builds the location to navigate to, carrying `return_to` as the
    /// `from` query parameter.
    #[must_use]
    pub fn location(&self) -> String {
        match &self.return_to {
            Some(return_to) => format!(
                "{}?{}={}",
                self.to,
                crate::policy::RETURN_TO_PARAM,
                urlencoding::encode(return_to)
            ),
            None => self.to.clone(),
        }
    }
}

/// What a guard decided to do with a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Render the wrapped screen.
    Render,
    /// Navigate elsewhere, replacing the current history entry.
    Redirect(Redirect),
    /// Refuse the screen without navigating.
    Forbidden,
}

/// Lifecycle of a single guard mount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardState {
    /// Waiting for the session to resolve; nothing is rendered yet.
    #[default]
    Checking,
    /// The decision has been made and will not change for this mount.
    Settled(GuardOutcome),
}

impl GuardState {
    /// Records the guard's decision.
    ///
    /// Returns false, leaving the state untouched, if the guard had already
    /// settled.
    pub fn settle(&mut self, outcome: GuardOutcome) -> bool {
        match self {
            Self::Checking => {
                *self = Self::Settled(outcome);
                true
            }
            Self::Settled(_) => false,
        }
    }

    #[must_use]
    pub fn is_checking(&self) -> bool {
        matches!(self, Self::Checking)
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&GuardOutcome> {
        match self {
            Self::Checking => None,
            Self::Settled(outcome) => Some(outcome),
        }
    }
}

/// Render decision for one kind of guard against one policy table.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard<'a> {
    kind: GuardKind,
    policy: &'a PolicyTable,
}

impl<'a> RouteGuard<'a> {
    #[must_use]
    pub fn new(kind: GuardKind, policy: &'a PolicyTable) -> Self {
        Self { kind, policy }
    }

    #[must_use]
    pub fn protected(policy: &'a PolicyTable) -> Self {
        Self::new(GuardKind::Protected, policy)
    }

    #[must_use]
    pub fn public(policy: &'a PolicyTable) -> Self {
        Self::new(GuardKind::Public, policy)
    }

    /// Decides what to do with a navigation to `path`.
    #[must_use]
    pub fn decide(&self, session: &Session, path: &str) -> GuardOutcome {
        let outcome = match self.kind {
            GuardKind::Protected => self.decide_protected(session, path),
            GuardKind::Public => self.decide_public(session),
        };
        debug!(
            kind = ?self.kind,
            path,
            role = %session.role_claim(),
            authenticated = session.is_authenticated(),
            ?outcome,
            "route guard decision"
        );
        outcome
    }

    fn decide_protected(&self, session: &Session, path: &str) -> GuardOutcome {
        let Some(viewer) = session.viewer() else {
            return GuardOutcome::Redirect(Redirect {
                to: self.policy.sign_in_path().to_string(),
                return_to: Some(path.to_string()),
            });
        };

        match viewer.role_claim() {
            RoleClaim::Known(role) if self.policy.is_allowed(*role, path) => GuardOutcome::Render,
            RoleClaim::Known(role) => GuardOutcome::Redirect(Redirect {
                to: self.policy.home_for(*role).to_string(),
                return_to: None,
            }),
            RoleClaim::Unrecognized(_) | RoleClaim::Absent => GuardOutcome::Forbidden,
        }
    }

    fn decide_public(&self, session: &Session) -> GuardOutcome {
        match session.role() {
            Some(role) => GuardOutcome::Redirect(Redirect {
                to: self.policy.home_for(role).to_string(),
                return_to: None,
            }),
            None => GuardOutcome::Render,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use crate::viewer::Viewer;

    fn signed_in(role: Role) -> Session {
        Session::Authenticated(Viewer::new(RoleClaim::Known(role)))
    }

    fn protected() -> RouteGuard<'static> {
        RouteGuard::protected(PolicyTable::storefront())
    }

    fn public() -> RouteGuard<'static> {
        RouteGuard::public(PolicyTable::storefront())
    }

    #[test]
    fn anonymous_viewer_is_sent_to_sign_in_with_return_path() {
        let outcome = protected().decide(&Session::Anonymous, "/cart");
        let expected = Redirect {
            to: "/login".to_string(),
            return_to: Some("/cart".to_string()),
        };
        assert_eq!(outcome, GuardOutcome::Redirect(expected.clone()));
        assert_eq!(expected.location(), "/login?from=%2Fcart");
    }

    #[test]
    fn buyer_is_sent_home_from_seller_screens() {
        let outcome = protected().decide(&signed_in(Role::Buyer), "/seller/add-product");
        assert_eq!(
            outcome,
            GuardOutcome::Redirect(Redirect {
                to: "/".to_string(),
                return_to: None,
            })
        );
    }

    #[test]
    fn shipper_may_open_shipper_details() {
        let outcome = protected().decide(&signed_in(Role::Shipper), "/shipper-details");
        assert_eq!(outcome, GuardOutcome::Render);
    }

    #[test]
    fn signed_in_admin_is_sent_home_from_sign_in() {
        let outcome = public().decide(&signed_in(Role::Admin), "/login");
        assert_eq!(
            outcome,
            GuardOutcome::Redirect(Redirect {
                to: "/admin".to_string(),
                return_to: None,
            })
        );
    }

    #[test]
    fn anonymous_viewer_may_open_public_screens() {
        assert_eq!(public().decide(&Session::Anonymous, "/login"), GuardOutcome::Render);
    }

    #[test]
    fn unrecognized_role_is_forbidden_on_protected_screens() {
        let session = Session::Authenticated(Viewer::new(RoleClaim::Unrecognized(
            "moderator".to_string(),
        )));
        for path in ["/", "/cart", "/admin", "/products"] {
            assert_eq!(protected().decide(&session, path), GuardOutcome::Forbidden);
        }
    }

    #[test]
    fn missing_role_is_forbidden_on_protected_screens() {
        let session = Session::Authenticated(Viewer::new(RoleClaim::Absent));
        assert_eq!(protected().decide(&session, "/"), GuardOutcome::Forbidden);
    }

    #[test]
    fn unrecognized_role_may_open_public_screens() {
        let session = Session::Authenticated(Viewer::new(RoleClaim::Unrecognized(
            "moderator".to_string(),
        )));
        assert_eq!(public().decide(&session, "/login"), GuardOutcome::Render);
    }

    #[test]
    fn denied_redirects_always_land_on_allowed_homes() {
        let policy = PolicyTable::storefront();
        for role in Role::ALL {
            let outcome = protected().decide(&signed_in(role), "/definitely-not-allowed");
            let GuardOutcome::Redirect(redirect) = outcome else {
                panic!("expected redirect for {role}");
            };
            assert_eq!(
                protected().decide(&signed_in(role), &redirect.to),
                GuardOutcome::Render,
                "home of {role} must render"
            );
            assert_eq!(redirect.to, policy.home_for(role));
        }
    }

    #[test]
    fn both_guards_agree_on_homes() {
        for role in Role::ALL {
            let from_public = public().decide(&signed_in(role), "/login");
            let from_protected = protected().decide(&signed_in(role), "/nowhere");
            assert_eq!(from_public, from_protected);
        }
    }

    #[test]
    fn state_settles_once() {
        let mut state = GuardState::default();
        assert!(state.is_checking());
        assert!(state.settle(GuardOutcome::Render));
        assert!(!state.settle(GuardOutcome::Forbidden));
        assert_eq!(state.outcome(), Some(&GuardOutcome::Render));
    }

    #[test]
    fn redirect_without_return_path_is_plain() {
        let redirect = Redirect {
            to: "/admin".to_string(),
            return_to: None,
        };
        assert_eq!(redirect.location(), "/admin");
    }

    #[test]
    fn outcome_serialization_format() {
        let json = serde_json::to_value(GuardOutcome::Redirect(Redirect {
            to: "/".to_string(),
            return_to: None,
        }))
        .expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"outcome": "redirect", "to": "/", "return_to": null})
        );
    }
}
