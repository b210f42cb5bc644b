//! Resolved viewer sessions.
//!
//! A session is the outcome of one identity check: either nobody is signed
//! in, or a viewer is. Sessions are resolved fresh for every guard mount
//! and are never cached or persisted by the storefront.

use serde::{Deserialize, Serialize};

use crate::role::{Role, RoleClaim};
use crate::viewer::Viewer;

/// The result of resolving who is viewing the storefront.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "viewer", rename_all = "snake_case")]
pub enum Session {
    /// No one is signed in, or the identity check failed.
    #[default]
    Anonymous,
    /// A viewer is signed in.
    Authenticated(Viewer),
}

impl Session {
    /// Returns true if a viewer is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Returns the signed-in viewer, if any.
    #[must_use]
    pub fn viewer(&self) -> Option<&Viewer> {
        match self {
            Self::Authenticated(viewer) => Some(viewer),
            Self::Anonymous => None,
        }
    }

    /// Returns the viewer's recognized role.
    ///
    /// `None` both for anonymous sessions and for viewers whose role tag
    /// is unrecognized or missing.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.viewer().and_then(Viewer::role)
    }

    /// Returns the viewer's role claim, or `Absent` when anonymous.
    #[must_use]
    pub fn role_claim(&self) -> RoleClaim {
        self.viewer()
            .map(|viewer| viewer.role_claim().clone())
            .unwrap_or_default()
    }
}

/// Credentials the browser sent along with a navigation.
///
/// The storefront never inspects them; it relays the cookie header to the
/// identity service so the service can recognize its own session cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientCredentials {
    cookie: Option<String>,
}

impl AmbientCredentials {
    /// Credentials with no cookie at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Wraps a raw `Cookie` header value. Blank headers carry nothing.
    #[must_use]
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        Self {
            cookie: header
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        }
    }

    /// Returns the cookie header to forward, if any.
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }
}
