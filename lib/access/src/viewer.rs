//! The viewer: whoever is looking at the storefront right now.
//!
//! Viewer records are owned by the remote identity service. The storefront
//! only reads them, so every field other than the role claim is optional.

use serde::{Deserialize, Serialize};

use crate::role::{Role, RoleClaim};

/// Identity of a signed-in viewer as reported by the identity service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// Opaque identifier assigned by the identity service.
    id: Option<String>,
    /// Name to greet the viewer with.
    display_name: Option<String>,
    /// Contact email.
    email: Option<String>,
    /// The role the identity service reported.
    role: RoleClaim,
}

impl Viewer {
    /// Creates a viewer carrying only a role claim.
    #[must_use]
    pub fn new(role: RoleClaim) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    /// Sets the viewer's identifier.
    #[must_use]
    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn role_claim(&self) -> &RoleClaim {
        &self.role
    }

    /// Returns the recognized role, if the claim is one.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.role()
    }

    /// Best label for greeting the viewer: display name, then email.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.display_name().or_else(|| self.email())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let viewer = Viewer::new(RoleClaim::Known(Role::Buyer))
            .with_id(Some("42".to_string()))
            .with_display_name(Some("Linh".to_string()))
            .with_email(Some("linh@example.com".to_string()));

        assert_eq!(viewer.id(), Some("42"));
        assert_eq!(viewer.display_name(), Some("Linh"));
        assert_eq!(viewer.email(), Some("linh@example.com"));
        assert_eq!(viewer.role(), Some(Role::Buyer));
    }

    #[test]
    fn label_falls_back_to_email() {
        let viewer = Viewer::new(RoleClaim::Absent).with_email(Some("a@b.c".to_string()));
        assert_eq!(viewer.label(), Some("a@b.c"));
        assert_eq!(Viewer::new(RoleClaim::Absent).label(), None);
    }
}
