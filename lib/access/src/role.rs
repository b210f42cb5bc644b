//! Viewer roles for storefront access control.
//!
//! The identity service tags every signed-in viewer with exactly one role.
//! The storefront recognizes a closed set of roles; any other tag is kept
//! verbatim as an unrecognized claim so the guards can classify it
//! explicitly instead of guessing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storefront role assigned by the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Shopper browsing, buying and reviewing products.
    Buyer,
    /// Merchant managing a product catalog and incoming orders.
    Seller,
    /// Courier handling pickups and deliveries.
    Shipper,
    /// Platform operator.
    Admin,
}

impl Role {
    /// Every recognized role, in table order.
    pub const ALL: [Role; 4] = [Role::Buyer, Role::Seller, Role::Shipper, Role::Admin];

    /// Returns the wire tag for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Shipper => "shipper",
            Self::Admin => "admin",
        }
    }

    /// Parses a role tag, ignoring surrounding whitespace and ASCII case.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(tag))
    }

    /// Position of this role in [`Role::ALL`].
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Buyer => 0,
            Self::Seller => 1,
            Self::Shipper => 2,
            Self::Admin => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role a signed-in viewer claims, as reported by the identity service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tag", rename_all = "snake_case")]
pub enum RoleClaim {
    /// A recognized storefront role.
    Known(Role),
    /// A role tag that is not part of the storefront's role set.
    Unrecognized(String),
    /// The identity response carried no role tag at all.
    #[default]
    Absent,
}

impl RoleClaim {
    /// Classifies an optional raw role tag.
    ///
    /// Blank tags count as absent.
    #[must_use]
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            None | Some("") => Self::Absent,
            Some(tag) => match Role::parse(tag) {
                Some(role) => Self::Known(role),
                None => Self::Unrecognized(tag.to_string()),
            },
        }
    }

    /// Returns the recognized role, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Known(role) => Some(*role),
            Self::Unrecognized(_) | Self::Absent => None,
        }
    }
}

impl From<Role> for RoleClaim {
    fn from(role: Role) -> Self {
        Self::Known(role)
    }
}

impl fmt::Display for RoleClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(role) => write!(f, "{role}"),
            Self::Unrecognized(tag) => write!(f, "unrecognized({tag})"),
            Self::Absent => f.write_str("none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_every_role_tag() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(Role::parse("  Seller "), Some(Role::Seller));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
    }

    #[test]
    fn parse_rejects_unknown_and_partial_tags() {
        assert_eq!(Role::parse("moderator"), None);
        assert_eq!(Role::parse("super-admin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn index_matches_all_order() {
        for (position, role) in Role::ALL.into_iter().enumerate() {
            assert_eq!(role.index(), position);
        }
    }

    #[test]
    fn claim_from_tag_classifies() {
        assert_eq!(
            RoleClaim::from_tag(Some("shipper")),
            RoleClaim::Known(Role::Shipper)
        );
        assert_eq!(
            RoleClaim::from_tag(Some("moderator")),
            RoleClaim::Unrecognized("moderator".to_string())
        );
        assert_eq!(RoleClaim::from_tag(Some("   ")), RoleClaim::Absent);
        assert_eq!(RoleClaim::from_tag(None), RoleClaim::Absent);
    }

    #[test]
    fn claim_role_only_for_known() {
        assert_eq!(RoleClaim::Known(Role::Buyer).role(), Some(Role::Buyer));
        assert_eq!(RoleClaim::Unrecognized("x".to_string()).role(), None);
        assert_eq!(RoleClaim::Absent.role(), None);
    }

    #[test]
    fn role_serialization_format() {
        let json = serde_json::to_string(&Role::Shipper).expect("serialize");
        assert_eq!(json, "\"shipper\"");
    }

    #[test]
    fn claim_serialization_format() {
        let json = serde_json::to_value(RoleClaim::Known(Role::Admin)).expect("serialize");
        assert_eq!(json, serde_json::json!({"kind": "known", "tag": "admin"}));

        let json = serde_json::to_value(RoleClaim::Absent).expect("serialize");
        assert_eq!(json, serde_json::json!({"kind": "absent"}));
    }
}
