//! Role policy table: which paths each role may navigate to.
//!
//! Every role owns an allow-list of path prefixes and a home path. The home
//! path is where the guards send a viewer who wandered somewhere their role
//! may not go, and where an already signed-in viewer lands when they open a
//! public-only screen. Both guards read the same table, so they cannot
//! disagree about where a role belongs.
//!
//! A table is validated once when it is built and is immutable afterwards.

use rootcause::prelude::Report;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::PolicyError;
use crate::role::Role;

/// Path of the sign-in screen.
pub const SIGN_IN_PATH: &str = "/login";

/// Query parameter carrying the path a viewer asked for before sign-in.
pub const RETURN_TO_PARAM: &str = "from";

/// Paths any signed-in viewer may open, merged into every role's allow-list.
const SHARED_PATHS: [&str; 2] = ["/products", "/profile"];

/// Returns true if `path` is `entry` or lies underneath it.
///
/// Matching is anchored at a path separator: `/seller` matches `/seller`
/// and `/seller/orders` but not `/sellers`.
#[must_use]
pub fn path_matches(entry: &str, path: &str) -> bool {
    match path.strip_prefix(entry) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

/// Allowed paths and home for a single role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    home: String,
    allow: Vec<String>,
}

impl RolePolicy {
    #[must_use]
    pub fn home(&self) -> &str {
        &self.home
    }

    /// The role's allow-list, shared paths included.
    #[must_use]
    pub fn allow_list(&self) -> &[String] {
        &self.allow
    }

    #[must_use]
    pub fn allows(&self, path: &str) -> bool {
        self.allow.iter().any(|entry| path_matches(entry, path))
    }
}

/// Validated, immutable role policy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    sign_in_path: String,
    /// Indexed by `Role::index`.
    policies: Vec<RolePolicy>,
}

impl PolicyTable {
    /// Starts building a custom table.
    #[must_use]
    pub fn builder() -> PolicyTableBuilder {
        PolicyTableBuilder::new()
    }

    /// The storefront's table, built and validated on first use.
    ///
    /// # Panics
    ///
    /// Panics if the built-in table violates a policy invariant. Servers
    /// call this during startup so a bad table never reaches a viewer.
    #[must_use]
    pub fn storefront() -> &'static PolicyTable {
        static TABLE: OnceLock<PolicyTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            storefront_builder()
                .build()
                .unwrap_or_else(|report| panic!("invalid built-in policy table: {report}"))
        })
    }

    /// Returns true if `role` may open `path`.
    #[must_use]
    pub fn is_allowed(&self, role: Role, path: &str) -> bool {
        self.policy(role).allows(path)
    }

    /// Where to send a viewer of `role` when they may not stay put.
    #[must_use]
    pub fn home_for(&self, role: Role) -> &str {
        self.policy(role).home()
    }

    #[must_use]
    pub fn policy(&self, role: Role) -> &RolePolicy {
        &self.policies[role.index()]
    }

    #[must_use]
    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }
}

/// Builder for [`PolicyTable`].
#[derive(Debug, Clone)]
pub struct PolicyTableBuilder {
    sign_in_path: String,
    shared: Vec<String>,
    roles: BTreeMap<Role, (String, Vec<String>)>,
}

impl PolicyTableBuilder {
    /// Creates an empty builder with the default sign-in path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sign_in_path: SIGN_IN_PATH.to_string(),
            shared: Vec::new(),
            roles: BTreeMap::new(),
        }
    }

    /// Sets the sign-in path.
    #[must_use]
    pub fn sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.sign_in_path = path.into();
        self
    }

    /// Adds paths every signed-in viewer may open.
    #[must_use]
    pub fn shared<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shared.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Defines a role's home and allow-list, replacing any earlier definition.
    #[must_use]
    pub fn role<I, S>(mut self, role: Role, home: impl Into<String>, allow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allow = allow.into_iter().map(Into::into).collect();
        self.roles.insert(role, (home.into(), allow));
        self
    }

    /// Validates and freezes the table.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] if a role is missing, has an empty
    /// allow-list, lists a relative path, or has a home path its own
    /// allow-list denies.
    pub fn build(mut self) -> Result<PolicyTable, Report<PolicyError>> {
        ensure_absolute(&self.sign_in_path)?;
        for entry in &self.shared {
            ensure_absolute(entry)?;
        }

        let mut policies = Vec::with_capacity(Role::ALL.len());
        for role in Role::ALL {
            let (home, mut allow) = self
                .roles
                .remove(&role)
                .ok_or(PolicyError::MissingRole { role })?;

            if allow.is_empty() {
                return Err(PolicyError::EmptyAllowList { role }.into());
            }
            for entry in &allow {
                ensure_absolute(entry)?;
            }
            for entry in &self.shared {
                if !allow.contains(entry) {
                    allow.push(entry.clone());
                }
            }

            let policy = RolePolicy { home, allow };
            if !policy.allows(&policy.home) {
                return Err(PolicyError::HomeNotAllowed {
                    role,
                    home: policy.home,
                }
                .into());
            }
            policies.push(policy);
        }

        Ok(PolicyTable {
            sign_in_path: self.sign_in_path,
            policies,
        })
    }
}

impl Default for PolicyTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_absolute(entry: &str) -> Result<(), Report<PolicyError>> {
    if entry.starts_with('/') {
        Ok(())
    } else {
        Err(PolicyError::InvalidEntry {
            entry: entry.to_string(),
        }
        .into())
    }
}

fn storefront_builder() -> PolicyTableBuilder {
    PolicyTable::builder()
        .shared(SHARED_PATHS)
        .role(
            Role::Admin,
            "/admin",
            [
                "/admin",
                "/admin/dashboard",
                "/admin/users",
                "/admin/resolve-violations",
            ],
        )
        .role(
            Role::Seller,
            "/seller/dashboard",
            [
                "/seller",
                "/seller/seller-dashboard",
                "/seller/products",
                "/seller/orders",
                "/seller/add-product",
                "/seller-report",
            ],
        )
        .role(
            Role::Shipper,
            "/shipper-details",
            [
                "/shipper",
                "/shipper-details",
                "/shipper/products",
                "/shipper/orders",
            ],
        )
        .role(
            Role::Buyer,
            "/",
            [
                "/",
                "/cart",
                "/home",
                "/checkout",
                "/payment",
                "/buyer/orders",
                "/write-review",
                "/review",
                "/product",
                "/promotion",
                "/user",
            ],
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> &'static PolicyTable {
        PolicyTable::storefront()
    }

    #[test]
    fn path_matches_exact_and_children() {
        assert!(path_matches("/seller", "/seller"));
        assert!(path_matches("/seller", "/seller/x"));
        assert!(path_matches("/seller", "/seller/"));
    }

    #[test]
    fn path_matches_respects_separator_boundary() {
        assert!(!path_matches("/seller", "/sellers"));
        assert!(!path_matches("/seller", "/sellersomething"));
        assert!(!path_matches("/seller", "/selle"));
    }

    #[test]
    fn root_entry_only_matches_root() {
        assert!(path_matches("/", "/"));
        assert!(!path_matches("/", "/cart"));
    }

    #[test]
    fn is_allowed_matches_definition_for_every_role() {
        let probes = [
            "/", "/cart", "/cart/item/3", "/carts", "/seller", "/sellers", "/seller/x",
            "/admin", "/admin/users/9", "/administrator", "/shipper-details", "/shipper",
            "/products", "/products/12", "/profile", "/checkout", "/login",
        ];
        for role in Role::ALL {
            let policy = table().policy(role);
            for path in probes {
                let expected = policy
                    .allow_list()
                    .iter()
                    .any(|entry| path == entry.as_str() || path.starts_with(&format!("{entry}/")));
                assert_eq!(
                    table().is_allowed(role, path),
                    expected,
                    "role {role}, path {path}"
                );
            }
        }
    }

    #[test]
    fn every_home_is_allowed() {
        for role in Role::ALL {
            assert!(
                table().is_allowed(role, table().home_for(role)),
                "home of {role} must be allowed"
            );
        }
    }

    #[test]
    fn storefront_homes() {
        assert_eq!(table().home_for(Role::Admin), "/admin");
        assert_eq!(table().home_for(Role::Seller), "/seller/dashboard");
        assert_eq!(table().home_for(Role::Shipper), "/shipper-details");
        assert_eq!(table().home_for(Role::Buyer), "/");
    }

    #[test]
    fn buyer_cannot_open_seller_screens() {
        assert!(!table().is_allowed(Role::Buyer, "/seller/add-product"));
        assert!(table().is_allowed(Role::Seller, "/seller/add-product"));
    }

    #[test]
    fn shared_paths_reach_every_role() {
        for role in Role::ALL {
            assert!(table().is_allowed(role, "/products/42"));
            assert!(table().is_allowed(role, "/profile"));
        }
    }

    #[test]
    fn sign_in_is_not_a_protected_destination() {
        for role in Role::ALL {
            assert!(!table().is_allowed(role, SIGN_IN_PATH));
        }
    }

    fn minimal() -> PolicyTableBuilder {
        PolicyTable::builder()
            .role(Role::Buyer, "/", ["/"])
            .role(Role::Seller, "/seller", ["/seller"])
            .role(Role::Shipper, "/shipper", ["/shipper"])
            .role(Role::Admin, "/admin", ["/admin"])
    }

    #[test]
    fn build_accepts_minimal_table() {
        let table = minimal().build().expect("valid table");
        assert_eq!(table.sign_in_path(), SIGN_IN_PATH);
    }

    #[test]
    fn build_rejects_missing_role() {
        let err = PolicyTable::builder()
            .role(Role::Buyer, "/", ["/"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("no policy defined"));
    }

    #[test]
    fn build_rejects_home_outside_allow_list() {
        let err = minimal()
            .role(Role::Seller, "/seller-home", ["/seller"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("/seller-home"));
    }

    #[test]
    fn build_rejects_empty_allow_list() {
        let err = minimal()
            .role(Role::Admin, "/admin", Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("empty allow-list"));
    }

    #[test]
    fn build_rejects_relative_entries() {
        let err = minimal().shared(["products"]).build().unwrap_err();
        assert!(err.to_string().contains("'products'"));
    }

    #[test]
    fn shared_paths_can_satisfy_home() {
        let table = minimal()
            .shared(["/account"])
            .role(Role::Shipper, "/account", ["/shipper"])
            .build()
            .expect("home reachable through shared path");
        assert!(table.is_allowed(Role::Shipper, "/account"));
    }

    #[test]
    fn shared_paths_are_not_duplicated() {
        let table = minimal().shared(["/admin"]).build().expect("valid");
        let admin = table.policy(Role::Admin).allow_list();
        assert_eq!(admin.iter().filter(|entry| *entry == "/admin").count(), 1);
    }
}
