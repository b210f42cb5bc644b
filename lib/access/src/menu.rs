//! Per-role navigation menu shown in the storefront header.

use serde::{Deserialize, Serialize};

use crate::policy::PolicyTable;
use crate::role::Role;

/// One link in the header menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub key: String,
    pub label: String,
    pub to: String,
}

impl MenuEntry {
    fn new(key: &str, label: &str, to: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            to: to.to_string(),
        }
    }
}

fn entries(role: Role) -> &'static [(&'static str, &'static str, &'static str)] {
    match role {
        Role::Buyer => &[
            ("profile", "Profile", "/profile"),
            ("orders", "My orders", "/buyer/orders"),
            ("cart", "My cart", "/cart"),
        ],
        Role::Seller => &[
            ("profile", "Profile", "/profile"),
            ("products", "Products", "/seller/products"),
            ("orders", "Orders", "/seller/orders"),
            ("add-product", "Add product", "/seller/add-product"),
        ],
        Role::Shipper => &[
            ("profile", "Profile", "/profile"),
            ("details", "Shipper details", "/shipper-details"),
            ("orders", "Orders", "/shipper/orders"),
        ],
        Role::Admin => &[
            ("dashboard", "Dashboard", "/admin/dashboard"),
            ("users", "Users", "/admin/users"),
            ("violations", "Violations", "/admin/resolve-violations"),
        ],
    }
}

/// Menu links for `role`, limited to what the policy lets the role open.
#[must_use]
pub fn menu_for(policy: &PolicyTable, role: Role) -> Vec<MenuEntry> {
    entries(role)
        .iter()
        .filter(|(_, _, to)| policy.is_allowed(role, to))
        .map(|(key, label, to)| MenuEntry::new(key, label, to))
        .collect()
}
