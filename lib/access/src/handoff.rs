//! Where a viewer goes after signing in.

use crate::policy::PolicyTable;
use crate::role::RoleClaim;

/// Returns true if `path` stays on this site.
///
/// Protocol-relative (`//host`) and backslash-smuggled (`/\host`) paths are
/// rejected, since browsers treat both as another origin. So is any path
/// carrying ASCII control characters: browsers strip tabs and newlines, so
/// `/\t/host` would become `//host`.
#[must_use]
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
        && !path.chars().any(|c| c.is_ascii_control())
}

/// Picks the screen to open once sign-in succeeds.
///
/// The remembered `from` path wins when it is local and the viewer's role
/// may open it. Otherwise a known role goes home. A viewer without a
/// recognized role has no home, so they return to `from` or the storefront
/// root, where the protected guard refuses them.
#[must_use]
pub fn post_sign_in_target(policy: &PolicyTable, claim: &RoleClaim, from: Option<&str>) -> String {
    let from = from.map(str::trim).filter(|from| is_local_path(from));

    match claim.role() {
        Some(role) => match from {
            Some(from) if policy.is_allowed(role, path_only(from)) => from.to_string(),
            _ => policy.home_for(role).to_string(),
        },
        None => from.unwrap_or("/").to_string(),
    }
}

fn path_only(target: &str) -> &str {
    target
        .split_once(['?', '#'])
        .map_or(target, |(path, _)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;

    fn target(claim: RoleClaim, from: Option<&str>) -> String {
        post_sign_in_target(PolicyTable::storefront(), &claim, from)
    }

    #[test]
    fn returns_to_remembered_path_when_allowed() {
        assert_eq!(target(Role::Buyer.into(), Some("/cart")), "/cart");
        assert_eq!(
            target(Role::Buyer.into(), Some("/product?id=4")),
            "/product?id=4"
        );
    }

    #[test]
    fn goes_home_when_remembered_path_is_denied() {
        assert_eq!(
            target(Role::Seller.into(), Some("/admin/users")),
            "/seller/dashboard"
        );
    }

    #[test]
    fn goes_home_without_remembered_path() {
        assert_eq!(target(Role::Admin.into(), None), "/admin");
        assert_eq!(target(Role::Shipper.into(), Some("")), "/shipper-details");
    }

    #[test]
    fn refuses_off_site_paths() {
        assert_eq!(target(Role::Buyer.into(), Some("//evil.example")), "/");
        assert_eq!(target(Role::Buyer.into(), Some("https://evil.example")), "/");
        assert_eq!(target(Role::Buyer.into(), Some("/\\evil.example")), "/");
        assert_eq!(target(Role::Buyer.into(), Some("/\t/evil.example")), "/");
    }

    #[test]
    fn unrecognized_role_cannot_smuggle_off_site_path() {
        let claim = RoleClaim::Unrecognized("moderator".to_string());
        assert_eq!(target(claim.clone(), Some("/\t/evil.example")), "/");
        assert_eq!(target(claim.clone(), Some("/\n/evil.example")), "/");
        assert_eq!(target(RoleClaim::Absent, Some("/\r\n/evil.example")), "/");
    }

    #[test]
    fn unrecognized_role_returns_to_local_path_or_root() {
        let claim = RoleClaim::Unrecognized("moderator".to_string());
        assert_eq!(target(claim.clone(), Some("/cart")), "/cart");
        assert_eq!(target(claim, Some("//evil.example")), "/");
        assert_eq!(target(RoleClaim::Absent, None), "/");
    }

    #[test]
    fn local_path_detection() {
        assert!(is_local_path("/"));
        assert!(is_local_path("/seller/orders"));
        assert!(!is_local_path("seller"));
        assert!(!is_local_path("//cdn.example/x"));
        assert!(!is_local_path("/\t/cdn.example/x"));
    }
}
