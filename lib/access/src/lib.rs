//! Role-based route authorization for the storefront.
//!
//! This crate provides:
//! - Roles and role claims (`Role`, `RoleClaim`)
//! - The signed-in viewer and their session (`Viewer`, `Session`)
//! - Normalization of identity service responses (`normalize_identity`)
//! - The role policy table (`PolicyTable`)
//! - Route guard decisions (`RouteGuard`, `GuardOutcome`)
//! - Guard mounts, the session resolver seam, and the identity service
//!   client (behind the `http` feature)
//!
//! # Access Control Model
//!
//! Every screen sits behind one of two guards:
//! - Protected screens need a signed-in viewer whose role's allow-list
//!   covers the path
//! - Public screens, such as sign-in, are only for anonymous viewers
//!
//! # Example
//!
//! ```
//! use storefront_access::{GuardOutcome, PolicyTable, Role, RoleClaim, RouteGuard, Session, Viewer};
//!
//! let policy = PolicyTable::storefront();
//! let buyer = Session::Authenticated(Viewer::new(RoleClaim::Known(Role::Buyer)));
//!
//! assert_eq!(RouteGuard::protected(policy).decide(&buyer, "/cart"), GuardOutcome::Render);
//!
//! // Anonymous viewers are sent to sign in, remembering where they were going
//! let GuardOutcome::Redirect(redirect) =
//!     RouteGuard::protected(policy).decide(&Session::Anonymous, "/cart")
//! else {
//!     unreachable!();
//! };
//! assert_eq!(redirect.location(), "/login?from=%2Fcart");
//! ```

pub mod error;
pub mod guard;
pub mod handoff;
pub mod identity;
pub mod menu;
pub mod policy;
pub mod role;
pub mod session;
pub mod viewer;

#[cfg(feature = "http")]
pub mod client;
#[cfg(feature = "http")]
pub mod mount;
#[cfg(feature = "http")]
pub mod resolver;

// Re-export main types at crate root
pub use error::{IdentityError, PolicyError};
pub use guard::{GuardKind, GuardOutcome, GuardState, Redirect, RouteGuard};
pub use handoff::{is_local_path, post_sign_in_target};
pub use identity::normalize_identity;
pub use menu::{MenuEntry, menu_for};
pub use policy::{PolicyTable, PolicyTableBuilder, RolePolicy, RETURN_TO_PARAM, SIGN_IN_PATH, path_matches};
pub use role::{Role, RoleClaim};
pub use session::{AmbientCredentials, Session};
pub use viewer::Viewer;

#[cfg(feature = "http")]
pub use client::{IdentityClient, IdentityConfig, SignInCredentials, SignInOutcome};
#[cfg(feature = "http")]
pub use mount::GuardMount;
#[cfg(feature = "http")]
pub use resolver::{FixedSessionResolver, SessionResolver};
