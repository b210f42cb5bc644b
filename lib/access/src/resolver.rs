//! The session resolver seam.
//!
//! Guards never talk to the identity service directly; they ask a
//! [`SessionResolver`]. Resolution cannot fail: every failure is absorbed
//! and reported as an anonymous session.

use async_trait::async_trait;

use crate::session::{AmbientCredentials, Session};

/// Resolves the viewer behind a set of ambient credentials.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Returns the current session, or [`Session::Anonymous`] on any failure.
    async fn resolve(&self, credentials: &AmbientCredentials) -> Session;
}

#[async_trait]
impl<R> SessionResolver for std::sync::Arc<R>
where
    R: SessionResolver + ?Sized,
{
    async fn resolve(&self, credentials: &AmbientCredentials) -> Session {
        (**self).resolve(credentials).await
    }
}

/// A resolver that always answers with the same session.
///
/// Useful for tests and for serving a storefront with identity disabled.
#[derive(Debug, Clone, Default)]
pub struct FixedSessionResolver {
    session: Session,
}

impl FixedSessionResolver {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionResolver for FixedSessionResolver {
    async fn resolve(&self, _credentials: &AmbientCredentials) -> Session {
        self.session.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::{Role, RoleClaim};
    use crate::viewer::Viewer;
    use std::sync::Arc;

    #[tokio::test]
    async fn fixed_resolver_is_idempotent() {
        let session = Session::Authenticated(Viewer::new(RoleClaim::Known(Role::Buyer)));
        let resolver = FixedSessionResolver::new(session.clone());
        let credentials = AmbientCredentials::none();

        let first = resolver.resolve(&credentials).await;
        let second = resolver.resolve(&credentials).await;
        assert_eq!(first, session);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn arc_forwards_to_inner_resolver() {
        let resolver: Arc<dyn SessionResolver> = Arc::new(FixedSessionResolver::default());
        let session = resolver.resolve(&AmbientCredentials::none()).await;
        assert_eq!(session, Session::Anonymous);
    }
}
