//! One guard mount: a single check of the viewer's session for one screen.
//!
//! A mount starts in [`GuardState::Checking`], resolves the session in the
//! background, and settles exactly once. Dropping or unmounting the guard
//! before the session resolves discards the late result.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::guard::{GuardKind, GuardOutcome, GuardState, RouteGuard};
use crate::policy::PolicyTable;
use crate::resolver::SessionResolver;
use crate::session::{AmbientCredentials, Session};

/// A mounted guard waiting for, or holding, its decision.
#[derive(Debug)]
pub struct GuardMount {
    kind: GuardKind,
    path: String,
    policy: Arc<PolicyTable>,
    mounted: Arc<AtomicBool>,
    state: watch::Receiver<GuardState>,
}

impl GuardMount {
    /// Mounts a guard for `path` and starts resolving the session.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<R>(
        resolver: Arc<R>,
        policy: Arc<PolicyTable>,
        kind: GuardKind,
        path: impl Into<String>,
        credentials: AmbientCredentials,
    ) -> Self
    where
        R: SessionResolver + ?Sized + 'static,
    {
        let path = path.into();
        let mounted = Arc::new(AtomicBool::new(true));
        let (tx, state) = watch::channel(GuardState::Checking);

        tokio::spawn({
            let policy = Arc::clone(&policy);
            let mounted = Arc::clone(&mounted);
            let path = path.clone();
            async move {
                let session = resolver.resolve(&credentials).await;
                if !mounted.load(Ordering::Acquire) {
                    debug!(?kind, %path, "guard unmounted before session resolved; discarding");
                    return;
                }
                let outcome = RouteGuard::new(kind, &policy).decide(&session, &path);
                tx.send_if_modified(|state| state.settle(outcome));
            }
        });

        Self {
            kind,
            path,
            policy,
            mounted,
            state,
        }
    }

    /// The current state of this mount.
    #[must_use]
    pub fn state(&self) -> GuardState {
        self.state.borrow().clone()
    }

    /// Waits for the guard to settle.
    ///
    /// If the background check ended without settling, the viewer is
    /// treated as anonymous.
    pub async fn settled(&mut self) -> GuardOutcome {
        loop {
            if let Some(outcome) = self.state.borrow_and_update().outcome() {
                return outcome.clone();
            }
            if self.state.changed().await.is_err() {
                debug!(kind = ?self.kind, path = %self.path, "guard check ended without a decision");
                return RouteGuard::new(self.kind, &self.policy)
                    .decide(&Session::Anonymous, &self.path);
            }
        }
    }

    /// Unmounts the guard. A session resolving afterwards is ignored.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for GuardMount {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::Release);
    }
}
