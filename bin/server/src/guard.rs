//! Route guard components.
//!
//! Every screen is wrapped in [`ProtectedRoute`] or [`PublicRoute`]. The
//! guard renders a loading indicator while it checks, then the screen, a
//! redirect, or a refusal. Each mount checks on its own; nothing is cached
//! between navigations.

use crate::session::SignOutButton;
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;
use storefront_access::{GuardKind, GuardOutcome, PolicyTable, RouteGuard, Session};

/// Server function deciding whether the viewer may open `path`.
#[server]
pub async fn check_route(kind: GuardKind, path: String) -> Result<GuardOutcome, ServerFnError> {
    use crate::state::{access_state, ambient_credentials};
    use std::sync::Arc;
    use storefront_access::GuardMount;

    let state = access_state().await.map_err(|e| e.into_server_error())?;
    let credentials = ambient_credentials().await;

    // Dropping the mount when the request is cancelled discards the result.
    let mut mount = GuardMount::start(
        Arc::clone(&state.resolver),
        Arc::clone(&state.policy),
        kind,
        path,
        credentials,
    );
    Ok(mount.settled().await)
}

/// Wraps a screen that needs a signed-in viewer whose role allows it.
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    guarded(GuardKind::Protected, children)
}

/// Wraps a screen meant only for anonymous viewers, such as sign-in.
#[component]
pub fn PublicRoute(children: ChildrenFn) -> impl IntoView {
    guarded(GuardKind::Public, children)
}

fn guarded(kind: GuardKind, children: ChildrenFn) -> impl IntoView {
    let location = use_location();
    let decision = Resource::new(
        move || location.pathname.get(),
        move |path| async move {
            match check_route(kind, path.clone()).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    leptos::logging::warn!("route check for {path} failed: {e}");
                    RouteGuard::new(kind, PolicyTable::storefront()).decide(&Session::Anonymous, &path)
                }
            }
        },
    );

    view! {
        <Suspense fallback=move || view! { <p class="guard-checking">"Loading..."</p> }>
            {move || {
                decision.get().map(|outcome| match outcome {
                    GuardOutcome::Render => children().into_any(),
                    GuardOutcome::Redirect(redirect) => view! {
                        <Redirect
                            path=redirect.location()
                            options=NavigateOptions {
                                replace: true,
                                ..Default::default()
                            }
                        />
                    }.into_any(),
                    GuardOutcome::Forbidden => view! { <Forbidden/> }.into_any(),
                })
            }}
        </Suspense>
    }
}

/// Shown to signed-in viewers whose role the storefront does not recognize.
#[component]
fn Forbidden() -> impl IntoView {
    view! {
        <div class="forbidden">
            <h1>"Access denied"</h1>
            <p>"Your account cannot open this page."</p>
            <SignOutButton/>
        </div>
    }
}
