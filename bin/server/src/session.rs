//! Server functions for the viewer's session.

use leptos::prelude::*;
use storefront_access::Viewer;

/// Server function to get the signed-in viewer, if any.
#[server]
pub async fn current_viewer() -> Result<Option<Viewer>, ServerFnError> {
    use crate::state::{access_state, ambient_credentials};
    use storefront_access::SessionResolver;

    let state = access_state().await.map_err(|e| e.into_server_error())?;
    let credentials = ambient_credentials().await;
    let session = state.resolver.resolve(&credentials).await;
    Ok(session.viewer().cloned())
}

/// Server function to sign in with email and password.
///
/// Returns the path to open next: the remembered `from` path when the
/// viewer's role allows it, otherwise the role's home.
#[server]
pub async fn sign_in(
    email: String,
    password: String,
    from: Option<String>,
) -> Result<String, ServerFnError> {
    use crate::error::GatewayError;
    use crate::state::{access_state, relay_cookies};
    use storefront_access::{SignInCredentials, post_sign_in_target};

    let state = access_state().await.map_err(|e| e.into_server_error())?;
    let credentials = SignInCredentials { email, password };

    let outcome = state.identity.sign_in(&credentials).await.map_err(|report| {
        let error = GatewayError::from(report.current_context());
        match error {
            GatewayError::InvalidCredentials => {
                tracing::info!(email = %credentials.email, "Sign-in refused: invalid credentials");
            }
            _ => tracing::warn!(error = %report, email = %credentials.email, "Sign-in failed"),
        }
        error.into_server_error()
    })?;

    relay_cookies(&outcome.cookies);

    let claim = outcome.session.role_claim();
    let target = post_sign_in_target(&state.policy, &claim, from.as_deref());
    tracing::info!(email = %credentials.email, role = %claim, %target, "Viewer signed in");
    Ok(target)
}

/// Server function to sign out.
///
/// Returns the sign-in path.
#[server]
pub async fn sign_out() -> Result<String, ServerFnError> {
    use crate::error::GatewayError;
    use crate::state::{access_state, ambient_credentials, relay_cookies};

    let state = access_state().await.map_err(|e| e.into_server_error())?;
    let credentials = ambient_credentials().await;

    let cookies = state.identity.sign_out(&credentials).await.map_err(|report| {
        tracing::warn!(error = %report, "Sign-out failed");
        GatewayError::from(report.current_context()).into_server_error()
    })?;

    relay_cookies(&cookies);
    tracing::info!("Viewer signed out");
    Ok(state.policy.sign_in_path().to_string())
}

/// Sign-out button that returns the viewer to the sign-in screen.
#[component]
pub fn SignOutButton() -> impl IntoView {
    use leptos::form::ActionForm;
    use leptos_router::NavigateOptions;
    use leptos_router::hooks::use_navigate;

    let sign_out = ServerAction::<SignOut>::new();
    let navigate = use_navigate();

    Effect::new(move || {
        if let Some(Ok(target)) = sign_out.value().get() {
            navigate(
                &target,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    let error = move || {
        sign_out
            .value()
            .get()
            .and_then(Result::err)
            .map(|e| user_message(&e, "Sign-out failed, try again"))
    };

    view! {
        <ActionForm action=sign_out>
            <button type="submit" class="logout-button">"Log out"</button>
            {move || error().map(|msg| view! { <p class="form-error">{msg}</p> })}
        </ActionForm>
    }
}

/// The message to show for a failed server function.
///
/// Server errors carry the user-safe text chosen on the server; anything
/// else is a transport failure and gets `fallback`.
pub fn user_message(error: &ServerFnError, fallback: &str) -> String {
    match error {
        ServerFnError::ServerError(message) => message.clone(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_show_their_message() {
        let error = ServerFnError::new("Sign-in is unavailable, try again later");
        assert_eq!(
            user_message(&error, "fallback"),
            "Sign-in is unavailable, try again later"
        );
    }

    #[test]
    fn transport_errors_show_the_fallback() {
        let error: ServerFnError = ServerFnError::Request("connection reset".to_string());
        assert_eq!(
            user_message(&error, "Sign-out failed, try again"),
            "Sign-out failed, try again"
        );
    }
}
