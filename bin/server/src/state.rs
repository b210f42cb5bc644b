//! Per-request access to the identity gateway.

use axum::Extension;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use leptos::prelude::*;
use leptos_axum::ResponseOptions;
use std::sync::Arc;
use storefront_access::{AmbientCredentials, IdentityClient, PolicyTable, SessionResolver};

use crate::error::GatewayError;

/// Shared state attached to every request as an extension.
#[derive(Clone)]
pub struct AccessState {
    /// Resolves the viewer behind a request's cookie.
    pub resolver: Arc<dyn SessionResolver>,
    /// Client for sign-in and sign-out.
    pub identity: IdentityClient,
    /// The role policy table shared by both guards.
    pub policy: Arc<PolicyTable>,
}

impl AccessState {
    /// Creates state that resolves sessions through `identity`.
    pub fn new(identity: IdentityClient, policy: Arc<PolicyTable>) -> Self {
        Self {
            resolver: Arc::new(identity.clone()),
            identity,
            policy,
        }
    }
}

/// Extracts the access state from the current request.
pub async fn access_state() -> Result<AccessState, GatewayError> {
    let Extension(state) = leptos_axum::extract::<Extension<AccessState>>()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Access state missing from request");
            GatewayError::StateUnavailable {
                details: e.to_string(),
            }
        })?;
    Ok(state)
}

/// The credentials the browser sent with the current request.
pub async fn ambient_credentials() -> AmbientCredentials {
    match leptos_axum::extract::<HeaderMap>().await {
        Ok(headers) => AmbientCredentials::from_cookie_header(
            headers.get(COOKIE).and_then(|value| value.to_str().ok()),
        ),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to extract request headers");
            AmbientCredentials::none()
        }
    }
}

/// Relays `Set-Cookie` headers from the identity service to the browser.
pub fn relay_cookies(cookies: &[String]) {
    let Some(response) = use_context::<ResponseOptions>() else {
        tracing::warn!("No response options in context; cookies not relayed");
        return;
    };
    for cookie in cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => response.append_header(SET_COOKIE, value),
            Err(e) => tracing::warn!(error = %e, "Dropping unrelayable Set-Cookie header"),
        }
    }
}
