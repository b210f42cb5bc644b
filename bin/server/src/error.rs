//! Domain error types for server operations.
//!
//! Server functions log the full error and hand the browser a user-safe
//! `ServerFnError` built by `into_server_error`.

use leptos::server_fn::error::ServerFnError;
use std::fmt;
use storefront_access::IdentityError;

/// Errors from the identity gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The access state was not attached to the request.
    StateUnavailable { details: String },
    /// Email or password is wrong.
    InvalidCredentials,
    /// The identity service refused the request with an explanation.
    Rejected { message: String },
    /// The identity service could not be reached or answered unexpectedly.
    IdentityUnavailable { details: String },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateUnavailable { details } => {
                write!(f, "access state unavailable: {}", details)
            }
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::Rejected { message } => {
                write!(f, "identity service refused the request: {}", message)
            }
            Self::IdentityUnavailable { details } => {
                write!(f, "identity service unavailable: {}", details)
            }
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<&IdentityError> for GatewayError {
    fn from(error: &IdentityError) -> Self {
        match error {
            IdentityError::InvalidCredentials => Self::InvalidCredentials,
            IdentityError::Rejected { message, .. } => Self::Rejected {
                message: message.clone(),
            },
            other => Self::IdentityUnavailable {
                details: other.to_string(),
            },
        }
    }
}

impl GatewayError {
    /// Convert to a user-safe ServerFnError.
    pub fn into_server_error(self) -> ServerFnError {
        match self {
            GatewayError::StateUnavailable { .. } => ServerFnError::new("Server misconfigured"),
            GatewayError::InvalidCredentials => ServerFnError::new("Invalid email or password"),
            GatewayError::Rejected { message } => ServerFnError::new(message),
            GatewayError::IdentityUnavailable { .. } => {
                ServerFnError::new("Sign-in is unavailable, try again later")
            }
        }
    }
}
