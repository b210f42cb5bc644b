//! HTTP client for the remote identity service.
//!
//! The storefront sits in front of the identity service as a same-origin
//! gateway: the browser's cookie header is relayed on every call, and any
//! `Set-Cookie` headers the service answers with are relayed back.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CACHE_CONTROL, COOKIE, HeaderMap, SET_COOKIE};
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use async_trait::async_trait;

use crate::error::IdentityError;
use crate::identity::normalize_identity;
use crate::resolver::SessionResolver;
use crate::session::{AmbientCredentials, Session};

/// Configuration for reaching the identity service.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the identity service (e.g., "http://localhost:8080").
    base_url: String,
    /// Path answering "who is signed in".
    /// Default: "/api/users/me"
    #[serde(default = "default_me_path")]
    me_path: String,
    /// Path accepting email and password.
    /// Default: "/api/users/login"
    #[serde(default = "default_login_path")]
    login_path: String,
    /// Path ending the identity service's session.
    /// Default: "/api/users/logout"
    #[serde(default = "default_logout_path")]
    logout_path: String,
    /// Upper bound on every identity request, in milliseconds.
    /// Default: 5000
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
}

fn default_me_path() -> String {
    "/api/users/me".to_string()
}

fn default_login_path() -> String {
    "/api/users/login".to_string()
}

fn default_logout_path() -> String {
    "/api/users/logout".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl IdentityConfig {
    /// Creates a configuration with defaults for optional fields.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            me_path: default_me_path(),
            login_path: default_login_path(),
            logout_path: default_logout_path(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn me_url(&self) -> String {
        self.url(&self.me_path)
    }

    #[must_use]
    pub fn login_url(&self) -> String {
        self.url(&self.login_path)
    }

    #[must_use]
    pub fn logout_url(&self) -> String {
        self.url(&self.logout_path)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Email and password submitted on the sign-in screen.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignInCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignInOutcome {
    /// The session described by the sign-in response.
    pub session: Session,
    /// `Set-Cookie` headers to relay to the browser.
    pub cookies: Vec<String>,
}

/// Client for the identity service.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    config: IdentityConfig,
}

impl IdentityClient {
    /// Creates a client whose every request is bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: IdentityConfig) -> Result<Self, Report<IdentityError>> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| IdentityError::ClientBuild {
                details: e.to_string(),
            })?;
        Ok(Self { http, config })
    }

    /// Asks the identity service who is signed in.
    ///
    /// # Errors
    ///
    /// Returns an error on timeout, transport failure, non-success status,
    /// or a body that is not JSON. A JSON body the storefront does not
    /// understand is not an error; it yields an anonymous session.
    #[instrument(skip_all, fields(endpoint = %self.config.me_url()))]
    pub async fn current_session(
        &self,
        credentials: &AmbientCredentials,
    ) -> Result<Session, Report<IdentityError>> {
        let endpoint = self.config.me_url();
        let mut request = self
            .http
            .get(&endpoint)
            .header(CACHE_CONTROL, "no-cache")
            .header(ACCEPT, "application/json");
        if let Some(cookie) = credentials.cookie() {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(|e| transport_error(&endpoint, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
            }
            .into());
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| body_error(&endpoint, &e))?;
        Ok(normalize_identity(&body))
    }

    /// Signs a viewer in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] on 401,
    /// [`IdentityError::Rejected`] when a success response does not describe
    /// a signed-in viewer, and other variants on transport failure or
    /// unexpected responses.
    #[instrument(skip_all, fields(endpoint = %self.config.login_url(), email = %credentials.email))]
    pub async fn sign_in(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<SignInOutcome, Report<IdentityError>> {
        let endpoint = self.config.login_url();
        let response = self
            .http
            .post(&endpoint)
            .header(ACCEPT, "application/json")
            .json(credentials)
            .send()
            .await
            .map_err(|e| transport_error(&endpoint, &e))?;

        let status = response.status();
        let cookies = relayed_cookies(response.headers());
        let body = response.json::<Value>().await;

        if status == StatusCode::UNAUTHORIZED {
            return Err(IdentityError::InvalidCredentials.into());
        }
        if !status.is_success() {
            // Failure bodies are optional and may not be JSON.
            let body = body.unwrap_or(Value::Null);
            return Err(match rejection_message(&body) {
                Some(message) => IdentityError::Rejected {
                    status: status.as_u16(),
                    message,
                },
                None => IdentityError::UnexpectedStatus {
                    endpoint,
                    status: status.as_u16(),
                },
            }
            .into());
        }

        let body = body.map_err(|e| body_error(&endpoint, &e))?;
        let session = normalize_identity(&body);
        if !session.is_authenticated() {
            // A success status whose body names nobody is a refusal.
            return Err(match rejection_message(&body) {
                Some(message) => IdentityError::Rejected {
                    status: status.as_u16(),
                    message,
                },
                None => IdentityError::InvalidCredentials,
            }
            .into());
        }
        debug!(role = %session.role_claim(), "sign-in accepted");
        Ok(SignInOutcome { session, cookies })
    }

    /// Ends the identity service's session for these credentials.
    ///
    /// Returns the `Set-Cookie` headers to relay, typically clearing the
    /// session cookie.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip_all, fields(endpoint = %self.config.logout_url()))]
    pub async fn sign_out(
        &self,
        credentials: &AmbientCredentials,
    ) -> Result<Vec<String>, Report<IdentityError>> {
        let endpoint = self.config.logout_url();
        let mut request = self.http.post(&endpoint);
        if let Some(cookie) = credentials.cookie() {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(|e| transport_error(&endpoint, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
            }
            .into());
        }
        Ok(relayed_cookies(response.headers()))
    }
}

#[async_trait]
impl SessionResolver for IdentityClient {
    async fn resolve(&self, credentials: &AmbientCredentials) -> Session {
        match self.current_session(credentials).await {
            Ok(session) => session,
            Err(report) => {
                if matches!(report.current_context(), IdentityError::Timeout { .. }) {
                    warn!(error = %report, "identity check timed out; treating viewer as anonymous");
                } else {
                    debug!(error = %report, "identity check failed; treating viewer as anonymous");
                }
                Session::Anonymous
            }
        }
    }
}

fn transport_error(endpoint: &str, error: &reqwest::Error) -> IdentityError {
    if error.is_timeout() {
        IdentityError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        IdentityError::Unreachable {
            endpoint: endpoint.to_string(),
            details: error.to_string(),
        }
    }
}

fn body_error(endpoint: &str, error: &reqwest::Error) -> IdentityError {
    if error.is_timeout() {
        IdentityError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        IdentityError::MalformedResponse {
            endpoint: endpoint.to_string(),
            details: error.to_string(),
        }
    }
}

fn relayed_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}

fn rejection_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .into_iter()
        .find_map(|key| body.get(key)?.as_str())
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
}
