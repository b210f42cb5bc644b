//! Error types for the storefront-access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `PolicyError`: the role policy table violates its own invariants
//! - `IdentityError`: a call to the remote identity service failed

use crate::role::Role;
use std::fmt;

/// Errors raised while building a role policy table.
///
/// Every variant describes a table that would let the guards disagree or
/// redirect a viewer in a loop, so a table carrying any of them is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A recognized role has no entry in the table.
    MissingRole { role: Role },
    /// A role was given no allowed paths.
    EmptyAllowList { role: Role },
    /// A path entry is not an absolute path.
    InvalidEntry { entry: String },
    /// A role's home path is not allowed by its own allow-list.
    HomeNotAllowed { role: Role, home: String },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRole { role } => {
                write!(f, "no policy defined for role '{role}'")
            }
            Self::EmptyAllowList { role } => {
                write!(f, "role '{role}' has an empty allow-list")
            }
            Self::InvalidEntry { entry } => {
                write!(f, "policy path '{entry}' must start with '/'")
            }
            Self::HomeNotAllowed { role, home } => {
                write!(
                    f,
                    "home path '{home}' of role '{role}' is not in its allow-list"
                )
            }
        }
    }
}

impl std::error::Error for PolicyError {}

/// Errors from calls to the remote identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The HTTP client could not be constructed.
    ClientBuild { details: String },
    /// The identity service could not be reached.
    Unreachable { endpoint: String, details: String },
    /// The identity service did not answer within the configured timeout.
    Timeout { endpoint: String },
    /// The identity service answered with a non-success status.
    UnexpectedStatus { endpoint: String, status: u16 },
    /// Sign-in was refused because the credentials are wrong.
    InvalidCredentials,
    /// The identity service refused the request with an explanation.
    Rejected { status: u16, message: String },
    /// The response body was not the JSON the storefront expects.
    MalformedResponse { endpoint: String, details: String },
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientBuild { details } => {
                write!(f, "failed to build identity client: {details}")
            }
            Self::Unreachable { endpoint, details } => {
                write!(f, "identity service at '{endpoint}' unreachable: {details}")
            }
            Self::Timeout { endpoint } => {
                write!(f, "identity request to '{endpoint}' timed out")
            }
            Self::UnexpectedStatus { endpoint, status } => {
                write!(f, "identity service at '{endpoint}' returned status {status}")
            }
            Self::InvalidCredentials => write!(f, "incorrect email or password"),
            Self::Rejected { status, message } => {
                write!(f, "identity service rejected request ({status}): {message}")
            }
            Self::MalformedResponse { endpoint, details } => {
                write!(f, "malformed response from '{endpoint}': {details}")
            }
        }
    }
}

impl std::error::Error for IdentityError {}
