// File: src/error.rs
// Purpose: Registration-time failures

use thiserror::Error;

/// Errors raised while building the route table.
///
/// Resolution never fails: a location that matches nothing is `None`, and an
/// unknown route name has no URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Neither the route nor the defaults provide a renderable body
    #[error("route `{route}` has no renderable body (set `body` on the route or in the defaults)")]
    MissingBody { route: String },

    /// The route's path template cannot be parsed
    #[error("route `{route}` has an invalid path template: {reason}")]
    InvalidPattern { route: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
