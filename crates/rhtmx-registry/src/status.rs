// File: src/status.rs
// Purpose: Fixed status code <-> symbolic name tables for error routes

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Status codes that have a symbolic error-route name
const STATUS_NAMES: &[(u16, &str)] = &[
    (400, "BadRequest"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "NotFound"),
    (409, "Conflict"),
    (410, "Gone"),
    (418, "ImATeapot"),
    (429, "TooManyRequests"),
    (500, "InternalServerError"),
    (501, "NotImplemented"),
    (502, "BadGateway"),
    (503, "ServiceUnavailable"),
    (504, "GatewayTimeout"),
];

static NAME_BY_CODE: Lazy<HashMap<u16, &'static str>> =
    Lazy::new(|| STATUS_NAMES.iter().copied().collect());

static CODE_BY_NAME: Lazy<HashMap<&'static str, u16>> =
    Lazy::new(|| STATUS_NAMES.iter().map(|&(code, name)| (name, code)).collect());

/// Status reported for error keys that are neither a code nor a known name
pub const FALLBACK_STATUS: u16 = 500;

/// Symbolic name for a status code
///
/// # Examples
///
/// ```
/// use rhtmx_registry::status::name_for;
///
/// assert_eq!(name_for(404), Some("NotFound"));
/// assert_eq!(name_for(200), None);
/// ```
pub fn name_for(code: u16) -> Option<&'static str> {
    NAME_BY_CODE.get(&code).copied()
}

/// Status code for a symbolic name
///
/// # Examples
///
/// ```
/// use rhtmx_registry::status::code_for;
///
/// assert_eq!(code_for("ServiceUnavailable"), Some(503));
/// assert_eq!(code_for("Teapot"), None);
/// ```
pub fn code_for(name: &str) -> Option<u16> {
    CODE_BY_NAME.get(name).copied()
}

/// Key under which an error route is registered or looked up.
///
/// Accepts either a numeric status (`404`, `"404"`) or a symbolic name
/// (`"NotFound"`). Known names are folded into their numeric code, so both
/// spellings address the same route. Unknown names are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    Code(u16),
    Name(String),
}

impl ErrorKey {
    /// Folds known symbolic names into their status code
    pub fn normalize(self) -> Self {
        match self {
            ErrorKey::Name(name) => match code_for(&name) {
                Some(code) => ErrorKey::Code(code),
                None => ErrorKey::Name(name),
            },
            code => code,
        }
    }

    /// The string key used in the error-route table
    pub fn storage_key(&self) -> String {
        match self.clone().normalize() {
            ErrorKey::Code(code) => code.to_string(),
            ErrorKey::Name(name) => name,
        }
    }

    /// Numeric status this key stands for
    pub fn status(&self) -> u16 {
        match self.clone().normalize() {
            ErrorKey::Code(code) => code,
            ErrorKey::Name(_) => FALLBACK_STATUS,
        }
    }

    /// Symbolic name for this key, if the code is one of the known ones
    pub fn name(&self) -> Option<&'static str> {
        match self.clone().normalize() {
            ErrorKey::Code(code) => name_for(code),
            ErrorKey::Name(_) => None,
        }
    }

    /// Whether this key maps onto the fixed code table
    pub fn is_known(&self) -> bool {
        self.name().is_some()
    }
}

impl From<u16> for ErrorKey {
    fn from(code: u16) -> Self {
        ErrorKey::Code(code)
    }
}

/// Integer literals default to `i32`; out-of-range values are kept as names
impl From<i32> for ErrorKey {
    fn from(code: i32) -> Self {
        u16::try_from(code)
            .map(ErrorKey::Code)
            .unwrap_or_else(|_| ErrorKey::Name(code.to_string()))
    }
}

impl From<&str> for ErrorKey {
    fn from(key: &str) -> Self {
        key.trim()
            .parse::<u16>()
            .map(ErrorKey::Code)
            .unwrap_or_else(|_| ErrorKey::Name(key.to_string()))
    }
}

impl From<String> for ErrorKey {
    fn from(key: String) -> Self {
        ErrorKey::from(key.as_str())
    }
}

impl From<&String> for ErrorKey {
    fn from(key: &String) -> Self {
        ErrorKey::from(key.as_str())
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKey::Code(code) => write!(f, "{}", code),
            ErrorKey::Name(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_inverse() {
        for &(code, name) in STATUS_NAMES {
            assert_eq!(name_for(code), Some(name));
            assert_eq!(code_for(name), Some(code));
        }
        assert_eq!(NAME_BY_CODE.len(), 13);
        assert_eq!(CODE_BY_NAME.len(), 13);
    }

    #[test]
    fn test_error_key_from_str() {
        assert_eq!(ErrorKey::from("404"), ErrorKey::Code(404));
        assert_eq!(ErrorKey::from("NotFound"), ErrorKey::Name("NotFound".into()));
        assert_eq!(ErrorKey::from("NotFound").normalize(), ErrorKey::Code(404));
    }

    #[test]
    fn test_storage_key() {
        assert_eq!(ErrorKey::from(404).storage_key(), "404");
        assert_eq!(ErrorKey::from("NotFound").storage_key(), "404");
        assert_eq!(ErrorKey::from("Maintenance").storage_key(), "Maintenance");
        assert_eq!(ErrorKey::from(599).storage_key(), "599");
    }

    #[test]
    fn test_status_and_name() {
        assert_eq!(ErrorKey::from("Gone").status(), 410);
        assert_eq!(ErrorKey::from(410).name(), Some("Gone"));
        assert_eq!(ErrorKey::from(599).name(), None);
        assert_eq!(ErrorKey::from(599).status(), 599);
        assert_eq!(ErrorKey::from("Maintenance").status(), FALLBACK_STATUS);
        assert!(!ErrorKey::from("Maintenance").is_known());
        assert_eq!(ErrorKey::from(404_u16), ErrorKey::from(404_i32));
    }
}
