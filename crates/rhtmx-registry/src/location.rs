// File: src/location.rs
// Purpose: Parse locations into pathname/query/host and format them back

use crate::Params;
use url::form_urlencoded;
use url::{ParseError, Url};

/// Base used to resolve relative locations; its host is never reported
const RELATIVE_BASE: &str = "http://relative.invalid/";
const RELATIVE_HOST: &str = "relative.invalid";

/// A parsed location: either an absolute URL or a relative path
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// Path component, always starting with `/` (still percent-encoded)
    pub pathname: String,
    /// Decoded query parameters; a repeated key keeps its last value
    pub query: Params,
    /// `host[:port]`, present only when the location names one
    pub host: Option<String>,
}

impl Location {
    /// Parses an absolute URL, a protocol-relative URL or a relative path
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_registry::Location;
    ///
    /// let location = Location::parse("https://example.com:8080/users/42?tab=posts#top");
    /// assert_eq!(location.pathname, "/users/42");
    /// assert_eq!(location.host.as_deref(), Some("example.com:8080"));
    /// assert_eq!(location.query.get("tab").map(String::as_str), Some("posts"));
    ///
    /// let relative = Location::parse("/users/42?tab=posts");
    /// assert_eq!(relative.pathname, "/users/42");
    /// assert_eq!(relative.host, None);
    /// ```
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) => Self::from_url(&url),
            Err(ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
                .and_then(|base| base.join(location))
                .map(|url| Self::from_url(&url))
                .unwrap_or_else(|_| Self::from_raw(location)),
            Err(_) => Self::from_raw(location),
        }
    }

    fn from_url(url: &Url) -> Self {
        let host = url
            .host_str()
            .filter(|host| *host != RELATIVE_HOST)
            .map(|host| match url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            });

        Self {
            pathname: url.path().to_string(),
            query: url.query_pairs().into_owned().collect(),
            host,
        }
    }

    /// Splits a location the `url` crate refuses to parse
    fn from_raw(location: &str) -> Self {
        let without_fragment = location.split('#').next().unwrap_or_default();
        let (path, query) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));

        let pathname = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        Self {
            pathname,
            query: parse_query(query),
            host: None,
        }
    }
}

/// Parses a query string (without the leading `?`) into parameters
///
/// # Examples
///
/// ```
/// use rhtmx_registry::location::parse_query;
///
/// let query = parse_query("tab=posts&q=hello+world&tab=likes");
/// assert_eq!(query.get("q").map(String::as_str), Some("hello world"));
/// assert_eq!(query.get("tab").map(String::as_str), Some("likes"));
/// ```
pub fn parse_query(query: &str) -> Params {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

/// Formats a pathname and query parameters into a URL string
///
/// The `?` is only added when there is at least one parameter.
///
/// # Examples
///
/// ```
/// use rhtmx_registry::{format_location, Params};
///
/// let mut query = Params::new();
/// assert_eq!(format_location("/users/42", &query), "/users/42");
///
/// query.insert("tab".to_string(), "posts".to_string());
/// query.insert("q".to_string(), "a&b".to_string());
/// assert_eq!(format_location("/users/42", &query), "/users/42?q=a%26b&tab=posts");
/// ```
pub fn format_location(pathname: &str, query: &Params) -> String {
    if query.is_empty() {
        return pathname.to_string();
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        serializer.append_pair(key, value);
    }
    format!("{}?{}", pathname, serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_path() {
        let location = Location::parse("/about");
        assert_eq!(location.pathname, "/about");
        assert!(location.query.is_empty());
        assert_eq!(location.host, None);
    }

    #[test]
    fn test_parse_path_without_leading_slash() {
        assert_eq!(Location::parse("about").pathname, "/about");
    }

    #[test]
    fn test_parse_query_only() {
        let location = Location::parse("?page=2");
        assert_eq!(location.pathname, "/");
        assert_eq!(location.query.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_parse_protocol_relative() {
        let location = Location::parse("//cdn.example.com/assets/app.js");
        assert_eq!(location.host.as_deref(), Some("cdn.example.com"));
        assert_eq!(location.pathname, "/assets/app.js");
    }

    #[test]
    fn test_parse_absolute_without_path() {
        let location = Location::parse("http://a.com");
        assert_eq!(location.pathname, "/");
        assert_eq!(location.host.as_deref(), Some("a.com"));
    }

    #[test]
    fn test_parse_drops_fragment() {
        let location = Location::parse("/docs/intro#setup");
        assert_eq!(location.pathname, "/docs/intro");
    }

    #[test]
    fn test_from_raw_fallback() {
        let location = Location::from_raw("users/42?tab=posts#x");
        assert_eq!(location.pathname, "/users/42");
        assert_eq!(location.query.get("tab").map(String::as_str), Some("posts"));
    }

    #[test]
    fn test_format_round_trips_through_parse() {
        let mut query = Params::new();
        query.insert("q".to_string(), "hello world".to_string());
        query.insert("filter".to_string(), "a=b".to_string());

        let formatted = format_location("/search", &query);
        let parsed = Location::parse(&formatted);

        assert_eq!(parsed.pathname, "/search");
        assert_eq!(parsed.query, query);
    }
}
