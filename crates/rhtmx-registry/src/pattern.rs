//! Path template parsing, matching and substitution
//!
//! A template such as `/users/:id/posts/:slug?` is parsed once into typed
//! segments. The same parsed form drives both directions:
//! - **matching** a concrete path and extracting parameters
//! - **substituting** parameters back into a concrete path

use crate::Params;
use std::borrow::Cow;
use tracing::warn;

/// One segment of a parsed path template
///
/// # Examples
///
/// ```
/// use rhtmx_registry::pattern::{classify_segment, Segment};
///
/// assert_eq!(classify_segment("about"), Ok(Segment::Static("about".into())));
/// assert_eq!(classify_segment(":id"), Ok(Segment::Required("id".into())));
/// assert_eq!(classify_segment(":id?"), Ok(Segment::Optional("id".into())));
/// assert_eq!(
///     classify_segment("*slug"),
///     Ok(Segment::CatchAll { name: "slug".into(), optional: false })
/// );
/// assert!(classify_segment(":").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text: `users`
    Static(String),
    /// Required parameter: `:id`
    Required(String),
    /// Optional parameter: `:id?`
    Optional(String),
    /// Rest of the path: `*slug` (one or more segments) or `*slug?` (zero or more)
    CatchAll { name: String, optional: bool },
}

impl Segment {
    /// Placeholder name, if this segment is dynamic
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Required(name) | Segment::Optional(name) => Some(name.as_str()),
            Segment::CatchAll { name, .. } => Some(name.as_str()),
        }
    }

    fn is_dynamic(&self) -> bool {
        !matches!(self, Segment::Static(_))
    }
}

/// Classifies a single template segment
pub fn classify_segment(segment: &str) -> Result<Segment, String> {
    if let Some(rest) = segment.strip_prefix(':') {
        return match rest.strip_suffix('?') {
            Some(name) => param_name(segment, name).map(Segment::Optional),
            None => param_name(segment, rest).map(Segment::Required),
        };
    }

    if let Some(rest) = segment.strip_prefix('*') {
        let (name, optional) = match rest.strip_suffix('?') {
            Some(name) => (name, true),
            None => (rest, false),
        };
        return param_name(segment, name).map(|name| Segment::CatchAll { name, optional });
    }

    Ok(Segment::Static(segment.to_string()))
}

fn param_name(segment: &str, name: &str) -> Result<String, String> {
    if name.is_empty() {
        Err(format!("segment `{}` has no parameter name", segment))
    } else {
        Ok(name.to_string())
    }
}

/// A parsed path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parses a template like `/users/:id`
    ///
    /// Fails when a placeholder has no name (`/users/:`) or when a catch-all
    /// is followed by further segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_registry::PathPattern;
    ///
    /// let pattern = PathPattern::parse("/posts/:year/:slug").unwrap();
    /// assert_eq!(pattern.keys(), vec!["year", "slug"]);
    /// assert_eq!(pattern.source(), "/posts/:year/:slug");
    /// ```
    pub fn parse(template: &str) -> Result<Self, String> {
        let segments = segments(template)
            .into_iter()
            .map(classify_segment)
            .collect::<Result<Vec<_>, _>>()?;

        let catch_all_position = segments
            .iter()
            .position(|s| matches!(s, Segment::CatchAll { .. }));
        if let Some(position) = catch_all_position {
            if position + 1 != segments.len() {
                return Err("a catch-all segment must be the last segment".to_string());
            }
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// The template exactly as it was written
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in order of appearance
    pub fn keys(&self) -> Vec<&str> {
        self.segments.iter().filter_map(Segment::param_name).collect()
    }

    /// Whether `key` is one of this template's placeholders
    pub fn has_key(&self, key: &str) -> bool {
        self.segments.iter().any(|s| s.param_name() == Some(key))
    }

    /// Matching priority (lower = tried first)
    ///
    /// Fully static templates come first, then templates with fewer dynamic
    /// segments. Optional parameters count double, catch-alls go last.
    pub fn priority(&self) -> usize {
        self.segments.iter().fold(0, |acc, segment| {
            acc + match segment {
                Segment::Static(_) => 0,
                Segment::Required(_) => 1,
                Segment::Optional(_) => 2,
                Segment::CatchAll { optional: false, .. } => 1000,
                Segment::CatchAll { optional: true, .. } => 2000,
            }
        })
    }

    pub fn is_static(&self) -> bool {
        !self.segments.iter().any(Segment::is_dynamic)
    }

    /// Matches a concrete path, returning the extracted parameters
    ///
    /// Empty segments are ignored, so `/users/42/` matches `/users/:id`.
    /// Path segments are percent-decoded before comparison, so `/caf%C3%A9`
    /// matches the template `/café`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_registry::PathPattern;
    ///
    /// let pattern = PathPattern::parse("/users/:id").unwrap();
    /// let params = pattern.matches("/users/42", false).unwrap();
    /// assert_eq!(params.get("id").map(String::as_str), Some("42"));
    ///
    /// assert!(pattern.matches("/users", false).is_none());
    /// assert!(pattern.matches("/Users/42", false).is_none());
    /// assert!(pattern.matches("/Users/42", true).is_some());
    /// ```
    pub fn matches(&self, path: &str, case_insensitive: bool) -> Option<Params> {
        // Walks pattern and path segments together
        fn match_segments(
            pattern: &[Segment],
            path: &[&str],
            mut params: Params,
            case_insensitive: bool,
        ) -> Option<Params> {
            let Some((segment, rest)) = pattern.split_first() else {
                return path.is_empty().then_some(params);
            };

            match segment {
                Segment::CatchAll { name, optional } => {
                    if path.is_empty() && !optional {
                        return None;
                    }
                    let value = path.join("/");
                    params.insert(name.clone(), value);
                    Some(params)
                }
                Segment::Optional(name) => {
                    let should_consume = match (path.first(), rest.first()) {
                        (None, _) => false,
                        (Some(_), None) => true,
                        (Some(current), Some(Segment::Static(next))) => {
                            !segment_eq(next, current, case_insensitive)
                        }
                        (Some(_), Some(_)) => true,
                    };

                    if should_consume {
                        let mut consumed = params.clone();
                        consumed.insert(name.clone(), path[0].to_string());
                        if let Some(found) =
                            match_segments(rest, &path[1..], consumed, case_insensitive)
                        {
                            return Some(found);
                        }
                    }
                    match_segments(rest, path, params, case_insensitive)
                }
                Segment::Required(name) => {
                    let (current, remaining) = path.split_first()?;
                    params.insert(name.clone(), current.to_string());
                    match_segments(rest, remaining, params, case_insensitive)
                }
                Segment::Static(text) => {
                    let (current, remaining) = path.split_first()?;
                    if !segment_eq(text, current, case_insensitive) {
                        return None;
                    }
                    match_segments(rest, remaining, params, case_insensitive)
                }
            }
        }

        let owned: Vec<String> = segments(path).into_iter().map(decode).collect();
        let decoded: Vec<&str> = owned.iter().map(String::as_str).collect();

        match_segments(&self.segments, &decoded, Params::new(), case_insensitive)
    }

    /// Substitutes parameters into the template, producing a concrete path
    ///
    /// Values are percent-encoded; a catch-all value keeps its `/` separators.
    /// Returns `None` if a required placeholder has no value, or if a value
    /// would not survive as a path segment (`""`, `.` or `..`). Missing
    /// optional placeholders are dropped. Keys that are not placeholders are
    /// ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_registry::{Params, PathPattern};
    ///
    /// let pattern = PathPattern::parse("/users/:id/:tab?").unwrap();
    ///
    /// let mut params = Params::new();
    /// params.insert("id".to_string(), "42".to_string());
    /// assert_eq!(pattern.substitute(&params), Some("/users/42".to_string()));
    ///
    /// params.insert("tab".to_string(), "posts".to_string());
    /// assert_eq!(pattern.substitute(&params), Some("/users/42/posts".to_string()));
    ///
    /// assert_eq!(pattern.substitute(&Params::new()), None);
    ///
    /// params.insert("id".to_string(), "..".to_string());
    /// assert_eq!(pattern.substitute(&params), None);
    /// ```
    pub fn substitute(&self, params: &Params) -> Option<String> {
        let parts: Option<Vec<String>> = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Static(text) => Some(text.clone()),
                Segment::Required(name) => {
                    let value = params.get(name)?;
                    routable(name, value).then(|| encode(value))
                }
                Segment::Optional(name) => match params.get(name) {
                    Some(value) if !value.is_empty() => {
                        routable(name, value).then(|| encode(value))
                    }
                    _ => Some(String::new()),
                },
                Segment::CatchAll { name, optional } => {
                    let Some(value) = params.get(name) else {
                        return (*optional).then(String::new);
                    };
                    let parts = segments(value);
                    if parts.is_empty() && !*optional {
                        warn!(param = %name, "catch-all value has no path segments");
                        return None;
                    }
                    parts
                        .into_iter()
                        .map(|part| routable(name, part).then(|| encode(part)))
                        .collect::<Option<Vec<_>>>()
                        .map(|parts| parts.join("/"))
                }
            })
            .collect();

        parts.map(|parts| {
            let filtered: Vec<String> = parts.into_iter().filter(|s| !s.is_empty()).collect();

            if filtered.is_empty() {
                "/".to_string()
            } else {
                format!("/{}", filtered.join("/"))
            }
        })
    }
}

/// Splits a path into its non-empty segments
fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Whether a value can stand as a path segment and be matched back
///
/// An empty value collapses away, and `.`/`..` are resolved as dot segments
/// when the URL is parsed.
fn routable(name: &str, value: &str) -> bool {
    let ok = !matches!(value, "" | "." | "..");
    if !ok {
        warn!(param = %name, value = %value, "value cannot be used as a path segment");
    }
    ok
}

fn segment_eq(pattern: &str, path: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        pattern.eq_ignore_ascii_case(path)
    } else {
        pattern == path
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
