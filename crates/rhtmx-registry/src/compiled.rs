// File: src/compiled.rs
// Purpose: Fully merged routes, ready for matching and URL building

use crate::component::Renderable;
use crate::config::RouteConfig;
use crate::error::{RegistryError, Result};
use crate::pattern::PathPattern;
use crate::Props;
use std::fmt;

/// Request method a compiled route answers to.
///
/// Only navigation (`GET`) requests are ever resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route after merging with the defaults
///
/// Every field a descriptor needs is present, so resolution never has to
/// fall back to the defaults again.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRoute<C> {
    pub name: String,
    pub method: Method,
    /// Parsed path template; `None` when neither route nor defaults set a path
    pub pattern: Option<PathPattern>,
    pub head: Option<C>,
    pub body: C,
    pub props: Props,
    pub action: Option<String>,
    pub title: Option<String>,
}

impl<C> CompiledRoute<C> {
    /// The path template as written
    pub fn path(&self) -> Option<&str> {
        self.pattern.as_ref().map(PathPattern::source)
    }

    /// Matching priority; path-less routes sort last
    pub fn priority(&self) -> usize {
        self.pattern
            .as_ref()
            .map(PathPattern::priority)
            .unwrap_or(usize::MAX)
    }
}

/// Merges a route with the defaults and validates the result
///
/// Fails when the merged body is missing or not renderable, or when the
/// merged path template cannot be parsed.
///
/// # Examples
///
/// ```
/// use rhtmx_registry::{merge_with_defaults, RegistryError, RouteConfig};
///
/// let defaults = RouteConfig::new().with_head("Head");
///
/// let compiled = merge_with_defaults(
///     "about",
///     &RouteConfig::new().with_path("/about").with_body("About"),
///     &defaults,
/// )
/// .unwrap();
/// assert_eq!(compiled.body, "About");
/// assert_eq!(compiled.head, Some("Head"));
///
/// let err = merge_with_defaults("broken", &RouteConfig::new().with_path("/x"), &defaults);
/// assert_eq!(err, Err(RegistryError::MissingBody { route: "broken".into() }));
/// ```
pub fn merge_with_defaults<C: Renderable>(
    name: &str,
    route: &RouteConfig<C>,
    defaults: &RouteConfig<C>,
) -> Result<CompiledRoute<C>> {
    let merged = route.merged_with(defaults);

    let body = merged
        .body
        .filter(Renderable::is_renderable)
        .ok_or_else(|| RegistryError::MissingBody {
            route: name.to_string(),
        })?;

    let pattern = merged
        .path
        .as_deref()
        .map(PathPattern::parse)
        .transpose()
        .map_err(|reason| RegistryError::InvalidPattern {
            route: name.to_string(),
            reason,
        })?;

    Ok(CompiledRoute {
        name: name.to_string(),
        method: Method::Get,
        pattern,
        head: merged.head,
        body,
        props: merged.props.unwrap_or_default(),
        action: merged.action,
        title: merged.title,
    })
}
