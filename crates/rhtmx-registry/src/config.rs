// File: src/config.rs
// Purpose: Route configuration records and registry options (TOML-loadable)

use crate::Props;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Configuration of a single route, as authored.
///
/// Every field is optional; whatever a route leaves out is taken from the
/// registry defaults when the route is compiled.
///
/// # Examples
///
/// ```
/// use rhtmx_registry::RouteConfig;
///
/// let route: RouteConfig<&'static str> = RouteConfig::new()
///     .with_path("/users/:id")
///     .with_body("UserProfile")
///     .with_action("load_user")
///     .with_title("Profile");
///
/// assert_eq!(route.path.as_deref(), Some("/users/:id"));
/// assert_eq!(route.body, Some("UserProfile"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig<C> {
    /// Path template with `:name` placeholders
    pub path: Option<String>,

    /// Secondary content (document head, sidebar, ...)
    pub head: Option<C>,

    /// Primary content; required after merging with defaults
    pub body: Option<C>,

    /// Static data handed to the renderer
    pub props: Option<Props>,

    /// Name of the procedure to run before rendering
    pub action: Option<String>,

    pub title: Option<String>,
}

impl<C> Default for RouteConfig<C> {
    fn default() -> Self {
        Self {
            path: None,
            head: None,
            body: None,
            props: None,
            action: None,
            title: None,
        }
    }
}

impl<C> RouteConfig<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_head(mut self, head: C) -> Self {
        self.head = Some(head);
        self
    }

    pub fn with_body(mut self, body: C) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }

    /// Sets a single prop, creating the props bag if needed
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.props
            .get_or_insert_with(Props::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl<C: Clone> RouteConfig<C> {
    /// Field-by-field merge: own value if present, otherwise the default's
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_registry::RouteConfig;
    ///
    /// let defaults = RouteConfig::new().with_head("DefaultHead").with_title("Site");
    /// let route = RouteConfig::new().with_path("/about").with_body("About").with_title("About");
    ///
    /// let merged = route.merged_with(&defaults);
    /// assert_eq!(merged.head, Some("DefaultHead"));
    /// assert_eq!(merged.title.as_deref(), Some("About"));
    /// ```
    pub fn merged_with(&self, defaults: &Self) -> Self {
        Self {
            path: self.path.clone().or_else(|| defaults.path.clone()),
            head: self.head.clone().or_else(|| defaults.head.clone()),
            body: self.body.clone().or_else(|| defaults.body.clone()),
            props: self.props.clone().or_else(|| defaults.props.clone()),
            action: self.action.clone().or_else(|| defaults.action.clone()),
            title: self.title.clone().or_else(|| defaults.title.clone()),
        }
    }
}

/// Everything a [`Registry`](crate::Registry) is constructed from
///
/// Loadable from TOML:
///
/// ```toml
/// case_insensitive = false
///
/// [defaults]
/// head = "DefaultHead"
/// title = "My Site"
///
/// [routes.home]
/// path = "/"
/// body = "Home"
///
/// [routes.profile]
/// path = "/users/:id"
/// body = "Profile"
/// action = "load_user"
///
/// [errors.NotFound]
/// body = "NotFoundPage"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "C: Deserialize<'de>"))]
pub struct RegistryOptions<C> {
    /// Named routes
    #[serde(default = "BTreeMap::new")]
    pub routes: BTreeMap<String, RouteConfig<C>>,

    /// Fallback for every field a route leaves out
    #[serde(default)]
    pub defaults: RouteConfig<C>,

    /// Error routes keyed by status code (`"404"`) or name (`"NotFound"`)
    #[serde(default = "BTreeMap::new")]
    pub errors: BTreeMap<String, RouteConfig<C>>,

    /// Whether static path segments match regardless of ASCII case
    #[serde(default)]
    pub case_insensitive: bool,
}

impl<C> Default for RegistryOptions<C> {
    fn default() -> Self {
        Self {
            routes: BTreeMap::new(),
            defaults: RouteConfig::default(),
            errors: BTreeMap::new(),
            case_insensitive: false,
        }
    }
}

impl<C> RegistryOptions<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, name: impl Into<String>, route: RouteConfig<C>) -> Self {
        self.routes.insert(name.into(), route);
        self
    }

    pub fn with_defaults(mut self, defaults: RouteConfig<C>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_error(mut self, key: impl Into<String>, route: RouteConfig<C>) -> Self {
        self.errors.insert(key.into(), route);
        self
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }
}

impl<C: DeserializeOwned> RegistryOptions<C> {
    /// Load options from a TOML file
    ///
    /// A missing or blank file yields empty options.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read routes file: {:?}", path))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse routes file: {:?}", path))
    }

    /// Parse options from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_prefers_own_fields() {
        let defaults = RouteConfig::new()
            .with_path("/fallback")
            .with_body("DefaultBody".to_string())
            .with_action("noop");
        let route = RouteConfig::new()
            .with_path("/about")
            .with_body("About".to_string());

        let merged = route.merged_with(&defaults);
        assert_eq!(merged.path.as_deref(), Some("/about"));
        assert_eq!(merged.body.as_deref(), Some("About"));
        assert_eq!(merged.action.as_deref(), Some("noop"));
        assert_eq!(merged.props, None);
    }

    #[test]
    fn test_with_prop_builds_bag() {
        let route: RouteConfig<String> = RouteConfig::new()
            .with_prop("section", "news")
            .with_prop("limit", 10);

        let props = route.props.unwrap();
        assert_eq!(props.get("section"), Some(&json!("news")));
        assert_eq!(props.get("limit"), Some(&json!(10)));
    }

    #[test]
    fn test_empty_toml() {
        let options = RegistryOptions::<String>::from_toml("").unwrap();
        assert!(options.routes.is_empty());
        assert!(!options.case_insensitive);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            case_insensitive = true

            [defaults]
            head = "DefaultHead"

            [routes.profile]
            path = "/users/:id"
            body = "Profile"
            action = "load_user"

            [routes.profile.props]
            tab = "overview"

            [errors.NotFound]
            body = "Missing"
        "#;

        let options = RegistryOptions::<String>::from_toml(toml).unwrap();
        assert!(options.case_insensitive);
        assert_eq!(options.defaults.head.as_deref(), Some("DefaultHead"));

        let profile = &options.routes["profile"];
        assert_eq!(profile.path.as_deref(), Some("/users/:id"));
        assert_eq!(profile.action.as_deref(), Some("load_user"));
        assert_eq!(
            profile.props.as_ref().and_then(|p| p.get("tab")),
            Some(&json!("overview"))
        );
        assert_eq!(options.errors["NotFound"].body.as_deref(), Some("Missing"));
    }

    #[test]
    fn test_unknown_route_field_is_rejected() {
        let toml = r#"
            [routes.home]
            path = "/"
            bdy = "Home"
        "#;
        assert!(RegistryOptions::<String>::from_toml(toml).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let options = RegistryOptions::<String>::load("does/not/exist/routes.toml").unwrap();
        assert!(options.routes.is_empty());
    }
}
