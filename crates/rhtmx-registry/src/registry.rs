// File: src/registry.rs
// Purpose: Named route registry - resolve locations, build URLs, map error codes

use crate::compiled::{merge_with_defaults, CompiledRoute};
use crate::component::Renderable;
use crate::config::{RegistryOptions, RouteConfig};
use crate::descriptor::RouteDescriptor;
use crate::error::Result;
use crate::location::{format_location, Location};
use crate::status::ErrorKey;
use crate::Params;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Owns the route configuration and the table compiled from it.
///
/// The compiled table is derived state: it is rebuilt in full whenever a
/// route is added. Registration needs `&mut self`, so reads and writes are
/// serialized by the borrow checker.
///
/// # Examples
///
/// ```
/// use rhtmx_registry::{Registry, RegistryOptions, RouteConfig};
///
/// let mut registry: Registry<String> = Registry::new(RegistryOptions::new()).unwrap();
/// registry
///     .add_route("home", RouteConfig::new().with_path("/").with_body("Home".to_string()))
///     .unwrap()
///     .add_error_route("NotFound", RouteConfig::new().with_body("Missing".to_string()));
///
/// assert!(registry.get_route("/").is_some());
/// assert!(registry.get_route("/nowhere").is_none());
///
/// let not_found = registry.get_error_route(404, None);
/// assert_eq!(not_found.body.as_deref(), Some("Missing"));
/// ```
#[derive(Debug, Clone)]
pub struct Registry<C> {
    /// Routes as authored, in registration order
    routes: Vec<(String, RouteConfig<C>)>,
    defaults: RouteConfig<C>,
    /// Error routes by normalized key (`"404"`, or an unknown custom name)
    errors: HashMap<String, RouteConfig<C>>,
    /// Compiled routes, sorted by matching priority
    table: Vec<CompiledRoute<C>>,
    /// Route name -> index into `table`
    by_name: HashMap<String, usize>,
    case_insensitive: bool,
}

impl<C: Renderable> Registry<C> {
    /// Builds a registry and compiles its route table
    ///
    /// Fails if any route, once merged with the defaults, has no renderable
    /// body or an unparseable path template.
    pub fn new(options: RegistryOptions<C>) -> Result<Self> {
        let RegistryOptions {
            routes,
            defaults,
            errors,
            case_insensitive,
        } = options;

        let mut registry = Self {
            routes: routes.into_iter().collect(),
            defaults,
            errors: HashMap::new(),
            table: Vec::new(),
            by_name: HashMap::new(),
            case_insensitive,
        };

        for (key, route) in errors {
            registry.add_error_route(key, route);
        }

        let (table, by_name) = compile_table(&registry.routes, &registry.defaults)?;
        registry.table = table;
        registry.by_name = by_name;

        Ok(registry)
    }

    /// Loads options from a TOML file and builds the registry
    pub fn from_config_file(path: impl AsRef<Path>) -> anyhow::Result<Self>
    where
        C: DeserializeOwned,
    {
        let options = RegistryOptions::load(path)?;
        Ok(Self::new(options)?)
    }

    /// Adds or replaces a named route and recompiles the table
    ///
    /// The table is only replaced if the whole route set compiles; on error
    /// the registry is left unchanged.
    pub fn add_route(&mut self, name: impl Into<String>, route: RouteConfig<C>) -> Result<&mut Self> {
        let name = name.into();

        let mut routes = self.routes.clone();
        match routes.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = route,
            None => routes.push((name, route)),
        }

        let (table, by_name) = compile_table(&routes, &self.defaults)?;
        self.routes = routes;
        self.table = table;
        self.by_name = by_name;

        Ok(self)
    }

    /// Registers an error route under a status code or symbolic name
    ///
    /// `404`, `"404"` and `"NotFound"` all address the same route. Names
    /// outside the fixed status table are stored as-is.
    pub fn add_error_route(&mut self, key: impl Into<ErrorKey>, route: RouteConfig<C>) -> &mut Self {
        let key = key.into();
        if let ErrorKey::Name(name) = key.clone().normalize() {
            warn!(key = %name, "error route registered under an unrecognized status name");
        }

        self.errors.insert(key.storage_key(), route);
        self
    }

    /// Whether two locations point at the same host
    ///
    /// A location without a host (a relative path) is always same-domain.
    pub fn is_same_domain(&self, one: &str, two: &str) -> bool {
        match (Location::parse(one).host, Location::parse(two).host) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// The path component of a location (no host, query or fragment)
    pub fn get_path(&self, location: &str) -> String {
        Location::parse(location).pathname
    }

    /// Resolves a location to a route descriptor
    ///
    /// Query parameters are merged into the descriptor's params; a path
    /// parameter wins over a query parameter of the same name. Returns
    /// `None` when no route matches.
    pub fn get_route(&self, location: &str) -> Option<RouteDescriptor<C>> {
        let Location {
            pathname, query, ..
        } = Location::parse(location);

        let found = self.table.iter().find_map(|route| {
            route
                .pattern
                .as_ref()?
                .matches(&pathname, self.case_insensitive)
                .map(|params| (route, params))
        });

        match found {
            Some((route, path_params)) => {
                debug!(route = %route.name, path = %pathname, "resolved location");
                let mut params = query;
                params.extend(path_params);
                Some(RouteDescriptor::matched(route, params))
            }
            None => {
                debug!(path = %pathname, "no route matches location");
                None
            }
        }
    }

    /// Builds the descriptor for an error code
    ///
    /// Accepts a code (`404`, `"404"`) or a name (`"NotFound"`). `error` is
    /// `message` if given, otherwise the code's symbolic name. When no error
    /// route is registered the descriptor has no name and no body.
    pub fn get_error_route(&self, key: impl Into<ErrorKey>, message: Option<&str>) -> RouteDescriptor<C> {
        let key = key.into();
        let storage_key = key.storage_key();

        let route = self
            .errors
            .get(&storage_key)
            .map(|route| (storage_key.clone(), route.merged_with(&self.defaults)));

        if route.is_none() {
            debug!(key = %storage_key, "no error route registered");
        }

        RouteDescriptor::error(&key, message.map(str::to_string), route)
    }

    /// Builds a URL for a named route
    ///
    /// - Unknown name (or a route without a path): `None`
    /// - No params: the raw path template, unsubstituted
    /// - Otherwise placeholders are filled from `params` and every other key
    ///   goes into the query string. `None` if a required placeholder is
    ///   missing or its value cannot stand as a path segment (`""`, `.`,
    ///   `..`).
    pub fn get_route_url(&self, name: &str, params: Option<&Params>) -> Option<String> {
        let pattern = self.route(name)?.pattern.as_ref()?;

        let Some(params) = params else {
            return Some(pattern.source().to_string());
        };

        let Some(path) = pattern.substitute(params) else {
            warn!(route = %name, keys = ?pattern.keys(), "cannot fill path parameters for route URL");
            return None;
        };

        let query: Params = params
            .iter()
            .filter(|(key, _)| !pattern.has_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let url = format_location(&path, &query);
        debug!(route = %name, url = %url, "built route URL");
        Some(url)
    }

    /// Compiled route by name
    pub fn route(&self, name: &str) -> Option<&CompiledRoute<C>> {
        self.by_name.get(name).map(|&index| &self.table[index])
    }

    /// Compiled routes in matching order
    pub fn routes(&self) -> &[CompiledRoute<C>] {
        &self.table
    }

    /// Route names in registration order
    pub fn route_names(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(name, _)| name.as_str())
    }

    /// Registered error route for a code or name, as authored
    pub fn error_route(&self, key: impl Into<ErrorKey>) -> Option<&RouteConfig<C>> {
        self.errors.get(&key.into().storage_key())
    }

    pub fn defaults(&self) -> &RouteConfig<C> {
        &self.defaults
    }
}

/// Merges every route with the defaults and orders the result for matching
///
/// Ties in priority keep registration order.
fn compile_table<C: Renderable>(
    routes: &[(String, RouteConfig<C>)],
    defaults: &RouteConfig<C>,
) -> Result<(Vec<CompiledRoute<C>>, HashMap<String, usize>)> {
    let mut table = routes
        .iter()
        .map(|(name, route)| merge_with_defaults(name, route, defaults))
        .collect::<Result<Vec<_>>>()?;

    table.sort_by_key(CompiledRoute::priority);

    let by_name = table
        .iter()
        .enumerate()
        .map(|(index, route)| (route.name.clone(), index))
        .collect();

    debug!(routes = table.len(), "compiled route table");
    Ok((table, by_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegistryError;

    fn registry() -> Registry<&'static str> {
        Registry::new(
            RegistryOptions::new()
                .with_route("home", RouteConfig::new().with_path("/").with_body("Home"))
                .with_route(
                    "user",
                    RouteConfig::new().with_path("/users/:id").with_body("User"),
                )
                .with_route(
                    "new_user",
                    RouteConfig::new().with_path("/users/new").with_body("NewUser"),
                ),
        )
        .unwrap()
    }

    #[test]
    fn test_static_route_wins_over_dynamic() {
        let registry = registry();
        let route = registry.get_route("/users/new").unwrap();
        assert_eq!(route.name.as_deref(), Some("new_user"));

        let route = registry.get_route("/users/9").unwrap();
        assert_eq!(route.name.as_deref(), Some("user"));
    }

    #[test]
    fn test_failed_add_route_leaves_registry_unchanged() {
        let mut registry = registry();
        let result = registry.add_route("broken", RouteConfig::new().with_path("/broken"));

        assert!(matches!(result, Err(RegistryError::MissingBody { .. })));
        assert!(registry.route("broken").is_none());
        assert_eq!(registry.route_names().count(), 3);
    }

    #[test]
    fn test_add_route_overwrites_in_place() {
        let mut registry = registry();
        registry
            .add_route("home", RouteConfig::new().with_path("/start").with_body("Start"))
            .unwrap();

        assert!(registry.get_route("/").is_none());
        assert_eq!(
            registry.get_route("/start").unwrap().body,
            Some("Start")
        );
        assert_eq!(registry.route_names().count(), 3);
    }

    #[test]
    fn test_pathless_route_never_matches() {
        let mut registry = registry();
        registry
            .add_route("fragment", RouteConfig::new().with_body("Fragment"))
            .unwrap();

        assert!(registry.route("fragment").is_some());
        assert_eq!(registry.get_route_url("fragment", None), None);
        assert_eq!(registry.routes().last().map(|r| r.name.as_str()), Some("fragment"));
    }

    #[test]
    fn test_case_insensitive_option() {
        let registry: Registry<&'static str> = Registry::new(
            RegistryOptions::new()
                .with_case_insensitive(true)
                .with_route("about", RouteConfig::new().with_path("/about").with_body("About")),
        )
        .unwrap();

        assert!(registry.get_route("/ABOUT").is_some());
    }

    #[test]
    fn test_errors_from_options_are_normalized() {
        let registry: Registry<&'static str> = Registry::new(
            RegistryOptions::new().with_error("NotFound", RouteConfig::new().with_body("Missing")),
        )
        .unwrap();

        assert!(registry.error_route("404").is_some());
        assert!(registry.error_route(404).is_some());
        assert!(registry.error_route("NotFound").is_some());
    }
}
