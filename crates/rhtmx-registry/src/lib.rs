//! # RHTMX Route Registry
//!
//! A named-route registry that sits between a request and the renderer:
//! - Resolves a location (`/users/42?tab=posts`) to a [`RouteDescriptor`]
//! - Builds URLs back from a route name and parameters
//! - Maps HTTP-like status codes (`404`, `"NotFound"`) to error routes
//!
//! Every route is merged with a set of defaults when it is registered, so a
//! descriptor always comes back fully populated.
//!
//! ## Path Templates
//!
//! - Static segments (`/about`)
//! - Required parameters (`/users/:id`)
//! - Optional parameters (`/posts/:id?`)
//! - Catch-all segments (`/docs/*slug`, `/docs/*slug?`)
//!
//! ## Example
//!
//! ```
//! use rhtmx_registry::{Registry, RegistryOptions, RouteConfig};
//!
//! let mut registry: Registry<&'static str> = Registry::new(
//!     RegistryOptions::new().with_route("home", RouteConfig::new().with_path("/").with_body("Home")),
//! )
//! .unwrap();
//!
//! registry
//!     .add_route("profile", RouteConfig::new().with_path("/users/:id").with_body("Profile"))
//!     .unwrap();
//!
//! let route = registry.get_route("/users/42?tab=posts").unwrap();
//! assert_eq!(route.name.as_deref(), Some("profile"));
//! assert_eq!(route.params.get("id").map(String::as_str), Some("42"));
//! assert_eq!(route.params.get("tab").map(String::as_str), Some("posts"));
//!
//! let params = [("id", "42"), ("tab", "posts")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//! assert_eq!(
//!     registry.get_route_url("profile", Some(&params)),
//!     Some("/users/42?tab=posts".to_string())
//! );
//! ```

use std::collections::BTreeMap;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod compiled;
pub mod component;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod location;
pub mod pattern;
pub mod registry;
pub mod status;

pub use compiled::{merge_with_defaults, CompiledRoute, Method};
pub use component::Renderable;
pub use config::{RegistryOptions, RouteConfig};
pub use descriptor::RouteDescriptor;
pub use error::{RegistryError, Result};
pub use location::{format_location, Location};
pub use pattern::{PathPattern, Segment};
pub use registry::Registry;
pub use status::ErrorKey;

// ============================================================================
// Shared Aliases
// ============================================================================

/// Route parameters: path placeholders and query-string values, by name.
///
/// Ordered so that generated query strings are stable.
pub type Params = BTreeMap<String, String>;

/// Static data bag attached to a route
pub type Props = serde_json::Map<String, serde_json::Value>;
