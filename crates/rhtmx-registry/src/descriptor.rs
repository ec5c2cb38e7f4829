// File: src/descriptor.rs
// Purpose: The normalized result of every resolution

use crate::compiled::CompiledRoute;
use crate::config::RouteConfig;
use crate::status::ErrorKey;
use crate::{Params, Props};
use serde::Serialize;

/// Status of a successfully resolved route
pub const OK_STATUS: u16 = 200;

/// What the renderer receives for a resolved location or an error code.
///
/// Always fully populated: `params` and `props` are empty rather than absent.
/// `body` is only `None` for an error code with no error route registered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "C: Serialize"))]
pub struct RouteDescriptor<C> {
    pub status: u16,
    pub error: Option<String>,
    pub name: Option<String>,
    /// Path parameters merged over query parameters
    pub params: Params,
    pub action: Option<String>,
    pub head: Option<C>,
    pub body: Option<C>,
    pub props: Props,
    pub title: Option<String>,
}

impl<C: Clone> RouteDescriptor<C> {
    /// Descriptor for a matched route
    pub fn matched(route: &CompiledRoute<C>, params: Params) -> Self {
        Self {
            status: OK_STATUS,
            error: None,
            name: Some(route.name.clone()),
            params,
            action: route.action.clone(),
            head: route.head.clone(),
            body: Some(route.body.clone()),
            props: route.props.clone(),
            title: route.title.clone(),
        }
    }

    /// Descriptor for an error code
    ///
    /// `route` is the registered error route already merged with the
    /// defaults, or `None` when nothing is registered for the key.
    pub fn error(
        key: &ErrorKey,
        message: Option<String>,
        route: Option<(String, RouteConfig<C>)>,
    ) -> Self {
        let error = message.or_else(|| key.name().map(str::to_string));

        match route {
            Some((name, route)) => Self {
                status: key.status(),
                error,
                name: Some(name),
                params: Params::new(),
                action: route.action,
                head: route.head,
                body: route.body,
                props: route.props.unwrap_or_default(),
                title: route.title,
            },
            None => Self {
                status: key.status(),
                error,
                name: None,
                params: Params::new(),
                action: None,
                head: None,
                body: None,
                props: Props::new(),
                title: None,
            },
        }
    }
}

impl<C> RouteDescriptor<C> {
    /// Whether there is something to render
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.status >= 400 || self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiled::merge_with_defaults;
    use serde_json::json;

    #[test]
    fn test_matched_descriptor() {
        let route = merge_with_defaults(
            "profile",
            &RouteConfig::new()
                .with_path("/users/:id")
                .with_body("Profile")
                .with_action("load_user"),
            &RouteConfig::new(),
        )
        .unwrap();

        let mut params = Params::new();
        params.insert("id".to_string(), "7".to_string());

        let descriptor = RouteDescriptor::matched(&route, params);
        assert_eq!(descriptor.status, 200);
        assert_eq!(descriptor.error, None);
        assert_eq!(descriptor.name.as_deref(), Some("profile"));
        assert_eq!(descriptor.body, Some("Profile"));
        assert_eq!(descriptor.action.as_deref(), Some("load_user"));
        assert!(!descriptor.is_error());
    }

    #[test]
    fn test_unconfigured_error_descriptor() {
        let descriptor: RouteDescriptor<String> =
            RouteDescriptor::error(&ErrorKey::from(503), None, None);

        assert_eq!(descriptor.status, 503);
        assert_eq!(descriptor.error.as_deref(), Some("ServiceUnavailable"));
        assert_eq!(descriptor.name, None);
        assert!(!descriptor.has_body());
        assert!(descriptor.is_error());
    }

    #[test]
    fn test_error_message_overrides_name() {
        let descriptor: RouteDescriptor<String> =
            RouteDescriptor::error(&ErrorKey::from(404), Some("No such user".to_string()), None);
        assert_eq!(descriptor.error.as_deref(), Some("No such user"));
    }

    #[test]
    fn test_serializes_for_hydration() {
        let descriptor: RouteDescriptor<String> =
            RouteDescriptor::error(&ErrorKey::from("NotFound"), None, None);

        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["status"], json!(404));
        assert_eq!(value["error"], json!("NotFound"));
        assert_eq!(value["body"], json!(null));
        assert_eq!(value["props"], json!({}));
    }
}
