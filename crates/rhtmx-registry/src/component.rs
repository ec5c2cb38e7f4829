// File: src/component.rs
// Purpose: Opaque handles for the components a route renders

use std::fmt::Debug;
use std::sync::Arc;

/// Anything the rendering layer knows how to render.
///
/// The registry stores `head` and `body` handles and hands them back inside
/// descriptors. It never calls them; the only question it asks is whether a
/// handle is usable as a body at all.
///
/// # Examples
///
/// ```
/// use rhtmx_registry::Renderable;
///
/// assert!("UserProfile".is_renderable());
/// assert!(!"".is_renderable());
/// ```
pub trait Renderable: Clone + Debug {
    fn is_renderable(&self) -> bool {
        true
    }
}

impl Renderable for String {
    fn is_renderable(&self) -> bool {
        !self.is_empty()
    }
}

impl Renderable for &'static str {
    fn is_renderable(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Debug + Send + Sync + ?Sized> Renderable for Arc<T> {}
