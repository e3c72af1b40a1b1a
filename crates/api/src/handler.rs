//! The handler seam between the factory and concrete resource types.

use std::any::Any;
use std::rc::Rc;

use crate::descriptor::Descriptor;
use crate::error::CreateError;

/// A live resource object.
///
/// The factory never looks inside; it only tracks identity (the `Rc`
/// pointer) and hands clones back to callers. Handlers downcast to their
/// concrete type and use interior mutability where reload is supported.
pub type Object = Rc<dyn Any>;

/// Callback invoked after a successful reload with the refreshed
/// descriptor and the resource name as passed to `reload`.
///
/// Closures capture their own state, so the traditional
/// (function, user data) pair collapses into one value; unregistration
/// matches on `Rc` identity.
pub type ReloadSubscriber = Rc<dyn Fn(&Descriptor, &str)>;

/// Converts loaded bytes into live objects for one file extension.
///
/// The factory is single-threaded: handler calls never overlap, and a
/// handler must not call back into the factory that invoked it. The
/// implementor owns whatever context it needs; the factory only borrows
/// the boxed handler for the factory's lifetime.
pub trait ResourceHandler {
    /// Parse `bytes` into a fresh live object. `name` is the resource name
    /// exactly as passed to `get`.
    fn create(&self, bytes: &[u8], name: &str) -> Result<Object, CreateError>;

    /// Tear down a live object whose reference count reached zero.
    fn destroy(&self, object: &Object);

    /// Whether [`ResourceHandler::recreate`] is implemented. Returning
    /// `false` disables reload for the extension.
    fn supports_recreate(&self) -> bool {
        false
    }

    /// Re-parse `bytes` into `object` in place, preserving its identity so
    /// references handed out by earlier `get` calls observe the new
    /// contents. Only invoked when `supports_recreate` returns `true`.
    fn recreate(&self, object: &Object, bytes: &[u8], name: &str) -> Result<(), CreateError> {
        let _ = (object, bytes, name);
        Err(CreateError::Unknown)
    }
}
