//! Public data model for the restock resource factory.
//!
//! This crate defines everything a resource handler or factory consumer
//! needs to name: the error taxonomies, the per-resource descriptor, the
//! opaque type handle, and the [`ResourceHandler`] trait itself. The
//! factory implementation lives in `restock-core`.

pub mod descriptor;
pub mod error;
pub mod handler;

pub use descriptor::{Descriptor, TypeHandle};
pub use error::{CreateError, FactoryError, ReloadError, Result};
pub use handler::{Object, ReloadSubscriber, ResourceHandler};
