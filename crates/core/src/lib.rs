//! The restock resource factory: a reference-counted, hash-keyed cache of
//! typed live objects loaded from a builtins archive, an HTTP origin, or
//! the local filesystem, with cooperative hot reload over an embedded
//! control server.

pub mod canon;
pub mod factory;
pub mod logging;
pub mod registry;
pub mod reload;

mod cache;
mod control;
mod loader;

pub use factory::{Factory, FactoryParams, DEFAULT_CONTROL_PORT};
pub use logging::init_logging;
