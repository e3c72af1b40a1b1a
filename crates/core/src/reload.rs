//! Hot reload of loaded resources.
//!
//! A reload re-reads the bytes behind an already-loaded resource and asks
//! the type's handler to rebuild the live object in place. Object identity
//! is preserved: references handed out by earlier `get` calls stay valid
//! and observe the new contents. Subscribers hear about successful reloads
//! in registration order; failures leave the prior object untouched and
//! notify nobody.

use std::rc::Rc;

use restock_api::{CreateError, Descriptor, ReloadError, ReloadSubscriber};
use tracing::warn;

use crate::canon::{canonical_path, path_hash};
use crate::factory::Factory;
use crate::loader;

/// Maximum number of reload subscribers per factory.
pub const MAX_RELOAD_SUBSCRIBERS: usize = 16;

impl Factory {
    /// Re-read `name` and rebuild its live object in place.
    pub fn reload(&mut self, name: &str) -> std::result::Result<Descriptor, ReloadError> {
        // A name whose canonical path cannot even be formed was never
        // loaded.
        let Ok(cpath) = canonical_path(&self.base_path, name) else {
            return Err(ReloadError::NotFound);
        };
        let hash = path_hash(&cpath);

        let Some(entry) = self.cache.get(hash) else {
            return Err(ReloadError::NotFound);
        };
        let handle = entry.resource_type;
        let object = entry.object.clone();
        let ref_count = entry.ref_count;

        if !self.types.record(handle).handler.supports_recreate() {
            let extension = self.types.extension(handle).unwrap_or_default().to_string();
            return Err(ReloadError::NotSupported(extension));
        }

        if let Err(err) = loader::fill(
            &mut self.stream,
            self.builtins.as_ref(),
            &self.backend,
            &cpath,
            name,
        ) {
            return Err(ReloadError::Load(err));
        }

        let record = self.types.record(handle);
        match record.handler.recreate(&object, self.stream.bytes(), name) {
            Ok(()) => {
                let descriptor = Descriptor {
                    name_hash: hash,
                    ref_count,
                    object,
                    resource_type: handle,
                };
                // Fan out against a snapshot of the subscriber list.
                let snapshot: Vec<ReloadSubscriber> =
                    self.subscribers.iter().flatten().cloned().collect();
                for subscriber in snapshot {
                    subscriber(&descriptor, name);
                }
                Ok(descriptor)
            }
            Err(CreateError::OutOfMemory) => Err(ReloadError::OutOfMemory),
            Err(CreateError::Format) => Err(ReloadError::Format),
            Err(CreateError::Constant) => Err(ReloadError::Constant),
            Err(CreateError::Unknown) => Err(ReloadError::Unknown),
        }
    }

    /// Register `subscriber` for successful-reload notifications.
    ///
    /// Without reload support this is a no-op. Beyond
    /// [`MAX_RELOAD_SUBSCRIBERS`] registrations the subscriber is dropped
    /// with a warning.
    pub fn register_reload_subscriber(&mut self, subscriber: ReloadSubscriber) {
        let Some(subscribers) = self.subscribers.as_mut() else {
            return;
        };
        if subscribers.len() == MAX_RELOAD_SUBSCRIBERS {
            warn!(
                "reload subscriber dropped: capacity of {MAX_RELOAD_SUBSCRIBERS} callbacks reached"
            );
            return;
        }
        subscribers.push(subscriber);
    }

    /// Remove every registration of `subscriber`, keeping the remaining
    /// ones in registration order.
    pub fn unregister_reload_subscriber(&mut self, subscriber: &ReloadSubscriber) {
        if let Some(subscribers) = self.subscribers.as_mut() {
            subscribers.retain(|registered| !Rc::ptr_eq(registered, subscriber));
        }
    }
}
