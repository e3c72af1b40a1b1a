//! Handlers registered by the CLI: raw byte blobs with reload support.

use std::cell::RefCell;
use std::rc::Rc;

use restock_api::{CreateError, Object, ResourceHandler};

/// A loaded blob. Reload swaps the bytes behind the `RefCell`, so every
/// outstanding reference observes the new contents.
pub struct RawBlob {
    pub bytes: RefCell<Vec<u8>>,
}

/// Stores resource bytes verbatim, whatever the extension.
pub struct RawHandler;

impl ResourceHandler for RawHandler {
    fn create(&self, bytes: &[u8], _name: &str) -> Result<Object, CreateError> {
        Ok(Rc::new(RawBlob {
            bytes: RefCell::new(bytes.to_vec()),
        }))
    }

    fn destroy(&self, _object: &Object) {}

    fn supports_recreate(&self) -> bool {
        true
    }

    fn recreate(&self, object: &Object, bytes: &[u8], _name: &str) -> Result<(), CreateError> {
        let blob = object.downcast_ref::<RawBlob>().ok_or(CreateError::Unknown)?;
        *blob.bytes.borrow_mut() = bytes.to_vec();
        Ok(())
    }
}
