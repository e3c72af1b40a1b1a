//! Resource type registry.
//!
//! Maps file extensions to their handlers. The registry is small and only
//! consulted on cache misses, so lookups are a linear scan. Records are
//! never removed while the factory lives, which is what makes the index
//! a stable [`TypeHandle`].

use restock_api::{FactoryError, ResourceHandler, Result, TypeHandle};

/// Maximum number of resource types per factory.
pub const MAX_RESOURCE_TYPES: usize = 128;

pub(crate) struct TypeRecord {
    pub(crate) extension: String,
    pub(crate) handler: Box<dyn ResourceHandler>,
}

#[derive(Default)]
pub(crate) struct TypeRegistry {
    records: Vec<TypeRecord>,
}

impl TypeRegistry {
    pub(crate) fn register(
        &mut self,
        extension: &str,
        handler: Box<dyn ResourceHandler>,
    ) -> Result<TypeHandle> {
        if self.records.len() == MAX_RESOURCE_TYPES {
            return Err(FactoryError::OutOfResources(MAX_RESOURCE_TYPES));
        }
        // Extensions are registered without the dot.
        if extension.contains('.') {
            return Err(FactoryError::Invalid(format!(
                "extension '{extension}' must not contain a dot"
            )));
        }
        if self.find(extension).is_some() {
            return Err(FactoryError::AlreadyRegistered(extension.to_string()));
        }

        let handle = TypeHandle::from_index(self.records.len());
        self.records.push(TypeRecord {
            extension: extension.to_string(),
            handler,
        });
        Ok(handle)
    }

    pub(crate) fn find(&self, extension: &str) -> Option<TypeHandle> {
        self.records
            .iter()
            .position(|record| record.extension == extension)
            .map(TypeHandle::from_index)
    }

    pub(crate) fn record(&self, handle: TypeHandle) -> &TypeRecord {
        &self.records[handle.index()]
    }

    pub(crate) fn extension(&self, handle: TypeHandle) -> Option<&str> {
        self.records
            .get(handle.index())
            .map(|record| record.extension.as_str())
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}
