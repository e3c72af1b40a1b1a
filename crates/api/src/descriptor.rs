use std::fmt;

use crate::handler::Object;

/// Opaque, stable identifier for a registered resource type.
///
/// Handles are only meaningful to the factory that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandle(u32);

impl TypeHandle {
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Point-in-time snapshot of a tracked resource.
#[derive(Clone)]
pub struct Descriptor {
    /// Hash of the canonical path; the resource's stable identity.
    pub name_hash: u64,
    /// Outstanding successful `get` calls minus `release` calls.
    pub ref_count: u32,
    /// The live object produced by the type's handler.
    pub object: Object,
    /// The type that created (and tears down) the object.
    pub resource_type: TypeHandle,
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name_hash", &format_args!("{:016x}", self.name_hash))
            .field("ref_count", &self.ref_count)
            .field("resource_type", &self.resource_type)
            .finish_non_exhaustive()
    }
}
