//! The deduplicating resource cache.
//!
//! Owns the primary index (canonical-path hash to entry), the secondary
//! index (live-object identity back to the hash) and the optional filename
//! index used for reload, and keeps all of them in step: every mutation
//! goes through [`ResourceCache::insert`] or [`ResourceCache::remove`].
//! An entry present in one index but not the others is a bug, checked with
//! assertions rather than surfaced as an error.

use std::collections::HashMap;
use std::rc::Rc;

use restock_api::{Descriptor, Object, TypeHandle};

/// Identity of a live object: the `Rc` allocation it is shared through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ObjectId(usize);

impl ObjectId {
    pub(crate) fn of(object: &Object) -> Self {
        Self(Rc::as_ptr(object) as *const () as usize)
    }
}

pub(crate) struct Entry {
    pub(crate) object: Object,
    pub(crate) ref_count: u32,
    pub(crate) resource_type: TypeHandle,
}

impl Entry {
    pub(crate) fn descriptor(&self, name_hash: u64) -> Descriptor {
        Descriptor {
            name_hash,
            ref_count: self.ref_count,
            object: self.object.clone(),
            resource_type: self.resource_type,
        }
    }
}

pub(crate) struct ResourceCache {
    by_hash: HashMap<u64, Entry>,
    by_object: HashMap<ObjectId, u64>,
    /// Present iff reload support is enabled; reload requests and the
    /// status page identify resources by name, not hash.
    filenames: Option<HashMap<u64, String>>,
}

impl ResourceCache {
    pub(crate) fn new(max_resources: usize, track_filenames: bool) -> Self {
        Self {
            by_hash: HashMap::with_capacity(max_resources),
            by_object: HashMap::with_capacity(max_resources),
            filenames: track_filenames.then(|| HashMap::with_capacity(max_resources)),
        }
    }

    pub(crate) fn get(&self, hash: u64) -> Option<&Entry> {
        self.by_hash.get(&hash)
    }

    pub(crate) fn get_mut(&mut self, hash: u64) -> Option<&mut Entry> {
        self.by_hash.get_mut(&hash)
    }

    pub(crate) fn hash_of(&self, id: ObjectId) -> Option<u64> {
        self.by_object.get(&id).copied()
    }

    /// Record a fresh entry in every index. The hash must be new; `get`
    /// always looks up before inserting.
    pub(crate) fn insert(&mut self, hash: u64, entry: Entry, canonical_path: &str) {
        let prior = self.by_object.insert(ObjectId::of(&entry.object), hash);
        debug_assert!(prior.is_none(), "live object registered under two paths");
        let prior = self.by_hash.insert(hash, entry);
        debug_assert!(prior.is_none(), "duplicate canonical path hash inserted");
        if let Some(filenames) = &mut self.filenames {
            filenames.insert(hash, canonical_path.to_string());
        }
    }

    /// Remove an entry from every index and hand it back.
    pub(crate) fn remove(&mut self, hash: u64) -> Entry {
        let entry = self
            .by_hash
            .remove(&hash)
            .expect("entry missing from primary index");
        let back = self.by_object.remove(&ObjectId::of(&entry.object));
        debug_assert_eq!(back, Some(hash), "secondary index out of step");
        if let Some(filenames) = &mut self.filenames {
            let name = filenames.remove(&hash);
            debug_assert!(name.is_some(), "filename index out of step");
        }
        entry
    }

    /// Tracked filenames with their entries, in map order.
    pub(crate) fn iter_filenames(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.filenames.iter().flatten().map(|(hash, name)| {
            let entry = self
                .by_hash
                .get(hash)
                .expect("tracked filename without entry");
            (name.as_str(), entry)
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        Entry {
            object: Rc::new(42u32),
            ref_count: 1,
            resource_type: TypeHandle::from_index(0),
        }
    }

    #[test]
    fn test_insert_links_all_indexes() {
        let mut cache = ResourceCache::new(16, true);
        let e = entry();
        let id = ObjectId::of(&e.object);
        cache.insert(7, e, "/data/a.txt");

        assert_eq!(cache.hash_of(id), Some(7));
        assert!(cache.get(7).is_some());
        let names: Vec<_> = cache.iter_filenames().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, vec!["/data/a.txt".to_string()]);
    }

    #[test]
    fn test_remove_unlinks_all_indexes() {
        let mut cache = ResourceCache::new(16, true);
        let e = entry();
        let id = ObjectId::of(&e.object);
        cache.insert(7, e, "/data/a.txt");

        let removed = cache.remove(7);
        assert_eq!(ObjectId::of(&removed.object), id);
        assert!(cache.is_empty());
        assert_eq!(cache.hash_of(id), None);
        assert_eq!(cache.iter_filenames().count(), 0);
    }

    #[test]
    fn test_filename_index_disabled() {
        let mut cache = ResourceCache::new(16, false);
        cache.insert(7, entry(), "/data/a.txt");
        assert_eq!(cache.iter_filenames().count(), 0);
        cache.remove(7);
    }
}
