//! Canonical resource paths.
//!
//! A resource's cache identity is the 64-bit hash of its canonical path:
//! the factory base path and the relative name joined with a single
//! separator, with runs of consecutive separators collapsed. Nothing else
//! is normalized; `..`, symlinks, and case are left alone so that cache
//! hits never touch the filesystem.

use restock_api::{FactoryError, Result};
use xxhash_rust::xxh3::xxh3_64;

/// Maximum canonical path length in bytes, including the reserved
/// terminator byte.
pub const RESOURCE_PATH_MAX: usize = 1024;

/// Join `base` and `name` with one separator and collapse separator runs.
pub fn canonical_path(base: &str, name: &str) -> Result<String> {
    let mut path = String::with_capacity(base.len() + name.len() + 1);
    let mut last = '\0';
    for c in base.chars().chain(std::iter::once('/')).chain(name.chars()) {
        if c != '/' || last != '/' {
            path.push(c);
        }
        last = c;
    }
    if path.len() + 1 > RESOURCE_PATH_MAX {
        return Err(FactoryError::PathTooLong(path.len()));
    }
    Ok(path)
}

/// Cache key for a canonical path.
pub fn path_hash(canonical: &str) -> u64 {
    xxh3_64(canonical.as_bytes())
}

/// File extension of a resource name: the characters after the last dot.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}
