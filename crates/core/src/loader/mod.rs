//! Backend-agnostic resource loading.
//!
//! [`fill`] loads the bytes of one resource into the factory's staging
//! buffer from exactly one backend per call, trying the builtins archive
//! first (by original name), then the remote backend the factory URI
//! selected. Loads are serialized through the single buffer; the exclusive
//! borrow is what enforces one load at a time.

mod archive;
mod file;
mod http;

pub(crate) use archive::BuiltinsArchive;
pub(crate) use http::HttpOrigin;

use restock_api::{FactoryError, Result};
use tracing::{debug, error};

/// Where resources outside the builtins archive come from.
pub(crate) enum Backend {
    File,
    Http(HttpOrigin),
}

/// The staging buffer every load writes into before a handler parses it.
///
/// One byte past the accepted data is always set to zero, so handlers
/// that treat the contents as a C string keep working; the slice handed
/// to handlers excludes it. Capacity is fixed for the factory's lifetime.
pub(crate) struct StreamBuffer {
    data: Box<[u8]>,
    len: usize,
}

impl StreamBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity + 1].into_boxed_slice(),
            len: 0,
        }
    }

    /// Configured capacity. The largest loadable resource is one byte
    /// smaller, leaving room for the terminator.
    pub(crate) fn capacity(&self) -> usize {
        self.data.len() - 1
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Whether `additional` more bytes fit, terminator included.
    pub(crate) fn fits(&self, additional: usize) -> bool {
        self.len + additional < self.capacity()
    }

    pub(crate) fn extend(&mut self, chunk: &[u8]) {
        debug_assert!(self.fits(chunk.len()));
        self.data[self.len..self.len + chunk.len()].copy_from_slice(chunk);
        self.len += chunk.len();
    }

    /// Read exactly `len` bytes from `reader` into the buffer.
    pub(crate) fn fill_from(
        &mut self,
        reader: &mut impl std::io::Read,
        len: usize,
    ) -> std::io::Result<()> {
        debug_assert!(self.len == 0 && self.fits(len));
        reader.read_exact(&mut self.data[..len])?;
        self.len = len;
        Ok(())
    }

    /// Write the terminating zero and return the loaded length.
    pub(crate) fn finish(&mut self) -> usize {
        self.data[self.len] = 0;
        self.len
    }

    /// The loaded bytes, excluding the terminator.
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

/// Fill `buffer` with the bytes of one resource.
///
/// `canonical_path` addresses the remote backends; `original_name` is the
/// name as passed by the caller and is what the builtins archive indexes.
pub(crate) fn fill(
    buffer: &mut StreamBuffer,
    builtins: Option<&BuiltinsArchive>,
    backend: &Backend,
    canonical_path: &str,
    original_name: &str,
) -> Result<usize> {
    buffer.clear();

    if let Some(archive) = builtins {
        if let Some(bytes) = archive.find(original_name) {
            if !buffer.fits(bytes.len()) {
                error!("resource too large for stream buffer: {canonical_path}");
                return Err(FactoryError::BufferTooSmall(canonical_path.to_string()));
            }
            buffer.extend(bytes);
            debug!(path = canonical_path, size = bytes.len(), "loaded from builtins");
            return Ok(buffer.finish());
        }
        // Not packaged; fall through to the remote backend.
    }

    match backend {
        Backend::Http(origin) => http::fetch(origin, canonical_path, buffer),
        Backend::File => file::read(canonical_path, buffer),
    }
}
