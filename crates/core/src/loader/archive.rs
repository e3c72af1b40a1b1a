//! Builtins archive backend.
//!
//! Pre-packaged resources are shipped as an uncompressed tar blob held in
//! memory. The blob is indexed once at wrap time into name to byte-range
//! entries; lookups slice the original buffer without copying. Entries are
//! keyed by original resource name, not canonical path.

use std::collections::HashMap;
use std::io::Cursor;

use restock_api::{FactoryError, Result};

pub(crate) struct BuiltinsArchive {
    data: Vec<u8>,
    index: HashMap<String, (usize, usize)>,
}

impl BuiltinsArchive {
    /// Index `data` as a tar archive. The bytes are retained as-is; entry
    /// contents stay where the archive put them.
    pub(crate) fn wrap(data: Vec<u8>) -> Result<Self> {
        let mut index = HashMap::new();
        {
            let mut archive = tar::Archive::new(Cursor::new(&data[..]));
            for entry in archive.entries().map_err(invalid)? {
                let entry = entry.map_err(invalid)?;
                if !entry.header().entry_type().is_file() {
                    continue;
                }
                let name = entry.path().map_err(invalid)?.to_string_lossy().into_owned();
                let offset = entry.raw_file_position() as usize;
                let size = entry.size() as usize;
                index.insert(name, (offset, size));
            }
        }
        Ok(Self { data, index })
    }

    pub(crate) fn find(&self, name: &str) -> Option<&[u8]> {
        let &(offset, size) = self.index.get(name)?;
        self.data.get(offset..offset + size)
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }
}

fn invalid(err: impl std::fmt::Display) -> FactoryError {
    FactoryError::Invalid(format!("bad builtins archive: {err}"))
}
