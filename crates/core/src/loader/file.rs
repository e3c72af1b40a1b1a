//! Local filesystem backend.

use std::fs::File;

use restock_api::{FactoryError, Result};
use tracing::{debug, error};

use super::StreamBuffer;

pub(crate) fn read(path: &str, buffer: &mut StreamBuffer) -> Result<usize> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            error!("resource not found: {path}");
            return Err(FactoryError::NotFound(path.to_string()));
        }
    };

    let len = file.metadata()?.len() as usize;
    if !buffer.fits(len) {
        error!("resource too large for stream buffer: {path}");
        return Err(FactoryError::BufferTooSmall(path.to_string()));
    }

    buffer.fill_from(&mut file, len)?;
    debug!(path, size = len, "loaded from file");
    Ok(buffer.finish())
}
