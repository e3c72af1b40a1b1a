//! HTTP origin backend.
//!
//! One blocking GET per load; the response body streams into the staging
//! buffer chunk by chunk, so an oversized resource is rejected without
//! retaining any of its data.

use std::io::Read;
use std::time::Duration;

use restock_api::{FactoryError, Result};
use tracing::{debug, error, warn};

use super::StreamBuffer;

const CHUNK_SIZE: usize = 64 * 1024;

/// Blocking HTTP client bound to the origin named by the factory URI.
pub(crate) struct HttpOrigin {
    agent: ureq::Agent,
    host: String,
    port: u16,
}

impl HttpOrigin {
    pub(crate) fn new(host: &str, port: u16) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .build();
        Self {
            agent,
            host: host.to_string(),
            port,
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.host, self.port, path)
    }
}

pub(crate) fn fetch(origin: &HttpOrigin, path: &str, buffer: &mut StreamBuffer) -> Result<usize> {
    let response = match origin.agent.get(&origin.url_for(path)).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(404, _)) => {
            error!("resource not found: {path}");
            return Err(FactoryError::NotFound(path.to_string()));
        }
        Err(ureq::Error::Status(status, _)) => {
            warn!("unexpected http status code {status} for {path}");
            return Err(FactoryError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("http status {status}"),
            )));
        }
        Err(err) => {
            error!("transport failure for {path}: {err}");
            return Err(FactoryError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                err,
            )));
        }
    };

    let content_length: Option<usize> = response
        .header("Content-Length")
        .and_then(|value| value.parse().ok());

    let mut reader = response.into_reader();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut chunk).map_err(FactoryError::Io)?;
        if n == 0 {
            break;
        }
        if !buffer.fits(n) {
            error!("resource too large for stream buffer: {path}");
            return Err(FactoryError::BufferTooSmall(path.to_string()));
        }
        buffer.extend(&chunk[..n]);
    }

    let streamed = buffer.bytes().len();
    if let Some(expected) = content_length {
        if expected != streamed {
            warn!(
                "content length {expected} differs from streamed bytes {streamed} for {path}"
            );
        }
    }

    debug!(path, size = streamed, "loaded from http");
    Ok(buffer.finish())
}
