//! Embedded control server.
//!
//! Two routes: `GET /` renders a status table of tracked filenames and
//! reference counts, and `GET /reload/<name>` drives the reloader. The
//! server never runs in the background; [`Factory::update`] drains pending
//! requests on the caller's thread, one cooperative tick at a time.

use std::fmt::Write;

use restock_api::ReloadError;
use tiny_http::{Request, Response, Server};
use tracing::{error, info, warn};

use crate::factory::Factory;

pub(crate) struct ControlServer {
    server: Server,
}

impl ControlServer {
    pub(crate) fn bind(port: u16) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let server = Server::http(("0.0.0.0", port))?;
        Ok(Self { server })
    }

    /// Non-blocking receive; `None` when no request is pending.
    pub(crate) fn try_recv(&self) -> Option<Request> {
        match self.server.try_recv() {
            Ok(request) => request,
            Err(err) => {
                error!("control server receive failed: {err}");
                None
            }
        }
    }
}

impl Factory {
    pub(crate) fn dispatch(&mut self, request: Request) {
        let url = request.url().to_string();
        if let Some(name) = url.strip_prefix("/reload/") {
            let message = self.handle_reload(name);
            let _ = request.respond(Response::from_string(message));
        } else if url == "/" {
            let _ = request.respond(html_response(self.status_page()));
        } else {
            let _ = request.respond(Response::empty(404));
        }
    }

    /// Run a reload and log its outcome; the logged line doubles as the
    /// response body.
    fn handle_reload(&mut self, name: &str) -> String {
        match self.reload(name) {
            Ok(_) => {
                let message = format!("{name} was successfully reloaded.");
                info!("{message}");
                message
            }
            Err(ReloadError::OutOfMemory) => {
                let message = format!("Not enough memory to reload {name}.");
                error!("{message}");
                message
            }
            Err(ReloadError::Format) | Err(ReloadError::Constant) => {
                let message = format!("{name} has invalid format and could not be reloaded.");
                error!("{message}");
                message
            }
            Err(ReloadError::NotFound) => {
                let message =
                    format!("{name} could not be reloaded since it was never loaded before.");
                error!("{message}");
                message
            }
            Err(ReloadError::Load(_)) => {
                let message = format!("{name} could not be loaded, reloading failed.");
                error!("{message}");
                message
            }
            Err(ReloadError::NotSupported(extension)) => {
                let message = format!("Reloading of resource type {extension} not supported.");
                warn!("{message}");
                message
            }
            Err(err @ ReloadError::Unknown) => {
                let message = format!("{name} could not be reloaded, unknown error: {err}.");
                warn!("{message}");
                message
            }
        }
    }

    fn status_page(&self) -> String {
        let mut html =
            String::from("<table><tr><th>Filename</th><th>Reference count</th></tr>");
        for (name, entry) in self.cache.iter_filenames() {
            let _ = write!(html, "<tr><td>{name}</td><td>{}</td></tr>", entry.ref_count);
        }
        html.push_str("</table>");
        html
    }
}

fn html_response(body: String) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut response = Response::from_string(body);
    if let Ok(header) =
        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
    {
        response.add_header(header);
    }
    response
}
