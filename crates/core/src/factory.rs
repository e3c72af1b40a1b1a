//! Factory assembly and the get/release lifecycle.
//!
//! The factory owns every moving part: the type registry, the
//! bidirectional cache, the staging buffer, the parsed origin, the
//! optional builtins archive, the optional control server, and the reload
//! subscriber list. Every mutating operation takes `&mut self`; that
//! exclusive borrow is the whole concurrency story, and it is also what
//! keeps a handler from re-entering the factory mid-load.

use restock_api::{
    Descriptor, FactoryError, Object, ReloadSubscriber, ResourceHandler, Result, TypeHandle,
};
use tracing::{debug, error, warn};
use url::Url;

use crate::cache::{Entry, ObjectId, ResourceCache};
use crate::canon::{canonical_path, extension_of, path_hash};
use crate::control::ControlServer;
use crate::loader::{self, Backend, BuiltinsArchive, HttpOrigin, StreamBuffer};
use crate::registry::TypeRegistry;

/// Default control-server port.
pub const DEFAULT_CONTROL_PORT: u16 = 8001;

/// Construction parameters for [`Factory::new`].
#[derive(Clone, Debug)]
pub struct FactoryParams {
    /// Capacity of the primary and secondary indexes.
    pub max_resources: usize,
    /// Staging buffer capacity in bytes. One extra byte is reserved for
    /// the trailing zero, so the largest loadable resource is
    /// `stream_buffer_size - 1` bytes.
    pub stream_buffer_size: usize,
    /// Track filenames and accept reload subscribers.
    pub reload_support: bool,
    /// Start the embedded control server; implies `reload_support`.
    pub http_server: bool,
    /// Port the control server binds.
    pub control_port: u16,
    /// Pre-packaged resources (an uncompressed tar blob) consulted before
    /// any other backend.
    pub builtins_archive: Option<Vec<u8>>,
}

impl Default for FactoryParams {
    fn default() -> Self {
        Self {
            max_resources: 1024,
            stream_buffer_size: 4 * 1024 * 1024,
            reload_support: false,
            http_server: false,
            control_port: DEFAULT_CONTROL_PORT,
            builtins_archive: None,
        }
    }
}

impl FactoryParams {
    pub fn with_max_resources(mut self, max_resources: usize) -> Self {
        self.max_resources = max_resources;
        self
    }

    pub fn with_stream_buffer_size(mut self, size: usize) -> Self {
        self.stream_buffer_size = size;
        self
    }

    pub fn with_reload_support(mut self) -> Self {
        self.reload_support = true;
        self
    }

    pub fn with_http_server(mut self) -> Self {
        self.http_server = true;
        self
    }

    pub fn with_control_port(mut self, port: u16) -> Self {
        self.control_port = port;
        self
    }

    pub fn with_builtins_archive(mut self, archive: Vec<u8>) -> Self {
        self.builtins_archive = Some(archive);
        self
    }
}

/// A reference-counted cache of typed live objects, loaded on demand from
/// a builtins archive, an HTTP origin, or the local filesystem.
pub struct Factory {
    pub(crate) types: TypeRegistry,
    pub(crate) cache: ResourceCache,
    pub(crate) base_path: String,
    pub(crate) backend: Backend,
    pub(crate) builtins: Option<BuiltinsArchive>,
    pub(crate) stream: StreamBuffer,
    pub(crate) control: Option<ControlServer>,
    pub(crate) subscribers: Option<Vec<ReloadSubscriber>>,
}

impl Factory {
    /// Build a factory rooted at `uri`, either `http://host[:port]/base`
    /// or `file:///base`. The base path is prepended to every resource
    /// name during canonicalization.
    pub fn new(params: FactoryParams, uri: &str) -> Result<Self> {
        let parsed = Url::parse(uri).map_err(|err| {
            error!("unable to parse uri {uri}: {err}");
            FactoryError::Invalid(format!("unable to parse uri '{uri}': {err}"))
        })?;

        let backend = match parsed.scheme() {
            "http" => {
                let host = parsed
                    .host_str()
                    .ok_or_else(|| FactoryError::Invalid(format!("missing host in '{uri}'")))?;
                Backend::Http(HttpOrigin::new(host, parsed.port().unwrap_or(80)))
            }
            "file" => Backend::File,
            scheme => {
                error!("invalid uri scheme '{scheme}': {uri}");
                return Err(FactoryError::Invalid(format!(
                    "unsupported scheme '{scheme}'"
                )));
            }
        };

        let reload_support = params.reload_support || params.http_server;

        let builtins = match params.builtins_archive {
            Some(bytes) => {
                let archive = BuiltinsArchive::wrap(bytes)?;
                debug!(entries = archive.len(), "builtins archive indexed");
                Some(archive)
            }
            None => None,
        };

        let control = if params.http_server {
            match ControlServer::bind(params.control_port) {
                Ok(server) => Some(server),
                Err(err) => {
                    warn!(
                        "unable to start control server on port {}: {err}",
                        params.control_port
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            types: TypeRegistry::default(),
            cache: ResourceCache::new(params.max_resources, reload_support),
            base_path: parsed.path().to_string(),
            backend,
            builtins,
            stream: StreamBuffer::new(params.stream_buffer_size),
            control,
            subscribers: reload_support.then(Vec::new),
        })
    }

    /// Register `handler` for `extension` (given without the dot).
    pub fn register_type(
        &mut self,
        extension: &str,
        handler: Box<dyn ResourceHandler>,
    ) -> Result<TypeHandle> {
        let handle = self.types.register(extension, handler)?;
        debug!("registered resource type '{extension}' ({} total)", self.types.len());
        Ok(handle)
    }

    /// Fetch `name`, loading it on first use. Every successful call takes
    /// one reference that must be paired with a [`Factory::release`].
    pub fn get(&mut self, name: &str) -> Result<Object> {
        let cpath = canonical_path(&self.base_path, name)?;
        let hash = path_hash(&cpath);

        if let Some(entry) = self.cache.get_mut(hash) {
            entry.ref_count += 1;
            debug!(path = %cpath, ref_count = entry.ref_count, "cache hit");
            return Ok(entry.object.clone());
        }

        let Some(extension) = extension_of(name) else {
            warn!("unable to load resource '{name}': missing file extension");
            return Err(FactoryError::MissingExtension(name.to_string()));
        };
        let Some(handle) = self.types.find(extension) else {
            error!("unknown resource type: {extension}");
            return Err(FactoryError::UnknownType(extension.to_string()));
        };

        let size = loader::fill(
            &mut self.stream,
            self.builtins.as_ref(),
            &self.backend,
            &cpath,
            name,
        )?;

        match self.types.record(handle).handler.create(self.stream.bytes(), name) {
            Ok(object) => {
                debug!(path = %cpath, size, "created resource");
                self.cache.insert(
                    hash,
                    Entry {
                        object: object.clone(),
                        ref_count: 1,
                        resource_type: handle,
                    },
                    &cpath,
                );
                Ok(object)
            }
            Err(err) => {
                warn!("unable to create resource {cpath}: {err}");
                Err(FactoryError::Unknown(cpath))
            }
        }
    }

    /// Drop one reference to `object`. When the count reaches zero the
    /// handler's `destroy` runs and the resource leaves the cache.
    ///
    /// # Panics
    ///
    /// Releasing an object this factory never loaded, or releasing more
    /// times than `get` was called, is a caller bug and panics.
    pub fn release(&mut self, object: &Object) {
        let hash = self
            .cache
            .hash_of(ObjectId::of(object))
            .expect("released an object this factory never loaded");
        let entry = self.cache.get_mut(hash).expect("secondary index out of step");
        assert!(entry.ref_count > 0, "resource reference count underflow");
        entry.ref_count -= 1;
        if entry.ref_count > 0 {
            return;
        }

        let entry = self.cache.remove(hash);
        self.types
            .record(entry.resource_type)
            .handler
            .destroy(&entry.object);
    }

    /// Type of a live object loaded through this factory.
    pub fn get_type(&self, object: &Object) -> Result<TypeHandle> {
        let hash = self
            .cache
            .hash_of(ObjectId::of(object))
            .ok_or(FactoryError::NotLoaded)?;
        let entry = self.cache.get(hash).expect("secondary index out of step");
        debug_assert!(entry.ref_count > 0);
        Ok(entry.resource_type)
    }

    /// Type registered for `extension`.
    pub fn get_type_from_extension(&self, extension: &str) -> Result<TypeHandle> {
        self.types
            .find(extension)
            .ok_or_else(|| FactoryError::UnknownType(extension.to_string()))
    }

    /// Extension the type was registered under.
    pub fn get_extension_from_type(&self, handle: TypeHandle) -> Result<&str> {
        self.types
            .extension(handle)
            .ok_or_else(|| FactoryError::UnknownType(format!("#{}", handle.index())))
    }

    /// Snapshot of the tracked resource named `name`, or `NotLoaded`.
    pub fn get_descriptor(&self, name: &str) -> Result<Descriptor> {
        let cpath = canonical_path(&self.base_path, name)?;
        let hash = path_hash(&cpath);
        self.cache
            .get(hash)
            .map(|entry| entry.descriptor(hash))
            .ok_or(FactoryError::NotLoaded)
    }

    /// Number of resources currently resident in the cache.
    pub fn resident_count(&self) -> usize {
        self.cache.len()
    }

    /// Cooperative tick: drain pending control-server I/O, if any.
    pub fn update(&mut self) {
        loop {
            let Some(request) = self.control.as_ref().and_then(ControlServer::try_recv) else {
                break;
            };
            self.dispatch(request);
        }
    }
}

impl Drop for Factory {
    fn drop(&mut self) {
        // Resident resources at teardown are a caller bug; they are
        // leaked, never destroyed.
        if !self.cache.is_empty() {
            warn!(
                "factory dropped with {} resources still loaded; they will not be destroyed",
                self.cache.len()
            );
        }
    }
}
