use thiserror::Error;

/// Errors reported by factory operations.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("invalid argument: {0}")]
    Invalid(String),
    #[error("resource type '{0}' is already registered")]
    AlreadyRegistered(String),
    #[error("resource type capacity ({0}) exceeded")]
    OutOfResources(usize),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("missing file extension: '{0}'")]
    MissingExtension(String),
    #[error("unknown resource type: {0}")]
    UnknownType(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("resource too large for stream buffer: {0}")]
    BufferTooSmall(String),
    #[error("canonical path too long ({0} bytes)")]
    PathTooLong(usize),
    #[error("resource not loaded")]
    NotLoaded,
    #[error("unable to create resource: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, FactoryError>;

/// Errors a handler reports from `create` or `recreate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error("out of memory")]
    OutOfMemory,
    #[error("invalid format")]
    Format,
    #[error("invalid constant")]
    Constant,
    #[error("unknown create error")]
    Unknown,
}

/// Errors reported by `Factory::reload`.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("not enough memory")]
    OutOfMemory,
    #[error("invalid format")]
    Format,
    #[error("invalid constant")]
    Constant,
    #[error("resource was never loaded")]
    NotFound,
    #[error("load failed: {0}")]
    Load(FactoryError),
    #[error("reloading of resource type '{0}' not supported")]
    NotSupported(String),
    #[error("unknown reload error")]
    Unknown,
}
