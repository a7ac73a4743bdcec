use thiserror::Error;

/// Errors surfaced by every operation in this crate.
///
/// Engine-level failures are wrapped into [`Error::Engine`] at the call
/// site that observed them: the diagnostic message survives, the engine's
/// own error type does not cross the crate boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// The file, group, or dataset does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested operation's type disagrees with the stored type.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The operation is not supported for the stored type.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A buffer, shape, or chunk size disagrees with the dataset's extents.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Any failure reported by the underlying HDF5 library.
    #[error("storage engine error: {0}")]
    Engine(String),
}

impl From<hdf5::Error> for Error {
    fn from(err: hdf5::Error) -> Self {
        Error::Engine(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
