use thiserror::Error;

/// Error types for the compute module.
///
/// These stay internal to the crate's fallible arithmetic: the public
/// operations log them and degrade to absence or a zero fallback instead of
/// surfacing a fatal error (absence of data is expressed as `Option`, not as
/// an error).
#[derive(Error, Debug)]
pub enum ComputeError {
    /// A checked decimal operation overflowed.
    #[error("Decimal overflow: {0}")]
    Overflow(String),
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
