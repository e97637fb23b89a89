//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent wrapper for [`aoe_alz4::error::Error`]
    #[error(transparent)]
    Alz4Error(#[from] aoe_alz4::error::Error),

    /// entry of {0} bytes does not fit in a bar archive
    #[error("entry of {0} bytes does not fit in a bar archive")]
    TooLarge(u64),

    /// {path} changed while it was being added
    #[error("{path} changed while it was being added: expected {expected} bytes, copied {actual}")]
    SizeChanged {
        /// Name of the entry
        path: String,
        /// Length observed before copying
        expected: u64,
        /// Bytes actually copied
        actual: u64,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
