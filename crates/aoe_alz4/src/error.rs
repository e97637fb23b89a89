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

    /// Transparent wrapper for [`lz4_flex::block::DecompressError`]
    #[error(transparent)]
    DecompressError(#[from] lz4_flex::block::DecompressError),

    /// header {0:?} is not recognized as a valid type
    #[error("header {0:?} is not recognized as a valid type")]
    InvalidMagic([u8; 4]),

    /// payload decompressed to {actual} bytes, header declares {expected}
    #[error("payload decompressed to {actual} bytes, header declares {expected}")]
    SizeMismatch {
        /// Size stored in the header
        expected: usize,
        /// Size produced by the decompressor
        actual: usize,
    },

    /// payload ends after {actual} bytes, header declares {expected}
    #[error("payload ends after {actual} bytes, header declares {expected}")]
    TruncatedPayload {
        /// Size stored in the header
        expected: usize,
        /// Bytes left in the frame
        actual: usize,
    },

    /// {compressed} compressed bytes cannot expand to {uncompressed}
    #[error("{compressed} compressed bytes cannot expand to {uncompressed}")]
    ImplausibleSize {
        /// Size of the stored payload
        compressed: usize,
        /// Size stored in the header
        uncompressed: usize,
    },

    /// {0} bytes do not fit in an alz4 frame
    #[error("{0} bytes do not fit in an alz4 frame")]
    TooLarge(usize),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
