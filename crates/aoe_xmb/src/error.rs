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

    /// Transparent wrapper for [`quick_xml::Error`]
    #[error(transparent)]
    XmlError(#[from] quick_xml::Error),

    /// Transparent wrapper for [`std::str::Utf8Error`]
    #[error(transparent)]
    Utf8Error(#[from] std::str::Utf8Error),

    /// Transparent wrapper for [`widestring::error::Utf16Error`]
    #[error(transparent)]
    Utf16Error(#[from] widestring::error::Utf16Error),

    /// UTF-16 source of {0} bytes ends in half a character
    #[error("UTF-16 source of {0} bytes ends in half a character")]
    OddUtf16Length(usize),

    /// document has no root element
    #[error("document has no root element")]
    MissingRoot,

    /// second root element {0}
    #[error("second root element <{0}>, a document has exactly one")]
    MultipleRoots(String),

    /// element {0} is never closed
    #[error("element <{0}> is never closed")]
    UnclosedElement(String),

    /// node {0} is not part of the document
    #[error("node {0} is not part of the document")]
    UnknownNode(usize),

    /// {0} is missing from the name tables
    #[error("{0} is missing from the name tables")]
    UnknownName(String),

    /// layout of node {node} is inconsistent
    #[error("layout of node {node} is inconsistent: expected {expected}, found {actual}")]
    InvalidLayout {
        /// Index of the node in the document
        node: usize,
        /// Offset or size the node should have
        expected: usize,
        /// Offset or size the node has
        actual: usize,
    },

    /// node regions do not tile the tree payload
    #[error("node regions leave {0} bytes of the tree payload unclaimed")]
    UnclaimedBytes(usize),

    /// {0} bytes do not fit in an xmb file
    #[error("{0} bytes do not fit in an xmb file")]
    TooLarge(usize),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
