//! Error types for the webmkit library.
//!
//! This module provides the error hierarchy shared by all webmkit crates.
//! Container and codec crates define their own error enums and convert them
//! into [`Error`] at the crate boundary.

use thiserror::Error;

/// Main error type for the webmkit library.
#[derive(Error, Debug)]
pub enum Error {
    /// Container format errors (demuxing).
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    /// Codec errors (bitstream header parsing, decoding).
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Bitstream parsing errors.
    #[error("Bitstream error: {0}")]
    Bitstream(#[from] BitstreamError),

    /// Unsupported feature or format.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Container format errors.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// Invalid or corrupted container structure.
    #[error("Invalid container structure: {0}")]
    InvalidStructure(String),

    /// Unknown or unsupported container format.
    #[error("Unknown container format")]
    UnknownFormat,

    /// Nested elements exceeded their parent's declared size.
    #[error("Declared size overrun in element: {0}")]
    SizeOverrun(String),

    /// Generic container error message.
    #[error("{0}")]
    Other(String),
}

/// Codec errors.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Unsupported codec profile.
    #[error("Unsupported profile: {0}")]
    UnsupportedProfile(String),

    /// Invalid coded header.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Generic codec error message.
    #[error("{0}")]
    Other(String),
}

/// Bitstream parsing errors.
#[derive(Error, Debug)]
pub enum BitstreamError {
    /// Unexpected end of bitstream.
    #[error("Unexpected end of bitstream")]
    UnexpectedEnd,

    /// Invalid syntax element value.
    #[error("Invalid syntax element: {element} = {value}")]
    InvalidSyntax {
        /// Syntax element name.
        element: String,
        /// Invalid value.
        value: i64,
    },

    /// Generic bitstream error message.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an unsupported error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }
}
