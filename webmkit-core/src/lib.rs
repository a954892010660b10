//! # webmkit-core
//!
//! Core types shared by the webmkit crates:
//! - Error hierarchy ([`Error`] and its container/codec/bitstream sub-errors)
//! - Bit-granular stream access ([`BitReader`], [`BitWriter`])
//!
//! The container and codec crates define their own error enums and convert
//! them into [`Error`] at the crate boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitstream;
pub mod error;

pub use bitstream::{BitReader, BitWriter};
pub use error::{BitstreamError, CodecError, ContainerError, Error, Result};
