//! # scavenger — binary archive container codec
//!
//! Format guarantees:
//! - A single file holds an ordered list of arbitrary binary objects,
//!   addressable by zero-based index, plus two opaque signatures (a 4-byte
//!   primary and a 6-byte secondary) tagging the contents' schema.
//! - Every multi-byte integer on disk is big-endian; 48-bit quantities are
//!   split into a `(low: u32, high: u16)` pair so the format never depends
//!   on a 64-bit host integer type.
//! - The index table lives at the end of the file, after the payload and
//!   0-3 bytes of alignment padding; the trailing 6-byte count is read first
//!   so the index can be located without scanning the payload.
//! - There is no compression, checksumming, encryption, or in-place
//!   modification — an archive is write-once, then read-only.
//! - An interrupted encode never leaves a valid-looking file: the encoder
//!   unlinks its own destination on drop unless `complete()` has already
//!   succeeded.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod intcodec;
pub mod signature;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Result, ScavengerError};
