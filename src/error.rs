//! Unified error taxonomy for the encoder and decoder.
//!
//! One flat enum covers every failure mode in the container format, rather
//! than a separate error type per subsystem.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScavengerError {
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("file too small to be a valid archive: {size} B (minimum 22 B)")]
    FileTooSmall { size: u64 },

    #[error("file length {size} B is not aligned (expected size mod 4 == 2)")]
    FileNotAligned { size: u64 },

    #[error("malformed archive: {0}")]
    Malformed(String),

    #[error("header total-size field ({expected} B) does not match observed file length ({actual} B)")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("object is empty — at least one byte must be written before it is finalized")]
    EmptyObject,

    #[error("projected archive size would exceed the 48-bit size limit (2^48 - 1 bytes)")]
    FileTooLarge,

    #[error("no object is open — call begin_object() before write()")]
    NoObjectOpen,

    #[error("value {0} exceeds the 48-bit range (2^48 - 1)")]
    ValueOutOfRange(u64),

    #[error("the encoder has already completed; no further operations are allowed")]
    AlreadyCompleted,

    #[error("the encoder is in an error state; no further operations are allowed")]
    Errored,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid UTF-8 in object payload: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, ScavengerError>;
