//! 48-bit split integer codec — pure functions, no I/O.
//!
//! # Split 48-bit integer
//! `value = high * 2^32 + low`, with `0 <= low <= 2^32 - 1` and
//! `0 <= high <= 2^16 - 1`. Valid range is `[0, 2^48 - 1]` (256 TiB - 1).
//! Both halves are always written big-endian, independent of host
//! endianness — see [`write_u48_be`]/[`read_u48_be`].

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::error::{Result, ScavengerError};

/// Largest value a split 48-bit integer can hold: `2^48 - 1`.
pub const MAX_U48: u64 = (1u64 << 48) - 1;

/// Split a 48-bit value into its big-endian `(low: u32, high: u16)` halves.
///
/// Fails with [`ScavengerError::ValueOutOfRange`] if `v > MAX_U48`.
pub fn split_48(v: u64) -> Result<(u32, u16)> {
    if v > MAX_U48 {
        return Err(ScavengerError::ValueOutOfRange(v));
    }
    let low = (v & 0xFFFF_FFFF) as u32;
    let high = (v >> 32) as u16;
    Ok((low, high))
}

/// Reassemble a 48-bit value from its `(low, high)` halves.
///
/// Every `(u32, u16)` pair is in range by construction, so this cannot fail.
pub fn join_48(low: u32, high: u16) -> u64 {
    ((high as u64) << 32) | (low as u64)
}

/// Write a 48-bit value as its two big-endian halves: low(4) then high(2).
pub fn write_u48_be<W: Write>(mut w: W, v: u64) -> Result<()> {
    let (low, high) = split_48(v)?;
    w.write_u32::<BigEndian>(low)?;
    w.write_u16::<BigEndian>(high)?;
    Ok(())
}

/// Read a 48-bit value from its two big-endian halves: low(4) then high(2).
pub fn read_u48_be<R: Read>(mut r: R) -> io::Result<u64> {
    let low = r.read_u32::<BigEndian>()?;
    let high = r.read_u16::<BigEndian>()?;
    Ok(join_48(low, high))
}
