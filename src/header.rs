//! Fixed on-disk regions: the 16-byte header, the 12-byte index record, and
//! the 6-byte count trailer.
//!
//! # On-disk layout (all fields big-endian)
//!
//! ```text
//! Header (16 B, offset 0):
//!   Offset  Size  Field
//!      0      4   primary               opaque signature bytes
//!      4      6   secondary             opaque signature bytes
//!     10      4   total-size-low        BE u32
//!     14      2   total-size-high       BE u16
//!
//! Index record (12 B):
//!   Offset  Size  Field
//!      0      4   offset-low            BE u32
//!      4      4   size-low              BE u32
//!      8      2   offset-high           BE u16
//!     10      2   size-high             BE u16
//!
//! Count trailer (6 B):
//!   Offset  Size  Field
//!      0      4   count-low             BE u32
//!      4      2   count-high            BE u16
//! ```
//!
//! Note the index record's interleaved halves: both low halves precede both
//! high halves. This is not the same layout as the header's single split
//! integer and must not be "simplified" to match it.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::error::{Result, ScavengerError};
use crate::intcodec::{join_48, split_48};

pub const HEADER_SIZE: usize = 16;
pub const INDEX_RECORD_SIZE: usize = 12;
pub const COUNT_SIZE: usize = 6;

/// Smallest legal archive: header + zero-record index + count trailer.
pub const MIN_FILE_SIZE: u64 = HEADER_SIZE as u64 + COUNT_SIZE as u64;

// ── Header ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Header {
    pub primary: [u8; 4],
    pub secondary: [u8; 6],
    pub total_size: u64,
}

impl Header {
    pub fn write<W: Write>(&self, mut w: W) -> Result<()> {
        w.write_all(&self.primary)?;
        w.write_all(&self.secondary)?;
        let (low, high) = split_48(self.total_size)?;
        w.write_u32::<BigEndian>(low)?;
        w.write_u16::<BigEndian>(high)?;
        Ok(())
    }

    pub fn read<R: Read>(mut r: R) -> io::Result<Self> {
        let mut primary = [0u8; 4];
        r.read_exact(&mut primary)?;
        let mut secondary = [0u8; 6];
        r.read_exact(&mut secondary)?;
        let low = r.read_u32::<BigEndian>()?;
        let high = r.read_u16::<BigEndian>()?;
        Ok(Self {
            primary,
            secondary,
            total_size: join_48(low, high),
        })
    }
}

// ── Index record ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRecord {
    pub offset: u64,
    pub size: u64,
}

impl IndexRecord {
    pub fn pack(&self) -> Result<[u8; INDEX_RECORD_SIZE]> {
        let (off_lo, off_hi) = split_48(self.offset)?;
        let (sz_lo, sz_hi) = split_48(self.size)?;
        let mut buf = [0u8; INDEX_RECORD_SIZE];
        buf[0..4].copy_from_slice(&off_lo.to_be_bytes());
        buf[4..8].copy_from_slice(&sz_lo.to_be_bytes());
        buf[8..10].copy_from_slice(&off_hi.to_be_bytes());
        buf[10..12].copy_from_slice(&sz_hi.to_be_bytes());
        Ok(buf)
    }

    pub fn unpack(buf: &[u8; INDEX_RECORD_SIZE]) -> Self {
        let off_lo = u32::from_be_bytes(buf[0..4].try_into().unwrap());
        let sz_lo = u32::from_be_bytes(buf[4..8].try_into().unwrap());
        let off_hi = u16::from_be_bytes(buf[8..10].try_into().unwrap());
        let sz_hi = u16::from_be_bytes(buf[10..12].try_into().unwrap());
        Self {
            offset: join_48(off_lo, off_hi),
            size: join_48(sz_lo, sz_hi),
        }
    }

    /// Validate this record against the total file size (§3 per-object
    /// invariants). Does not check overlap — overlap is legal.
    pub fn validate(&self, file_size: u64) -> Result<()> {
        if self.size == 0 {
            return Err(ScavengerError::Malformed(
                "index record has size 0".to_string(),
            ));
        }
        if self.offset >= file_size {
            return Err(ScavengerError::Malformed(format!(
                "index record offset {} is not less than file size {file_size}",
                self.offset
            )));
        }
        if self.size > file_size - self.offset {
            return Err(ScavengerError::Malformed(format!(
                "index record size {} at offset {} exceeds file size {file_size}",
                self.size, self.offset
            )));
        }
        Ok(())
    }
}

// ── Count trailer ────────────────────────────────────────────────────────────

pub fn pack_count(count: u64) -> Result<[u8; COUNT_SIZE]> {
    let (low, high) = split_48(count)?;
    let mut buf = [0u8; COUNT_SIZE];
    buf[0..4].copy_from_slice(&low.to_be_bytes());
    buf[4..6].copy_from_slice(&high.to_be_bytes());
    Ok(buf)
}

pub fn unpack_count(buf: &[u8; COUNT_SIZE]) -> u64 {
    let low = u32::from_be_bytes(buf[0..4].try_into().unwrap());
    let high = u16::from_be_bytes(buf[4..6].try_into().unwrap());
    join_48(low, high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let h = Header {
            primary: [0x01, 0x02, 0x03, 0x04],
            secondary: *b"exampl",
            total_size: 39,
        };
        let mut buf = Vec::new();
        h.write(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE);
        // Bytes 10..=15 are the BE split of total_size = 39 = 0x27.
        assert_eq!(&buf[10..16], &[0, 0, 0, 39, 0, 0]);

        let h2 = Header::read(&buf[..]).unwrap();
        assert_eq!(h2.primary, h.primary);
        assert_eq!(h2.secondary, h.secondary);
        assert_eq!(h2.total_size, h.total_size);
    }

    #[test]
    fn index_record_roundtrip() {
        let r = IndexRecord { offset: 16, size: 2 };
        let packed = r.pack().unwrap();
        assert_eq!(packed.len(), INDEX_RECORD_SIZE);
        let r2 = IndexRecord::unpack(&packed);
        assert_eq!(r, r2);
    }

    #[test]
    fn index_record_interleaved_layout() {
        // offset and size must each fit in their low u32 halves here, so the
        // high halves (bytes 8..12) are zero and the low halves occupy 0..8.
        let r = IndexRecord { offset: 0x1_0000_0000, size: 5 };
        let packed = r.pack().unwrap();
        // off_lo = 0, sz_lo = 5, off_hi = 1, sz_hi = 0
        assert_eq!(&packed[0..4], &0u32.to_be_bytes());
        assert_eq!(&packed[4..8], &5u32.to_be_bytes());
        assert_eq!(&packed[8..10], &1u16.to_be_bytes());
        assert_eq!(&packed[10..12], &0u16.to_be_bytes());
    }

    #[test]
    fn index_record_rejects_zero_size() {
        let r = IndexRecord { offset: 16, size: 0 };
        assert!(r.validate(100).is_err());
    }

    #[test]
    fn index_record_rejects_out_of_bounds() {
        assert!(IndexRecord { offset: 100, size: 1 }.validate(100).is_err());
        assert!(IndexRecord { offset: 90, size: 20 }.validate(100).is_err());
        assert!(IndexRecord { offset: 90, size: 10 }.validate(100).is_ok());
    }

    #[test]
    fn count_roundtrip() {
        let packed = pack_count(3).unwrap();
        assert_eq!(unpack_count(&packed), 3);
    }
}
