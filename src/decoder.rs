//! Random-access decoder — validates global structure on open, then
//! services per-object index lookups and seeks against a kept-open file
//! handle.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Result, ScavengerError};
use crate::header::{Header, IndexRecord, COUNT_SIZE, HEADER_SIZE, INDEX_RECORD_SIZE};
use crate::intcodec::{read_u48_be, MAX_U48};
use crate::signature::{
    parse_primary, parse_secondary, primary_to_hex, secondary_to_ascii, secondary_to_hex,
};

/// Chunk size used by [`Decoder::copy_object_to`].
pub const COPY_CHUNK_SIZE: usize = 16 * 1024;

pub struct Decoder {
    file: File,
    size: u64,
    primary: [u8; 4],
    secondary: [u8; 6],
    count: u64,
    index_offset: u64,
}

impl Decoder {
    /// Open an archive and validate the global invariants of §3.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();

        if size < HEADER_SIZE as u64 + COUNT_SIZE as u64 {
            return Err(ScavengerError::FileTooSmall { size });
        }
        if size > MAX_U48 {
            return Err(ScavengerError::Malformed(format!(
                "file length {size} B exceeds the 48-bit size limit"
            )));
        }
        if size % 4 != 2 {
            return Err(ScavengerError::FileNotAligned { size });
        }

        file.seek(SeekFrom::Start(0))?;
        let header = Header::read(&mut file)?;
        if header.total_size != size {
            return Err(ScavengerError::SizeMismatch {
                expected: header.total_size,
                actual: size,
            });
        }

        file.seek(SeekFrom::Start(size - COUNT_SIZE as u64))?;
        let count = read_u48_be(&mut file)?;

        let max_count = (size - HEADER_SIZE as u64 - COUNT_SIZE as u64) / INDEX_RECORD_SIZE as u64;
        if count > max_count {
            return Err(ScavengerError::Malformed(format!(
                "object count {count} exceeds the maximum {max_count} the file can hold"
            )));
        }

        let index_offset = size - COUNT_SIZE as u64 - count * INDEX_RECORD_SIZE as u64;
        if index_offset < HEADER_SIZE as u64 {
            return Err(ScavengerError::Malformed(format!(
                "computed index offset {index_offset} precedes the end of the header"
            )));
        }

        Ok(Self {
            file,
            size,
            primary: header.primary,
            secondary: header.secondary,
            count,
            index_offset,
        })
    }

    pub fn primary(&self) -> String {
        primary_to_hex(&self.primary)
    }

    pub fn secondary(&self) -> String {
        secondary_to_hex(&self.secondary)
    }

    pub fn secondary_ascii(&self) -> Option<String> {
        secondary_to_ascii(&self.secondary)
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn matches(&self, primary: &str, secondary: &str) -> Result<bool> {
        let primary = parse_primary(primary)?;
        let secondary = parse_secondary(secondary)?;
        Ok(primary == self.primary && secondary == self.secondary)
    }

    fn check_index(&self, i: u64) -> Result<()> {
        if i >= self.count {
            return Err(ScavengerError::OutOfRange(format!(
                "object index {i} is out of range (count = {})",
                self.count
            )));
        }
        Ok(())
    }

    fn read_index_record(&mut self, i: u64) -> Result<IndexRecord> {
        self.check_index(i)?;
        let offset = self.index_offset + i * INDEX_RECORD_SIZE as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = [0u8; INDEX_RECORD_SIZE];
        self.file.read_exact(&mut buf)?;
        let record = IndexRecord::unpack(&buf);
        record.validate(self.size)?;
        Ok(record)
    }

    /// Size in bytes of object `i`.
    pub fn measure(&mut self, i: u64) -> Result<u64> {
        Ok(self.read_index_record(i)?.size)
    }

    /// Read `len` bytes of object `i` starting at `offs`.
    pub fn read(&mut self, i: u64, offs: u64, len: u64) -> Result<Vec<u8>> {
        let record = self.read_index_record(i)?;
        if offs >= record.size {
            return Err(ScavengerError::OutOfRange(format!(
                "offset {offs} is not less than object size {}",
                record.size
            )));
        }
        if len == 0 || len > record.size - offs {
            return Err(ScavengerError::OutOfRange(format!(
                "length {len} exceeds the {} bytes available at offset {offs}",
                record.size - offs
            )));
        }

        self.file.seek(SeekFrom::Start(record.offset + offs))?;
        let mut buf = vec![0u8; len as usize];
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read the entire contents of object `i`.
    pub fn read_full(&mut self, i: u64) -> Result<Vec<u8>> {
        let record = self.read_index_record(i)?;
        self.read(i, 0, record.size)
    }

    /// Read the entire contents of object `i` and interpret it as UTF-8.
    pub fn read_full_str(&mut self, i: u64) -> Result<String> {
        let bytes = self.read_full(i)?;
        Ok(std::str::from_utf8(&bytes)?.to_owned())
    }

    /// Stream object `i` to `out` in fixed-size chunks without holding the
    /// whole object in memory.
    pub fn copy_object_to<W: Write>(&mut self, i: u64, out: &mut W) -> Result<()> {
        let record = self.read_index_record(i)?;
        self.file.seek(SeekFrom::Start(record.offset))?;
        let mut remaining = record.size;
        let mut buf = [0u8; COPY_CHUNK_SIZE];
        while remaining > 0 {
            let want = remaining.min(COPY_CHUNK_SIZE as u64) as usize;
            self.file.read_exact(&mut buf[..want])?;
            out.write_all(&buf[..want])?;
            remaining -= want as u64;
        }
        Ok(())
    }
}
