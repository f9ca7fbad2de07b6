//! Streaming encoder — writes objects forward, buffers the index in a
//! scratch file, and stitches everything together on `complete()`.
//!
//! # Lifecycle
//! `Open` -> (`begin_object`/`write`)* -> `complete` -> `Completed`.
//! Any failure of `begin_object`, `write`, or `complete` other than
//! `NoObjectOpen` latches the instance into `Errored`; every subsequent call
//! except `Drop` then fails immediately. Dropping the encoder before
//! `complete()` succeeds closes and unlinks the destination file — a
//! half-written archive must never be left looking valid. The scratch index
//! file ([`tempfile::NamedTempFile`]) unlinks itself on drop regardless of
//! how the encoder's lifecycle ended; this is the same
//! destructor-as-rollback invariant applied to a second resource.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Result, ScavengerError};
use crate::header::{pack_count, Header, IndexRecord, COUNT_SIZE, HEADER_SIZE, INDEX_RECORD_SIZE};
use crate::intcodec::{write_u48_be, MAX_U48};
use crate::signature::{parse_primary, parse_secondary};

/// Worst-case padding bytes between the payload and the index (§3).
const PADDING_WORST: u64 = 3;
/// Byte used to fill padding; value is unconstrained by the format.
const PADDING_BYTE: u8 = 0x20;
/// Chunk size used when streaming the scratch index into the destination.
pub const SCRATCH_COPY_CHUNK_SIZE: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncoderState {
    Open,
    Completed,
    Errored,
}

pub struct Encoder {
    file: Option<File>,
    path: PathBuf,
    scratch: Option<NamedTempFile>,
    state: EncoderState,
    last_error: Option<String>,

    /// Objects fully finalized so far (not counting one currently open).
    count: u64,
    /// Payload bytes committed before the currently open object.
    bytes: u64,
    /// Payload bytes written into the currently open object, or 0 if none.
    local: u64,
    object_open: bool,
}

impl Encoder {
    /// Create a new archive at `path` with the given signatures.
    ///
    /// Fails with `InvalidSignature` if `primary` is not 8 hex digits, or
    /// `secondary` is neither 12 hex digits nor 6 printable ASCII bytes.
    /// Fails with an IO error if the destination cannot be created. Both
    /// failures are hard constructor failures — no instance is returned to
    /// roll back, since nothing has been written yet.
    pub fn new<P: AsRef<Path>>(path: P, primary: &str, secondary: &str) -> Result<Self> {
        let primary = parse_primary(primary)?;
        let secondary = parse_secondary(secondary)?;
        let path = path.as_ref().to_owned();

        let mut file = File::create(&path)?;
        // Reserve the 16-byte header: primary/secondary are final already;
        // the 6-byte total-size field is patched in complete().
        Header { primary, secondary, total_size: 0 }.write(&mut file)?;

        let scratch = NamedTempFile::new()?;

        Ok(Self {
            file: Some(file),
            path,
            scratch: Some(scratch),
            state: EncoderState::Open,
            last_error: None,
            count: 0,
            bytes: 0,
            local: 0,
            object_open: false,
        })
    }

    pub fn error_state(&self) -> bool {
        self.state == EncoderState::Errored
    }

    pub fn last_error_message(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn check_usable(&self) -> Result<()> {
        match self.state {
            EncoderState::Open => Ok(()),
            EncoderState::Completed => Err(ScavengerError::AlreadyCompleted),
            EncoderState::Errored => Err(ScavengerError::Errored),
        }
    }

    fn fail(&mut self, err: ScavengerError) -> ScavengerError {
        self.state = EncoderState::Errored;
        self.last_error = Some(err.to_string());
        err
    }

    /// Worst-case projected final file size if the archive were finalized
    /// immediately after committing `extra_local` more bytes to the
    /// currently-open-or-about-to-open object, with `extra_records` more
    /// index records than `self.count` already accounts for.
    fn projected_size(&self, extra_local: u64, extra_records: u64) -> u64 {
        HEADER_SIZE as u64
            + self.bytes
            + extra_local
            + PADDING_WORST
            + (self.count + extra_records) * INDEX_RECORD_SIZE as u64
            + COUNT_SIZE as u64
    }

    fn scratch_mut(&mut self) -> &mut NamedTempFile {
        self.scratch.as_mut().expect("scratch file is present while Open")
    }

    fn file_mut(&mut self) -> &mut File {
        self.file.as_mut().expect("destination file is present while Open")
    }

    /// Finalize the currently open object: write its index record to
    /// scratch, roll `local` into `bytes`, and reset `local`. No-op if no
    /// object is open.
    fn finalize_current_object(&mut self) -> Result<()> {
        if !self.object_open {
            return Ok(());
        }
        if self.local == 0 {
            return Err(self.fail(ScavengerError::EmptyObject));
        }

        let record = IndexRecord {
            offset: HEADER_SIZE as u64 + self.bytes,
            size: self.local,
        };
        let packed = match record.pack() {
            Ok(p) => p,
            Err(e) => return Err(self.fail(e)),
        };
        if let Err(e) = self.scratch_mut().write_all(&packed) {
            return Err(self.fail(e.into()));
        }

        self.bytes += self.local;
        self.count += 1;
        self.local = 0;
        self.object_open = false;
        Ok(())
    }

    /// Begin a new object. Finalizes any previously open object first.
    pub fn begin_object(&mut self) -> Result<()> {
        self.check_usable()?;
        self.finalize_current_object()?;

        if self.projected_size(0, 1) > MAX_U48 {
            return Err(self.fail(ScavengerError::FileTooLarge));
        }
        self.object_open = true;
        Ok(())
    }

    /// Append `chunk` to the currently open object. A zero-length chunk is a
    /// no-op. `NoObjectOpen` leaves the encoder `Open` — it is the caller's
    /// own mistake, not archive corruption, so there is nothing to roll back.
    pub fn write(&mut self, chunk: &[u8]) -> Result<()> {
        self.check_usable()?;
        if !self.object_open {
            return Err(ScavengerError::NoObjectOpen);
        }
        if chunk.is_empty() {
            return Ok(());
        }

        if self.projected_size(self.local + chunk.len() as u64, 1) > MAX_U48 {
            return Err(self.fail(ScavengerError::FileTooLarge));
        }

        if let Err(e) = self.file_mut().write_all(chunk) {
            return Err(self.fail(e.into()));
        }
        self.local += chunk.len() as u64;
        Ok(())
    }

    /// Finalize the open object (if any), write padding, stitch the scratch
    /// index and count trailer into the destination, and patch the header's
    /// total-size field. Must be called exactly once.
    pub fn complete(&mut self) -> Result<()> {
        self.check_usable()?;
        self.finalize_current_object()?;

        let padding = ((4 - (self.bytes % 4)) % 4) as usize;
        if let Err(e) = self.write_padding(padding) {
            return Err(self.fail(e));
        }

        if let Err(e) = self.stream_scratch_index() {
            return Err(self.fail(e));
        }

        let count_bytes = match pack_count(self.count) {
            Ok(b) => b,
            Err(e) => return Err(self.fail(e)),
        };
        if let Err(e) = self.file_mut().write_all(&count_bytes) {
            return Err(self.fail(e.into()));
        }

        let total_size = HEADER_SIZE as u64
            + self.bytes
            + padding as u64
            + self.count * INDEX_RECORD_SIZE as u64
            + COUNT_SIZE as u64;
        if total_size > MAX_U48 {
            return Err(self.fail(ScavengerError::FileTooLarge));
        }

        if let Err(e) = self.patch_header_size(total_size) {
            return Err(self.fail(e));
        }
        if let Err(e) = self.file_mut().flush() {
            return Err(self.fail(e.into()));
        }

        self.state = EncoderState::Completed;
        Ok(())
    }

    fn write_padding(&mut self, padding: usize) -> Result<()> {
        if padding == 0 {
            return Ok(());
        }
        let buf = [PADDING_BYTE; PADDING_WORST as usize];
        self.file_mut().write_all(&buf[..padding])?;
        Ok(())
    }

    fn stream_scratch_index(&mut self) -> Result<()> {
        self.scratch_mut().as_file_mut().seek(SeekFrom::Start(0))?;
        let mut buf = [0u8; SCRATCH_COPY_CHUNK_SIZE];
        loop {
            let n = {
                let scratch = self.scratch_mut().as_file_mut();
                scratch.read(&mut buf)?
            };
            if n == 0 {
                break;
            }
            self.file_mut().write_all(&buf[..n])?;
        }
        Ok(())
    }

    fn patch_header_size(&mut self, total_size: u64) -> Result<()> {
        self.file_mut().seek(SeekFrom::Start(10))?;
        write_u48_be(self.file_mut(), total_size)?;
        self.file_mut().seek(SeekFrom::End(0))?;
        Ok(())
    }
}

impl Drop for Encoder {
    fn drop(&mut self) {
        if self.state != EncoderState::Completed {
            // Close the handle before unlinking so the removal can succeed
            // on every platform, not just ones that allow deleting open files.
            self.file.take();
            let _ = fs::remove_file(&self.path);
        }
        // self.scratch drops here regardless of state, unlinking itself.
    }
}
