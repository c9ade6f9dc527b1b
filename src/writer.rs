//! A buffered, seekable writer for binary encoding.

use crate::error::{Error, Result};
use crate::reader::{DEFAULT_CAPACITY, MIN_CAPACITY};
use crate::traits::{absolute, reserve, shifted, std_position, ByteWriter, SeekFrom, Seeker};
use std::io::{self, Write};

/// A writer that batches writes into a buffer before committing them to a
/// seekable medium.
///
/// The writer is conceptually an offset in the medium plus a buffer of bytes
/// pending at that offset. Writes that fit in the remaining room are plain
/// memory appends; the buffer is committed when it overflows, when the writer
/// seeks somewhere else, or on an explicit [`flush`](BufferedWriter::flush).
///
/// Pending bytes are not written on drop. Call `flush` (or
/// [`into_inner`](BufferedWriter::into_inner)) before discarding a writer.
///
/// ```rust
/// use viewio::{BufferedWriter, MemoryBuffer, WriteExt};
///
/// let mut medium = MemoryBuffer::new();
/// let mut writer = BufferedWriter::with_capacity(&mut medium, 16)?;
/// writer.write_u32(0xDEAD_BEEF)?;
/// writer.write_i16(-1)?;
/// writer.flush()?;
///
/// assert_eq!(medium.to_vec(), vec![0xef, 0xbe, 0xad, 0xde, 0xff, 0xff]);
/// # Ok::<(), viewio::Error>(())
/// ```
pub struct BufferedWriter<M> {
    medium: M,
    buffer: Vec<u8>,
    capacity: usize,
    // Room of the working buffer; exceeds `capacity` only while an
    // oversized write is pending.
    limit: usize,
    // Offset in the medium where `buffer` belongs.
    start: i64,
    poisoned: bool,
}

impl<M: Write + io::Seek> BufferedWriter<M> {
    /// Creates a writer with [`DEFAULT_CAPACITY`].
    pub fn new(medium: M) -> Result<Self> {
        Self::with_capacity(medium, DEFAULT_CAPACITY)
    }

    /// Creates a writer buffering up to `capacity` bytes (at least
    /// [`MIN_CAPACITY`]), positioned at the medium's current position.
    pub fn with_capacity(mut medium: M, capacity: usize) -> Result<Self> {
        let capacity = capacity.max(MIN_CAPACITY);
        let start = medium.stream_position()? as i64;
        Ok(Self {
            medium,
            buffer: Vec::with_capacity(capacity),
            capacity,
            limit: capacity,
            start,
            poisoned: false,
        })
    }

    /// The buffer capacity this writer was created with (after the floor).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of bytes written but not yet committed to the medium.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Gets a reference to the underlying medium.
    pub fn get_ref(&self) -> &M {
        &self.medium
    }

    /// Flushes, then returns the underlying medium.
    pub fn into_inner(mut self) -> Result<M> {
        self.flush()?;
        Ok(self.medium)
    }

    fn commit(&mut self) -> Result<()> {
        self.medium.seek(absolute(self.start)?)?;
        self.medium.write_all(&self.buffer)?;
        Ok(())
    }

    fn check_poisoned(&self) -> Result<()> {
        if self.poisoned {
            Err(Error::Poisoned)
        } else {
            Ok(())
        }
    }

    /// Commits the pending bytes to the medium at the recorded offset.
    ///
    /// A failed or short write poisons the writer: the medium may already
    /// hold part of the bytes, and writing them again could duplicate data.
    pub fn flush(&mut self) -> Result<()> {
        self.check_poisoned()?;
        if self.buffer.is_empty() {
            return Ok(());
        }

        let pending = self.buffer.len();
        if let Err(err) = self.commit() {
            self.poisoned = true;
            log::warn!(
                "flush of {} bytes at offset {} failed, writer poisoned",
                pending,
                self.start
            );
            let source = match err {
                Error::Io(e) => e,
                other => io::Error::new(io::ErrorKind::Other, other),
            };
            return Err(Error::FlushFailed {
                offset: self.start,
                pending,
                source,
            });
        }

        log::trace!("flushed {} bytes at offset {}", pending, self.start);
        self.start += pending as i64;
        self.buffer.clear();
        if self.limit > self.capacity {
            self.buffer = Vec::with_capacity(self.capacity);
            self.limit = self.capacity;
        }
        Ok(())
    }
}

impl<M: Write + io::Seek + Clone> BufferedWriter<M> {
    /// Flushes, then returns a second writer over the same medium at the same
    /// offset with its own empty buffer.
    ///
    /// As with readers, the two writers must not be driven concurrently.
    pub fn duplicate(&mut self) -> Result<Self> {
        self.flush()?;
        Ok(Self {
            medium: self.medium.clone(),
            buffer: Vec::with_capacity(self.capacity),
            capacity: self.capacity,
            limit: self.capacity,
            start: self.start,
            poisoned: false,
        })
    }
}

impl<M: Write + io::Seek> ByteWriter for BufferedWriter<M> {
    fn write_slice(&mut self, n: usize) -> Result<&mut [u8]> {
        self.check_poisoned()?;
        let len = self.buffer.len();
        if n <= self.limit - len {
            self.buffer.resize(len + n, 0);
            return Ok(&mut self.buffer[len..]);
        }

        self.flush()?;
        if n >= self.capacity {
            log::debug!("oversized write of {} bytes, growing buffer", n);
            let mut buffer = Vec::new();
            reserve(&mut buffer, n)?;
            self.buffer = buffer;
            self.limit = n.saturating_mul(2).saturating_add(1);
        }
        self.buffer.resize(n, 0);
        Ok(&mut self.buffer[..])
    }
}

impl<M: Write + io::Seek> Seeker for BufferedWriter<M> {
    /// Seeking to the current offset is free. Any other target commits the
    /// pending bytes before the medium is repositioned.
    fn seek(&mut self, pos: SeekFrom) -> Result<i64> {
        self.check_poisoned()?;
        let target = match pos {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(offset) => shifted(self.offset(), offset)?,
            SeekFrom::End(offset) => {
                self.flush()?;
                self.start = self.medium.seek(io::SeekFrom::End(offset))? as i64;
                return Ok(self.start);
            }
        };
        if target == self.offset() {
            return Ok(target);
        }

        let pos = absolute(target)?;
        self.flush()?;
        self.start = self.medium.seek(pos)? as i64;
        Ok(self.start)
    }

    fn offset(&self) -> i64 {
        self.start + self.buffer.len() as i64
    }
}

impl<M: Write + io::Seek> Write for BufferedWriter<M> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_slice(buf.len())?.copy_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        BufferedWriter::flush(self)?;
        self.medium.flush()
    }
}

impl<M: Write + io::Seek> io::Seek for BufferedWriter<M> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        std_position(Seeker::seek(self, pos.try_into()?)?)
    }
}
