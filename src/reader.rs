//! A buffered, lazily seeking reader for binary decoding.

use crate::error::{Error, Result};
use crate::traits::{absolute, shifted, std_position, ByteReader, SeekFrom, Seeker};
use std::io::{self, BufRead, Read};

/// Window capacity used by [`BufferedReader::new`] and [`BufferedWriter::new`].
///
/// [`BufferedWriter::new`]: crate::BufferedWriter::new
pub const DEFAULT_CAPACITY: usize = 4096;

/// Smallest window capacity; smaller requests are rounded up to this.
pub const MIN_CAPACITY: usize = 16;

/// A reader that caches a sliding window of a seekable medium.
///
/// The reader is conceptually a point in the medium (its offset) that moves
/// forward with every read. Reads that fit in the cached window are served
/// from it without copying; reads that straddle the window end, or exceed
/// the window capacity, are assembled in a separate scratch buffer.
///
/// Seeking is lazy: a target inside the cached window only moves the cursor,
/// anything else empties the window and the medium is touched again on the
/// next read. Every refill repositions the medium explicitly, so several
/// readers may share one medium as long as they are driven one operation at
/// a time.
///
/// ```rust
/// use std::io::Cursor;
/// use viewio::{BufferedReader, ReadExt, SeekFrom, Seeker};
///
/// let data: Vec<u8> = (0..64).collect();
/// let mut reader = BufferedReader::with_capacity(Cursor::new(data), 16)?;
///
/// assert_eq!(reader.read_u32()?, u32::from_le_bytes([0, 1, 2, 3]));
/// reader.seek(SeekFrom::Start(40))?;
/// assert_eq!(reader.read_u8()?, 40);
/// assert_eq!(reader.offset(), 41);
/// # Ok::<(), viewio::Error>(())
/// ```
pub struct BufferedReader<M> {
    medium: M,
    // Cached medium bytes starting at `start`; the length is the valid length.
    window: Vec<u8>,
    capacity: usize,
    cursor: usize,
    start: i64,
    // Never aliases the window.
    scratch: Vec<u8>,
}

impl<M: Read + io::Seek> BufferedReader<M> {
    /// Creates a reader with [`DEFAULT_CAPACITY`].
    pub fn new(medium: M) -> Result<Self> {
        Self::with_capacity(medium, DEFAULT_CAPACITY)
    }

    /// Creates a reader whose window holds `capacity` bytes (at least
    /// [`MIN_CAPACITY`]). The reader starts at the medium's current position
    /// with an empty window.
    pub fn with_capacity(mut medium: M, capacity: usize) -> Result<Self> {
        let capacity = capacity.max(MIN_CAPACITY);
        let start = medium.stream_position()? as i64;
        Ok(Self {
            medium,
            window: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
            start,
            scratch: Vec::with_capacity(MIN_CAPACITY),
        })
    }

    /// The window capacity this reader was created with (after the floor).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Empties the window, forcing the next read to go to the medium.
    ///
    /// Needed when the medium may have been modified behind this reader's back.
    pub fn invalidate_buffer(&mut self) {
        self.start = self.offset();
        self.window.clear();
        self.cursor = 0;
    }

    /// Gets a reference to the underlying medium.
    pub fn get_ref(&self) -> &M {
        &self.medium
    }

    /// Consumes the reader, returning the underlying medium. Buffered bytes
    /// are discarded.
    pub fn into_inner(self) -> M {
        self.medium
    }

    /// Moves the window to the bytes that directly follow it.
    fn advance_window(&mut self) -> Result<()> {
        self.start += self.window.len() as i64;
        self.cursor = 0;
        self.window.clear();
        self.medium.seek(absolute(self.start)?)?;

        self.window.resize(self.capacity, 0);
        let mut filled = 0;
        while filled < self.capacity {
            match self.medium.read(&mut self.window[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.window.clear();
                    return Err(e.into());
                }
            }
        }
        self.window.truncate(filled);
        log::trace!("window refilled at offset {}: {} bytes", self.start, filled);
        Ok(())
    }

    /// Puts the reader back at `origin` with an empty window after a failed read.
    fn rewind_to(&mut self, origin: i64) {
        self.window.clear();
        self.cursor = 0;
        self.start = origin;
    }

    fn small_read(&mut self, n: usize) -> Result<&[u8]> {
        let end = self.cursor + n;
        if end <= self.window.len() {
            let from = self.cursor;
            self.cursor = end;
            return Ok(&self.window[from..end]);
        }
        self.spanning_read(n)
    }

    /// Assembles `n` bytes in scratch from the unread window tail followed by
    /// as many window refills as needed. Scratch grows with the bytes actually
    /// delivered, so `n` is never trusted as an allocation size.
    fn spanning_read(&mut self, n: usize) -> Result<&[u8]> {
        let origin = self.offset();
        self.scratch.clear();
        self.scratch.extend_from_slice(&self.window[self.cursor..]);

        while self.scratch.len() < n {
            if let Err(err) = self.advance_window() {
                self.rewind_to(origin);
                return Err(err);
            }
            let need = n - self.scratch.len();
            if self.window.len() < need.min(self.capacity) {
                let got = self.scratch.len() + self.window.len();
                self.rewind_to(origin);
                return Err(Error::unexpected_eof(origin, n, got));
            }
            let take = need.min(self.window.len());
            self.scratch.extend_from_slice(&self.window[..take]);
            self.cursor = take;
        }
        Ok(&self.scratch)
    }
}

impl<M: Read + io::Seek + Clone> BufferedReader<M> {
    /// Returns an independent reader over the same medium.
    ///
    /// The window is deep-copied and the copy gets its own cursor, offset and
    /// scratch space. Both readers reposition the shared medium when they
    /// refill, so they must be driven strictly one operation at a time and
    /// never from two threads.
    pub fn duplicate(&self) -> Self {
        let mut window = Vec::with_capacity(self.capacity);
        window.extend_from_slice(&self.window);
        Self {
            medium: self.medium.clone(),
            window,
            capacity: self.capacity,
            cursor: self.cursor,
            start: self.start,
            scratch: Vec::with_capacity(MIN_CAPACITY),
        }
    }
}

impl<M: Read + io::Seek> ByteReader for BufferedReader<M> {
    fn read_slice(&mut self, n: usize) -> Result<&[u8]> {
        if n < self.capacity {
            self.small_read(n)
        } else {
            self.spanning_read(n)
        }
    }
}

impl<M: Read + io::Seek> Seeker for BufferedReader<M> {
    /// Moves the offset without touching the medium, unless the target is
    /// relative to the end of the medium.
    fn seek(&mut self, pos: SeekFrom) -> Result<i64> {
        let target = match pos {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(offset) => shifted(self.offset(), offset)?,
            SeekFrom::End(offset) => self.medium.seek(io::SeekFrom::End(offset))? as i64,
        };
        if target < 0 {
            return Err(Error::NegativeOffset { target });
        }

        let local = target - self.start;
        if (0..=self.window.len() as i64).contains(&local) {
            self.cursor = local as usize;
        } else {
            log::trace!("seek to {} leaves the window, invalidating", target);
            self.window.clear();
            self.cursor = 0;
            self.start = target;
        }
        Ok(self.offset())
    }

    fn offset(&self) -> i64 {
        self.start + self.cursor as i64
    }
}

impl<M: Read + io::Seek> BufRead for BufferedReader<M> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.cursor == self.window.len() {
            let origin = self.offset();
            if let Err(err) = self.advance_window() {
                self.rewind_to(origin);
                return Err(err.into());
            }
        }
        Ok(&self.window[self.cursor..])
    }

    fn consume(&mut self, amt: usize) {
        self.cursor = (self.cursor + amt).min(self.window.len());
    }
}

impl<M: Read + io::Seek> Read for BufferedReader<M> {
    /// Copies whatever the window can provide, refilling it once if empty.
    /// Returns `Ok(0)` at the end of the medium.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<M: Read + io::Seek> io::Seek for BufferedReader<M> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        std_position(Seeker::seek(self, pos.try_into()?)?)
    }
}
