//! Unbuffered, offset-tracking access to a medium.
//!
//! These adapters give a plain `Read + Seek` or `Write + Seek` medium an
//! offset of its own, so it can sit under a [`SeekerView`](crate::SeekerView)
//! without a window in between. Both reposition the medium before touching
//! it and are therefore safe to use on a medium shared with others.

use crate::error::{Error, Result};
use crate::reader::DEFAULT_CAPACITY;
use crate::traits::{
    absolute, reserve, shifted, std_position, ByteReader, ByteWriter, SeekFrom, Seeker,
};
use std::io::{self, Read, Write};

/// Reads straight from the medium at its own tracked offset.
pub struct StreamReader<M> {
    medium: M,
    offset: i64,
    scratch: Vec<u8>,
}

impl<M: Read + io::Seek> StreamReader<M> {
    /// Creates a reader at the medium's current position.
    pub fn new(mut medium: M) -> Result<Self> {
        let offset = medium.stream_position()? as i64;
        Ok(Self {
            medium,
            offset,
            scratch: Vec::new(),
        })
    }

    pub fn get_ref(&self) -> &M {
        &self.medium
    }

    pub fn into_inner(self) -> M {
        self.medium
    }

    /// Reads into `buf` until it is full or the medium ends.
    fn fill(medium: &mut M, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match medium.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<M: Read + io::Seek> ByteReader for StreamReader<M> {
    /// Reads in chunks of at most [`DEFAULT_CAPACITY`] so the scratch space
    /// only grows as far as the medium actually delivers.
    fn read_slice(&mut self, n: usize) -> Result<&[u8]> {
        self.scratch.clear();
        self.medium.seek(absolute(self.offset)?)?;

        while self.scratch.len() < n {
            let filled = self.scratch.len();
            let chunk = (n - filled).min(DEFAULT_CAPACITY);
            self.scratch.resize(filled + chunk, 0);
            let got = match Self::fill(&mut self.medium, &mut self.scratch[filled..]) {
                Ok(got) => got,
                Err(err) => {
                    self.scratch.clear();
                    return Err(err.into());
                }
            };
            if got < chunk {
                self.scratch.clear();
                return Err(Error::unexpected_eof(self.offset, n, filled + got));
            }
        }
        self.offset = shifted(self.offset, self.scratch.len() as i64)?;
        Ok(&self.scratch)
    }
}

impl<M: Read + io::Seek> Seeker for StreamReader<M> {
    fn seek(&mut self, pos: SeekFrom) -> Result<i64> {
        let target = match pos {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(offset) => shifted(self.offset, offset)?,
            SeekFrom::End(offset) => self.medium.seek(io::SeekFrom::End(offset))? as i64,
        };
        if target < 0 {
            return Err(Error::NegativeOffset { target });
        }
        self.offset = target;
        Ok(target)
    }

    fn offset(&self) -> i64 {
        self.offset
    }
}

impl<M: Read + io::Seek> Read for StreamReader<M> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.medium.seek(absolute(self.offset)?)?;
        let n = self.medium.read(buf)?;
        self.offset += n as i64;
        Ok(n)
    }
}

impl<M: Read + io::Seek> io::Seek for StreamReader<M> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        std_position(Seeker::seek(self, pos.try_into()?)?)
    }
}

/// Writes to the medium while tracking its offset.
///
/// Raw [`Write`] calls go straight through. Typed writes need a buffer to
/// encode into, so the bytes handed out by [`ByteWriter::write_slice`] are
/// held back until the next operation on the writer, or an explicit
/// [`flush`](StreamWriter::flush), commits them at their offset.
pub struct StreamWriter<M> {
    medium: M,
    // Offset of the first pending byte; everything before it is committed.
    offset: i64,
    pending: Vec<u8>,
}

impl<M: Write + io::Seek> StreamWriter<M> {
    /// Creates a writer at the medium's current position.
    pub fn new(mut medium: M) -> Result<Self> {
        let offset = medium.stream_position()? as i64;
        Ok(Self {
            medium,
            offset,
            pending: Vec::new(),
        })
    }

    /// Moves the medium back to this writer's offset, for when something else
    /// has repositioned a shared medium in between.
    pub fn seek_current(&mut self) -> Result<()> {
        self.flush()?;
        self.medium.seek(absolute(self.offset)?)?;
        Ok(())
    }

    /// Number of typed bytes not yet committed to the medium.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Commits the pending typed bytes at their offset.
    ///
    /// On failure the pending bytes are dropped: the medium may already hold
    /// a prefix of them.
    pub fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let pending = self.pending.len();
        let committed = absolute(self.offset).and_then(|pos| {
            self.medium.seek(pos)?;
            self.medium.write_all(&self.pending)?;
            Ok(())
        });
        self.pending.clear();
        if let Err(err) = committed {
            log::warn!(
                "commit of {} bytes at offset {} failed",
                pending,
                self.offset
            );
            let source = match err {
                Error::Io(e) => e,
                other => io::Error::new(io::ErrorKind::Other, other),
            };
            return Err(Error::FlushFailed {
                offset: self.offset,
                pending,
                source,
            });
        }
        self.offset = shifted(self.offset, pending as i64)?;
        Ok(())
    }

    pub fn get_ref(&self) -> &M {
        &self.medium
    }

    /// Commits pending bytes, then returns the underlying medium.
    pub fn into_inner(mut self) -> Result<M> {
        self.flush()?;
        Ok(self.medium)
    }
}

impl<M: Write + io::Seek> ByteWriter for StreamWriter<M> {
    fn write_slice(&mut self, n: usize) -> Result<&mut [u8]> {
        self.flush()?;
        reserve(&mut self.pending, n)?;
        self.pending.resize(n, 0);
        Ok(&mut self.pending[..])
    }
}

impl<M: Write + io::Seek> Seeker for StreamWriter<M> {
    fn seek(&mut self, pos: SeekFrom) -> Result<i64> {
        let pos = match pos {
            SeekFrom::Start(offset) => absolute(offset)?,
            SeekFrom::Current(offset) => absolute(shifted(self.offset(), offset)?)?,
            SeekFrom::End(offset) => io::SeekFrom::End(offset),
        };
        self.flush()?;
        self.offset = self.medium.seek(pos)? as i64;
        Ok(self.offset)
    }

    fn offset(&self) -> i64 {
        self.offset + self.pending.len() as i64
    }
}

impl<M: Write + io::Seek> Write for StreamWriter<M> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        StreamWriter::flush(self)?;
        let n = self.medium.write(buf)?;
        self.offset += n as i64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        StreamWriter::flush(self)?;
        self.medium.flush()
    }
}

impl<M: Write + io::Seek> io::Seek for StreamWriter<M> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        std_position(Seeker::seek(self, pos.try_into()?)?)
    }
}
