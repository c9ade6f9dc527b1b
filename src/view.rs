//! Relative addressing over any [`Seeker`].
//!
//! A view is a seeker plus a base offset. It lets a nested decoder or encoder
//! work in local coordinates ("entry 3 lives at local offset 24") without
//! knowing where its structure sits in the medium. The innermost seeker stays
//! the only owner of the real offset; a view just subtracts its base.

use crate::error::{Error, Result};
use crate::reader::BufferedReader;
use crate::traits::{shifted, ByteReader, ByteWriter, SeekFrom, Seeker};
use crate::writer::BufferedWriter;
use std::io::{self, Read, Write};

/// A coordinate transform giving a seeker a local zero at `base`.
///
/// Only [`SeekFrom::Start`] is translated; `Current` and `End` pass through
/// untouched. The local offset may be negative when the seeker sits before the
/// base, which is a valid "look-behind" position rather than an error. A seek
/// that lands before the start of the medium reports its target in local
/// coordinates.
///
/// ```rust
/// use viewio::{MemoryBuffer, SeekFrom, Seeker, SeekerView};
///
/// let mut buf = MemoryBuffer::new();
/// let mut outer = SeekerView::new(&mut buf, 100);
/// let mut inner = outer.view(8);
/// inner.seek(SeekFrom::Start(0))?;
/// assert_eq!(inner.global_offset(), 108);
/// assert_eq!(inner.offset(), 0);
/// # Ok::<(), viewio::Error>(())
/// ```
#[derive(Debug)]
pub struct SeekerView<S> {
    inner: S,
    base: i64,
}

impl<S: Seeker> SeekerView<S> {
    /// Creates a view whose local zero is the global offset `base`.
    pub fn new(inner: S, base: i64) -> Self {
        Self { inner, base }
    }

    /// Creates a view based at the seeker's current offset.
    pub fn here(inner: S) -> Self {
        let base = inner.offset();
        Self { inner, base }
    }

    /// The global offset this view treats as local zero.
    pub fn base(&self) -> i64 {
        self.base
    }

    /// The offset of the wrapped seeker, in its own coordinates.
    pub fn global_offset(&self) -> i64 {
        self.inner.offset()
    }

    /// Translates a global offset into this view's coordinates.
    pub fn local(&self, global: i64) -> i64 {
        global - self.base
    }

    /// Derives a nested view at local offset `delta` of this one.
    ///
    /// The nested view borrows the same seeker; no I/O happens.
    pub fn view(&mut self, delta: i64) -> SeekerView<&mut S> {
        SeekerView {
            base: self.base + delta,
            inner: &mut self.inner,
        }
    }

    /// Derives a nested view based at the current offset.
    pub fn view_here(&mut self) -> SeekerView<&mut S> {
        let here = self.offset();
        self.view(here)
    }

    /// Moves this view's own base by `delta`, in place.
    pub fn rebase(&mut self, delta: i64) {
        self.base += delta;
    }

    /// Moves this view's base to the current offset, in place.
    pub fn rebase_here(&mut self) {
        self.base = self.global_offset();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Seeker> Seeker for SeekerView<S> {
    /// Seeks in the wrapped seeker and returns the resulting local offset.
    fn seek(&mut self, pos: SeekFrom) -> Result<i64> {
        let base = self.base;
        let pos = match pos {
            SeekFrom::Start(offset) => SeekFrom::Start(shifted(offset, base)?),
            other => other,
        };
        match self.inner.seek(pos) {
            Ok(global) => Ok(self.local(global)),
            Err(Error::NegativeOffset { target }) => Err(Error::NegativeOffset {
                target: target.saturating_sub(base),
            }),
            Err(err) => Err(err),
        }
    }

    fn offset(&self) -> i64 {
        self.local(self.global_offset())
    }
}

impl<S: ByteReader> ByteReader for SeekerView<S> {
    fn read_slice(&mut self, n: usize) -> Result<&[u8]> {
        self.inner.read_slice(n)
    }
}

impl<S: ByteWriter> ByteWriter for SeekerView<S> {
    fn write_slice(&mut self, n: usize) -> Result<&mut [u8]> {
        self.inner.write_slice(n)
    }
}

/// A buffered reader addressed through a view.
pub type ReaderView<M> = SeekerView<BufferedReader<M>>;

/// A buffered writer addressed through a view.
pub type WriterView<M> = SeekerView<BufferedWriter<M>>;

impl<M: Read + io::Seek> SeekerView<BufferedReader<M>> {
    /// Wraps `medium` in a buffered reader viewed from global zero.
    pub fn buffered(medium: M, capacity: usize) -> Result<Self> {
        Ok(Self::new(BufferedReader::with_capacity(medium, capacity)?, 0))
    }

    pub fn invalidate_buffer(&mut self) {
        self.inner.invalidate_buffer();
    }
}

impl<M: Read + io::Seek + Clone> SeekerView<BufferedReader<M>> {
    /// Duplicates the reader (see [`BufferedReader::duplicate`]), keeping the base.
    pub fn duplicate(&self) -> Self {
        Self::new(self.inner.duplicate(), self.base)
    }
}

impl<M: Write + io::Seek> SeekerView<BufferedWriter<M>> {
    /// Wraps `medium` in a buffered writer viewed from global zero.
    pub fn buffered(medium: M, capacity: usize) -> Result<Self> {
        Ok(Self::new(BufferedWriter::with_capacity(medium, capacity)?, 0))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}

impl<M: Write + io::Seek + Clone> SeekerView<BufferedWriter<M>> {
    /// Flushes, then duplicates the writer, keeping the base.
    pub fn duplicate(&mut self) -> Result<Self> {
        Ok(Self::new(self.inner.duplicate()?, self.base))
    }
}
