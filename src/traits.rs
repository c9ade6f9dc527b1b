//! Core traits for the viewio library.
//!
//! Everything that moves bytes is built against two small capability
//! contracts, [`ByteReader`] and [`ByteWriter`]. Coordinate management goes
//! through [`Seeker`].

use crate::error::{Error, Result};
use std::io;

/// A position to seek to, relative to one of three anchors.
///
/// Unlike [`std::io::SeekFrom`], `Start` carries a signed offset: inside a
/// view, "start" is the view's local zero and a negative target addresses
/// bytes that precede the view's base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekFrom {
    /// Relative to the start (of the medium, or of a view).
    Start(i64),
    /// Relative to the current offset.
    Current(i64),
    /// Relative to the end of the medium.
    End(i64),
}

/// Fails with [`Error::OffsetOverflow`] for a `Start` beyond `i64::MAX`.
impl TryFrom<io::SeekFrom> for SeekFrom {
    type Error = Error;

    fn try_from(pos: io::SeekFrom) -> Result<Self> {
        Ok(match pos {
            io::SeekFrom::Start(offset) => {
                let offset = i64::try_from(offset).map_err(|_| Error::OffsetOverflow {
                    offset: i64::MAX,
                    delta: offset.saturating_sub(i64::MAX as u64) as i64,
                })?;
                SeekFrom::Start(offset)
            }
            io::SeekFrom::Current(offset) => SeekFrom::Current(offset),
            io::SeekFrom::End(offset) => SeekFrom::End(offset),
        })
    }
}

/// `offset + delta`, or [`Error::OffsetOverflow`].
pub(crate) fn shifted(offset: i64, delta: i64) -> Result<i64> {
    offset
        .checked_add(delta)
        .ok_or(Error::OffsetOverflow { offset, delta })
}

/// Reserves room for `additional` more bytes, surfacing an impossible
/// allocation as an I/O error.
pub(crate) fn reserve(buffer: &mut Vec<u8>, additional: usize) -> Result<()> {
    buffer
        .try_reserve_exact(additional)
        .map_err(|err| Error::Io(io::Error::new(io::ErrorKind::OutOfMemory, err)))
}

/// Converts an absolute offset into a std seek target for the medium.
pub(crate) fn absolute(offset: i64) -> Result<io::SeekFrom> {
    u64::try_from(offset)
        .map(io::SeekFrom::Start)
        .map_err(|_| Error::NegativeOffset { target: offset })
}

/// Converts an offset reported by a [`Seeker`] into a std seek result.
pub(crate) fn std_position(offset: i64) -> io::Result<u64> {
    u64::try_from(offset).map_err(|_| Error::NegativeOffset { target: offset }.into())
}

/// The read capability: "give me the next `n` bytes at the current offset".
pub trait ByteReader {
    /// Returns exactly the next `n` bytes and advances the offset by `n`.
    ///
    /// The slice borrows the reader and is only valid until the next call on
    /// it. Copy out anything that has to outlive that.
    fn read_slice(&mut self, n: usize) -> Result<&[u8]>;
}

/// The write capability: "give me `n` writable bytes at the current offset".
pub trait ByteWriter {
    /// Returns a writable window of exactly `n` bytes and advances the offset
    /// by `n`.
    ///
    /// Whatever is written into the window is logically committed: it is
    /// observable through the same instance, though not necessarily flushed
    /// to the medium yet.
    fn write_slice(&mut self, n: usize) -> Result<&mut [u8]>;
}

/// Something with a current offset that can be repositioned.
pub trait Seeker {
    /// Moves to `pos` and returns the resulting offset.
    fn seek(&mut self, pos: SeekFrom) -> Result<i64>;

    /// The offset at which the next read or write happens.
    fn offset(&self) -> i64;
}

impl<R: ByteReader + ?Sized> ByteReader for &mut R {
    fn read_slice(&mut self, n: usize) -> Result<&[u8]> {
        (**self).read_slice(n)
    }
}

impl<W: ByteWriter + ?Sized> ByteWriter for &mut W {
    fn write_slice(&mut self, n: usize) -> Result<&mut [u8]> {
        (**self).write_slice(n)
    }
}

impl<S: Seeker + ?Sized> Seeker for &mut S {
    fn seek(&mut self, pos: SeekFrom) -> Result<i64> {
        (**self).seek(pos)
    }

    fn offset(&self) -> i64 {
        (**self).offset()
    }
}
