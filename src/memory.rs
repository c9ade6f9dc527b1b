//! A growable in-memory medium.

use crate::error::{Error, Result};
use crate::traits::{reserve, shifted, std_position, ByteReader, ByteWriter, SeekFrom, Seeker};
use crate::view::SeekerView;
use std::io::{self, Read, Write};

/// A seekable, writable byte store that stands in for a real medium.
///
/// The length only ever grows, to cover the highest offset that has been
/// written to or seeked to; gaps are zero-filled. Capacity at least doubles
/// when it has to grow.
///
/// A seek to a negative offset fails with [`Error::NegativeOffset`] and
/// leaves the buffer exactly as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBuffer {
    buffer: Vec<u8>,
    offset: usize,
}

impl MemoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            offset: 0,
        }
    }

    /// Empties the buffer and moves back to offset 0, keeping the allocation.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.offset = 0;
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Returns a snapshot copy of the content. Later writes never alter it.
    pub fn to_vec(&self) -> Vec<u8> {
        self.buffer.clone()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Writes the whole content to `out`, returning the number of bytes.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize> {
        out.write_all(&self.buffer)?;
        Ok(self.buffer.len())
    }

    /// A view into this buffer whose local zero is at `base`.
    pub fn view(&mut self, base: i64) -> SeekerView<&mut MemoryBuffer> {
        SeekerView::new(self, base)
    }

    /// Makes sure the buffer is at least `len` bytes long.
    fn grow_to(&mut self, len: usize) -> Result<()> {
        if len > self.buffer.capacity() {
            let doubled = self.buffer.capacity().saturating_mul(2);
            let cur = self.buffer.len();
            if reserve(&mut self.buffer, doubled.max(len) - cur).is_err() {
                reserve(&mut self.buffer, len - cur)?;
            }
        }
        if len > self.buffer.len() {
            self.buffer.resize(len, 0);
        }
        Ok(())
    }
}

impl From<Vec<u8>> for MemoryBuffer {
    fn from(buffer: Vec<u8>) -> Self {
        Self { buffer, offset: 0 }
    }
}

impl Seeker for MemoryBuffer {
    fn seek(&mut self, pos: SeekFrom) -> Result<i64> {
        let target = match pos {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(offset) => shifted(self.offset as i64, offset)?,
            SeekFrom::End(offset) => shifted(self.buffer.len() as i64, offset)?,
        };
        let offset = usize::try_from(target).map_err(|_| Error::NegativeOffset { target })?;
        self.grow_to(offset)?;
        self.offset = offset;
        Ok(target)
    }

    fn offset(&self) -> i64 {
        self.offset as i64
    }
}

impl ByteWriter for MemoryBuffer {
    fn write_slice(&mut self, n: usize) -> Result<&mut [u8]> {
        let start = self.offset;
        let end = start.checked_add(n).ok_or(Error::OffsetOverflow {
            offset: start as i64,
            delta: i64::try_from(n).unwrap_or(i64::MAX),
        })?;
        self.grow_to(end)?;
        self.offset = end;
        Ok(&mut self.buffer[start..end])
    }
}

impl ByteReader for MemoryBuffer {
    fn read_slice(&mut self, n: usize) -> Result<&[u8]> {
        let start = self.offset;
        let available = self.buffer.len() - start;
        if n > available {
            return Err(Error::unexpected_eof(start as i64, n, available));
        }
        self.offset = start + n;
        Ok(&self.buffer[start..start + n])
    }
}

impl Write for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_slice(buf.len())?.copy_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for MemoryBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.buffer.len() - self.offset);
        buf[..n].copy_from_slice(self.read_slice(n)?);
        Ok(n)
    }
}

impl io::Seek for MemoryBuffer {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        std_position(Seeker::seek(self, pos.try_into()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{ReadExt, WriteExt};

    #[test]
    fn test_negative_seek_leaves_state_untouched() {
        let mut buf = MemoryBuffer::with_capacity(4);
        buf.write_bytes(b"abc").unwrap();
        let (len, cap, offset) = (buf.len(), buf.capacity(), buf.offset());

        for pos in [
            SeekFrom::Start(-1),
            SeekFrom::Current(-4),
            SeekFrom::End(-100),
        ] {
            assert!(matches!(buf.seek(pos), Err(Error::NegativeOffset { .. })));
            assert_eq!(buf.len(), len);
            assert_eq!(buf.capacity(), cap);
            assert_eq!(buf.offset(), offset);
        }
        assert_eq!(buf.as_slice(), b"abc");
    }

    #[test]
    fn test_unreachable_offsets_leave_state_untouched() {
        let mut buf = MemoryBuffer::with_capacity(4);
        buf.write_bytes(b"abc").unwrap();

        assert!(matches!(
            buf.seek(SeekFrom::Current(i64::MAX)),
            Err(Error::OffsetOverflow {
                offset: 3,
                delta: i64::MAX
            })
        ));
        assert!(matches!(
            buf.seek(SeekFrom::End(i64::MAX)),
            Err(Error::OffsetOverflow { .. })
        ));
        assert!(matches!(
            buf.seek(SeekFrom::Start(i64::MAX)),
            Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::OutOfMemory
        ));
        assert!(matches!(
            buf.write_slice(usize::MAX),
            Err(Error::OffsetOverflow { offset: 3, .. })
        ));
        assert_eq!(buf.offset(), 3);
        assert_eq!(buf.as_slice(), b"abc");

        let err = io::Seek::seek(&mut buf, io::SeekFrom::Start(u64::MAX)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(buf.offset(), 3);
    }

    #[test]
    fn test_growth_keeps_prior_bytes() {
        let mut buf = MemoryBuffer::with_capacity(2);
        buf.write_bytes(b"xy").unwrap();
        let big = vec![7u8; 1000];
        buf.write_bytes(&big).unwrap();
        assert_eq!(&buf.as_slice()[..2], b"xy");
        assert_eq!(&buf.as_slice()[2..], &big[..]);
    }

    #[test]
    fn test_capacity_at_least_doubles() {
        let mut buf = MemoryBuffer::with_capacity(16);
        buf.write_bytes(&[0; 16]).unwrap();
        let cap = buf.capacity();
        buf.write_u8(1).unwrap();
        assert!(buf.capacity() >= 2 * cap);
    }

    #[test]
    fn test_seek_past_end_extends_with_zeros() {
        let mut buf = MemoryBuffer::new();
        buf.write_u8(9).unwrap();
        buf.seek(SeekFrom::Start(5)).unwrap();
        assert_eq!(buf.len(), 5);
        buf.write_u8(1).unwrap();
        assert_eq!(buf.to_vec(), vec![9, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_length_tracks_highest_offset() {
        let mut buf = MemoryBuffer::new();
        buf.seek(SeekFrom::Start(10)).unwrap();
        buf.seek(SeekFrom::Start(2)).unwrap();
        buf.write_u16(0xffff).unwrap();
        assert_eq!(buf.len(), 10);
        buf.seek(SeekFrom::End(3)).unwrap();
        assert_eq!(buf.len(), 13);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut buf = MemoryBuffer::new();
        buf.write_bytes(b"before").unwrap();
        let snapshot = buf.to_vec();
        buf.seek(SeekFrom::Start(0)).unwrap();
        buf.write_bytes(b"AFTER!").unwrap();
        assert_eq!(snapshot, b"before".to_vec());
        assert_eq!(buf.as_slice(), b"AFTER!");
    }

    #[test]
    fn test_read_past_end_is_unexpected_eof() {
        let mut buf = MemoryBuffer::from(vec![1, 2, 3]);
        assert_eq!(buf.read_u16().unwrap(), 0x0201);
        assert!(matches!(
            buf.read_u16(),
            Err(Error::UnexpectedEof {
                offset: 2,
                wanted: 2,
                got: 1
            })
        ));
        assert_eq!(buf.offset(), 2);
    }

    #[test]
    fn test_reset_keeps_allocation() {
        let mut buf = MemoryBuffer::new();
        buf.write_bytes(&[1; 64]).unwrap();
        let cap = buf.capacity();
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.offset(), 0);
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn test_write_to() {
        let mut buf = MemoryBuffer::new();
        buf.write_str("dump").unwrap();
        let mut out = Vec::new();
        assert_eq!(buf.write_to(&mut out).unwrap(), 4);
        assert_eq!(out, b"dump".to_vec());
    }

    #[test]
    fn test_view_is_scoped_to_base() {
        let mut buf = MemoryBuffer::new();
        buf.write_bytes(&[0; 8]).unwrap();
        {
            let mut view = buf.view(4);
            view.seek(SeekFrom::Start(0)).unwrap();
            view.write_u16(0xabcd).unwrap();
            assert_eq!(view.offset(), 2);
            assert_eq!(view.global_offset(), 6);
        }
        assert_eq!(&buf.as_slice()[4..6], &[0xcd, 0xab]);
    }
}
