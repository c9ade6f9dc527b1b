use std::cell::Cell;
use std::io::{Cursor, Read, Result, Seek, SeekFrom, Write};
use std::rc::Rc;

/// Call counters that stay readable after the medium moved into a reader.
#[derive(Clone, Default)]
pub struct Calls {
    reads: Rc<Cell<usize>>,
    writes: Rc<Cell<usize>>,
    seeks: Rc<Cell<usize>>,
}

impl Calls {
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    #[allow(dead_code)]
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn seeks(&self) -> usize {
        self.seeks.get()
    }

    /// Total number of operations issued against the medium.
    pub fn total(&self) -> usize {
        self.reads() + self.writes() + self.seeks()
    }
}

/// An in-memory medium that counts every operation issued against it.
pub struct CountingMedium {
    inner: Cursor<Vec<u8>>,
    calls: Calls,
}

impl CountingMedium {
    pub fn new(data: Vec<u8>) -> (Self, Calls) {
        let calls = Calls::default();
        let medium = Self {
            inner: Cursor::new(data),
            calls: calls.clone(),
        };
        (medium, calls)
    }

    #[allow(dead_code)]
    pub fn into_data(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl Read for CountingMedium {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.calls.reads.set(self.calls.reads.get() + 1);
        self.inner.read(buf)
    }
}

impl Write for CountingMedium {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.calls.writes.set(self.calls.writes.get() + 1);
        self.inner.write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Seek for CountingMedium {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.calls.seeks.set(self.calls.seeks.get() + 1);
        self.inner.seek(pos)
    }
}
