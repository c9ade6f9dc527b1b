//! A cloneable handle to one medium, for several readers or writers.

use std::cell::{Ref, RefCell, RefMut};
use std::io::{self, Read, Write};
use std::rc::Rc;

/// A single-threaded shared medium.
///
/// Clones refer to the same medium and the same physical position, which is
/// exactly what [`BufferedReader::duplicate`](crate::BufferedReader::duplicate)
/// expects. It is neither `Send` nor `Sync`: instances sharing a medium are
/// meant to be driven one operation at a time from one thread.
#[derive(Debug, Default)]
pub struct Shared<M>(Rc<RefCell<M>>);

impl<M> Shared<M> {
    pub fn new(medium: M) -> Self {
        Self(Rc::new(RefCell::new(medium)))
    }

    pub fn borrow(&self) -> Ref<'_, M> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, M> {
        self.0.borrow_mut()
    }

    /// Returns the medium if this is the last handle to it.
    pub fn try_unwrap(self) -> std::result::Result<M, Self> {
        Rc::try_unwrap(self.0)
            .map(RefCell::into_inner)
            .map_err(Self)
    }
}

impl<M> Clone for Shared<M> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<M: Read> Read for Shared<M> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.borrow_mut().read(buf)
    }
}

impl<M: Write> Write for Shared<M> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

impl<M: io::Seek> io::Seek for Shared<M> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        self.0.borrow_mut().seek(pos)
    }
}
