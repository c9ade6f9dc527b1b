use std::io::{Read, Result, Seek, SeekFrom, Write};

/// Wraps a medium and misbehaves on reads and writes in configurable ways.
pub struct FaultyMedium<M> {
    inner: M,
    mode: FaultMode,
    counter: usize,
}

#[allow(dead_code)]
pub enum FaultMode {
    /// Every read returns at most one byte.
    OneByteChunks,
    /// Every n-th read fails with `Interrupted`.
    InterruptedEvery(usize),
    /// Reads report end of stream from the n-th read on.
    PrematureEofAt(usize),
    /// Writes accept this many bytes in total, then fail.
    WriteBudget(usize),
}

impl<M> FaultyMedium<M> {
    pub fn new(inner: M, mode: FaultMode) -> Self {
        Self {
            inner,
            mode,
            counter: 0,
        }
    }

    #[allow(dead_code)]
    pub fn get_ref(&self) -> &M {
        &self.inner
    }

    #[allow(dead_code)]
    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: Read> Read for FaultyMedium<M> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.counter += 1;
        match self.mode {
            FaultMode::OneByteChunks => {
                let end = buf.len().min(1);
                self.inner.read(&mut buf[..end])
            }
            FaultMode::InterruptedEvery(n) if n != 0 && self.counter % n == 0 => {
                Err(std::io::Error::from(std::io::ErrorKind::Interrupted))
            }
            FaultMode::PrematureEofAt(n) if self.counter >= n => Ok(0),
            _ => self.inner.read(buf),
        }
    }
}

impl<M: Write> Write for FaultyMedium<M> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        match &mut self.mode {
            FaultMode::WriteBudget(0) => Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "Simulated I/O error",
            )),
            FaultMode::WriteBudget(budget) => {
                let n = (*budget).min(buf.len());
                *budget -= n;
                self.inner.write(&buf[..n])
            }
            _ => self.inner.write(buf),
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}

impl<M: Seek> Seek for FaultyMedium<M> {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.inner.seek(pos)
    }
}
