use thiserror::Error;

/// Custom error types for the viewio library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from std::io operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The medium ended before a read could be fully satisfied.
    ///
    /// This is fatal for the read that produced it: binary decoding has no
    /// meaningful partial result. It is never used for an expected end of data.
    #[error("Unexpected end of stream at offset {offset}: wanted {wanted} bytes, got {got}")]
    UnexpectedEof {
        offset: i64,
        wanted: usize,
        got: usize,
    },

    /// A buffered writer could not commit its pending bytes to the medium.
    ///
    /// Fatal: the medium may hold a prefix of the pending bytes, so a retry
    /// could duplicate or interleave data. The writer is poisoned afterwards.
    #[error("Flushing {pending} bytes at offset {offset} failed: {source}")]
    FlushFailed {
        offset: i64,
        pending: usize,
        #[source]
        source: std::io::Error,
    },

    /// Operation on a writer that previously failed to flush.
    #[error("Writer is poisoned by an earlier flush failure")]
    Poisoned,

    /// A seek resolved to an address before the start of the medium.
    #[error("Cannot go to negative offset {target}")]
    NegativeOffset { target: i64 },

    /// A relative seek or offset computation does not fit in an `i64`.
    #[error("Offset {offset} moved by {delta} overflows")]
    OffsetOverflow { offset: i64, delta: i64 },

    /// Bytes requested as a string were not valid UTF-8.
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Create a new `UnexpectedEof` error.
    pub fn unexpected_eof(offset: i64, wanted: usize, got: usize) -> Self {
        Self::UnexpectedEof {
            offset,
            wanted,
            got,
        }
    }

    /// Whether this error leaves no safe way to retry the failed operation.
    ///
    /// Truncated reads and failed flushes are fatal; a negative offset or an
    /// invalid string is an ordinary input validation failure.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedEof { .. } | Self::FlushFailed { .. } | Self::Poisoned
        )
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;
        match err {
            Error::Io(e) => e,
            Error::FlushFailed { source, .. } => source,
            Error::UnexpectedEof { .. } => std::io::Error::new(ErrorKind::UnexpectedEof, err),
            Error::NegativeOffset { .. } | Error::OffsetOverflow { .. } => {
                std::io::Error::new(ErrorKind::InvalidInput, err)
            }
            Error::InvalidUtf8(_) => std::io::Error::new(ErrorKind::InvalidData, err),
            Error::Poisoned => std::io::Error::new(ErrorKind::Other, err),
        }
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;
