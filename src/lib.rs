//! # viewio (v0.1.0)
//!
//! Buffered, offset-tracked binary I/O with relative views.
//!
//! ## Overview
//!
//! `viewio` gives binary-format decoders and encoders fixed-width primitive
//! access over any seekable medium, plus "views" that let nested structures
//! be addressed in local coordinates. It is meant as the foundation for
//! parsers of formats with self-relative offsets: length-prefixed blocks,
//! offset tables, nested records.
//!
//! ## Key Features
//!
//! * **Windowed Reading**: A sliding window over the medium serves small reads
//!   without copying and without touching the medium
//! * **Lazy Seeking**: Seeks inside the cached window cost no I/O at all
//! * **Batched Writing**: Writes are appended in memory and committed on
//!   overflow, seek or explicit flush
//! * **Relative Views**: Nested coordinate systems that compose additively
//! * **In-Memory Medium**: A growable buffer usable wherever a file would be
//!
//! ## Quick Start
//!
//! ```rust
//! use viewio::*;
//!
//! fn main() -> Result<()> {
//!     let mut medium = MemoryBuffer::new();
//!
//!     let mut writer = BufferedWriter::new(&mut medium)?;
//!     writer.write_u32(0xDEAD_BEEF)?;
//!     writer.write_i16(-1)?;
//!     writer.flush()?;
//!
//!     let mut reader = BufferedReader::new(&mut medium)?;
//!     reader.seek(SeekFrom::Start(0))?;
//!     assert_eq!(reader.read_u32()?, 0xDEAD_BEEF);
//!     assert_eq!(reader.read_i16()?, -1);
//!     assert_eq!(reader.offset(), 6);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is built around three core traits:
//!
//! * **`ByteReader`**: "give me the next `n` bytes" (borrowed until the next call)
//! * **`ByteWriter`**: "give me `n` writable bytes"
//! * **`Seeker`**: a current offset that can be moved
//!
//! Typed access (`ReadExt`, `WriteExt`) is a stateless layer over the first
//! two. Views only intercept seeking; every byte still flows through the
//! buffered reader or writer underneath.
//!
//! None of the types are thread-safe, and several instances sharing one
//! medium must be driven strictly one operation at a time.

pub mod codec;
pub mod error;
pub mod memory;
pub mod reader;
pub mod shared;
pub mod stream;
pub mod traits;
pub mod view;
pub mod writer;

// Re-export the main public API for user convenience.
pub use codec::{ReadExt, WriteExt};
pub use error::{Error, Result};
pub use memory::MemoryBuffer;
pub use reader::{BufferedReader, DEFAULT_CAPACITY, MIN_CAPACITY};
pub use shared::Shared;
pub use stream::{StreamReader, StreamWriter};
pub use traits::{ByteReader, ByteWriter, SeekFrom, Seeker};
pub use view::{ReaderView, SeekerView, WriterView};
pub use writer::BufferedWriter;
