//! Typed reads and writes of fixed-width primitives.
//!
//! These are stateless extension traits: every operation is a single
//! `read_slice(width)` or `write_slice(width)` on the capability contract.
//! Integers are little-endian, floats are IEEE-754 bit patterns, booleans
//! are one byte. Strings and byte runs carry no framing; the caller supplies
//! the byte length.

use crate::error::Result;
use crate::traits::{ByteReader, ByteWriter};

macro_rules! read_le {
    ($($(#[$doc:meta])* $name:ident => $ty:ty;)*) => {
        $(
            $(#[$doc])*
            fn $name(&mut self) -> Result<$ty> {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                let mut raw = [0u8; WIDTH];
                raw.copy_from_slice(self.read_slice(WIDTH)?);
                Ok(<$ty>::from_le_bytes(raw))
            }
        )*
    };
}

macro_rules! write_le {
    ($($(#[$doc:meta])* $name:ident => $ty:ty;)*) => {
        $(
            $(#[$doc])*
            fn $name(&mut self, value: $ty) -> Result<()> {
                let raw = value.to_le_bytes();
                self.write_slice(raw.len())?.copy_from_slice(&raw);
                Ok(())
            }
        )*
    };
}

/// Typed decoding on top of any [`ByteReader`].
pub trait ReadExt: ByteReader {
    read_le! {
        /// Reads an unsigned byte.
        read_u8 => u8;
        /// Reads a signed byte.
        read_i8 => i8;
        read_u16 => u16;
        read_i16 => i16;
        read_u32 => u32;
        read_i32 => i32;
        read_u64 => u64;
        read_i64 => i64;
    }

    /// Reads a 32bit IEEE-754 value without any rounding.
    fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reads a 64bit IEEE-754 value without any rounding.
    fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Reads a single byte boolean. Any nonzero byte is `true`.
    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Fills `out` with the next `out.len()` bytes.
    fn read_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        let len = out.len();
        out.copy_from_slice(self.read_slice(len)?);
        Ok(())
    }

    /// Reads `len` bytes into a fresh vector.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        Ok(self.read_slice(len)?.to_vec())
    }

    /// Reads a UTF-8 string of `len` bytes (not characters).
    fn read_string(&mut self, len: usize) -> Result<String> {
        Ok(String::from_utf8(self.read_vec(len)?)?)
    }
}

impl<R: ByteReader + ?Sized> ReadExt for R {}

/// Typed encoding on top of any [`ByteWriter`].
pub trait WriteExt: ByteWriter {
    write_le! {
        /// Writes an unsigned byte.
        write_u8 => u8;
        /// Writes a signed byte.
        write_i8 => i8;
        write_u16 => u16;
        write_i16 => i16;
        write_u32 => u32;
        write_i32 => i32;
        write_u64 => u64;
        write_i64 => i64;
    }

    fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_u32(value.to_bits())
    }

    fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_u64(value.to_bits())
    }

    /// Writes a boolean as exactly `0` or `1`.
    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.write_slice(value.len())?.copy_from_slice(value);
        Ok(())
    }

    /// Writes the raw UTF-8 bytes of `value`, with no terminator or length.
    fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_bytes(value.as_bytes())
    }
}

impl<W: ByteWriter + ?Sized> WriteExt for W {}
