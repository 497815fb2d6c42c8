//! # Byte Cursor
//!
//! Positioned primitive reader/writer underneath the PAK codec.
//!
//! Every PAK field is one of three fixed-width primitives, always in the
//! same byte order:
//!
//! | Primitive | Width | Used for |
//! |-----------|-------|----------|
//! | `i16` | 2 bytes | file header (`array_count`) |
//! | `i32` | 4 bytes | group counts, complex flags, channel lengths |
//! | `f64` | 8 bytes | channel values |
//!
//! The legacy files were produced by a 32-bit-`long` Windows build on x86,
//! so the byte order is little-endian ([`PakEndian`]) and is not configurable.
//!
//! Cursors are generic over [`Read`]/[`Write`] so the codec can run against
//! files or in-memory buffers alike.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::error::{PakError, Result};


/// Byte order of every multi-byte PAK field
pub type PakEndian = byteorder::LittleEndian;

/// The two fixed modes a PAK handle can be opened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Existing file, positioned at its first byte, read-only
    Read,
    /// New or truncated file, write-only
    Write,
}

/// Open `path` in the given mode, classifying failures into [`PakError`]
pub fn open_file<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<File> {
    let path = path.as_ref();
    let result = match mode {
        OpenMode::Read => File::open(path),
        OpenMode::Write => OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path),
    };
    result.map_err(|e| PakError::from_open(e, path, mode))
}

/// Positioned little-endian reader
pub struct ByteReader<R: Read> {
    inner: R,
    position: u64,
}

impl ByteReader<BufReader<File>> {
    /// Open a file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = open_file(path, OpenMode::Read)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> ByteReader<R> {
    /// Wrap any reader; the position starts at zero
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read one `i16`, naming `field` if the input ends first
    pub fn read_i16(&mut self, field: &'static str) -> Result<i16> {
        let value = self
            .inner
            .read_i16::<PakEndian>()
            .map_err(|e| PakError::from_read(e, field))?;
        self.position += 2;
        Ok(value)
    }

    /// Read one `i32`
    pub fn read_i32(&mut self, field: &'static str) -> Result<i32> {
        let value = self
            .inner
            .read_i32::<PakEndian>()
            .map_err(|e| PakError::from_read(e, field))?;
        self.position += 4;
        Ok(value)
    }

    /// Read one `f64`
    pub fn read_f64(&mut self, field: &'static str) -> Result<f64> {
        let value = self
            .inner
            .read_f64::<PakEndian>()
            .map_err(|e| PakError::from_read(e, field))?;
        self.position += 8;
        Ok(value)
    }

    /// Read exactly `count` doubles into a freshly allocated buffer
    ///
    /// The buffer grows in bounded chunks so a corrupt count cannot force
    /// a huge allocation before the input runs out.
    pub fn read_f64_vec(&mut self, count: usize, field: &'static str) -> Result<Vec<f64>> {
        const CHUNK: usize = 64 * 1024;

        let mut values = Vec::with_capacity(count.min(CHUNK));
        let mut remaining = count;
        while remaining > 0 {
            let take = remaining.min(CHUNK);
            let start = values.len();
            values.resize(start + take, 0.0);
            self.inner
                .read_f64_into::<PakEndian>(&mut values[start..])
                .map_err(|e| PakError::from_read(e, field))?;
            self.position += (take * 8) as u64;
            remaining -= take;
        }
        Ok(values)
    }

    /// Fill `buf` completely from the input
    pub fn read_bytes(&mut self, buf: &mut [u8], field: &'static str) -> Result<()> {
        self.inner
            .read_exact(buf)
            .map_err(|e| PakError::from_read(e, field))?;
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Whether the input has no bytes left
    ///
    /// Only meaningful at a record boundary; consumes nothing.
    pub fn is_exhausted(&mut self) -> Result<bool>
    where
        R: std::io::BufRead,
    {
        let buf = self.inner.fill_buf().map_err(PakError::IoRead)?;
        Ok(buf.is_empty())
    }

    /// Release the underlying reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Positioned little-endian writer
pub struct ByteWriter<W: Write> {
    inner: W,
    position: u64,
}

impl ByteWriter<BufWriter<File>> {
    /// Create or truncate a file for writing
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = open_file(path, OpenMode::Write)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ByteWriter<W> {
    /// Wrap any writer; the position starts at zero
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes written so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Write one `i16`
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.inner
            .write_i16::<PakEndian>(value)
            .map_err(PakError::IoWrite)?;
        self.position += 2;
        Ok(())
    }

    /// Write one `i32`
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.inner
            .write_i32::<PakEndian>(value)
            .map_err(PakError::IoWrite)?;
        self.position += 4;
        Ok(())
    }

    /// Write one `f64`
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.inner
            .write_f64::<PakEndian>(value)
            .map_err(PakError::IoWrite)?;
        self.position += 8;
        Ok(())
    }

    /// Write a run of doubles back to back
    pub fn write_f64_slice(&mut self, values: &[f64]) -> Result<()> {
        for &value in values {
            self.write_f64(value)?;
        }
        Ok(())
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes).map_err(PakError::IoWrite)?;
        self.position += bytes.len() as u64;
        Ok(())
    }

    /// Flush buffered bytes to the underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(PakError::IoWrite)
    }

    /// Flush and release the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.inner)
    }
}
