use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use super::{decode_count, decode_flag};
use crate::cursor::ByteReader;
use crate::dataset::{value_width, Dataset, DatasetName, DatasetParts, NAME_FIELD_LEN};
use crate::error::{PakError, Result};

/// Read handle over a PAK stream
///
/// The file header is consumed when the handle is created, so
/// [`array_count`](Self::array_count) is available immediately and the
/// cursor sits at the first group header.
pub struct PakReader<R: Read> {
    cursor: ByteReader<R>,
    array_count: i16,
}

impl PakReader<BufReader<File>> {
    /// Open a PAK file and read its header
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = Self::from_cursor(ByteReader::open(path)?)?;
        debug!(
            "Opened {} for reading ({} groups declared)",
            path.display(),
            reader.array_count
        );
        Ok(reader)
    }
}

impl<R: Read> PakReader<R> {
    /// Read the file header from any reader positioned at its start
    pub fn new(inner: R) -> Result<Self> {
        Self::from_cursor(ByteReader::new(inner))
    }

    fn from_cursor(mut cursor: ByteReader<R>) -> Result<Self> {
        let array_count = cursor.read_i16("file header")?;
        if array_count < 0 {
            return Err(PakError::Corrupt(format!(
                "file header declares {} groups",
                array_count
            )));
        }
        Ok(Self {
            cursor,
            array_count,
        })
    }

    /// Number of dataset groups the file header declares
    pub fn array_count(&self) -> i16 {
        self.array_count
    }

    /// Bytes consumed so far, file header included
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Read a group header: the number of datasets that follow
    pub fn read_dataset_group_header(&mut self) -> Result<usize> {
        let raw = self.cursor.read_i32("dataset group header")?;
        decode_count(raw, "dataset group count")
    }

    /// Read the 256-byte name field
    pub fn read_name(&mut self) -> Result<DatasetName> {
        let mut raw = [0u8; NAME_FIELD_LEN];
        self.cursor.read_bytes(&mut raw, "dataset name")?;
        DatasetName::from_raw(raw)
    }

    /// Read a complex flag followed by a sample count
    pub fn read_channel_info(&mut self, channel: &'static str) -> Result<(bool, usize)> {
        let flag = self.cursor.read_i32(channel)?;
        let is_complex = decode_flag(flag, channel)?;
        let count = self.cursor.read_i32(channel)?;
        let count = decode_count(count, channel)?;
        Ok((is_complex, count))
    }

    /// Read a lone complex flag (the Y channel has no count of its own)
    pub fn read_complex_flag(&mut self, channel: &'static str) -> Result<bool> {
        let flag = self.cursor.read_i32(channel)?;
        decode_flag(flag, channel)
    }

    /// Read `count` samples, doubled for complex channels
    pub fn read_values(
        &mut self,
        is_complex: bool,
        count: usize,
        channel: &'static str,
    ) -> Result<Vec<f64>> {
        let len = count.checked_mul(value_width(is_complex)).ok_or_else(|| {
            PakError::Corrupt(format!("{} count {} overflows", channel, count))
        })?;
        self.cursor.read_f64_vec(len, channel)
    }

    /// Read every field that follows a dataset name
    pub fn read_dataset_data(&mut self, name: DatasetName) -> Result<Dataset> {
        let (x_is_complex, x_count) = self.read_channel_info("x channel")?;
        let x_values = self.read_values(x_is_complex, x_count, "x values")?;

        let (z_is_complex, z_count) = self.read_channel_info("z channel")?;
        let z_values = self.read_values(z_is_complex, z_count, "z values")?;

        let y_is_complex = self.read_complex_flag("y channel")?;
        let mut y_values = Vec::with_capacity(z_count.min(4096));
        for _ in 0..z_count {
            y_values.push(self.read_values(y_is_complex, x_count, "y values")?);
        }

        Ok(Dataset::library_owned(DatasetParts {
            name,
            x_is_complex,
            x_count,
            x_values,
            z_is_complex,
            z_count,
            z_values,
            y_is_complex,
            y_values,
        }))
    }

    /// Read one complete dataset record
    ///
    /// The result is library-owned: release it (or drop it) once done.
    pub fn read_dataset(&mut self) -> Result<Dataset> {
        let offset = self.cursor.position();
        let name = self.read_name()?;
        let dataset = self.read_dataset_data(name)?;
        debug!("Read dataset {} at offset {}", dataset, offset);
        Ok(dataset)
    }

    /// Release the underlying reader
    pub fn into_inner(self) -> R {
        self.cursor.into_inner()
    }

    pub(super) fn cursor_mut(&mut self) -> &mut ByteReader<R> {
        &mut self.cursor
    }
}
