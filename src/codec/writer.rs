use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use super::{encode_count, encode_flag};
use crate::cursor::{open_file, ByteWriter, OpenMode};
use crate::dataset::{Dataset, DatasetName};
use crate::error::{PakError, Result};

/// Write handle over a PAK stream
///
/// The file header must be written first, exactly once. The declared
/// `array_count` is caller metadata and is not checked against the groups
/// that actually follow.
pub struct PakWriter<W: Write> {
    cursor: ByteWriter<W>,
    header_written: bool,
}

impl PakWriter<BufWriter<File>> {
    /// Create or truncate a PAK file
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let writer = Self::new(BufWriter::new(open_file(path, OpenMode::Write)?));
        debug!("Opened {} for writing", path.display());
        Ok(writer)
    }
}

impl<W: Write> PakWriter<W> {
    /// Wrap any writer; nothing is written until the file header
    pub fn new(inner: W) -> Self {
        Self {
            cursor: ByteWriter::new(inner),
            header_written: false,
        }
    }

    /// Bytes written so far
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn require_header(&self, what: &str) -> Result<()> {
        if self.header_written {
            Ok(())
        } else {
            Err(PakError::IoWrite(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} written before the file header", what),
            )))
        }
    }

    /// Write the file header: the number of groups that will follow
    pub fn write_file_header(&mut self, array_count: i16) -> Result<()> {
        if self.header_written {
            return Err(PakError::IoWrite(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file header written twice",
            )));
        }
        self.cursor.write_i16(array_count)?;
        self.header_written = true;
        Ok(())
    }

    /// Write a group header: the number of datasets that follow
    pub fn write_dataset_group_header(&mut self, count: usize) -> Result<()> {
        self.require_header("dataset group header")?;
        let count = encode_count(count, "dataset group count")?;
        self.cursor.write_i32(count)
    }

    /// Write the 256-byte name field verbatim
    pub fn write_name(&mut self, name: &DatasetName) -> Result<()> {
        self.require_header("dataset name")?;
        self.cursor.write_bytes(name.as_raw())
    }

    /// Write a complex flag followed by a sample count
    pub fn write_channel_info(
        &mut self,
        is_complex: bool,
        count: usize,
        channel: &'static str,
    ) -> Result<()> {
        self.require_header(channel)?;
        let count = encode_count(count, channel)?;
        self.cursor.write_i32(encode_flag(is_complex))?;
        self.cursor.write_i32(count)
    }

    /// Write a lone complex flag
    pub fn write_complex_flag(&mut self, is_complex: bool) -> Result<()> {
        self.require_header("y channel")?;
        self.cursor.write_i32(encode_flag(is_complex))
    }

    /// Write a run of channel values
    pub fn write_values(&mut self, values: &[f64]) -> Result<()> {
        self.require_header("channel values")?;
        self.cursor.write_f64_slice(values)
    }

    /// Validate and write one complete dataset record
    ///
    /// Nothing is written if the dataset is released, inconsistent, or
    /// declares counts that do not fit the on-disk `i32` fields.
    pub fn write_dataset(&mut self, dataset: &Dataset) -> Result<()> {
        self.require_header("dataset")?;
        if dataset.is_released() {
            return Err(PakError::InvalidDataset(format!(
                "'{}' has been released",
                dataset.name()
            )));
        }
        dataset.validate()?;
        encode_count(dataset.x_count(), "x channel")?;
        encode_count(dataset.z_count(), "z channel")?;

        let offset = self.cursor.position();
        self.write_name(dataset.name())?;
        self.write_channel_info(dataset.x_is_complex(), dataset.x_count(), "x channel")?;
        self.write_values(dataset.x_values())?;
        self.write_channel_info(dataset.z_is_complex(), dataset.z_count(), "z channel")?;
        self.write_values(dataset.z_values())?;
        self.write_complex_flag(dataset.y_is_complex())?;
        for row in dataset.y_values() {
            self.write_values(row)?;
        }
        debug!("Wrote dataset {} at offset {}", dataset, offset);
        Ok(())
    }

    /// Flush everything and release the underlying writer
    pub fn finish(self) -> Result<W> {
        self.cursor.into_inner()
    }
}
