use std::fmt;
use std::io::BufRead;

use log::warn;
use serde::Serialize;

use super::PakReader;
use crate::dataset::Dataset;
use crate::error::Result;

/// Shape of one dataset record, without its values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    /// Dataset label
    pub name: String,
    /// Byte offset of the record's name field
    pub offset: u64,
    /// Declared nx
    pub nx: usize,
    /// Declared nz
    pub nz: usize,
    /// X values are complex pairs
    pub x_is_complex: bool,
    /// Y values are complex pairs
    pub y_is_complex: bool,
    /// Z values are complex pairs
    pub z_is_complex: bool,
}

impl DatasetSummary {
    fn of(dataset: &Dataset, offset: u64) -> Self {
        Self {
            name: dataset.name().as_str().into_owned(),
            offset,
            nx: dataset.x_count(),
            nz: dataset.z_count(),
            x_is_complex: dataset.x_is_complex(),
            y_is_complex: dataset.y_is_complex(),
            z_is_complex: dataset.z_is_complex(),
        }
    }
}

/// One dataset group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    /// Datasets in on-disk order
    pub datasets: Vec<DatasetSummary>,
}

/// Structure of a whole PAK file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    /// Groups declared by the file header
    pub array_count: i16,
    /// Groups in on-disk order
    pub groups: Vec<GroupSummary>,
    /// Total size of the framed content in bytes
    pub bytes: u64,
    /// Bytes remain after the last declared group
    pub trailing_data: bool,
}

impl FileSummary {
    /// Number of datasets across all groups
    pub fn dataset_count(&self) -> usize {
        self.groups.iter().map(|g| g.datasets.len()).sum()
    }
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "PAK file: {} group(s), {} dataset(s), {} bytes",
            self.array_count,
            self.dataset_count(),
            self.bytes
        )?;
        for (g, group) in self.groups.iter().enumerate() {
            writeln!(f, "  group {}: {} dataset(s)", g, group.datasets.len())?;
            for ds in &group.datasets {
                writeln!(
                    f,
                    "    @{:<8} '{}' nx={} nz={} cplx(x,y,z)=({},{},{})",
                    ds.offset,
                    ds.name,
                    ds.nx,
                    ds.nz,
                    u8::from(ds.x_is_complex),
                    u8::from(ds.y_is_complex),
                    u8::from(ds.z_is_complex)
                )?;
            }
        }
        if self.trailing_data {
            writeln!(f, "  (trailing data after last group)")?;
        }
        Ok(())
    }
}

impl<R: BufRead> PakReader<R> {
    /// Walk every declared group and dataset, keeping only their shapes
    ///
    /// Each dataset is released as soon as its shape has been recorded.
    pub fn summarize(mut self) -> Result<FileSummary> {
        let mut groups = Vec::with_capacity(self.array_count() as usize);
        for _ in 0..self.array_count() {
            let count = self.read_dataset_group_header()?;
            let mut datasets = Vec::with_capacity(count.min(4096));
            for _ in 0..count {
                let offset = self.position();
                let mut dataset = self.read_dataset()?;
                datasets.push(DatasetSummary::of(&dataset, offset));
                dataset.release();
            }
            groups.push(GroupSummary { datasets });
        }

        let bytes = self.position();
        let trailing_data = !self.cursor_mut().is_exhausted()?;
        if trailing_data {
            warn!("Trailing data after {} declared group(s)", self.array_count());
        }

        Ok(FileSummary {
            array_count: self.array_count(),
            groups,
            bytes,
            trailing_data,
        })
    }
}
