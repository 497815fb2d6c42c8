//! # PAK Codec
//!
//! Maps between PAK bytes and [`Dataset`](crate::dataset::Dataset)s.
//!
//! ## Framing
//!
//! ```text
//! i16  array_count                      file header
//! repeat array_count times:
//!   i32  dataset_count                  group header
//!   repeat dataset_count times:
//!     [u8; 256]  name                   zero-padded
//!     i32  x_is_complex, i32 nx, f64 × nx·(1|2)
//!     i32  z_is_complex, i32 nz, f64 × nz·(1|2)
//!     i32  y_is_complex,         f64 × nz rows × nx·(1|2)
//! ```
//!
//! All fields are little-endian. Fields are interleaved exactly as above;
//! there are no length-prefixed blobs, padding, or checksums.
//!
//! ## Example
//!
//! ```rust
//! use binpak::codec::{PakReader, PakWriter};
//! use binpak::dataset::{DatasetBuilder, DatasetName};
//!
//! let dataset = DatasetBuilder::new(DatasetName::new("sin52")?)
//!     .x(vec![0.0, 1.0, 2.0, 3.0], false)
//!     .z(vec![0.0], false)
//!     .y_row(vec![0.0; 4], false)
//!     .build()?;
//!
//! let mut writer = PakWriter::new(Vec::new());
//! writer.write_file_header(1)?;
//! writer.write_dataset_group_header(1)?;
//! writer.write_dataset(&dataset)?;
//! let bytes = writer.finish()?;
//!
//! let mut reader = PakReader::new(bytes.as_slice())?;
//! assert_eq!(reader.array_count(), 1);
//! assert_eq!(reader.read_dataset_group_header()?, 1);
//! let read_back = reader.read_dataset()?;
//! assert_eq!(read_back, dataset);
//! # Ok::<(), binpak::PakError>(())
//! ```

mod reader;
mod summary;
mod writer;


pub use reader::PakReader;
pub use summary::{DatasetSummary, FileSummary, GroupSummary};
pub use writer::PakWriter;

use crate::error::{PakError, Result};

/// On-disk size of the file header
pub const FILE_HEADER_LEN: u64 = 2;
/// On-disk size of a group header
pub const GROUP_HEADER_LEN: u64 = 4;

/// Size in bytes of a dataset record with the given shape
pub fn record_len(
    nx: usize,
    nz: usize,
    x_is_complex: bool,
    y_is_complex: bool,
    z_is_complex: bool,
) -> u64 {
    use crate::dataset::{value_width, NAME_FIELD_LEN};

    let x = nx * value_width(x_is_complex);
    let z = nz * value_width(z_is_complex);
    let y = nz * nx * value_width(y_is_complex);
    (NAME_FIELD_LEN + 5 * 4 + (x + y + z) * 8) as u64
}

fn decode_flag(raw: i32, channel: &'static str) -> Result<bool> {
    match raw {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(PakError::Corrupt(format!(
            "{} complex flag is {}, expected 0 or 1",
            channel, other
        ))),
    }
}

fn encode_flag(is_complex: bool) -> i32 {
    i32::from(is_complex)
}

fn decode_count(raw: i32, field: &'static str) -> Result<usize> {
    usize::try_from(raw)
        .map_err(|_| PakError::Corrupt(format!("{} is negative ({})", field, raw)))
}

fn encode_count(count: usize, field: &'static str) -> Result<i32> {
    i32::try_from(count).map_err(|_| {
        PakError::InvalidDataset(format!(
            "{} count {} does not fit in a 32-bit field",
            field, count
        ))
    })
}
