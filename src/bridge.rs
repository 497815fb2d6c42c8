//! # Array Bridge
//!
//! Copies channel buffers out to flat sequences for a [`Transform`] and
//! back into fresh buffers afterwards. The transform only ever sees copies,
//! so a misbehaving transform cannot touch the source dataset.
//!
//! Complex channels stay interleaved (real, imaginary, real, ...); the
//! transform receives the flat sequence as-is.
//!
//! [`Transform`]: crate::transform::Transform

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// One of the three channel roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Abscissa, nx samples
    X,
    /// Ordinate rows, nz × nx samples
    Y,
    /// Row coordinate, nz samples
    Z,
}

impl ChannelKind {
    /// All channels
    pub const ALL: [ChannelKind; 3] = [ChannelKind::X, ChannelKind::Y, ChannelKind::Z];

    /// Lower-case channel letter
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::X => "x",
            ChannelKind::Y => "y",
            ChannelKind::Z => "z",
        }
    }

    /// Whether this channel is complex in `dataset`
    pub fn is_complex(&self, dataset: &Dataset) -> bool {
        match self {
            ChannelKind::X => dataset.x_is_complex(),
            ChannelKind::Y => dataset.y_is_complex(),
            ChannelKind::Z => dataset.z_is_complex(),
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(ChannelKind::X),
            "y" => Ok(ChannelKind::Y),
            "z" => Ok(ChannelKind::Z),
            other => Err(format!("unknown channel '{}', expected x, y or z", other)),
        }
    }
}

/// Copy a channel buffer into an independent flat sequence
///
/// Values are returned unchanged; complex pairs stay interleaved.
pub fn to_flat(values: &[f64], is_complex: bool) -> Vec<f64> {
    debug_assert!(!is_complex || values.len() % 2 == 0);
    values.to_vec()
}

/// Copy a transformed sequence into a new owned channel buffer
pub fn from_flat(values: &[f64]) -> Vec<f64> {
    values.to_vec()
}

/// Flat copies of every row of a channel
///
/// X and Z yield one sequence each; Y yields one per row.
pub fn channel_rows(dataset: &Dataset, channel: ChannelKind) -> Vec<Vec<f64>> {
    let is_complex = channel.is_complex(dataset);
    match channel {
        ChannelKind::X => vec![to_flat(dataset.x_values(), is_complex)],
        ChannelKind::Z => vec![to_flat(dataset.z_values(), is_complex)],
        ChannelKind::Y => dataset
            .y_values()
            .iter()
            .map(|row| to_flat(row, is_complex))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetBuilder, DatasetName};

    #[test]
    fn test_to_flat_keeps_interleaving() {
        let values = [1.0, -1.0, 2.0, -2.0];
        assert_eq!(to_flat(&values, true), values.to_vec());
    }

    #[test]
    fn test_flat_copy_is_isolated() {
        let dataset = DatasetBuilder::new(DatasetName::new("iso").unwrap())
            .x(vec![1.0, 2.0], false)
            .z(vec![0.0], false)
            .y_row(vec![3.0, 4.0], false)
            .build()
            .unwrap();

        let mut flat = channel_rows(&dataset, ChannelKind::X).remove(0);
        flat[0] = 100.0;
        flat.push(5.0);
        assert_eq!(dataset.x_values(), &[1.0, 2.0]);

        let back = from_flat(&flat);
        assert_eq!(back, vec![100.0, 2.0, 5.0]);
    }

    #[test]
    fn test_channel_rows_per_channel() {
        let dataset = DatasetBuilder::new(DatasetName::new("rows").unwrap())
            .x(vec![1.0], false)
            .z(vec![7.0, 8.0], false)
            .y_rows(vec![vec![3.0], vec![4.0]], false)
            .build()
            .unwrap();

        assert_eq!(channel_rows(&dataset, ChannelKind::X), vec![vec![1.0]]);
        assert_eq!(channel_rows(&dataset, ChannelKind::Z), vec![vec![7.0, 8.0]]);
        assert_eq!(
            channel_rows(&dataset, ChannelKind::Y),
            vec![vec![3.0], vec![4.0]]
        );
    }

    #[test]
    fn test_parse_channel() {
        assert_eq!("X".parse::<ChannelKind>().unwrap(), ChannelKind::X);
        assert_eq!(" y ".parse::<ChannelKind>().unwrap(), ChannelKind::Y);
        assert!("w".parse::<ChannelKind>().is_err());
    }
}
