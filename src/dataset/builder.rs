use super::name::DatasetName;
use super::types::{value_width, Dataset, DatasetParts};
use crate::error::Result;

/// Builder for caller-owned datasets
///
/// Declared counts are derived from the buffer lengths: `nx` from the X
/// buffer, `nz` from the Z buffer. `build` validates the result.
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    parts: DatasetParts,
}

impl DatasetBuilder {
    /// Start a dataset with the given label and empty channels
    pub fn new(name: DatasetName) -> Self {
        Self {
            parts: DatasetParts {
                name,
                ..Default::default()
            },
        }
    }

    /// Set the X channel; nx becomes `values.len() / width`
    pub fn x(mut self, values: Vec<f64>, is_complex: bool) -> Self {
        self.parts.x_count = values.len() / value_width(is_complex);
        self.parts.x_is_complex = is_complex;
        self.parts.x_values = values;
        self
    }

    /// Set the Z channel; nz becomes `values.len() / width`
    pub fn z(mut self, values: Vec<f64>, is_complex: bool) -> Self {
        self.parts.z_count = values.len() / value_width(is_complex);
        self.parts.z_is_complex = is_complex;
        self.parts.z_values = values;
        self
    }

    /// Set all Y rows
    pub fn y_rows(mut self, rows: Vec<Vec<f64>>, is_complex: bool) -> Self {
        self.parts.y_is_complex = is_complex;
        self.parts.y_values = rows;
        self
    }

    /// Set a single Y row (the nz = 1 case)
    pub fn y_row(self, row: Vec<f64>, is_complex: bool) -> Self {
        self.y_rows(vec![row], is_complex)
    }

    /// Validate and produce a caller-owned dataset
    pub fn build(self) -> Result<Dataset> {
        Dataset::try_from_parts(self.parts)
    }
}
