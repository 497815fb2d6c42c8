use std::fmt;

use log::trace;

use super::name::DatasetName;
use super::validate::validate;
use crate::error::Result;

/// Number of doubles stored per declared sample
#[inline]
pub fn value_width(is_complex: bool) -> usize {
    if is_complex {
        2
    } else {
        1
    }
}

/// Where a dataset's buffers came from, and whether they are still live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Allocated by the read path; must be released exactly once
    Owned,
    /// Built in-process; releasing it never frees anything
    CallerBuilt,
    /// Buffers already freed
    Released,
}

/// What a call to [`Dataset::release`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Library-owned buffers were freed
    Freed,
    /// Nothing to do, the dataset was built by the caller
    CallerOwned,
    /// Nothing to do, the buffers were freed earlier
    AlreadyReleased,
}

/// Plain field storage of one dataset
///
/// Counts are declared separately from the value buffers, exactly as on
/// disk; [`validate`](super::validate) checks that they agree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetParts {
    /// 256-byte label
    pub name: DatasetName,
    /// X values are real/imaginary pairs
    pub x_is_complex: bool,
    /// Declared number of X samples (nx)
    pub x_count: usize,
    /// nx (or 2·nx) X values
    pub x_values: Vec<f64>,
    /// Z values are real/imaginary pairs
    pub z_is_complex: bool,
    /// Declared number of Z samples (nz)
    pub z_count: usize,
    /// nz (or 2·nz) Z values
    pub z_values: Vec<f64>,
    /// Y values are real/imaginary pairs
    pub y_is_complex: bool,
    /// One row of nx (or 2·nx) values per Z sample
    pub y_values: Vec<Vec<f64>>,
}

impl DatasetParts {
    /// Expected length of the X buffer
    pub fn x_len(&self) -> usize {
        self.x_count * value_width(self.x_is_complex)
    }

    /// Expected length of the Z buffer
    pub fn z_len(&self) -> usize {
        self.z_count * value_width(self.z_is_complex)
    }

    /// Expected length of every Y row
    pub fn y_row_len(&self) -> usize {
        self.x_count * value_width(self.y_is_complex)
    }

    /// Total number of doubles held across all three channels
    pub fn value_count(&self) -> usize {
        self.x_values.len()
            + self.z_values.len()
            + self.y_values.iter().map(Vec::len).sum::<usize>()
    }
}

/// One named X/Y/Z record with tracked release state
///
/// Datasets produced by the read path are [`Ownership::Owned`] and free
/// their buffers when released or dropped, whichever comes first. Datasets
/// built in-process are [`Ownership::CallerBuilt`].
pub struct Dataset {
    parts: DatasetParts,
    ownership: Ownership,
}

impl Dataset {
    /// Wrap freshly decoded fields as a library-owned dataset
    pub(crate) fn library_owned(parts: DatasetParts) -> Self {
        Self {
            parts,
            ownership: Ownership::Owned,
        }
    }

    /// Wrap caller-supplied fields without checking them
    ///
    /// The result is caller-owned. Writing it still validates first, so an
    /// inconsistent record never reaches disk.
    pub fn from_parts(parts: DatasetParts) -> Self {
        Self {
            parts,
            ownership: Ownership::CallerBuilt,
        }
    }

    /// Wrap caller-supplied fields, rejecting inconsistent lengths
    pub fn try_from_parts(parts: DatasetParts) -> Result<Self> {
        validate(&parts)?;
        Ok(Self::from_parts(parts))
    }

    /// Take the fields out, leaving this instance released
    pub fn into_parts(mut self) -> DatasetParts {
        let parts = std::mem::take(&mut self.parts);
        self.ownership = Ownership::Released;
        parts
    }

    /// Check the length invariants
    pub fn validate(&self) -> Result<()> {
        validate(&self.parts)
    }

    /// Free library-owned buffers
    ///
    /// Idempotent: a second call, or a call on a caller-built dataset, does
    /// nothing and says so in the returned outcome.
    pub fn release(&mut self) -> ReleaseOutcome {
        match self.ownership {
            Ownership::Owned => {
                trace!(
                    "Releasing dataset '{}' ({} values)",
                    self.parts.name,
                    self.parts.value_count()
                );
                let parts = &mut self.parts;
                parts.x_values = Vec::new();
                parts.z_values = Vec::new();
                parts.y_values = Vec::new();
                parts.x_count = 0;
                parts.z_count = 0;
                self.ownership = Ownership::Released;
                ReleaseOutcome::Freed
            }
            Ownership::CallerBuilt => ReleaseOutcome::CallerOwned,
            Ownership::Released => ReleaseOutcome::AlreadyReleased,
        }
    }

    /// Current release state
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Whether the buffers are still live
    pub fn is_released(&self) -> bool {
        self.ownership == Ownership::Released
    }

    /// All fields, read-only
    pub fn parts(&self) -> &DatasetParts {
        &self.parts
    }

    /// Dataset label
    pub fn name(&self) -> &DatasetName {
        &self.parts.name
    }

    /// X values are complex pairs
    pub fn x_is_complex(&self) -> bool {
        self.parts.x_is_complex
    }

    /// Declared nx
    pub fn x_count(&self) -> usize {
        self.parts.x_count
    }

    /// X buffer
    pub fn x_values(&self) -> &[f64] {
        &self.parts.x_values
    }

    /// X buffer, mutable in place (its length is fixed)
    pub fn x_values_mut(&mut self) -> &mut [f64] {
        &mut self.parts.x_values
    }

    /// Z values are complex pairs
    pub fn z_is_complex(&self) -> bool {
        self.parts.z_is_complex
    }

    /// Declared nz
    pub fn z_count(&self) -> usize {
        self.parts.z_count
    }

    /// Z buffer
    pub fn z_values(&self) -> &[f64] {
        &self.parts.z_values
    }

    /// Z buffer, mutable in place
    pub fn z_values_mut(&mut self) -> &mut [f64] {
        &mut self.parts.z_values
    }

    /// Y values are complex pairs
    pub fn y_is_complex(&self) -> bool {
        self.parts.y_is_complex
    }

    /// All Y rows, one per Z sample
    pub fn y_values(&self) -> &[Vec<f64>] {
        &self.parts.y_values
    }

    /// One Y row
    pub fn y_row(&self, z: usize) -> Option<&[f64]> {
        self.parts.y_values.get(z).map(Vec::as_slice)
    }

    /// One Y row, mutable in place
    pub fn y_row_mut(&mut self, z: usize) -> Option<&mut [f64]> {
        self.parts.y_values.get_mut(z).map(Vec::as_mut_slice)
    }

    /// Borrow for a full value listing
    pub fn dump(&self) -> DatasetDump<'_> {
        DatasetDump(self)
    }
}

impl Drop for Dataset {
    fn drop(&mut self) {
        self.release();
    }
}

impl Clone for Dataset {
    /// Clones are always caller-owned; only the read path hands out owned buffers
    fn clone(&self) -> Self {
        Self::from_parts(self.parts.clone())
    }
}

impl PartialEq for Dataset {
    /// Field equality; release state is not compared
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("name", &self.parts.name)
            .field("x_is_complex", &self.parts.x_is_complex)
            .field("x_count", &self.parts.x_count)
            .field("z_is_complex", &self.parts.z_is_complex)
            .field("z_count", &self.parts.z_count)
            .field("y_is_complex", &self.parts.y_is_complex)
            .field("ownership", &self.ownership)
            .finish()
    }
}

fn complexity(is_complex: bool) -> &'static str {
    if is_complex {
        "complex"
    } else {
        "real"
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}': nx={} nz={} (x {}, y {}, z {})",
            self.parts.name,
            self.parts.x_count,
            self.parts.z_count,
            complexity(self.parts.x_is_complex),
            complexity(self.parts.y_is_complex),
            complexity(self.parts.z_is_complex),
        )
    }
}

/// Full value listing of a dataset, one value per line
pub struct DatasetDump<'a>(&'a Dataset);

impl fmt::Display for DatasetDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self.0.parts();
        writeln!(f, "Name     : {}", parts.name)?;
        writeln!(f, "nx       : {}", parts.x_count)?;
        writeln!(f, "nz       : {}", parts.z_count)?;
        writeln!(f, "xCplx    : {}", u8::from(parts.x_is_complex))?;
        writeln!(f, "yCplx    : {}", u8::from(parts.y_is_complex))?;
        writeln!(f, "zCplx    : {}", u8::from(parts.z_is_complex))?;
        writeln!(f)?;
        writeln!(f, "xdata:")?;
        for (i, v) in parts.x_values.iter().enumerate() {
            writeln!(f, "  x[{}] = {}", i, v)?;
        }
        writeln!(f)?;
        writeln!(f, "ydata:")?;
        for (z, row) in parts.y_values.iter().enumerate() {
            writeln!(f, "  y[{}]:", z)?;
            for (i, v) in row.iter().enumerate() {
                writeln!(f, "    y[{}][{}] = {}", z, i, v)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "zdata:")?;
        for (i, v) in parts.z_values.iter().enumerate() {
            writeln!(f, "  z[{}] = {}", i, v)?;
        }
        Ok(())
    }
}
