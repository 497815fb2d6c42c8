use super::types::DatasetParts;
use crate::error::{PakError, Result};

/// Check that declared counts and buffer lengths agree
///
/// The four invariants:
///
/// 1. `x_values.len() == nx · width(x)`
/// 2. `z_values.len() == nz · width(z)`
/// 3. `y_values.len() == nz`
/// 4. every Y row has `nx · width(y)` values
///
/// plus a terminated name field.
pub fn validate(parts: &DatasetParts) -> Result<()> {
    let name = parts.name.as_str();

    if !parts.name.is_terminated() {
        return Err(PakError::InvalidDataset(
            "name field has no NUL terminator".to_string(),
        ));
    }

    if parts.x_values.len() != parts.x_len() {
        return Err(PakError::InvalidDataset(format!(
            "'{}': x has {} values, nx = {} ({}) requires {}",
            name,
            parts.x_values.len(),
            parts.x_count,
            kind(parts.x_is_complex),
            parts.x_len()
        )));
    }

    if parts.z_values.len() != parts.z_len() {
        return Err(PakError::InvalidDataset(format!(
            "'{}': z has {} values, nz = {} ({}) requires {}",
            name,
            parts.z_values.len(),
            parts.z_count,
            kind(parts.z_is_complex),
            parts.z_len()
        )));
    }

    if parts.y_values.len() != parts.z_count {
        return Err(PakError::InvalidDataset(format!(
            "'{}': y has {} rows, nz = {}",
            name,
            parts.y_values.len(),
            parts.z_count
        )));
    }

    let row_len = parts.y_row_len();
    if let Some((z, row)) = parts
        .y_values
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != row_len)
    {
        return Err(PakError::InvalidDataset(format!(
            "'{}': y row {} has {} values, nx = {} ({}) requires {}",
            name,
            z,
            row.len(),
            parts.x_count,
            kind(parts.y_is_complex),
            row_len
        )));
    }

    Ok(())
}

fn kind(is_complex: bool) -> &'static str {
    if is_complex {
        "complex"
    } else {
        "real"
    }
}
