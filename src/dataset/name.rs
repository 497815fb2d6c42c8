use std::borrow::Cow;
use std::fmt;

use crate::error::{PakError, Result};

/// On-disk width of the name field, terminator included
pub const NAME_FIELD_LEN: usize = 256;

/// Fixed 256-byte dataset label
///
/// The raw field is kept byte-for-byte, including anything after the
/// terminator, so a file can be rewritten without touching its padding.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DatasetName {
    raw: [u8; NAME_FIELD_LEN],
}

impl DatasetName {
    /// Build a zero-padded name from text
    ///
    /// Fails if the text does not fit in 255 bytes or contains a NUL.
    pub fn new(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        if bytes.len() >= NAME_FIELD_LEN {
            return Err(PakError::InvalidDataset(format!(
                "name is {} bytes, at most {} fit in the name field",
                bytes.len(),
                NAME_FIELD_LEN - 1
            )));
        }
        if bytes.contains(&0) {
            return Err(PakError::InvalidDataset(format!(
                "name {:?} contains an embedded NUL",
                text
            )));
        }

        let mut raw = [0u8; NAME_FIELD_LEN];
        raw[..bytes.len()].copy_from_slice(bytes);
        Ok(Self { raw })
    }

    /// Wrap a field exactly as it was read from disk
    ///
    /// The field must hold a terminator somewhere in its 256 bytes.
    pub fn from_raw(raw: [u8; NAME_FIELD_LEN]) -> Result<Self> {
        if !raw.contains(&0) {
            return Err(PakError::Corrupt(
                "dataset name field has no NUL terminator".to_string(),
            ));
        }
        Ok(Self { raw })
    }

    /// The full 256-byte field as written to disk
    pub fn as_raw(&self) -> &[u8; NAME_FIELD_LEN] {
        &self.raw
    }

    /// Bytes up to (not including) the first terminator
    pub fn as_bytes(&self) -> &[u8] {
        let end = self
            .raw
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_FIELD_LEN);
        &self.raw[..end]
    }

    /// The label as text; invalid UTF-8 is replaced
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Whether the field only ever held a terminated, zero-padded label
    pub fn is_terminated(&self) -> bool {
        self.raw.contains(&0)
    }
}

impl Default for DatasetName {
    fn default() -> Self {
        Self {
            raw: [0u8; NAME_FIELD_LEN],
        }
    }
}

impl fmt::Debug for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatasetName({:?})", self.as_str())
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl TryFrom<&str> for DatasetName {
    type Error = PakError;

    fn try_from(text: &str) -> Result<Self> {
        Self::new(text)
    }
}
