use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::cursor::{open_file, OpenMode};
use crate::error::{PakError, Result};

/// Destination file of a session
///
/// `Staged` writes to a temporary file in the output's directory and only
/// replaces the output on [`commit`](Self::commit); dropping it uncommitted
/// deletes the temporary file.
pub enum OutputFile {
    /// Writing straight to the output path
    Direct(File),
    /// Writing to a temporary file that becomes `target` on commit
    Staged {
        /// Temporary file being written
        temp: NamedTempFile,
        /// Final output path
        target: PathBuf,
    },
}

impl OutputFile {
    /// Open the destination, staged or direct
    pub fn create(path: &Path, staged: bool) -> Result<Self> {
        if !staged {
            return Ok(OutputFile::Direct(open_file(path, OpenMode::Write)?));
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir)
            .map_err(|e| PakError::from_open(e, path, OpenMode::Write))?;
        debug!(
            "Staging output for {} in {}",
            path.display(),
            temp.path().display()
        );
        Ok(OutputFile::Staged {
            temp,
            target: path.to_path_buf(),
        })
    }

    /// Make the written bytes visible at the output path
    pub fn commit(self) -> Result<()> {
        match self {
            OutputFile::Direct(file) => file.sync_all().map_err(PakError::IoWrite),
            OutputFile::Staged { temp, target } => {
                temp.as_file().sync_all().map_err(PakError::IoWrite)?;
                temp.persist(&target)
                    .map_err(|e| PakError::IoWrite(e.error))?;
                debug!("Moved staged output into {}", target.display());
                Ok(())
            }
        }
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputFile::Direct(file) => file.write(buf),
            OutputFile::Staged { temp, .. } => temp.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputFile::Direct(file) => file.flush(),
            OutputFile::Staged { temp, .. } => temp.flush(),
        }
    }
}
