//! # Session Pipeline
//!
//! Drives one input/output file pair through the codec:
//!
//! ```text
//! Start → InputOpened → OutputOpened → HeaderWritten
//!   → (GroupHeaderRead → GroupHeaderWritten
//!        → (DatasetRead → Transformed → DatasetWritten)*)*
//!   → Closed
//! ```
//!
//! Every group declared by the input's file header is processed, and every
//! dataset in each group is read, transformed, written and released before
//! the next one is read, so output order equals input order.
//!
//! Any failure ends the run. Nothing is retried: a partly consumed input
//! cannot be rewound to a record boundary. The source dataset is released
//! on every exit path (explicitly on success, by `Drop` otherwise) and both
//! handles are closed when the session is dropped.
//!
//! ## Example
//!
//! ```rust,no_run
//! use binpak::session::{run_files, SessionConfig};
//! use binpak::transform::GaussianFilter;
//!
//! let stats = run_files(
//!     "sin_wave.pak52",
//!     "filtered.pak52",
//!     &GaussianFilter::new(2.0),
//!     SessionConfig::default(),
//! )?;
//! println!("{}", stats);
//! # Ok::<(), binpak::PakError>(())
//! ```

mod config;
mod output;
mod stats;

#[cfg(test)]
mod tests;

pub use config::{ChannelSelection, SessionConfig};
pub use output::OutputFile;
pub use stats::SessionStats;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, error, info, warn};

use crate::bridge::{from_flat, to_flat, ChannelKind};
use crate::codec::{PakReader, PakWriter};
use crate::dataset::{Dataset, DatasetBuilder, ReleaseOutcome};
use crate::error::{PakError, Result};
use crate::transform::Transform;

/// Where a session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing opened yet
    Start,
    /// Input handle open, file header read
    InputOpened,
    /// Output handle open
    OutputOpened,
    /// Output file header written
    HeaderWritten,
    /// Input group header read
    GroupHeaderRead,
    /// Output group header written
    GroupHeaderWritten,
    /// A source dataset is in memory
    DatasetRead,
    /// Its replacement has been built
    Transformed,
    /// The replacement is on disk and the source released
    DatasetWritten,
    /// Both handles closed
    Closed,
}

/// Rebuild `dataset` with `transform` applied to the selected channels
///
/// Name and complex flags are copied from the source; nx and nz follow
/// the lengths the transform returns. The result is caller-owned and has
/// passed validation.
pub fn transform_dataset<T: Transform + ?Sized>(
    dataset: &Dataset,
    transform: &T,
    config: &SessionConfig,
) -> Result<Dataset> {
    if config.require_single_row && dataset.z_count() != 1 {
        return Err(PakError::UnsupportedShape {
            name: dataset.name().as_str().into_owned(),
            nz: dataset.z_count(),
        });
    }

    let apply = |channel: ChannelKind, values: &[f64]| -> Vec<f64> {
        let flat = to_flat(values, channel.is_complex(dataset));
        if config.channels.contains(channel) {
            from_flat(&transform.apply(&flat))
        } else {
            flat
        }
    };

    let x = apply(ChannelKind::X, dataset.x_values());
    let z = apply(ChannelKind::Z, dataset.z_values());
    let y: Vec<Vec<f64>> = dataset
        .y_values()
        .iter()
        .map(|row| apply(ChannelKind::Y, row))
        .collect();

    DatasetBuilder::new(dataset.name().clone())
        .x(x, dataset.x_is_complex())
        .z(z, dataset.z_is_complex())
        .y_rows(y, dataset.y_is_complex())
        .build()
}

/// One input/output pair plus the state of the run over them
pub struct Session<R: Read, W: Write> {
    reader: PakReader<R>,
    writer: PakWriter<W>,
    config: SessionConfig,
    state: SessionState,
    stats: SessionStats,
}

impl<R: Read, W: Write> Session<R, W> {
    /// Start a session over already opened handles
    pub fn new(reader: PakReader<R>, writer: PakWriter<W>, config: SessionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
            state: SessionState::OutputOpened,
            stats: SessionStats::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Counters so far
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    fn advance(&mut self, next: SessionState) {
        debug!("Session {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Copy every group and dataset from input to output through `transform`
    ///
    /// Stops at the first failure, leaving [`state`](Self::state) at the
    /// last step that completed.
    pub fn run<T: Transform + ?Sized>(&mut self, transform: &T) -> Result<SessionStats> {
        let array_count = self.reader.array_count();
        self.writer.write_file_header(array_count)?;
        self.advance(SessionState::HeaderWritten);

        for group in 0..array_count {
            let count = self.reader.read_dataset_group_header()?;
            self.advance(SessionState::GroupHeaderRead);
            if count == 0 {
                warn!("Dataset group {} is empty", group);
            }

            self.writer.write_dataset_group_header(count)?;
            self.advance(SessionState::GroupHeaderWritten);

            for _ in 0..count {
                self.process_dataset(transform)?;
            }
            self.stats.groups += 1;
        }

        self.stats.bytes_written = self.writer.position();
        Ok(self.stats.clone())
    }

    fn process_dataset<T: Transform + ?Sized>(&mut self, transform: &T) -> Result<()> {
        // dropped (and so released) on every early return below
        let mut source = self.reader.read_dataset()?;
        self.advance(SessionState::DatasetRead);
        self.stats.values_read += source.parts().value_count();

        let rebuilt = transform_dataset(&source, transform, &self.config)?;
        self.advance(SessionState::Transformed);

        self.writer.write_dataset(&rebuilt)?;
        self.stats.values_written += rebuilt.parts().value_count();
        self.stats.datasets += 1;

        match source.release() {
            ReleaseOutcome::AlreadyReleased => {
                error!("Source dataset '{}' was released twice", source.name());
                return Err(PakError::DoubleRelease(source.name().as_str().into_owned()));
            }
            ReleaseOutcome::Freed | ReleaseOutcome::CallerOwned => {}
        }
        self.advance(SessionState::DatasetWritten);
        Ok(())
    }

    /// Flush and close both handles, returning the output writer
    pub fn close(self) -> Result<W> {
        let Session {
            reader,
            writer,
            state,
            ..
        } = self;
        drop(reader);
        let inner = writer.finish()?;
        debug!("Session {:?} -> {:?}", state, SessionState::Closed);
        Ok(inner)
    }

    /// Run to completion and close, closing on failure as well
    pub fn execute<T: Transform + ?Sized>(mut self, transform: &T) -> Result<(SessionStats, W)> {
        match self.run(transform) {
            Ok(stats) => {
                let inner = self.close()?;
                Ok((stats, inner))
            }
            Err(e) => {
                debug!("Session aborted after {:?}: {}", self.state, e);
                Err(e)
            }
        }
    }
}

impl Session<BufReader<File>, BufWriter<OutputFile>> {
    /// Open `input` for reading, then `output` for writing
    ///
    /// The output is only touched once the input has opened cleanly.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(
        input: P,
        output: Q,
        config: SessionConfig,
    ) -> Result<Self> {
        debug!("Session {:?}", SessionState::Start);
        let reader = PakReader::open(input)?;
        debug!("Session -> {:?}", SessionState::InputOpened);
        let output = OutputFile::create(output.as_ref(), config.atomic_output)?;
        let writer = PakWriter::new(BufWriter::new(output));
        Ok(Self::new(reader, writer, config))
    }
}

/// Rescale every dataset of `input` into `output`
pub fn run_files<P, Q, T>(
    input: P,
    output: Q,
    transform: &T,
    config: SessionConfig,
) -> Result<SessionStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    T: Transform + ?Sized,
{
    let (input, output) = (input.as_ref(), output.as_ref());
    info!(
        "Rescaling {} -> {} with {} on channels {}",
        input.display(),
        output.display(),
        transform.label(),
        config.channels
    );

    let session = Session::open(input, output, config)?;
    let (stats, buffered) = session.execute(transform)?;
    let file = buffered
        .into_inner()
        .map_err(|e| PakError::IoWrite(e.into_error()))?;
    file.commit()?;

    info!("{}", stats);
    Ok(stats)
}
