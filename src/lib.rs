//! # binpak - PAK Binary Dataset Codec
//!
//! `binpak` reads and writes scientific datasets stored in the legacy PAK
//! binary container and rescales them through a user-supplied transform.
//!
//! ## Key Features
//!
//! - **Byte-exact framing**: files are decoded and re-encoded field for field,
//!   name padding included, so an identity pass reproduces the input.
//!
//! - **Tracked ownership**: datasets from the read path know they own their
//!   buffers and release them exactly once, explicitly or on drop.
//!
//! - **Validated writes**: a dataset whose declared counts disagree with its
//!   buffers is rejected before a single byte is written.
//!
//! - **Injected I/O**: readers and writers are generic over `Read`/`Write`,
//!   so everything runs against in-memory buffers as well as files.
//!
//! ## Quick Start
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
//!
//! ## Architecture
//!
//! - [`cursor`]: fixed-width little-endian primitive reader/writer
//! - [`codec`]: PAK file, group and dataset framing
//! - [`dataset`]: the in-memory dataset model and its invariants
//! - [`bridge`]: flat copies of channel buffers for transforms
//! - [`transform`]: the transform interface and built-in filters
//! - [`session`]: the read → transform → write pipeline over a file pair
//!
//! ## Format
//!
//! | Field | Type | Notes |
//! |-------|------|-------|
//! | array_count | i16 | file header |
//! | dataset_count | i32 | per group |
//! | name | 256 bytes | zero-padded text |
//! | x_is_complex | i32 | 0/1 |
//! | nx | i32 | ≥ 0 |
//! | x_values | nx·(1 or 2) × f64 | |
//! | z_is_complex | i32 | 0/1 |
//! | nz | i32 | ≥ 0 |
//! | z_values | nz·(1 or 2) × f64 | |
//! | y_is_complex | i32 | 0/1 |
//! | y_values | nz rows × nx·(1 or 2) × f64 | one row per Z sample |

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod bridge;
pub mod codec;
pub mod cursor;
pub mod dataset;
pub mod error;
pub mod session;
pub mod transform;

pub use error::{PakError, Result};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::bridge::{from_flat, to_flat, ChannelKind};
    pub use crate::codec::{FileSummary, PakReader, PakWriter};
    pub use crate::dataset::{
        Dataset, DatasetBuilder, DatasetName, DatasetParts, Ownership, ReleaseOutcome,
    };
    pub use crate::error::{PakError, Result};
    pub use crate::session::{
        run_files, transform_dataset, ChannelSelection, Session, SessionConfig, SessionState,
        SessionStats,
    };
    pub use crate::transform::{
        BelowThreshold, Diff, GaussianFilter, Identity, IndexRamp, Transform, TransformSpec,
    };
}
