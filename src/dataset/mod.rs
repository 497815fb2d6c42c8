//! # Dataset Model
//!
//! In-memory form of one PAK dataset: a 256-byte name and three channels.
//!
//! ```text
//! X: nx samples            (nx or 2·nx doubles)
//! Z: nz samples            (nz or 2·nz doubles)
//! Y: nz rows × nx samples  (each row nx or 2·nx doubles)
//! ```
//!
//! A complex channel stores interleaved real/imaginary pairs, so its buffer
//! is twice the declared count.
//!
//! ## Ownership
//!
//! Every [`Dataset`] carries an [`Ownership`] tag. The read path produces
//! [`Ownership::Owned`] datasets whose buffers are freed by
//! [`Dataset::release`] or, failing that, on drop. Datasets built with
//! [`DatasetBuilder`] or [`Dataset::from_parts`] are
//! [`Ownership::CallerBuilt`]; releasing them is a no-op. Releasing twice
//! is always a no-op reported as [`ReleaseOutcome::AlreadyReleased`].
//!
//! ```rust
//! use binpak::dataset::{DatasetBuilder, DatasetName, ReleaseOutcome};
//!
//! let mut dataset = DatasetBuilder::new(DatasetName::new("sin52")?)
//!     .x(vec![0.0, 1.0, 2.0, 3.0], false)
//!     .z(vec![0.0], false)
//!     .y_row(vec![0.0, 0.0, 0.0, 0.0], false)
//!     .build()?;
//!
//! assert_eq!(dataset.x_count(), 4);
//! assert_eq!(dataset.release(), ReleaseOutcome::CallerOwned);
//! # Ok::<(), binpak::PakError>(())
//! ```

mod builder;
mod name;
mod types;
mod validate;


pub use builder::DatasetBuilder;
pub use name::{DatasetName, NAME_FIELD_LEN};
pub use types::{value_width, Dataset, DatasetDump, DatasetParts, Ownership, ReleaseOutcome};
pub use validate::validate;
