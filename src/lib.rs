// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Extract posterior samples, maximum-likelihood values and skymap statistics
//! from gravitational-wave transient catalogue (GWTC) result files, and
//! consolidate them into single HDF5 files.

mod cli;
pub(crate) mod constants;
pub mod event;
pub mod extract;
pub mod io;
mod params;
pub mod source;

#[cfg(test)]
mod tests;

use crossbeam_utils::atomic::AtomicCell;

// Re-exports.
pub use cli::{Gwtc, GwtcError};
pub use io::read::{Analysis, ExtraMetadata, ResultFile, SamplesTable};
pub use source::SourceType;

/// Should progress bars be drawn? This is set by the CLI and read wherever
/// progress bars are made.
pub(crate) static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
