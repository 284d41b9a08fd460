// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading result files.

use thiserror::Error;

use super::RESULT_FILE_EXTENSIONS;

#[derive(Error, Debug)]
pub enum ResultFileError {
    #[error("Tried to read result file '{file}' with an unsupported extension; supported extensions are: {RESULT_FILE_EXTENSIONS}")]
    UnsupportedExt { file: String },

    #[error("Posterior samples of analysis '{label}' are stored in an unrecognised layout: {reason}")]
    UnrecognisedSamples { label: String, reason: String },

    #[error("Expected {thing} to have {expected} elements, but it had {actual} instead")]
    BadShape {
        /// What was it that wasn't sensible? A column of samples, the
        /// parameter names, etc.
        thing: String,
        expected: usize,
        actual: usize,
    },

    #[error("Dataset '{dataset}' has a type that can't be read: {dtype}")]
    UnsupportedType { dataset: String, dtype: String },

    #[error("HDF5 couldn't read dataset '{dataset}'")]
    Hdf5Read { dataset: String },

    #[error("Couldn't decode the JSON structure of {file}: {err}")]
    Json {
        file: String,
        err: serde_json::Error,
    },

    #[error(transparent)]
    Hdf5(#[from] hdf5::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
