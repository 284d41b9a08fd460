// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all gwtc-related errors. This should be the *only* error
//! enum that is publicly visible.

use thiserror::Error;

use super::common::BatchArgsError;
use crate::{
    io::{read::ResultFileError, write::OutputWriteError},
    params::BatchError,
    source::SourceError,
};

const VERBOSITY_HINT: &str =
    "If you don't know what this means, try turning up verbosity (-v or -vv).";

/// The *only* publicly visible error from gwtc. Where possible, each message
/// suggests what the user can do about it.
#[derive(Error, Debug)]
pub enum GwtcError {
    /// An error related to the arguments of a subcommand.
    #[error("{0}\n\nSee --help for the arguments of each subcommand.")]
    Args(String),

    /// An error related to result files.
    #[error("{0}\n\nResult files must be PESummary HDF5 or JSON files. To ignore files that can't be read, use --skip-unreadable.")]
    ResultFile(String),

    /// An error related to classifying events by source type.
    #[error("{0}")]
    Source(String),

    /// An error related to writing output files.
    #[error("{0}\n\n{VERBOSITY_HINT}")]
    Write(String),

    /// An HDF5 error. Because these are usually quite spartan, a suggestion
    /// is provided here.
    #[error("HDF5 error: {0}\n\n{VERBOSITY_HINT}")]
    Hdf5(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files contain the same arguments as the command line; use --save-toml to see an example.")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<BatchArgsError> for GwtcError {
    fn from(e: BatchArgsError) -> Self {
        Self::Args(e.to_string())
    }
}

impl From<BatchError> for GwtcError {
    fn from(e: BatchError) -> Self {
        let s = e.to_string();
        match e {
            BatchError::NotADirectory(_) | BatchError::DuplicateEvent { .. } => Self::Args(s),
            BatchError::ResultFile { .. } => Self::ResultFile(s),
            BatchError::Write(e) => Self::from(e),
            BatchError::Hdf5(_) => Self::Hdf5(s),
            BatchError::ThreadPool(_) | BatchError::IO(_) => Self::Generic(s),
        }
    }
}

impl From<ResultFileError> for GwtcError {
    fn from(e: ResultFileError) -> Self {
        let s = e.to_string();
        match e {
            ResultFileError::IO(e) => Self::from(e),
            _ => Self::ResultFile(s),
        }
    }
}

impl From<OutputWriteError> for GwtcError {
    fn from(e: OutputWriteError) -> Self {
        let s = e.to_string();
        match e {
            OutputWriteError::FileNotWritable { .. }
            | OutputWriteError::NewDirectory(_)
            | OutputWriteError::InvalidString { .. }
            | OutputWriteError::Copy { .. } => Self::Write(s),
            OutputWriteError::Hdf5(_) => Self::Hdf5(s),
            OutputWriteError::IO(e) => Self::from(e),
        }
    }
}

impl From<SourceError> for GwtcError {
    fn from(e: SourceError) -> Self {
        Self::Source(e.to_string())
    }
}

impl From<std::io::Error> for GwtcError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
