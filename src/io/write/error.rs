// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with writing HDF5 output files.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputWriteError {
    #[error("Cannot write to the specified file '{file}'. Do you have write permissions set?")]
    FileNotWritable { file: String },

    #[error("Couldn't create directory '{0}' for output files. Do you have write permissions set?")]
    NewDirectory(PathBuf),

    #[error("'{value}' can't be written as an HDF5 string")]
    InvalidString { value: String },

    #[error("Couldn't copy the contents of '{src}' into group '{dst}' of the output file")]
    Copy { src: String, dst: String },

    #[error(transparent)]
    Hdf5(#[from] hdf5::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
