// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to write HDF5 output files.
//!
//! The layout of the output files is chosen to be readable with `h5py`:
//! strings are variable-length UTF-8, and lists of strings are 1D arrays of
//! them.

mod error;

pub use error::OutputWriteError;

use std::{ffi::CString, path::Path, str::FromStr};

use hdf5::{types::VarLenUnicode, Group, Location};
use hdf5_sys::{h5o::H5Ocopy, h5p::H5P_DEFAULT};
use log::trace;

use crate::cli::Warn;

/// Make a new output file, truncating it if it already exists.
pub(crate) fn create_output_file(path: &Path) -> Result<hdf5::File, OutputWriteError> {
    trace!("Creating output file {}", path.display());
    Ok(hdf5::File::create(path)?)
}

fn to_h5_string(value: &str) -> Result<VarLenUnicode, OutputWriteError> {
    VarLenUnicode::from_str(value).map_err(|_| OutputWriteError::InvalidString {
        value: value.to_string(),
    })
}

pub(crate) fn write_str_attr(
    location: &Location,
    name: &str,
    value: &str,
) -> Result<(), OutputWriteError> {
    let value = to_h5_string(value)?;
    location
        .new_attr::<VarLenUnicode>()
        .shape(())
        .create(name)?
        .write_scalar(&value)?;
    Ok(())
}

pub(crate) fn write_str_list_attr<S: AsRef<str>>(
    location: &Location,
    name: &str,
    values: &[S],
) -> Result<(), OutputWriteError> {
    if values.is_empty() {
        location
            .new_attr::<VarLenUnicode>()
            .shape(0_usize)
            .create(name)?;
        return Ok(());
    }

    let values = values
        .iter()
        .map(|v| to_h5_string(v.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    location
        .new_attr_builder()
        .with_data(values.as_slice())
        .create(name)?;
    Ok(())
}

pub(crate) fn write_f64_attr(
    location: &Location,
    name: &str,
    value: f64,
) -> Result<(), OutputWriteError> {
    location
        .new_attr::<f64>()
        .shape(())
        .create(name)?
        .write_scalar(&value)?;
    Ok(())
}

pub(crate) fn write_u64_attr(
    location: &Location,
    name: &str,
    value: u64,
) -> Result<(), OutputWriteError> {
    location
        .new_attr::<u64>()
        .shape(())
        .create(name)?
        .write_scalar(&value)?;
    Ok(())
}

/// Write a 1D dataset of values.
pub(crate) fn write_f64_dataset(
    group: &Group,
    name: &str,
    values: &[f64],
) -> Result<(), OutputWriteError> {
    group.new_dataset_builder().with_data(values).create(name)?;
    Ok(())
}

/// Write a dataset holding a single value.
pub(crate) fn write_f64_scalar_dataset(
    group: &Group,
    name: &str,
    value: f64,
) -> Result<(), OutputWriteError> {
    group
        .new_dataset::<f64>()
        .shape(())
        .create(name)?
        .write_scalar(&value)?;
    Ok(())
}

/// Copy everything in the HDF5 file `src` (including its root attributes) into
/// a new group named `dst_name` in `dst`.
pub(crate) fn copy_file_into(
    src: &Path,
    dst: &Group,
    dst_name: &str,
) -> Result<(), OutputWriteError> {
    let copy_err = || OutputWriteError::Copy {
        src: src.display().to_string(),
        dst: dst_name.to_string(),
    };
    let src_name = CString::new("/").map_err(|_| copy_err())?;
    let c_dst_name = CString::new(dst_name).map_err(|_| copy_err())?;

    let src_file = hdf5::File::open(src)?;
    // The raw call must hold the same lock as the rest of the hdf5 crate.
    let status = {
        let _guard = hdf5_sys::LOCK.lock();
        unsafe {
            H5Ocopy(
                src_file.id(),
                src_name.as_ptr(),
                dst.id(),
                c_dst_name.as_ptr(),
                H5P_DEFAULT,
                H5P_DEFAULT,
            )
        }
    };
    if status < 0 {
        return Err(copy_err());
    }
    Ok(())
}

/// Test whether we can write to a file; if the file exists, a warning is
/// queued saying that it'll be overwritten.
pub(crate) fn can_write_to_file(file: &Path) -> Result<(), OutputWriteError> {
    trace!("Testing whether we can write to {}", file.display());

    let exists = can_write_to_file_inner(file)?;
    if exists {
        format!("Will overwrite the existing file '{}'", file.display()).warn();
    }

    Ok(())
}

fn can_write_to_file_inner(file: &Path) -> Result<bool, OutputWriteError> {
    let file_exists = file.exists();

    match std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(file)
        .map_err(|e| e.kind())
    {
        // File is writable.
        Ok(_) => {
            // If the file in question didn't already exist, `OpenOptions::new`
            // creates it as part of its work. We don't want to keep the 0-sized
            // file; remove it if it didn't exist before.
            if !file_exists {
                std::fs::remove_file(file).map_err(OutputWriteError::IO)?;
            }
        }

        // File doesn't exist. Attempt to make the directories leading up to the
        // file; if this fails, then we can't write the file anyway.
        Err(std::io::ErrorKind::NotFound) => {
            if let Some(p) = file.parent() {
                match std::fs::DirBuilder::new()
                    .recursive(true)
                    .create(p)
                    .map_err(|e| e.kind())
                {
                    Ok(()) => (),
                    Err(std::io::ErrorKind::PermissionDenied) => {
                        return Err(OutputWriteError::NewDirectory(p.to_path_buf()))
                    }
                    Err(e) => return Err(OutputWriteError::IO(e.into())),
                }
            }
        }

        Err(std::io::ErrorKind::PermissionDenied) => {
            return Err(OutputWriteError::FileNotWritable {
                file: file.display().to_string(),
            })
        }

        Err(e) => {
            return Err(OutputWriteError::IO(e.into()));
        }
    }

    Ok(file_exists)
}
