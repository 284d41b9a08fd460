// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read PESummary HDF5 result files.
//!
//! Each analysis is a top-level group named after its label. Within it:
//! - `posterior_samples` is either a compound dataset (one field per
//!   parameter), or a group with `parameter_names` and a 2D `samples` dataset
//!   (samples along the first axis);
//! - `meta_data` contains (possibly nested) metadata;
//! - `psds` contains one dataset per detector.
//!
//! Any other top-level objects (e.g. `version` and `history`) are ignored.

use std::path::Path;

use hdf5::{
    types::{CompoundField, CompoundType, TypeDescriptor, VarLenAscii, VarLenUnicode},
    Dataset, Datatype, Group,
};
use hdf5_sys::{h5d::H5Dread, h5p::H5P_DEFAULT, h5s::H5S_ALL};
use indexmap::IndexMap;
use log::{debug, trace};
use serde_json::{Map, Value};

use super::{infer_detectors, Analysis, ExtraMetadata, ResultFile, ResultFileError, SamplesTable};

const POSTERIOR_SAMPLES: &str = "posterior_samples";
const META_DATA: &str = "meta_data";
const PSDS: &str = "psds";

pub(super) fn read(path: &Path) -> Result<ResultFile, ResultFileError> {
    let file = hdf5::File::open(path)?;
    let mut analyses = vec![];
    for group in file.groups()? {
        let label = base_name(&group.name());
        if !group.link_exists(POSTERIOR_SAMPLES) {
            trace!("Top-level group '{label}' has no posterior samples; ignoring");
            continue;
        }

        analyses.push(read_analysis(&group, label)?);
    }

    Ok(ResultFile { analyses })
}

fn read_analysis(group: &Group, label: String) -> Result<Analysis, ResultFileError> {
    debug!("Reading analysis '{label}'");
    let samples = read_posterior_samples(group, &label)?;

    let extra = if group.link_exists(META_DATA) {
        ExtraMetadata(read_metadata_group(&group.group(META_DATA)?)?)
    } else {
        ExtraMetadata::default()
    };

    let psd_names = if group.link_exists(PSDS) {
        group.group(PSDS)?.member_names()?
    } else {
        vec![]
    };
    let detectors = infer_detectors(psd_names, samples.parameters());

    Ok(Analysis {
        label,
        detectors,
        extra,
        samples,
    })
}

fn read_posterior_samples(group: &Group, label: &str) -> Result<SamplesTable, ResultFileError> {
    let is_group = group
        .groups()?
        .iter()
        .any(|g| base_name(&g.name()) == POSTERIOR_SAMPLES);
    if is_group {
        read_grouped_samples(&group.group(POSTERIOR_SAMPLES)?, label)
    } else {
        read_compound_samples(&group.dataset(POSTERIOR_SAMPLES)?, label)
    }
}

/// Samples stored as a structured array; each field is a parameter.
fn read_compound_samples(dataset: &Dataset, label: &str) -> Result<SamplesTable, ResultFileError> {
    let compound = match dataset.dtype()?.to_descriptor()? {
        TypeDescriptor::Compound(c) => c,
        other => {
            return Err(ResultFileError::UnrecognisedSamples {
                label: label.to_string(),
                reason: format!("expected a compound dataset, got {other:?}"),
            })
        }
    };

    let num_samples = dataset.size();
    let mut columns = IndexMap::with_capacity(compound.fields.len());
    for field in &compound.fields {
        if !is_numeric(&field.ty) {
            trace!("Ignoring non-numeric samples field '{}'", field.name);
            continue;
        }

        // Read only this field, converted to f64.
        let mem_type = Datatype::from_descriptor(&TypeDescriptor::Compound(CompoundType {
            fields: vec![CompoundField::typed::<f64>(&field.name, 0, 0)],
            size: std::mem::size_of::<f64>(),
        }))?;
        let column = read_dataset_as::<f64>(dataset, &mem_type, num_samples)?;
        columns.insert(field.name.clone(), column);
    }

    SamplesTable::new(columns)
}

/// Samples stored as `parameter_names` and a 2D `samples` dataset.
fn read_grouped_samples(group: &Group, label: &str) -> Result<SamplesTable, ResultFileError> {
    let parameter_names = read_strings(&group.dataset("parameter_names")?)?;
    let samples = group.dataset("samples")?;
    let shape = samples.shape();
    let (num_samples, num_parameters) = match shape.as_slice() {
        [s, p] => (*s, *p),
        _ => {
            return Err(ResultFileError::UnrecognisedSamples {
                label: label.to_string(),
                reason: format!("expected 2D samples, got shape {shape:?}"),
            })
        }
    };
    if num_parameters != parameter_names.len() {
        return Err(ResultFileError::BadShape {
            thing: format!("the posterior samples of '{label}'"),
            expected: parameter_names.len(),
            actual: num_parameters,
        });
    }

    let flat: Vec<f64> = samples.read_raw()?;
    let rows = flat
        .chunks(num_parameters.max(1))
        .take(num_samples)
        .map(|row| row.to_vec())
        .collect::<Vec<_>>();
    SamplesTable::from_rows(parameter_names, &rows)
}

fn read_metadata_group(group: &Group) -> Result<Map<String, Value>, ResultFileError> {
    let mut map = Map::new();
    for sub_group in group.groups()? {
        let key = base_name(&sub_group.name());
        map.insert(key, Value::Object(read_metadata_group(&sub_group)?));
    }
    for dataset in group.datasets()? {
        let key = base_name(&dataset.name());
        match read_metadata_value(&dataset) {
            Ok(value) => {
                map.insert(key, value);
            }
            // Metadata is only ever informational; don't fail because of an
            // exotic type.
            Err(e) => trace!("Couldn't read metadata '{}': {e}", dataset.name()),
        }
    }
    Ok(map)
}

fn read_metadata_value(dataset: &Dataset) -> Result<Value, ResultFileError> {
    let mut values: Vec<Value> = match dataset.dtype()?.to_descriptor()? {
        TypeDescriptor::Float(_) | TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
            dataset
                .read_raw::<f64>()?
                .into_iter()
                .map(Value::from)
                .collect()
        }
        TypeDescriptor::Boolean => dataset
            .read_raw::<bool>()?
            .into_iter()
            .map(Value::from)
            .collect(),
        TypeDescriptor::VarLenUnicode
        | TypeDescriptor::VarLenAscii
        | TypeDescriptor::FixedAscii(_)
        | TypeDescriptor::FixedUnicode(_) => {
            read_strings(dataset)?.into_iter().map(Value::from).collect()
        }
        other => {
            return Err(ResultFileError::UnsupportedType {
                dataset: dataset.name(),
                dtype: format!("{other:?}"),
            })
        }
    };

    // PESummary stores scalars as single-element arrays.
    Ok(if values.len() == 1 {
        values.swap_remove(0)
    } else {
        Value::Array(values)
    })
}

/// Read a dataset of strings, whether they're variable or fixed length.
fn read_strings(dataset: &Dataset) -> Result<Vec<String>, ResultFileError> {
    let dtype = dataset.dtype()?;
    let strings = match dtype.to_descriptor()? {
        TypeDescriptor::VarLenUnicode => dataset
            .read_raw::<VarLenUnicode>()?
            .into_iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        TypeDescriptor::VarLenAscii => dataset
            .read_raw::<VarLenAscii>()?
            .into_iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        _ => {
            // Fixed-length strings; read the bytes as they're stored.
            let width = dtype.size().max(1);
            let bytes = read_dataset_as::<u8>(dataset, &dtype, dataset.size() * width)?;
            bytes
                .chunks(width)
                .map(|s| {
                    String::from_utf8_lossy(s)
                        .trim_end_matches(|c| c == '\0' || c == ' ')
                        .to_string()
                })
                .collect()
        }
    };
    Ok(strings)
}

/// Read the whole of `dataset` into `num_elements` elements of `T`, with HDF5
/// converting the stored data into `mem_type`.
fn read_dataset_as<T: Copy + Default>(
    dataset: &Dataset,
    mem_type: &Datatype,
    num_elements: usize,
) -> Result<Vec<T>, ResultFileError> {
    // The buffer must be exactly as big as what HDF5 will write into it.
    let buffer_size = num_elements * std::mem::size_of::<T>();
    let expected_size = dataset.size() * mem_type.size();
    if buffer_size != expected_size {
        return Err(ResultFileError::BadShape {
            thing: format!("the read buffer for '{}'", dataset.name()),
            expected: expected_size,
            actual: buffer_size,
        });
    }

    let mut values = vec![T::default(); num_elements];
    let status = {
        let _guard = hdf5_sys::LOCK.lock();
        unsafe {
            H5Dread(
                dataset.id(),
                mem_type.id(),
                H5S_ALL,
                H5S_ALL,
                H5P_DEFAULT,
                values.as_mut_ptr().cast(),
            )
        }
    };
    if status < 0 {
        return Err(ResultFileError::Hdf5Read {
            dataset: dataset.name(),
        });
    }
    Ok(values)
}

fn is_numeric(ty: &TypeDescriptor) -> bool {
    matches!(
        ty,
        TypeDescriptor::Float(_)
            | TypeDescriptor::Integer(_)
            | TypeDescriptor::Unsigned(_)
    )
}

/// "/C01:Mixed/meta_data" -> "meta_data"
fn base_name(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}
