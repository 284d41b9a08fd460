// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read result files.
//!
//! Result files are the parameter-estimation products of the catalogue
//! releases, written by PESummary. Each file contains one or more independent
//! analyses (e.g. one per waveform approximant), each with its own posterior
//! samples and metadata. The whole file is read into a [`ResultFile`] when it
//! is opened; nothing else in `gwtc` needs to know about the file format.

mod error;
mod h5;
mod json;

pub use error::ResultFileError;

use std::{path::Path, str::FromStr};

use indexmap::IndexMap;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    constants::{LOG_LIKELIHOOD_KEY, SNR_SUFFIXES},
    source::{infer_source_type, SourceType},
};

/// The result file extensions that can be read.
pub(crate) const RESULT_FILE_EXTENSIONS: &str = "h5, hdf5, json";

#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResultFileType {
    /// PESummary's HDF5 format. This is what the catalogue releases use.
    #[strum(to_string = "h5", serialize = "hdf5")]
    Hdf5,

    /// PESummary's JSON format.
    #[strum(serialize = "json")]
    Json,
}

impl ResultFileType {
    pub(crate) fn from_path(path: &Path) -> Option<ResultFileType> {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ResultFileType::from_str(&e).ok())
    }
}

/// All of the analyses within a single result file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultFile {
    /// The analyses, in the order they appear in the file.
    pub analyses: Vec<Analysis>,
}

impl ResultFile {
    /// Read a result file. The format is determined by the file's extension.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<ResultFile, ResultFileError> {
        let path = path.as_ref();
        debug!("Reading result file {}", path.display());
        let result_file = match ResultFileType::from_path(path) {
            Some(ResultFileType::Hdf5) => h5::read(path)?,
            Some(ResultFileType::Json) => json::read(path)?,
            None => {
                return Err(ResultFileError::UnsupportedExt {
                    file: path.display().to_string(),
                })
            }
        };
        trace!(
            "{} has {} analyses: {:?}",
            path.display(),
            result_file.analyses.len(),
            result_file.labels()
        );
        Ok(result_file)
    }

    /// The labels of all analyses, in file order.
    pub fn labels(&self) -> Vec<&str> {
        self.analyses.iter().map(|a| a.label.as_str()).collect()
    }

    /// Get an analysis by its label.
    pub fn analysis(&self, label: &str) -> Option<&Analysis> {
        self.analyses.iter().find(|a| a.label == label)
    }

    /// Infer the source type of the event from the analysis labels. See
    /// [`infer_source_type`].
    pub fn source_type(&self) -> Option<SourceType> {
        infer_source_type(&self.labels())
    }
}

/// A single, independent parameter-estimation analysis of an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    /// The label of the analysis, e.g. "C01:IMRPhenomXPHM".
    pub label: String,

    /// The detectors used by the analysis. `None` entries indicate that the
    /// detector is not known.
    pub detectors: Vec<Option<String>>,

    /// Metadata that isn't a posterior sample, e.g. sampler settings and
    /// skymap statistics.
    pub extra: ExtraMetadata,

    /// The posterior samples.
    pub samples: SamplesTable,
}

impl Analysis {
    /// Are all of the detectors of this analysis known?
    pub fn has_detectors(&self) -> bool {
        self.detectors.iter().all(Option::is_some)
    }

    /// The names of this analysis's detectors, but only if all of them are
    /// known.
    pub fn detector_names(&self) -> Option<Vec<&str>> {
        self.detectors
            .iter()
            .map(|d| d.as_deref())
            .collect::<Option<Vec<_>>>()
    }
}

/// Posterior samples of an analysis. Each parameter has a column of values,
/// and all columns have the same length (the number of samples).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplesTable {
    columns: IndexMap<String, Vec<f64>>,
    num_samples: usize,
}

impl SamplesTable {
    /// Make a new table from columns of samples. Every column must have the
    /// same length.
    pub fn new(columns: IndexMap<String, Vec<f64>>) -> Result<SamplesTable, ResultFileError> {
        let num_samples = columns.values().next().map(|c| c.len()).unwrap_or(0);
        for (parameter, column) in &columns {
            if column.len() != num_samples {
                return Err(ResultFileError::BadShape {
                    thing: format!("the samples of '{parameter}'"),
                    expected: num_samples,
                    actual: column.len(),
                });
            }
        }

        Ok(SamplesTable {
            columns,
            num_samples,
        })
    }

    /// Make a new table from rows of samples; each row has one value per
    /// parameter, in the same order as `parameter_names`.
    pub fn from_rows(
        parameter_names: Vec<String>,
        rows: &[Vec<f64>],
    ) -> Result<SamplesTable, ResultFileError> {
        let mut columns: IndexMap<String, Vec<f64>> = parameter_names
            .into_iter()
            .map(|p| (p, Vec::with_capacity(rows.len())))
            .collect();
        for row in rows {
            if row.len() != columns.len() {
                return Err(ResultFileError::BadShape {
                    thing: "a row of posterior samples".to_string(),
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            for (column, &value) in columns.values_mut().zip(row.iter()) {
                column.push(value);
            }
        }

        Ok(SamplesTable {
            columns,
            num_samples: rows.len(),
        })
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn num_parameters(&self) -> usize {
        self.columns.len()
    }

    /// The parameter names, in file order.
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Get the samples of a parameter, if the parameter is present.
    pub fn get(&self, parameter: &str) -> Option<&[f64]> {
        self.columns.get(parameter).map(|c| c.as_slice())
    }

    /// Get the sample with the maximum log likelihood, as a value for every
    /// parameter. `None` is returned if there are no log likelihoods (or they
    /// are all NaN). When there's a tie, the first sample wins.
    pub fn max_likelihood(&self) -> Option<IndexMap<String, f64>> {
        let log_likelihoods = self.get(LOG_LIKELIHOOD_KEY)?;
        let mut i_max: Option<usize> = None;
        for (i, &l) in log_likelihoods.iter().enumerate() {
            if l.is_nan() {
                continue;
            }
            match i_max {
                Some(best) if log_likelihoods[best] >= l => (),
                _ => i_max = Some(i),
            }
        }
        let i_max = i_max?;

        Some(
            self.columns
                .iter()
                .map(|(parameter, column)| (parameter.clone(), column[i_max]))
                .collect(),
        )
    }
}

/// Arbitrary metadata of an analysis. PESummary groups this metadata into
/// "sampler", "meta_data" and "other" mappings; skymap statistics (e.g.
/// "area90") live in "other".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraMetadata(pub Map<String, Value>);

impl ExtraMetadata {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The "other" mapping, if present.
    pub fn other(&self) -> Option<&Map<String, Value>> {
        self.0.get("other").and_then(|o| o.as_object())
    }

    /// Get a numeric value out of the "other" mapping. Numeric strings and
    /// single-element arrays are also accepted, as PESummary writes values in
    /// both forms.
    pub fn other_f64(&self, key: &str) -> Option<f64> {
        self.other().and_then(|o| o.get(key)).and_then(value_to_f64)
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(a) if a.len() == 1 => value_to_f64(&a[0]),
        _ => None,
    }
}

/// Work out which detectors were used in an analysis. The names of the PSDs
/// are preferred; otherwise the per-detector SNR parameters are used. If
/// neither is available, the detectors are unknown and a single `None` is
/// returned.
pub(crate) fn infer_detectors<'a, I>(psd_names: Vec<String>, parameters: I) -> Vec<Option<String>>
where
    I: Iterator<Item = &'a str>,
{
    if !psd_names.is_empty() {
        return psd_names.into_iter().map(Some).collect();
    }

    let mut detectors: Vec<String> = vec![];
    for parameter in parameters {
        let detector = SNR_SUFFIXES
            .iter()
            .filter_map(|suffix| parameter.strip_suffix(suffix)?.strip_suffix('_'))
            .next();
        if let Some(detector) = detector {
            if detector.is_empty() || detector == "network" {
                continue;
            }
            if !detectors.iter().any(|d| d == detector) {
                detectors.push(detector.to_string());
            }
        }
    }

    if detectors.is_empty() {
        vec![None]
    } else {
        detectors.into_iter().map(Some).collect()
    }
}
