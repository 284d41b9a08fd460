// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pull requested fields out of a [`ResultFile`] and write them into an output
//! group.
//!
//! Every analysis of a result file gets its own subgroup, named after its
//! label. The subgroup carries the attributes `nsamples`, `detectors` and
//! (optionally) `area90`, and one dataset per requested parameter that the
//! analysis actually has.

mod maxl;

pub use maxl::{
    get_maximum_likelihood_data, write_maximum_likelihood_event, MaxLikelihoodEvent,
    MaxLikelihoodOptions, SkymapStats,
};

use hdf5::Group;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    constants::SNR_SUFFIXES,
    io::{
        read::{Analysis, ResultFile},
        write::{
            write_f64_attr, write_f64_dataset, write_str_list_attr, write_u64_attr,
            OutputWriteError,
        },
    },
};

/// What to write for each analysis, beyond the requested parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Also write the per-detector SNRs of analyses whose detectors are all
    /// known.
    pub write_snrs: bool,

    /// Write the skymap 90% area as an attribute (if available).
    pub write_skymap_stats: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            write_snrs: true,
            write_skymap_stats: true,
        }
    }
}

/// Get the keys to be looked up in an analysis's samples. These are the
/// caller's keys, followed by `{detector}_optimal_snr`,
/// `{detector}_matched_filter_snr` and `{detector}_matched_filter_abs_snr` for
/// each detector if `write_snrs` is true. Order is preserved and duplicates
/// are dropped.
///
/// `detectors` should only be supplied when all of an analysis's detectors are
/// known.
pub fn requested_keys<S: AsRef<str>>(
    keys: &[S],
    detectors: Option<&[&str]>,
    write_snrs: bool,
) -> Vec<String> {
    let mut requested: Vec<String> = Vec::with_capacity(keys.len());
    let mut push = |key: String| {
        if !requested.contains(&key) {
            requested.push(key);
        }
    };

    for key in keys {
        push(key.as_ref().to_string());
    }
    if let (true, Some(detectors)) = (write_snrs, detectors) {
        for detector in detectors {
            for suffix in SNR_SUFFIXES {
                push(format!("{detector}_{suffix}"));
            }
        }
    }

    requested
}

/// Write the requested `keys` of every analysis in `result_file` into
/// `group`, one subgroup per analysis. Keys that an analysis doesn't have are
/// logged and skipped.
pub fn write_event_data<S: AsRef<str>>(
    result_file: &ResultFile,
    group: &Group,
    keys: &[S],
    options: ExtractOptions,
) -> Result<(), OutputWriteError> {
    for analysis in &result_file.analyses {
        write_analysis(analysis, group, keys, options)?;
    }
    Ok(())
}

fn write_analysis<S: AsRef<str>>(
    analysis: &Analysis,
    group: &Group,
    keys: &[S],
    options: ExtractOptions,
) -> Result<(), OutputWriteError> {
    let label = analysis.label.as_str();
    debug!("Writing analysis '{label}' into {}", group.name());
    let analysis_group = group.create_group(label)?;

    write_u64_attr(
        &analysis_group,
        "nsamples",
        analysis.samples.num_samples() as u64,
    )?;
    let detectors = analysis.detector_names();
    write_str_list_attr(
        &analysis_group,
        "detectors",
        detectors.as_deref().unwrap_or_default(),
    )?;

    if options.write_skymap_stats {
        if let Some(area90) = analysis.extra.other_f64("area90") {
            write_f64_attr(&analysis_group, "area90", area90)?;
        }
    }

    for key in requested_keys(keys, detectors.as_deref(), options.write_snrs) {
        match analysis.samples.get(&key) {
            Some(samples) => write_f64_dataset(&analysis_group, &key, samples)?,
            None => info!(
                "Unable to get key {key} for analysis {label} in event {}",
                group.name()
            ),
        }
    }

    Ok(())
}
