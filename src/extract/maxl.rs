// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maximum-likelihood point estimates of every analysis of an event, plus
//! event-level metadata.

use hdf5::Group;
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    io::{
        read::ResultFile,
        write::{
            write_f64_attr, write_f64_scalar_dataset, write_str_attr, write_str_list_attr,
            OutputWriteError,
        },
    },
    source::SourceType,
};

/// What event-level metadata to collect alongside the maximum-likelihood
/// values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxLikelihoodOptions {
    pub write_source: bool,
    pub write_detectors: bool,
    pub write_skymap_stats: bool,
}

/// Skymap statistics of a single analysis [square degrees].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkymapStats {
    pub area50: Option<f64>,
    pub area90: Option<f64>,
}

/// Everything written for an event by the maximum-likelihood subcommand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaxLikelihoodEvent {
    /// Analysis label -> parameter -> maximum-likelihood value. Analyses
    /// without log likelihoods have no values.
    pub maxl: IndexMap<String, IndexMap<String, f64>>,

    /// The inferred source type. Only set if it was asked for and could be
    /// inferred.
    pub source_type: Option<SourceType>,

    /// The sorted union of detectors over all analyses whose detectors are all
    /// known. Only set if asked for.
    pub detectors: Option<Vec<String>>,

    /// Analysis label -> skymap statistics. Only set if asked for.
    pub skymap_stats: Option<IndexMap<String, SkymapStats>>,
}

impl MaxLikelihoodEvent {
    pub fn labels(&self) -> Vec<&str> {
        self.maxl.keys().map(|l| l.as_str()).collect()
    }
}

/// Get the maximum-likelihood sample of every analysis in `result_file`, as
/// well as any requested event-level metadata. This never fails; anything that
/// can't be determined is left out.
pub fn get_maximum_likelihood_data(
    result_file: &ResultFile,
    options: MaxLikelihoodOptions,
) -> MaxLikelihoodEvent {
    let maxl = result_file
        .analyses
        .iter()
        .map(|analysis| {
            let values = analysis.samples.max_likelihood().unwrap_or_else(|| {
                warn!(
                    "Analysis '{}' has no log likelihoods; it has no maximum-likelihood values",
                    analysis.label
                );
                IndexMap::new()
            });
            (analysis.label.clone(), values)
        })
        .collect();

    let source_type = if options.write_source {
        let source_type = result_file.source_type();
        if source_type.is_none() {
            debug!("Couldn't infer the source type of {:?}", result_file.labels());
        }
        source_type
    } else {
        None
    };

    let detectors = options.write_detectors.then(|| {
        result_file
            .analyses
            .iter()
            .filter_map(|a| a.detector_names())
            .flatten()
            .map(|d| d.to_string())
            .sorted()
            .dedup()
            .collect()
    });

    let skymap_stats = options.write_skymap_stats.then(|| {
        result_file
            .analyses
            .iter()
            .map(|a| {
                let stats = SkymapStats {
                    area50: a.extra.other_f64("area50"),
                    area90: a.extra.other_f64("area90"),
                };
                (a.label.clone(), stats)
            })
            .collect()
    });

    MaxLikelihoodEvent {
        maxl,
        source_type,
        detectors,
        skymap_stats,
    }
}

/// Write a [`MaxLikelihoodEvent`] into `group`. The event's attributes are
/// `labels`, and, if available, `source_type` and `detectors`. Each analysis
/// gets a subgroup with one scalar dataset per parameter; skymap statistics
/// are attributes of these subgroups.
pub fn write_maximum_likelihood_event(
    group: &Group,
    event: &MaxLikelihoodEvent,
) -> Result<(), OutputWriteError> {
    write_str_list_attr(group, "labels", &event.labels())?;
    if let Some(source_type) = event.source_type {
        write_str_attr(group, "source_type", &source_type.to_string())?;
    }
    if let Some(detectors) = &event.detectors {
        write_str_list_attr(group, "detectors", detectors)?;
    }

    for (label, values) in &event.maxl {
        let label_group = group.create_group(label)?;
        for (parameter, &value) in values {
            write_f64_scalar_dataset(&label_group, parameter, value)?;
        }

        let stats = event
            .skymap_stats
            .as_ref()
            .and_then(|s| s.get(label))
            .copied()
            .unwrap_or_default();
        if let Some(area50) = stats.area50 {
            write_f64_attr(&label_group, "area50", area50)?;
        }
        if let Some(area90) = stats.area90 {
            write_f64_attr(&label_group, "area90", area90)?;
        }
    }

    Ok(())
}
