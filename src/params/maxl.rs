// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Collect the maximum-likelihood values of many events into a single file.

use std::path::PathBuf;

use log::info;

use super::batch::{
    check_unique_event_names, collect_outcomes, map_events, read_result_file, BatchError,
    BatchSummary, EventOutcome,
};
use crate::{
    extract::{get_maximum_likelihood_data, write_maximum_likelihood_event, MaxLikelihoodOptions},
    io::write::create_output_file,
    source::{check_source, SourceType},
};

pub(crate) struct MaxLikelihoodParams {
    /// The result files to be processed, in order.
    pub(crate) event_files: Vec<PathBuf>,

    pub(crate) output_file: PathBuf,

    pub(crate) options: MaxLikelihoodOptions,

    /// Only events of this source type are written.
    pub(crate) source: SourceType,

    pub(crate) njobs: usize,

    pub(crate) skip_unreadable: bool,
}

impl MaxLikelihoodParams {
    pub(crate) fn run(&self) -> Result<BatchSummary, BatchError> {
        let MaxLikelihoodParams {
            event_files,
            output_file,
            options,
            source,
            njobs,
            skip_unreadable,
        } = self;

        check_unique_event_names(event_files)?;

        // Unlike localizations, nothing is written until all events have been
        // read.
        let results = map_events(event_files, *njobs, |path| {
            let result_file = read_result_file(path)?;
            let (_, is_correct_source) = check_source(&result_file.labels(), *source);
            if !is_correct_source {
                return Ok(None);
            }
            Ok(Some(get_maximum_likelihood_data(&result_file, *options)))
        })?;
        let outcomes = collect_outcomes(event_files, results, *skip_unreadable)?;

        info!("Writing {}", output_file.display());
        let output = create_output_file(output_file)?;
        let mut summary = BatchSummary::default();
        for (event_name, outcome) in outcomes {
            match outcome {
                EventOutcome::Processed(event) => {
                    let group = output.create_group(&event_name)?;
                    write_maximum_likelihood_event(&group, &event)?;
                    summary.written.push(event_name);
                }
                EventOutcome::Filtered => {
                    info!("Event {event_name} does not match source type {source}");
                    summary.filtered.push(event_name);
                }
                EventOutcome::Unreadable => summary.unreadable.push(event_name),
            }
        }

        Ok(summary)
    }
}
