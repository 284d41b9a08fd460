// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Extract posterior samples of many events and consolidate them into a
//! single file.

use std::path::{Path, PathBuf};

use log::{debug, info};

use super::batch::{
    check_unique_event_names, collect_outcomes, map_events, read_result_file, BatchError,
    BatchSummary, EventOutcome,
};
use crate::{
    event::{event_file_name, event_name_for_path},
    extract::{write_event_data, ExtractOptions},
    io::write::{copy_file_into, create_output_file, write_str_attr},
    source::{check_source, SourceType},
};

pub(crate) struct LocalizationsParams {
    /// The result files to be processed, in order.
    pub(crate) event_files: Vec<PathBuf>,

    /// The consolidated output file.
    pub(crate) output_file: PathBuf,

    /// The posterior-sample parameters to extract.
    pub(crate) keys: Vec<String>,

    /// Only events of this source type are written.
    pub(crate) source: SourceType,

    pub(crate) options: ExtractOptions,

    pub(crate) njobs: usize,

    /// Where the intermediate per-event files are written.
    pub(crate) event_dir: PathBuf,

    /// Should unreadable result files be skipped, rather than being an error?
    pub(crate) skip_unreadable: bool,
}

impl LocalizationsParams {
    pub(crate) fn run(&self) -> Result<BatchSummary, BatchError> {
        let LocalizationsParams {
            event_files,
            output_file,
            keys,
            source,
            options,
            njobs,
            event_dir,
            skip_unreadable,
        } = self;

        check_unique_event_names(event_files)?;
        std::fs::create_dir_all(event_dir)?;
        let results = map_events(event_files, *njobs, |path| {
            process_event(path, keys, *source, *options, event_dir)
        })?;
        let outcomes = collect_outcomes(event_files, results, *skip_unreadable)?;

        info!("Writing {}", output_file.display());
        let output = create_output_file(output_file)?;
        let mut summary = BatchSummary::default();
        for (event_name, outcome) in outcomes {
            match outcome {
                EventOutcome::Processed(event_file) => {
                    debug!("Copying {} into the output", event_file.display());
                    copy_file_into(&event_file, &output, &event_name)?;
                    summary.written.push(event_name);
                }
                EventOutcome::Filtered => {
                    info!("Skipping writing event {event_name} to output file");
                    summary.filtered.push(event_name);
                }
                EventOutcome::Unreadable => summary.unreadable.push(event_name),
            }
        }

        Ok(summary)
    }
}

/// Read a single result file and, if its source type matches `source`, write
/// the requested `keys` of every analysis into a new file in `event_dir`. The
/// path to the new file is returned; if the event doesn't match `source`,
/// nothing is written and `None` is returned.
pub(crate) fn process_event<S: AsRef<str>>(
    path: &Path,
    keys: &[S],
    source: SourceType,
    options: ExtractOptions,
    event_dir: &Path,
) -> Result<Option<PathBuf>, BatchError> {
    let event_name = event_name_for_path(path);
    info!("Processing event {event_name}");
    let result_file = read_result_file(path)?;

    let (event_source, is_correct_source) = check_source(&result_file.labels(), source);
    match event_source {
        Some(s) => info!("Event {event_name} inferred source type: {s}"),
        None => info!("Could not infer source type for event {event_name}"),
    }
    if !is_correct_source {
        info!("Event {event_name} does not match source type {source}");
        return Ok(None);
    }

    let output_file = event_dir.join(event_file_name(&event_name));
    let file = create_output_file(&output_file)?;
    if let Some(s) = event_source {
        write_str_attr(&file, "source_type", &s.to_string())?;
    }
    write_event_data(&result_file, &file, keys, options)?;

    Ok(Some(output_file))
}
