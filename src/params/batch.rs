// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code shared by subcommands that process a directory of events.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info, warn};
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    cli::Warn,
    event::{event_name_for_path, get_gw_event_from_filename},
    io::{
        read::{ResultFile, ResultFileError},
        write::OutputWriteError,
    },
    PROGRESS_BARS,
};

/// Get every file directly within `dir`, sorted by name. Anything that isn't a
/// file is ignored. Files without a GW event identifier in their name are
/// reported once here, as their file stem is used as the event name.
pub(crate) fn discover_event_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::NotADirectory(dir.to_path_buf()));
    }

    let mut event_files = vec![];
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            event_files.push(path);
        } else {
            format!("Ignoring '{}', as it is not a file", path.display()).warn();
        }
    }
    event_files.sort_unstable();
    for warning in event_files.iter().filter_map(|p| missing_identifier_warning(p)) {
        warning.warn();
    }
    debug!("Found {} event files in {}", event_files.len(), dir.display());
    Ok(event_files)
}

/// A warning for a file whose name has no GW event identifier.
pub(super) fn missing_identifier_warning(path: &Path) -> Option<String> {
    if !get_gw_event_from_filename(path).is_empty() {
        return None;
    }
    Some(format!(
        "No GW event identifier in '{}'; using '{}' as the event name",
        path.display(),
        event_name_for_path(path)
    ))
}

/// Every event must have a unique name, otherwise the events would overwrite
/// each other.
pub(super) fn check_unique_event_names(paths: &[PathBuf]) -> Result<(), BatchError> {
    let mut seen = HashSet::with_capacity(paths.len());
    for path in paths {
        let event_name = event_name_for_path(path);
        if !seen.insert(event_name.clone()) {
            return Err(BatchError::DuplicateEvent {
                event: event_name,
                file: path.display().to_string(),
            });
        }
    }
    Ok(())
}

pub(super) fn read_result_file(path: &Path) -> Result<ResultFile, BatchError> {
    ResultFile::read(path).map_err(|err| BatchError::ResultFile {
        file: path.display().to_string(),
        err,
    })
}

/// Run `f` on every path. If `njobs` is more than 1, a pool of that many
/// threads is used. The results are in the same order as `paths`, regardless
/// of the order in which the work finished.
pub(super) fn map_events<T, F>(
    paths: &[PathBuf],
    njobs: usize,
    f: F,
) -> Result<Vec<Result<T, BatchError>>, BatchError>
where
    T: Send,
    F: Fn(&Path) -> Result<T, BatchError> + Sync,
{
    let progress = ProgressBar::with_draw_target(
        Some(paths.len() as _),
        if PROGRESS_BARS.load() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg:17}: [{wide_bar:.blue}] {pos:3}/{len:3} events ({elapsed_precise}<{eta_precise})")
            .unwrap()
            .progress_chars("=> "),
    )
    .with_position(0)
    .with_message("Processing events");

    let work = |path: &PathBuf| {
        let result = f(path);
        progress.inc(1);
        result
    };

    let results = if njobs > 1 {
        info!("Processing {} events with {njobs} threads", paths.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(njobs)
            .thread_name(|i| format!("event-{i}"))
            .build()?;
        let mut results = Vec::with_capacity(paths.len());
        pool.install(|| paths.par_iter().map(work).collect_into_vec(&mut results));
        results
    } else {
        info!("Processing {} events", paths.len());
        paths.iter().map(work).collect()
    };
    progress.abandon_with_message("Finished processing");

    Ok(results)
}

/// What happened to a single event.
pub(super) enum EventOutcome<T> {
    /// The event was processed.
    Processed(T),

    /// The event didn't match the requested source type.
    Filtered,

    /// The result file couldn't be read, and that's allowed.
    Unreadable,
}

/// Pair each result with its event name. Result files that couldn't be read
/// are an error, unless `skip_unreadable` is true. Any other error is always
/// returned.
pub(super) fn collect_outcomes<T>(
    paths: &[PathBuf],
    results: Vec<Result<Option<T>, BatchError>>,
    skip_unreadable: bool,
) -> Result<Vec<(String, EventOutcome<T>)>, BatchError> {
    let mut outcomes = Vec::with_capacity(results.len());
    for (path, result) in paths.iter().zip(results) {
        let event_name = event_name_for_path(path);
        let outcome = match result {
            Ok(Some(t)) => EventOutcome::Processed(t),
            Ok(None) => EventOutcome::Filtered,
            Err(BatchError::ResultFile { file, err }) if skip_unreadable => {
                warn!("Skipping event {event_name}; couldn't read '{file}': {err}");
                EventOutcome::Unreadable
            }
            Err(e) => return Err(e),
        };
        outcomes.push((event_name, outcome));
    }
    Ok(outcomes)
}

/// The fate of every event in a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BatchSummary {
    /// Events written to the output file.
    pub(crate) written: Vec<String>,

    /// Events that didn't match the requested source type.
    pub(crate) filtered: Vec<String>,

    /// Events whose result files couldn't be read.
    pub(crate) unreadable: Vec<String>,
}

impl BatchSummary {
    pub(crate) fn log(&self) {
        info!(
            "{} events written, {} filtered by source type, {} unreadable",
            self.written.len(),
            self.filtered.len(),
            self.unreadable.len()
        );
        if !self.filtered.is_empty() {
            debug!("Filtered events: {}", self.filtered.join(", "));
        }
        if !self.unreadable.is_empty() {
            warn!("Unreadable events: {}", self.unreadable.join(", "));
        }
    }
}

#[derive(Error, Debug)]
pub(crate) enum BatchError {
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("Couldn't read result file '{file}': {err}")]
    ResultFile { file: String, err: ResultFileError },

    #[error("Event '{event}' appears in more than one result file (e.g. '{file}'); move the duplicates out of the directory")]
    DuplicateEvent { event: String, file: String },

    #[error(transparent)]
    Write(#[from] OutputWriteError),

    #[error(transparent)]
    Hdf5(#[from] hdf5::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
