// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code shared between `gwtc` subcommands: argument files, help texts and
//! printers.

mod printers;

pub(crate) use printers::{display_warnings, InfoPrinter, Warn};
#[cfg(test)]
pub(crate) use printers::queued_warnings;

use std::path::PathBuf;

use itertools::Itertools;
use log::{debug, trace};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::GwtcError;
use crate::{
    constants::DEFAULT_NJOBS,
    event::output_file_name,
    io::{read::RESULT_FILE_EXTENSIONS, write::can_write_to_file},
    params::discover_event_files,
    source::{SourceType, SOURCE_TYPES_COMMA_SEPARATED},
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref DIRECTORY_HELP: String =
        format!("Path to the directory containing result files. Every file directly within the directory is treated as an event. Supported formats: {RESULT_FILE_EXTENSIONS}");

    pub(super) static ref SOURCE_HELP: String =
        format!("Only write events of this CBC source type. Supported types: {}. Default: {}", *SOURCE_TYPES_COMMA_SEPARATED, SourceType::default());

    pub(super) static ref NJOBS_HELP: String =
        format!("The number of events to process in parallel. Default: {DEFAULT_NJOBS}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(GwtcError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(GwtcError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(GwtcError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Arguments common to subcommands that process a directory of events, after
/// they have been merged with an argument file.
pub(super) struct BatchArgs {
    pub(super) directory: Option<PathBuf>,
    pub(super) output_file: Option<PathBuf>,
    pub(super) default_output_file: &'static str,
    pub(super) source: Option<String>,
    pub(super) njobs: Option<usize>,
}

/// [`BatchArgs`] that have been checked.
pub(super) struct ParsedBatchArgs {
    pub(super) event_files: Vec<PathBuf>,
    pub(super) output_file: PathBuf,
    pub(super) source: SourceType,
    pub(super) njobs: usize,
}

impl BatchArgs {
    /// Find the event files, and check that the output can be written. Any
    /// problem is reported before work begins.
    pub(super) fn parse(self, printer: &mut InfoPrinter) -> Result<ParsedBatchArgs, GwtcError> {
        let BatchArgs {
            directory,
            output_file,
            default_output_file,
            source,
            njobs,
        } = self;

        let directory = directory.ok_or(BatchArgsError::NoDirectory)?;
        let event_files = discover_event_files(&directory)?;
        if event_files.is_empty() {
            format!("No files were found in '{}'", directory.display()).warn();
        }
        printer.push_line(
            format!(
                "{} event files in {}",
                event_files.len(),
                directory.display()
            )
            .into(),
        );
        trace!("Event files: {event_files:?}");

        let source = match source {
            None => SourceType::default(),
            Some(s) => s.parse().map_err(|_| BatchArgsError::InvalidSource {
                value: s.clone(),
                supported: SOURCE_TYPES_COMMA_SEPARATED.as_str(),
            })?,
        };
        printer.push_line(format!("Source type: {source}").into());

        let njobs = njobs.unwrap_or(DEFAULT_NJOBS);
        if njobs == 0 {
            return Err(BatchArgsError::ZeroJobs.into());
        }
        printer.push_line(format!("Number of jobs: {njobs}").into());

        let output_file = output_file_name(
            output_file.unwrap_or_else(|| PathBuf::from(default_output_file)),
        );
        debug!("Checking that {} can be written", output_file.display());
        can_write_to_file(&output_file)?;
        printer.push_line(format!("Output file: {}", output_file.display()).into());

        Ok(ParsedBatchArgs {
            event_files,
            output_file,
            source,
            njobs,
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum BatchArgsError {
    #[error("No directory of result files was specified")]
    NoDirectory,

    #[error("Invalid source type '{value}'. Supported types: {supported}")]
    InvalidSource {
        value: String,
        supported: &'static str,
    },

    #[error("The number of jobs must be at least 1")]
    ZeroJobs,
}
