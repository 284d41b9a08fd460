// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{
    display_warnings, BatchArgs, InfoPrinter, ARG_FILE_HELP, DIRECTORY_HELP, NJOBS_HELP,
    SOURCE_HELP,
};
use crate::{
    constants::{DEFAULT_LOCALIZATIONS_OUTPUT, LOCALIZATION_KEYS},
    extract::ExtractOptions,
    params::LocalizationsParams,
    GwtcError,
};

lazy_static::lazy_static! {
    static ref OUTPUT_FILE_HELP: String =
        format!("The consolidated output file. Its extension is always replaced with .hdf5. Default: {DEFAULT_LOCALIZATIONS_OUTPUT}");

    static ref PARAMETERS_HELP: String =
        format!("The posterior-sample parameters to extract from every analysis. Default: {}", LOCALIZATION_KEYS.join(" "));
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct LocalizationsArgs {
    #[clap(long, help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(name = "DIRECTORY", help = DIRECTORY_HELP.as_str(), parse(from_os_str))]
    pub(super) directory: Option<PathBuf>,

    #[clap(short = 'o', long, help = OUTPUT_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) output_file: Option<PathBuf>,

    #[clap(long, help = SOURCE_HELP.as_str())]
    pub(super) source: Option<String>,

    #[clap(long, multiple_values(true), help = PARAMETERS_HELP.as_str())]
    pub(super) parameters: Option<Vec<String>>,

    /// Also write the optimal, matched-filter and absolute matched-filter SNRs
    /// of each detector. SNRs are only written for analyses whose detectors
    /// are known.
    #[clap(long)]
    #[serde(default)]
    pub(super) write_snrs: bool,

    /// Write the 90% skymap area of each analysis (if available) as an
    /// attribute.
    #[clap(long)]
    #[serde(default)]
    pub(super) write_skymap_stats: bool,

    #[clap(short = 'n', long, help = NJOBS_HELP.as_str())]
    pub(super) njobs: Option<usize>,

    /// The directory that the intermediate per-event files are written to.
    /// These files are not removed. Default: the current directory
    #[clap(long, parse(from_os_str))]
    pub(super) event_dir: Option<PathBuf>,

    /// Skip result files that can't be read, rather than stopping.
    #[clap(long)]
    #[serde(default)]
    pub(super) skip_unreadable: bool,
}

impl LocalizationsArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<LocalizationsArgs, GwtcError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let LocalizationsArgs {
                args_file: _,
                directory,
                output_file,
                source,
                parameters,
                write_snrs,
                write_skymap_stats,
                njobs,
                event_dir,
                skip_unreadable,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(LocalizationsArgs {
                args_file: None,
                directory: cli_args.directory.or(directory),
                output_file: cli_args.output_file.or(output_file),
                source: cli_args.source.or(source),
                parameters: cli_args.parameters.or(parameters),
                write_snrs: cli_args.write_snrs || write_snrs,
                write_skymap_stats: cli_args.write_skymap_stats || write_skymap_stats,
                njobs: cli_args.njobs.or(njobs),
                event_dir: cli_args.event_dir.or(event_dir),
                skip_unreadable: cli_args.skip_unreadable || skip_unreadable,
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<LocalizationsParams, GwtcError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            directory,
            output_file,
            source,
            parameters,
            write_snrs,
            write_skymap_stats,
            njobs,
            event_dir,
            skip_unreadable,
        } = self;

        let mut printer = InfoPrinter::new("Extracting localizations".into());
        let batch = BatchArgs {
            directory,
            output_file,
            default_output_file: DEFAULT_LOCALIZATIONS_OUTPUT,
            source,
            njobs,
        }
        .parse(&mut printer)?;

        let keys = match parameters {
            Some(p) if !p.is_empty() => p,
            _ => LOCALIZATION_KEYS.iter().map(|k| k.to_string()).collect(),
        };
        printer.push_line(format!("Parameters: {}", keys.iter().join(", ")).into());

        let options = ExtractOptions {
            write_snrs,
            write_skymap_stats,
        };
        let mut extras = vec![];
        if write_snrs {
            extras.push("SNRs");
        }
        if write_skymap_stats {
            extras.push("skymap 90% areas");
        }
        if !extras.is_empty() {
            printer.push_line(format!("Also writing {}", extras.join(" and ")).into());
        }

        let event_dir = event_dir.unwrap_or_else(|| PathBuf::from("."));
        printer.push_line(
            format!("Per-event files are written to {}", event_dir.display()).into(),
        );
        if skip_unreadable {
            printer.push_line("Unreadable result files are skipped".into());
        }

        printer.display();
        display_warnings();

        Ok(LocalizationsParams {
            event_files: batch.event_files,
            output_file: batch.output_file,
            keys,
            source: batch.source,
            options,
            njobs: batch.njobs,
            event_dir,
            skip_unreadable,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), GwtcError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let summary = params.run()?;
        summary.log();
        Ok(())
    }
}
