// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{
    display_warnings, BatchArgs, InfoPrinter, ARG_FILE_HELP, DIRECTORY_HELP, NJOBS_HELP,
    SOURCE_HELP,
};
use crate::{
    constants::DEFAULT_MAXL_OUTPUT, extract::MaxLikelihoodOptions, params::MaxLikelihoodParams,
    GwtcError,
};

lazy_static::lazy_static! {
    static ref OUTPUT_FILE_HELP: String =
        format!("The consolidated output file. Its extension is always replaced with .hdf5. Default: {DEFAULT_MAXL_OUTPUT}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct MaxLikelihoodArgs {
    #[clap(long, help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(name = "DIRECTORY", help = DIRECTORY_HELP.as_str(), parse(from_os_str))]
    pub(super) directory: Option<PathBuf>,

    #[clap(short = 'o', long, help = OUTPUT_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) output_file: Option<PathBuf>,

    /// Write the source type of each event (inferred from the approximants
    /// of its analyses), if it can be inferred.
    #[clap(long)]
    #[serde(default)]
    pub(super) write_source: bool,

    /// Write the detectors of each event.
    #[clap(long)]
    #[serde(default)]
    pub(super) write_detectors: bool,

    /// Write the 50% and 90% skymap areas of each analysis (if available).
    #[clap(long)]
    #[serde(default)]
    pub(super) write_skymap_stats: bool,

    #[clap(long, help = SOURCE_HELP.as_str())]
    pub(super) source: Option<String>,

    #[clap(short = 'n', long, help = NJOBS_HELP.as_str())]
    pub(super) njobs: Option<usize>,

    /// Skip result files that can't be read, rather than stopping.
    #[clap(long)]
    #[serde(default)]
    pub(super) skip_unreadable: bool,
}

impl MaxLikelihoodArgs {
    /// Consolidate the command-line arguments with those in the argument file
    /// (if any), preferring the command line.
    pub(super) fn merge(self) -> Result<MaxLikelihoodArgs, GwtcError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let MaxLikelihoodArgs {
                args_file: _,
                directory,
                output_file,
                write_source,
                write_detectors,
                write_skymap_stats,
                source,
                njobs,
                skip_unreadable,
            } = unpack_arg_file!(arg_file);

            Ok(MaxLikelihoodArgs {
                args_file: None,
                directory: cli_args.directory.or(directory),
                output_file: cli_args.output_file.or(output_file),
                write_source: cli_args.write_source || write_source,
                write_detectors: cli_args.write_detectors || write_detectors,
                write_skymap_stats: cli_args.write_skymap_stats || write_skymap_stats,
                source: cli_args.source.or(source),
                njobs: cli_args.njobs.or(njobs),
                skip_unreadable: cli_args.skip_unreadable || skip_unreadable,
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<MaxLikelihoodParams, GwtcError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            directory,
            output_file,
            write_source,
            write_detectors,
            write_skymap_stats,
            source,
            njobs,
            skip_unreadable,
        } = self;

        let mut printer = InfoPrinter::new("Collecting maximum-likelihood values".into());
        let batch = BatchArgs {
            directory,
            output_file,
            default_output_file: DEFAULT_MAXL_OUTPUT,
            source,
            njobs,
        }
        .parse(&mut printer)?;

        let options = MaxLikelihoodOptions {
            write_source,
            write_detectors,
            write_skymap_stats,
        };
        let mut block = vec!["Event metadata:".into()];
        for (wanted, what) in [
            (write_source, "source type"),
            (write_detectors, "detectors"),
            (write_skymap_stats, "skymap 50% and 90% areas"),
        ] {
            if wanted {
                block.push(format!("  {what}").into());
            }
        }
        if block.len() > 1 {
            printer.push_block(block);
        }
        if skip_unreadable {
            printer.push_line("Unreadable result files are skipped".into());
        }

        printer.display();
        display_warnings();

        Ok(MaxLikelihoodParams {
            event_files: batch.event_files,
            output_file: batch.output_file,
            options,
            source: batch.source,
            njobs: batch.njobs,
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
