// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Print the analyses and inferred source type of result files, without
//! writing anything.

use std::path::{Path, PathBuf};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info};

use super::common::display_warnings;
use crate::{
    event::event_name_for_path,
    io::read::ResultFile,
    params::discover_event_files,
    source::{try_infer_source_type, SourceType},
    GwtcError,
};

#[derive(Parser, Debug, Clone, Default)]
pub(super) struct ClassifyArgs {
    /// Result files to classify. Directories are expanded into the files they
    /// contain.
    #[clap(name = "PATHS", required = true, parse(from_os_str))]
    pub(super) paths: Vec<PathBuf>,

    /// Fail if the source type of any file can't be inferred.
    #[clap(long)]
    pub(super) strict: bool,
}

/// What is known about the event in a single result file.
#[derive(Debug, PartialEq)]
pub(super) struct Classification {
    pub(super) event: String,
    pub(super) labels: Vec<String>,
    pub(super) source: Option<SourceType>,
}

impl ClassifyArgs {
    pub(super) fn run(self) -> Result<(), GwtcError> {
        for c in self.classify()? {
            let source = match c.source {
                Some(s) => s.to_string(),
                None => "unknown".to_string(),
            };
            info!("{}: {source} [{}]", c.event, c.labels.iter().join(", "));
        }
        Ok(())
    }

    fn classify(self) -> Result<Vec<Classification>, GwtcError> {
        let mut files = vec![];
        for path in self.paths {
            if path.is_dir() {
                files.extend(discover_event_files(&path)?);
            } else {
                files.push(path);
            }
        }
        // Discovery may have queued warnings.
        display_warnings();
        debug!("Classifying {} files", files.len());

        files
            .iter()
            .map(|f| classify_file(f, self.strict))
            .collect()
    }
}

fn classify_file(path: &Path, strict: bool) -> Result<Classification, GwtcError> {
    let result_file = ResultFile::read(path)?;
    let labels = result_file.labels();
    let source = if strict {
        Some(try_infer_source_type(&labels)?)
    } else {
        result_file.source_type()
    };

    Ok(Classification {
        event: event_name_for_path(path),
        labels: labels.into_iter().map(String::from).collect(),
        source,
    })
}
