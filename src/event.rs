// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Event identifiers and output file names.
//!
//! GW events in the catalogue releases are named `GWYYMMDD_hhmmss`; the result
//! files carry this name somewhere in their filename.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::constants::OUTPUT_EXTENSION;

lazy_static::lazy_static! {
    static ref GW_EVENT_REGEX: Regex = Regex::new(r"GW\d{6}_\d{6}").unwrap();
}

/// Get the GW event identifier (e.g. "GW191109_010717") from a filename or
/// URL. If there's no match, an empty string is returned.
pub fn get_gw_event_from_filename<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref().to_string_lossy();
    GW_EVENT_REGEX
        .find(&path)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Get the name used for the event contained in a result file. This is the GW
/// event identifier, unless the filename doesn't have one, in which case the
/// file stem is used.
///
/// Every part of `gwtc` that needs the name of an event derives it with this
/// function, so names always agree. Nothing is logged here; discovery reports
/// files without an identifier.
pub(crate) fn event_name_for_path(path: &Path) -> String {
    let event_name = get_gw_event_from_filename(path);
    if !event_name.is_empty() {
        return event_name;
    }

    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// The name of the file that holds a single event's output. The output
/// extension is appended, so event names containing dots keep them.
pub(crate) fn event_file_name(event_name: &str) -> PathBuf {
    PathBuf::from(format!("{event_name}.{OUTPUT_EXTENSION}"))
}

/// Replace the extension of `outfile` with `ext`.
pub fn clean_outfile_name<P: AsRef<Path>>(outfile: P, ext: &str) -> PathBuf {
    outfile.as_ref().with_extension(ext.trim_start_matches('.'))
}

/// Replace the extension of `outfile` with the output extension ("hdf5").
pub(crate) fn output_file_name<P: AsRef<Path>>(outfile: P) -> PathBuf {
    clean_outfile_name(outfile, OUTPUT_EXTENSION)
}
