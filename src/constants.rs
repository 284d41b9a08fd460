// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Useful constants.

/// The extension given to every output file. Any user-supplied output path has
/// its extension replaced with this.
pub const OUTPUT_EXTENSION: &str = "hdf5";

/// The default output file of the `localizations` subcommand.
pub const DEFAULT_LOCALIZATIONS_OUTPUT: &str = "gwtc_localizations.hdf5";

/// The default output file of the `maximum-likelihood` subcommand.
pub const DEFAULT_MAXL_OUTPUT: &str = "gwtc_maximum_likelihood.hdf5";

/// The posterior-sample parameters describing a GW localization (right
/// ascension, declination and luminosity distance).
pub const LOCALIZATION_KEYS: [&str; 3] = ["ra", "dec", "luminosity_distance"];

/// The token prepended to approximant names to form analysis labels in the
/// catalogue releases.
pub const ANALYSIS_LABEL_PREFIX: &str = "C01:";

/// The parameter used to find the maximum-likelihood sample of an analysis.
pub const LOG_LIKELIHOOD_KEY: &str = "log_likelihood";

/// Suffixes of the per-detector SNR parameters written alongside requested
/// parameters.
pub const SNR_SUFFIXES: [&str; 3] = [
    "optimal_snr",
    "matched_filter_snr",
    "matched_filter_abs_snr",
];

/// The default number of jobs used to process events.
pub const DEFAULT_NJOBS: usize = 1;
