// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Classification of compact-binary coalescences by source type.
//!
//! Each analysis within a result file is labelled by the waveform approximant
//! used to produce it. The catalogue releases use dedicated approximants for
//! each kind of source, so the set of labels in a file tells us what kind of
//! source the event was.
//!
//! The waveform tables below overlap (e.g. "Mixed" and "SEOBNRv4PHM" are used
//! for both BBH and NSBH events). Categories are tried in the order of
//! [`WAVEFORMS_PER_SOURCE`], and the first category containing every
//! approximant wins, so these events are classified as BBH.


use itertools::Itertools;
use log::trace;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::constants::ANALYSIS_LABEL_PREFIX;

lazy_static::lazy_static! {
    pub(crate) static ref SOURCE_TYPES_COMMA_SEPARATED: String = SourceType::iter().join(", ");
}

/// The kind of compact binary that produced a GW event. [`SourceType::All`] is
/// not a category that is ever inferred; it is a wildcard used when filtering
/// events.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum SourceType {
    #[default]
    #[strum(serialize = "ALL")]
    #[serde(rename = "ALL")]
    All,

    /// Binary black hole.
    #[strum(serialize = "BBH")]
    #[serde(rename = "BBH")]
    Bbh,

    /// Neutron star-black hole.
    #[strum(serialize = "NSBH")]
    #[serde(rename = "NSBH")]
    Nsbh,

    /// Binary neutron star.
    #[strum(serialize = "BNS")]
    #[serde(rename = "BNS")]
    Bns,
}

impl SourceType {
    /// Does an event with the inferred source type `inferred` pass a filter on
    /// `self`? The wildcard matches everything, including events whose source
    /// type could not be inferred.
    pub fn matches(self, inferred: Option<SourceType>) -> bool {
        self == SourceType::All || inferred == Some(self)
    }
}

pub const BBH_WAVEFORMS: &[&str] = &["Mixed", "IMRPhenomXPHM", "SEOBNRv4PHM"];

pub const BNS_WAVEFORMS: &[&str] = &[
    "IMRPhenomPv2_NRTidal:HighSpin",
    "IMRPhenomPv2_NRTidal:LowSpin",
];

pub const NSBH_WAVEFORMS: &[&str] = &[
    "IMRPhenomNSBH:HighSpin",
    "IMRPhenomNSBH:LowSpin",
    "IMRPhenomXPHM:HighSpin",
    "IMRPhenomXPHM:LowSpin",
    "Mixed",
    "Mixed:NSBH:HighSpin",
    "Mixed:NSBH:LowSpin",
    "SEOBNRv4PHM",
    "SEOBNRv4_ROM_NRTidalv2_NSBH:HighSpin",
    "SEOBNRv4_ROM_NRTidalv2_NSBH:LowSpin",
];

/// The waveform tables in order of priority.
pub const WAVEFORMS_PER_SOURCE: [(SourceType, &[&str]); 3] = [
    (SourceType::Bbh, BBH_WAVEFORMS),
    (SourceType::Bns, BNS_WAVEFORMS),
    (SourceType::Nsbh, NSBH_WAVEFORMS),
];

/// Get the approximant name from an analysis label, e.g. "C01:Mixed" ->
/// "Mixed". Labels without the prefix are returned as they are.
pub fn label_to_approximant(label: &str) -> &str {
    label.strip_prefix(ANALYSIS_LABEL_PREFIX).unwrap_or(label)
}

/// Get the analysis label of an approximant, e.g. "Mixed" -> "C01:Mixed".
pub fn approximant_to_label(approximant: &str) -> String {
    format!("{ANALYSIS_LABEL_PREFIX}{approximant}")
}

/// Infer the source type from the analysis labels of a result file. `None` is
/// returned if no single category contains the approximants of every label
/// (including when there are no labels).
pub fn infer_source_type<S: AsRef<str>>(labels: &[S]) -> Option<SourceType> {
    if labels.is_empty() {
        return None;
    }

    WAVEFORMS_PER_SOURCE
        .iter()
        .find(|(source, waveforms)| {
            let all_present = labels
                .iter()
                .all(|label| waveforms.contains(&label_to_approximant(label.as_ref())));
            trace!("{source}: all approximants present: {all_present}");
            all_present
        })
        .map(|(source, _)| *source)
}

/// The same as [`infer_source_type`], but failing to infer a source type is an
/// error.
pub fn try_infer_source_type<S: AsRef<str>>(labels: &[S]) -> Result<SourceType, SourceError> {
    infer_source_type(labels).ok_or_else(|| SourceError::Unknown {
        labels: labels.iter().map(|l| l.as_ref()).join(", "),
    })
}

/// Infer the source type from the analysis labels of a result file, and check
/// whether it matches the `requested` source type.
pub fn check_source<S: AsRef<str>>(
    labels: &[S],
    requested: SourceType,
) -> (Option<SourceType>, bool) {
    let inferred = infer_source_type(labels);
    (inferred, requested.matches(inferred))
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Could not infer a source type from the analysis labels: [{labels}]")]
    Unknown { labels: String },
}
