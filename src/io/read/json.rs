// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read PESummary JSON result files. The structure mirrors the HDF5
//! format; each analysis is a top-level object named after its label, and
//! posterior samples are stored as `parameter_names` and rows of `samples`.

use std::{fs::File, io::BufReader, path::Path};

use log::{debug, trace};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{infer_detectors, Analysis, ExtraMetadata, ResultFile, ResultFileError, SamplesTable};

#[derive(Deserialize)]
struct JsonAnalysis {
    posterior_samples: JsonSamples,

    #[serde(default)]
    meta_data: Map<String, Value>,

    #[serde(default)]
    psds: Map<String, Value>,
}

#[derive(Deserialize)]
struct JsonSamples {
    parameter_names: Vec<String>,
    samples: Vec<Vec<f64>>,
}

pub(super) fn read(path: &Path) -> Result<ResultFile, ResultFileError> {
    let json_err = |err| ResultFileError::Json {
        file: path.display().to_string(),
        err,
    };

    let reader = BufReader::new(File::open(path)?);
    let contents: Map<String, Value> = serde_json::from_reader(reader).map_err(json_err)?;

    let mut analyses = vec![];
    for (label, value) in contents {
        let has_samples = value
            .as_object()
            .map(|o| o.contains_key("posterior_samples"))
            .unwrap_or(false);
        if !has_samples {
            trace!("Top-level entry '{label}' has no posterior samples; ignoring");
            continue;
        }

        debug!("Reading analysis '{label}'");
        let JsonAnalysis {
            posterior_samples:
                JsonSamples {
                    parameter_names,
                    samples,
                },
            meta_data,
            psds,
        } = serde_json::from_value(value).map_err(json_err)?;

        let samples = SamplesTable::from_rows(parameter_names, &samples)?;
        let detectors = infer_detectors(psds.keys().cloned().collect(), samples.parameters());
        analyses.push(Analysis {
            label,
            detectors,
            extra: ExtraMetadata(meta_data),
            samples,
        });
    }

    Ok(ResultFile { analyses })
}
