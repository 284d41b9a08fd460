// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpful functions for tests: synthetic PESummary result files.

use std::path::{Path, PathBuf};

use hdf5::types::VarLenUnicode;
use serde_json::{json, Map, Value};

/// An analysis to be written into a fake result file.
#[derive(Debug, Clone)]
pub(crate) struct FakeAnalysis {
    pub(crate) label: String,
    pub(crate) parameters: Vec<String>,
    /// One row per sample, one value per parameter.
    pub(crate) rows: Vec<Vec<f64>>,
    /// Written as PSD names; empty means no PSDs.
    pub(crate) psds: Vec<String>,
    pub(crate) area50: Option<f64>,
    pub(crate) area90: Option<f64>,
}

/// A typical analysis with four samples. The third sample (index 2) has the
/// largest log likelihood.
pub(crate) fn fake_analysis(label: &str, psds: &[&str]) -> FakeAnalysis {
    let mut parameters: Vec<String> = ["ra", "dec", "luminosity_distance", "log_likelihood"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for ifo in psds {
        parameters.push(format!("{ifo}_optimal_snr"));
        parameters.push(format!("{ifo}_matched_filter_snr"));
    }

    let rows = (0..4)
        .map(|i| {
            let i = i as f64;
            let mut row = vec![0.5 + 0.1 * i, -0.2 - 0.1 * i, 400.0 + 10.0 * i];
            row.push([10.0, 12.5, 20.0, 15.0][i as usize]);
            for (j, _) in psds.iter().enumerate() {
                row.push(8.0 + i + j as f64);
                row.push(7.5 + i + j as f64);
            }
            row
        })
        .collect();

    FakeAnalysis {
        label: label.to_string(),
        parameters,
        rows,
        psds: psds.iter().map(|s| s.to_string()).collect(),
        area50: Some(25.0),
        area90: Some(100.0),
    }
}

impl FakeAnalysis {
    pub(crate) fn column(&self, parameter: &str) -> Vec<f64> {
        let i = self
            .parameters
            .iter()
            .position(|p| p == parameter)
            .unwrap();
        self.rows.iter().map(|row| row[i]).collect()
    }

    fn other(&self) -> Map<String, Value> {
        let mut other = Map::new();
        if let Some(area50) = self.area50 {
            other.insert("area50".to_string(), json!([area50]));
        }
        if let Some(area90) = self.area90 {
            other.insert("area90".to_string(), json!([area90]));
        }
        other
    }
}

/// Write analyses in the PESummary HDF5 layout, with posterior samples stored
/// as `parameter_names` and `samples`.
pub(crate) fn write_pesummary_hdf5(path: &Path, analyses: &[FakeAnalysis]) {
    let file = hdf5::File::create(path).unwrap();
    file.new_dataset_builder()
        .with_data(&["1.0.0".parse::<VarLenUnicode>().unwrap()][..])
        .create("version")
        .unwrap();

    for analysis in analyses {
        let group = file.create_group(&analysis.label).unwrap();

        let samples_group = group.create_group("posterior_samples").unwrap();
        let names = analysis
            .parameters
            .iter()
            .map(|p| p.parse::<VarLenUnicode>().unwrap())
            .collect::<Vec<_>>();
        samples_group
            .new_dataset_builder()
            .with_data(names.as_slice())
            .create("parameter_names")
            .unwrap();
        let flat = analysis.rows.concat();
        samples_group
            .new_dataset::<f64>()
            .shape((analysis.rows.len(), analysis.parameters.len()))
            .create("samples")
            .unwrap()
            .write_raw(flat.as_slice())
            .unwrap();

        let meta_data = group.create_group("meta_data").unwrap();
        let sampler = meta_data.create_group("sampler").unwrap();
        sampler
            .new_dataset_builder()
            .with_data(&[1000_i64][..])
            .create("nlive")
            .unwrap();
        let other = meta_data.create_group("other").unwrap();
        if let Some(area50) = analysis.area50 {
            other
                .new_dataset_builder()
                .with_data(&[area50][..])
                .create("area50")
                .unwrap();
        }
        if let Some(area90) = analysis.area90 {
            other
                .new_dataset_builder()
                .with_data(&[area90][..])
                .create("area90")
                .unwrap();
        }

        if !analysis.psds.is_empty() {
            let psds = group.create_group("psds").unwrap();
            for ifo in &analysis.psds {
                psds.new_dataset_builder()
                    .with_data(&[20.0, 1e-46, 21.0, 2e-46][..])
                    .create(ifo.as_str())
                    .unwrap();
            }
        }
    }
}

/// Write analyses in the PESummary JSON layout.
pub(crate) fn write_pesummary_json(path: &Path, analyses: &[FakeAnalysis]) {
    let mut contents = Map::new();
    contents.insert("version".to_string(), json!({"pesummary": ["1.0.0"]}));
    for analysis in analyses {
        let psds: Map<String, Value> = analysis
            .psds
            .iter()
            .map(|ifo| (ifo.clone(), json!([[20.0, 1e-46], [21.0, 2e-46]])))
            .collect();
        contents.insert(
            analysis.label.clone(),
            json!({
                "posterior_samples": {
                    "parameter_names": analysis.parameters,
                    "samples": analysis.rows,
                },
                "meta_data": {
                    "sampler": {"nlive": 1000},
                    "other": analysis.other(),
                },
                "psds": psds,
            }),
        );
    }
    std::fs::write(path, serde_json::to_string(&Value::Object(contents)).unwrap()).unwrap();
}

/// Write a release-style HDF5 result file for `event` into `dir`, with one
/// analysis per label (all with H1 and L1 PSDs).
pub(crate) fn write_release_file(dir: &Path, event: &str, labels: &[&str]) -> PathBuf {
    let path = dir.join(format!(
        "IGWN-GWTC3p0-v1-{event}_PEDataRelease_mixed_cosmo.h5"
    ));
    let analyses = labels
        .iter()
        .map(|l| fake_analysis(l, &["H1", "L1"]))
        .collect::<Vec<_>>();
    write_pesummary_hdf5(&path, &analyses);
    path
}
