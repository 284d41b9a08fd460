// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod localizations;
mod maximum_likelihood;
mod no_stderr;

use std::{
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};
use hdf5::types::VarLenUnicode;
use serde_json::json;

const EVENT1: &str = "GW191103_012549";
const EVENT2: &str = "GW191105_143521";
const EVENT3: &str = "GW200115_042309";

fn gwtc() -> Command {
    Command::cargo_bin("gwtc").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Write a PESummary JSON result file for `event` into `dir`. Each analysis
/// has H1 and L1 PSDs and four samples; the third sample has the largest log
/// likelihood (ra = 0.7, luminosity_distance = 420).
fn write_result_file(dir: &Path, event: &str, labels: &[&str]) -> PathBuf {
    let mut contents = serde_json::Map::new();
    contents.insert("version".to_string(), json!({"pesummary": ["1.0.0"]}));
    for label in labels {
        let samples = (0..4)
            .map(|i| {
                let i = i as f64;
                vec![
                    0.5 + 0.1 * i,
                    -0.2 - 0.1 * i,
                    400.0 + 10.0 * i,
                    [10.0, 12.5, 20.0, 15.0][i as usize],
                    8.0 + i,
                    7.0 + i,
                ]
            })
            .collect::<Vec<_>>();
        contents.insert(
            label.to_string(),
            json!({
                "posterior_samples": {
                    "parameter_names": [
                        "ra",
                        "dec",
                        "luminosity_distance",
                        "log_likelihood",
                        "H1_optimal_snr",
                        "L1_optimal_snr",
                    ],
                    "samples": samples,
                },
                "meta_data": {"other": {"area50": [25.0], "area90": [100.0]}},
                "psds": {"H1": [[20.0, 1e-46]], "L1": [[20.0, 1e-46]]},
            }),
        );
    }

    let path = dir.join(format!("{event}.json"));
    std::fs::write(&path, serde_json::to_string(&contents).unwrap()).unwrap();
    path
}

/// Write two BBH events and a BNS event into `dir`.
fn write_events(dir: &Path) {
    write_result_file(dir, EVENT1, &["C01:IMRPhenomXPHM", "C01:SEOBNRv4PHM"]);
    write_result_file(dir, EVENT2, &["C01:IMRPhenomPv2_NRTidal:LowSpin"]);
    write_result_file(dir, EVENT3, &["C01:Mixed"]);
}

fn read_str_attr(location: &hdf5::Location, name: &str) -> String {
    location
        .attr(name)
        .unwrap()
        .read_scalar::<VarLenUnicode>()
        .unwrap()
        .to_string()
}
