// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use hdf5::types::VarLenUnicode;
use tempfile::TempDir;

use crate::{get_cmd_output, gwtc, read_str_attr, write_events, EVENT1, EVENT2, EVENT3};

#[test]
fn test_maximum_likelihood() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input_dir = tmp_dir.path().join("input");
    std::fs::create_dir(&input_dir).unwrap();
    write_events(&input_dir);
    let output = tmp_dir.path().join("maxl.hdf5");

    #[rustfmt::skip]
    let cmd = gwtc()
        .args([
            "maxl",
            &format!("{}", input_dir.display()),
            "-o", &format!("{}", output.display()),
            "--write-source",
            "--write-detectors",
            "--write-skymap-stats",
            "-n", "2",
        ])
        .ok();
    assert!(cmd.is_ok(), "maxl failed: {}", cmd.err().unwrap());

    let file = hdf5::File::open(&output).unwrap();
    assert_eq!(file.member_names().unwrap(), [EVENT1, EVENT2, EVENT3]);

    let event = file.group(EVENT2).unwrap();
    assert_eq!(read_str_attr(&event, "source_type"), "BNS");
    let detectors: Vec<VarLenUnicode> = event.attr("detectors").unwrap().read_raw().unwrap();
    assert_eq!(
        detectors.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
        ["H1", "L1"]
    );
    let labels: Vec<VarLenUnicode> = event.attr("labels").unwrap().read_raw().unwrap();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].as_str(), "C01:IMRPhenomPv2_NRTidal:LowSpin");

    let analysis = event.group("C01:IMRPhenomPv2_NRTidal:LowSpin").unwrap();
    let ra = analysis.dataset("ra").unwrap().read_scalar::<f64>().unwrap();
    approx::assert_abs_diff_eq!(ra, 0.7, epsilon = 1e-10);
    let log_likelihood = analysis
        .dataset("log_likelihood")
        .unwrap()
        .read_scalar::<f64>()
        .unwrap();
    approx::assert_abs_diff_eq!(log_likelihood, 20.0);
    let area50 = analysis.attr("area50").unwrap().read_scalar::<f64>().unwrap();
    approx::assert_abs_diff_eq!(area50, 25.0);
}

#[test]
fn test_maximum_likelihood_source_filter() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input_dir = tmp_dir.path().join("input");
    std::fs::create_dir(&input_dir).unwrap();
    write_events(&input_dir);
    let output = tmp_dir.path().join("maxl.hdf5");

    #[rustfmt::skip]
    let cmd = gwtc()
        .args([
            "maximum-likelihood",
            &format!("{}", input_dir.display()),
            "-o", &format!("{}", output.display()),
            "--source", "bns",
        ])
        .ok();
    assert!(cmd.is_ok(), "maxl failed: {}", cmd.err().unwrap());

    let file = hdf5::File::open(&output).unwrap();
    assert_eq!(file.member_names().unwrap(), [EVENT2]);
    let event = file.group(EVENT2).unwrap();
    assert!(event.attr("source_type").is_err());
    assert!(event.attr("detectors").is_err());
}

#[test]
fn test_maximum_likelihood_bad_source() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");

    #[rustfmt::skip]
    let cmd = gwtc()
        .args([
            "maxl",
            &format!("{}", tmp_dir.path().display()),
            "-o", &format!("{}", tmp_dir.path().join("maxl.hdf5").display()),
            "--source", "BHNS",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Invalid source type 'BHNS'"), "{stderr}");
}
