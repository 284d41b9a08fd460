// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use crate::{get_cmd_output, gwtc, read_str_attr, write_events, EVENT1, EVENT2, EVENT3};

#[test]
fn test_localizations() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input_dir = tmp_dir.path().join("input");
    std::fs::create_dir(&input_dir).unwrap();
    write_events(&input_dir);
    let output = tmp_dir.path().join("locs.h5");
    let event_dir = tmp_dir.path().join("events");

    #[rustfmt::skip]
    let cmd = gwtc()
        .args([
            "localizations",
            &format!("{}", input_dir.display()),
            "-o", &format!("{}", output.display()),
            "--event-dir", &format!("{}", event_dir.display()),
            "--source", "BBH",
            "--write-snrs",
            "--write-skymap-stats",
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "localizations failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    // Not every SNR is present.
    assert!(stdout.contains("Unable to get key H1_matched_filter_snr"));

    // The extension is always replaced.
    assert!(!output.exists());
    let output = output.with_extension("hdf5");
    let file = hdf5::File::open(&output).unwrap();
    assert_eq!(file.member_names().unwrap(), [EVENT1, EVENT3]);

    let event = file.group(EVENT1).unwrap();
    assert_eq!(read_str_attr(&event, "source_type"), "BBH");
    let analysis = event.group("C01:SEOBNRv4PHM").unwrap();
    assert_eq!(analysis.attr("nsamples").unwrap().read_scalar::<u64>().unwrap(), 4);
    let area90 = analysis.attr("area90").unwrap().read_scalar::<f64>().unwrap();
    approx::assert_abs_diff_eq!(area90, 100.0);
    let distance = analysis
        .dataset("luminosity_distance")
        .unwrap()
        .read_raw::<f64>()
        .unwrap();
    assert_eq!(distance, [400.0, 410.0, 420.0, 430.0]);
    assert!(analysis.link_exists("L1_optimal_snr"));
    assert!(!analysis.link_exists("L1_matched_filter_snr"));
    assert!(!analysis.link_exists("log_likelihood"));

    assert!(event_dir.join(format!("{EVENT1}.hdf5")).exists());
    assert!(!event_dir.join(format!("{EVENT2}.hdf5")).exists());
}

#[test]
fn test_localizations_parameters() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input_dir = tmp_dir.path().join("input");
    std::fs::create_dir(&input_dir).unwrap();
    write_events(&input_dir);
    let output = tmp_dir.path().join("locs.hdf5");

    #[rustfmt::skip]
    let cmd = gwtc()
        .current_dir(tmp_dir.path())
        .args([
            "get-localizations",
            &format!("{}", input_dir.display()),
            "-o", &format!("{}", output.display()),
            "--parameters", "ra", "log_likelihood",
        ])
        .ok();
    assert!(cmd.is_ok(), "localizations failed: {}", cmd.err().unwrap());

    let file = hdf5::File::open(&output).unwrap();
    assert_eq!(file.member_names().unwrap(), [EVENT1, EVENT2, EVENT3]);
    let analysis = file
        .group(&format!("{EVENT2}/C01:IMRPhenomPv2_NRTidal:LowSpin"))
        .unwrap();
    assert_eq!(
        analysis.member_names().unwrap(),
        ["log_likelihood", "ra"]
    );
    assert!(analysis.attr("area90").is_err());
    // Per-event files go into the working directory by default.
    assert!(tmp_dir.path().join(format!("{EVENT2}.hdf5")).exists());
}

#[test]
fn test_localizations_unreadable_file() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input_dir = tmp_dir.path().join("input");
    std::fs::create_dir(&input_dir).unwrap();
    write_events(&input_dir);
    std::fs::write(input_dir.join("README.txt"), "Not a result file").unwrap();
    let output = tmp_dir.path().join("locs.hdf5");

    #[rustfmt::skip]
    let args = [
        "localizations",
        &format!("{}", input_dir.display()),
        "-o", &format!("{}", output.display()),
        "--event-dir", &format!("{}", tmp_dir.path().display()),
    ];
    let cmd = gwtc().args(args).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("README.txt"), "{stderr}");
    assert!(!output.exists());

    let cmd = gwtc().args(args).arg("--skip-unreadable").ok();
    assert!(cmd.is_ok(), "localizations failed: {}", cmd.err().unwrap());
    let file = hdf5::File::open(&output).unwrap();
    assert_eq!(file.member_names().unwrap(), [EVENT1, EVENT2, EVENT3]);
}

#[test]
fn test_localizations_no_directory() {
    let cmd = gwtc().args(["localizations"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No directory"), "{stderr}");
}
