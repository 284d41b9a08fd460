// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use tempfile::TempDir;

use crate::{get_cmd_output, gwtc, write_events, write_result_file, EVENT1};

#[test]
fn test_localizations_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    write_events(tmp_dir.path());
    let output = tmp_dir.path().join("out").join("locs.hdf5");

    #[rustfmt::skip]
    let cmd = gwtc()
        .args([
            "localizations",
            &format!("{}", tmp_dir.path().display()),
            "-o", &format!("{}", output.display()),
            "--event-dir", &format!("{}", tmp_dir.path().join("events").display()),
            "-vv",
        ])
        .ok();
    assert!(cmd.is_ok(), "localizations failed: {}", cmd.err().unwrap());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

#[test]
fn test_maximum_likelihood_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    write_events(tmp_dir.path());
    let output = tmp_dir.path().join("out").join("maxl.hdf5");

    #[rustfmt::skip]
    let cmd = gwtc()
        .args([
            "maxl",
            &format!("{}", tmp_dir.path().display()),
            "-o", &format!("{}", output.display()),
            "--write-source",
        ])
        .ok();
    assert!(cmd.is_ok(), "maxl failed: {}", cmd.err().unwrap());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

#[test]
fn test_classify_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let file = write_result_file(tmp_dir.path(), EVENT1, &["C01:Mixed"]);

    let cmd = gwtc()
        .args(["classify", &format!("{}", file.display())])
        .ok();
    assert!(cmd.is_ok(), "classify failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains(&format!("{EVENT1}: BBH [C01:Mixed]")), "{stdout}");
}

#[test]
fn test_dry_run_and_save_toml() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    write_events(tmp_dir.path());
    let output = tmp_dir.path().join("locs.hdf5");
    let toml = tmp_dir.path().join("args").join("locs.toml");
    std::fs::create_dir(tmp_dir.path().join("args")).unwrap();

    #[rustfmt::skip]
    let cmd = gwtc()
        .args([
            "localizations",
            &format!("{}", tmp_dir.path().display()),
            "-o", &format!("{}", output.display()),
            "--write-snrs",
            "--dry-run",
            "--save-toml", &format!("{}", toml.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "dry run failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("Dry run -- exiting now."));
    assert!(!output.exists());

    // The saved arguments can be used to do the real run.
    let contents = std::fs::read_to_string(&toml).unwrap();
    assert!(contents.contains("write_snrs = true"), "{contents}");
    let cmd = gwtc()
        .args([
            "localizations",
            "--args-file",
            &format!("{}", toml.display()),
            "--event-dir",
            &format!("{}", tmp_dir.path().join("events").display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "localizations failed: {}", cmd.err().unwrap());
    assert!(output.exists());
}
