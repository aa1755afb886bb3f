//! End-to-end CLI tests for the proceedings binary.
//!
//! None of these reach the network: they run the offline subcommands or fail
//! before any client is built.

use assert_cmd::Command;
use predicates::prelude::*;
use proceedings_core::ProceedingsStore;
use tempfile::TempDir;

mod support;
use support::record;

/// Binary invocation isolated from any user config file.
fn proceedings(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("proceedings").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_binary_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    proceedings(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("harvest"))
        .stdout(predicate::str::contains("top-downloads"));
}

#[test]
fn test_binary_version_displays_name() {
    let home = TempDir::new().unwrap();
    proceedings(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("proceedings"));
}

#[test]
fn test_binary_without_subcommand_fails() {
    let home = TempDir::new().unwrap();
    proceedings(&home).assert().failure();
}

#[test]
fn test_binary_rejects_out_of_range_year() {
    let home = TempDir::new().unwrap();
    proceedings(&home)
        .args(["analyze", "--from", "1800"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1800"));
}

#[test]
fn test_analyze_writes_summary_and_charts() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let store = ProceedingsStore::new(work.path().join("proceedings"));
    store
        .save(
            2020,
            &[
                record("Music Generation with Transformers", None),
                record("Beat Tracking", Some("An analysis of tempo.")),
            ],
        )
        .unwrap();
    let output = work.path().join("output");

    proceedings(&home)
        .arg("--proceedings-dir")
        .arg(store.dir())
        .args(["analyze", "--from", "2019", "--to", "2020", "--output-dir"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("2020"))
        .stdout(predicate::str::contains("50.0%"));

    for name in [
        "trends.json",
        "generation_percentage.svg",
        "analysis_percentage.svg",
        "percentage_overlay.svg",
        "absolute_counts_overlay.svg",
    ] {
        assert!(output.join(name).is_file(), "{name} was written");
    }
}

#[test]
fn test_clean_rewrites_abstracts_in_place() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let store = ProceedingsStore::new(work.path());
    store
        .save(2018, &[record("Tagged", Some("<p>Plain words</p>"))])
        .unwrap();

    proceedings(&home)
        .arg("--proceedings-dir")
        .arg(work.path())
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned 1 abstracts across 1 files."));

    assert_eq!(store.load(2018).unwrap()[0].abstract_text(), "Plain words");
}

#[test]
fn test_enrich_on_missing_folder_fails() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    proceedings(&home)
        .arg("--proceedings-dir")
        .arg(work.path().join("absent"))
        .arg("enrich")
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent"));
}

#[test]
fn test_config_show_reflects_file_values() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.toml");
    std::fs::write(
        &config,
        "venue = \"icmc\"\ntop_limit = 7\nanalyze_from_year = 2005\nanalyze_to_year = 2010\n",
    )
    .unwrap();

    proceedings(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = loaded"))
        .stdout(predicate::str::contains("venue = icmc"))
        .stdout(predicate::str::contains("top_limit = 7"))
        .stdout(predicate::str::contains("analyze_years = 2005..=2010"));
}

#[test]
fn test_config_show_cli_overrides_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.toml");
    std::fs::write(&config, "proceedings_dir = \"from-file\"\n").unwrap();

    proceedings(&home)
        .arg("--config")
        .arg(&config)
        .args(["--proceedings-dir", "from-cli", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("proceedings_dir = from-cli"));
}

#[test]
fn test_unknown_config_key_fails() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.toml");
    std::fs::write(&config, "unknown_key = 1\n").unwrap();

    proceedings(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown_key"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let home = TempDir::new().unwrap();

    proceedings(&home)
        .arg("--config")
        .arg(home.path().join("nope.toml"))
        .args(["config", "show"])
        .assert()
        .failure();
}
