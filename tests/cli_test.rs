use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("momo-guard"));
    cmd.arg("tests/fixtures/messages.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "timestamp,sender,status,phone,amount,detail,flags",
        ))
        .stdout(predicate::str::contains(
            "1735741800000,MPESA,ACCEPTED,254712345678,5000,",
        ))
        // Same text ten seconds later
        .stdout(predicate::str::contains(
            "1735741810000,MPESA,DUPLICATE,254712345678,5000,Identical message from 254712345678 10000 ms ago",
        ))
        .stdout(predicate::str::contains(
            "1735742400000,AIRTELMONEY,ACCEPTED,254733815930,1250.50,",
        ))
        .stdout(predicate::str::contains("1735743000000,FRIEND,REJECTED,,,"));

    Ok(())
}

#[test]
fn test_cli_rejects_missing_input() {
    let mut cmd = Command::new(cargo_bin!("momo-guard"));
    cmd.arg("tests/fixtures/does_not_exist.csv");

    cmd.assert().failure();
}

#[test]
fn test_cli_config_override() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut config,
        br#"{ "amount": { "max": "1000" } }"#,
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("momo-guard"));
    cmd.arg("tests/fixtures/messages.csv")
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "1735741800000,MPESA,REJECTED,254712345678,5000,",
        ))
        .stdout(predicate::str::contains("too large"));
}

#[test]
fn test_cli_invalid_config_fails() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut config,
        br#"{ "windows": { "exact_window_ms": 600000 } }"#,
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("momo-guard"));
    cmd.arg("tests/fixtures/messages.csv")
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("exact window"));
}
