#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: accept a transaction
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "sender,timestamp,text").unwrap();
    writeln!(
        csv1,
        "MPESA,1735741800000,\"Confirmed. KES 5,000 from John 0722815930 on 01/01/2025 at 14:30 ref QAB123ABC\""
    )
    .unwrap();

    let mut cmd1 = Command::new(cargo_bin!("momo-guard"));
    cmd1.arg(csv1.path()).arg("--db-path").arg(&db_path);

    let output1 = cmd1.output().expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("1735741800000,MPESA,ACCEPTED,254722815930,5000,"));

    // 2. Second run: same phone and amount, worded differently, 30 seconds later.
    // The duplicate detector starts empty, so only the stored record can catch it.
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "sender,timestamp,text").unwrap();
    writeln!(
        csv2,
        "MPESA,1735741830000,\"M-PESA: you have received Ksh 5,000.00 from 254722815930 ref RZX998KLM at 14:30\""
    )
    .unwrap();

    let mut cmd2 = Command::new(cargo_bin!("momo-guard"));
    cmd2.arg(csv2.path()).arg("--db-path").arg(&db_path);

    let output2 = cmd2.output().expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert!(
        stdout2.contains("1735741830000,MPESA,CONFLICT,254722815930,5000.00,"),
        "{stdout2}"
    );
}
