use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn run(rows: &[[&str; 3]], path: &str) -> assert_cmd::assert::Assert {
    let output_path = std::path::PathBuf::from(path);
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(["sender", "timestamp", "text"]).unwrap();
    for row in rows {
        wtr.write_record(row).unwrap();
    }
    wtr.flush().unwrap();
    drop(wtr);

    let assert = Command::new(cargo_bin!("momo-guard"))
        .arg(&output_path)
        .assert();
    std::fs::remove_file(output_path).ok();
    assert
}

#[test]
fn test_amount_bounds_are_inclusive() {
    run(
        &[
            ["MPESA", "1", "Confirmed. KES 1.00 from 0722815930 on 01/01/2025 ref QKA000001X"],
            ["MPESA", "2", "Confirmed. KES 0.99 from 0733815930 on 01/01/2025 ref QKA000002X"],
            ["MPESA", "3", "Confirmed. KES 1,000,000.00 from 0790815236 on 01/01/2025 ref QKA000003X"],
            ["MPESA", "4", "Confirmed. KES 1,000,000.01 from 0705918273 on 01/01/2025 ref QKA000004X"],
        ],
        "boundary_amount_test.csv",
    )
    .success()
    .stdout(predicate::str::contains("1,MPESA,ACCEPTED,254722815930,1.00,"))
    .stdout(predicate::str::contains("2,MPESA,REJECTED,254733815930,0.99,"))
    .stdout(predicate::str::contains(
        "3,MPESA,ACCEPTED,254790815236,1000000.00,",
    ))
    .stdout(predicate::str::contains("unusual_amount"))
    .stdout(predicate::str::contains(
        "4,MPESA,REJECTED,254705918273,1000000.01,",
    ));
}

#[test]
fn test_window_edges() {
    let text = "Confirmed. KES 700 from 0722815930 on 01/01/2025 ref QKB000001X";
    run(
        &[
            ["MPESA", "1735741800000", text],
            // exactly one minute later: still an exact duplicate
            ["MPESA", "1735741860000", text],
            // six minutes after the first: outside every window
            ["MPESA", "1735742160001", text],
        ],
        "boundary_window_test.csv",
    )
    .success()
    .stdout(predicate::str::contains(
        "1735741860000,MPESA,DUPLICATE,254722815930,700,Identical message",
    ))
    .stdout(predicate::str::contains(
        "1735742160001,MPESA,ACCEPTED,254722815930,700,",
    ));
}
