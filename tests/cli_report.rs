//! The simulator binary prints its report as JSON on stdout and keeps logs on
//! stderr.

use std::process::{Command, Output};

use catcher::SimulationReport;
use rstest::rstest;

fn run_simulator(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_catcher-sim"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("simulator should start")
}

#[rstest]
#[case::quiet(&["--ticks", "600"])]
#[case::verbose(&["--ticks", "600", "--verbose"])]
fn report_is_the_only_thing_on_stdout(#[case] args: &[&str]) {
    let output = run_simulator(args);
    assert!(output.status.success(), "simulator failed: {output:?}");

    let stdout = String::from_utf8(output.stdout).expect("stdout should be UTF-8");
    let lines: Vec<&str> = stdout.lines().collect();
    let [line] = lines.as_slice() else {
        panic!("expected exactly one stdout line, got: {stdout}");
    };

    let report: SimulationReport =
        serde_json::from_str(line).expect("stdout should hold a JSON report");
    assert!(report.ticks <= 600);
    assert!(report.ticks > 0);
}

#[rstest]
fn startup_line_goes_to_stderr() {
    let output = run_simulator(&["--ticks", "10", "--verbose"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("simulating"), "stderr was: {stderr}");
}

#[rstest]
fn non_positive_step_is_rejected_without_a_report() {
    let output = run_simulator(&["--dt", "0"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
