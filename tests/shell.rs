mod common;

use common::TestEnv;
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn shell_starts_with_banner_and_help() {
    let env = TestEnv::new();
    env.demo()
        .write_stdin("exit\n")
        .assert()
        .success()
        .stdout(contains("VALTSTORAGE.CLOUD"))
        .stdout(contains("Available commands:"))
        .stdout(contains("Goodbye"));
}

#[test]
fn shell_reports_bad_input_and_keeps_going() {
    let env = TestEnv::new();
    env.demo()
        .write_stdin("frobnicate\nupload\ndownload https://valtstorage.cloud/share//\nhelp\nexit\n")
        .assert()
        .success()
        .stderr(contains("Unknown command: frobnicate"))
        .stdout(contains("Type \"help\" to see available commands"))
        .stderr(contains("Error: Missing file path"))
        .stdout(contains("Usage: upload <file>"))
        .stderr(contains("Invalid share URL format"))
        .stdout(contains("Goodbye"));
}

#[test]
fn shell_runs_commands_in_sequence() {
    let env = TestEnv::new();
    env.write_file("notes.txt", b"hello");
    env.demo()
        .write_stdin("UPLOAD notes.txt\ndownload V1A2B3C4D\nexit\n")
        .assert()
        .success()
        .stdout(contains("File uploaded successfully!"))
        .stdout(contains("text/plain"))
        .stdout(contains("File saved:"));
    assert!(env.exists("valtstorage-V1A2B3C4D-README.md"));
}

#[test]
fn shell_exits_cleanly_at_end_of_input() {
    let env = TestEnv::new();
    env.demo()
        .write_stdin("help\n")
        .assert()
        .success()
        .stdout(contains("Goodbye"));
}

#[test]
fn shell_ignores_lines_after_exit() {
    let env = TestEnv::new();
    env.demo()
        .write_stdin("exit\nfrobnicate\n")
        .assert()
        .success()
        .stderr(contains("Unknown command").not());
}
