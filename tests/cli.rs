//! CLI integration tests: runs the compiled `lox` binary end-to-end and
//! checks exit codes, stdout, and stderr against spec.md §6/§8. Modeled on
//! the `faxc-drv` driver crate's own `assert_cmd` + `predicates` +
//! `tempfile` integration tests in the retrieval pack.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn script_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp script");
    write!(file, "{}", contents).expect("write temp script");
    file
}

#[test]
fn scenario_one_prints_true_and_exits_zero() {
    let file = script_file("print (1 + 2) * 3 == 9;");
    Command::cargo_bin("lox")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));
}

#[test]
fn scenario_four_runtime_error_exits_70() {
    let file = script_file("print \"a\" + 1;");
    Command::cargo_bin("lox")
        .unwrap()
        .arg(file.path())
        .assert()
        .code(70)
        .stderr(predicate::str::contains("Operands must be two numbers or two strings."))
        .stderr(predicate::str::contains("[line 1]"));
}

#[test]
fn scenario_six_parse_error_exits_65() {
    let file = script_file("1 + ;");
    Command::cargo_bin("lox")
        .unwrap()
        .arg(file.path())
        .assert()
        .code(65)
        .stderr(predicate::str::contains("[line 1] Error at ';': Expect expression."));
}

#[test]
fn nonexistent_file_exits_65() {
    Command::cargo_bin("lox")
        .unwrap()
        .arg("/no/such/file.lox")
        .assert()
        .code(65);
}

#[test]
fn too_many_arguments_prints_usage_and_exits_64() {
    Command::cargo_bin("lox")
        .unwrap()
        .arg("a.lox")
        .arg("b.lox")
        .assert()
        .code(64)
        .stdout(predicate::str::contains("Usage: lox [script]"));
}

#[test]
fn block_scoping_shadow_and_restore_via_file() {
    let file = script_file(
        "var a = \"first\"; print a; { var a = \"second\"; print a; } print a;",
    );
    Command::cargo_bin("lox")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("first\nsecond\nfirst\n"));
}
