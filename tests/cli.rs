//! CLI integration tests.
//!
//! Uses `assert_cmd` to spawn the `wwec` binary and verify exit codes,
//! stdout content and stderr content. Sources are written to a fresh
//! temporary directory per test.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const HELLO: &str = "raw\nnxt x\nx = 5\nanunciar -> x <-\nsmackdown\n";

fn wwec() -> Command {
    let mut cmd = cargo_bin_cmd!("wwec");
    cmd.env_remove("RUST_LOG").env_remove("WWEC_CC");
    cmd
}

fn write_source(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    path
}

fn cc_available() -> bool {
    std::process::Command::new("cc")
        .arg("--version")
        .output()
        .is_ok()
}

#[test]
fn help_exits_0_with_description() {
    wwec()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compile WWE programs"));
}

#[test]
fn emit_c_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "hello.wwe", HELLO);

    wwec()
        .arg(&input)
        .args(["--emit", "c"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#include \"wwe_list.h\""))
        .stdout(predicate::str::contains("printf(\"%.2f\", (double)(x));"));
}

#[test]
fn emit_c_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "hello.wwe", HELLO);
    let output = dir.path().join("hello.c");

    wwec()
        .arg(&input)
        .args(["--emit", "c", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let c = fs::read_to_string(&output).unwrap();
    assert!(c.contains("int main(void) {"));
}

#[test]
fn emit_tokens_listing() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "hello.wwe", "raw\nL.size x=1\n");

    wwec()
        .arg(&input)
        .args(["--emit", "tokens"])
        .assert()
        .success()
        .stdout(concat!(
            "raw -> PROGRAM_START\n\\n -> EOL\n",
            "L -> VARIABLE\n.size -> SIZE\nx=1 -> UNRECOGNIZED\n\\n -> EOL\n",
        ));
}

#[test]
fn emit_ast_tree() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "sum.wwe", "raw\nnxt a\na = 1 + 2 + 3\nsmackdown\n");

    wwec()
        .arg(&input)
        .args(["--emit", "ast"])
        .assert()
        .success()
        .stdout("program\n  declare a\n  assign a = (1 + (2 + 3))\n");
}

#[test]
fn emit_symbol_history() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "hello.wwe", HELLO);

    wwec()
        .arg(&input)
        .args(["--emit", "symbols"])
        .assert()
        .success()
        .stdout("scope depth 0\n  x: numeric = 5\n");
}

#[test]
fn undeclared_variable_exits_1() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "bad.wwe", "raw\nnxt x\nx = y\nsmackdown\n");

    wwec()
        .arg(&input)
        .args(["--emit", "c"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "semantic error: line 3: variable 'y' is not declared",
        ));
}

#[test]
fn unrecognized_word_exits_1() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "bad.wwe", "raw\nnxt x\nx=1\nsmackdown\n");

    wwec()
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "lexical error: line 3: 'x=1' is not a valid word",
        ));
}

#[test]
fn missing_input_file_exits_1() {
    let dir = TempDir::new().unwrap();

    wwec()
        .arg(dir.path().join("nope.wwe"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not read"));
}

#[test]
fn missing_compiler_exits_1() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "hello.wwe", HELLO);

    wwec()
        .arg(&input)
        .env("WWEC_CC", "wwec-no-such-compiler")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("translation failed"));
}

#[test]
fn builds_and_runs_executable() {
    if !cc_available() {
        eprintln!("skipping: no C compiler on PATH");
        return;
    }
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "hello.wwe", HELLO);
    let exe = dir.path().join("hello_bin");

    wwec()
        .arg(&input)
        .arg("-o")
        .arg(&exe)
        .arg("--keep-c")
        .assert()
        .success()
        .stderr(predicate::str::contains("Finished"));

    assert!(dir.path().join("hello_bin_temp.c").exists());

    Command::new(&exe)
        .assert()
        .success()
        .stdout("5.00");
}

#[test]
fn default_output_is_input_stem() {
    if !cc_available() {
        eprintln!("skipping: no C compiler on PATH");
        return;
    }
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "stem.wwe", HELLO);

    wwec().arg(&input).assert().success();

    assert!(dir.path().join("stem").exists());
    assert!(!dir.path().join("stem_temp.c").exists());
}
