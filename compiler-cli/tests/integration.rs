//! Checks for regressions in the CLI interface code
//!
//! To skip unit tests, and only run integration tests, execute:
//!
//! ```sh
//! cargo test --test integration
//! ```

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::{io::Write, process::Command};
use tempfile::NamedTempFile;

const WELL_TYPED: &str = "class Main {
    public static void main(String[] args) {
        System.out.println(new B().get());
    }
}
class A {
    int x;
    public int get() { return x; }
}
class B extends A {
    public int set(int value) { x = value; return x; }
}
";

fn source_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("cannot create temporary file");
    file.write_all(content)
        .expect("cannot write temporary file");
    file
}

fn minijavac(args: &[&str], input: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("minijavac").unwrap();
    cmd.env("TERM", "dumb"); // disable color output
    cmd.env_remove("RUST_LOG");
    cmd.args(args);
    cmd.arg(input.path());
    cmd
}

#[test]
fn echo_copies_the_input() {
    let input = source_file(WELL_TYPED.as_bytes());
    minijavac(&["--echo"], &input)
        .assert()
        .success()
        .stdout(predicate::str::contains("public int set(int value)"));
}

#[test]
fn echo_accepts_empty_files() {
    let input = source_file(b"");
    minijavac(&["--echo"], &input)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn lextest_prints_one_token_per_line() {
    let input = source_file(b"class Foo { int x; } /* comment */ 42");
    minijavac(&["--lextest"], &input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "class\nidentifier Foo\n{\nint\nidentifier x\n;\n}\ninteger literal 42\nEOF\n",
        ));
}

#[test]
fn lexical_errors_fail() {
    let input = source_file(b"class Foo { int x = 1 & 2; }");
    minijavac(&["--lextest"], &input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn non_ascii_input_is_rejected() {
    let input = source_file("class Fö {}".as_bytes());
    minijavac(&["--parsetest"], &input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot decode input file"));
}

#[test]
fn parsetest() {
    let valid = source_file(WELL_TYPED.as_bytes());
    minijavac(&["--parsetest"], &valid).assert().success();

    let missing_semicolon =
        source_file(b"class Main { public static void main(String[] a) { x = 1 } }");
    minijavac(&["--parsetest"], &missing_semicolon)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected"));

    let empty = source_file(b"");
    minijavac(&["--parsetest"], &empty)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected end of file"));
}

#[test]
fn print_ast_is_canonical() {
    let input = source_file(b"class Main { public static void main(String[] a) { System.out.println(1+2*3); } }");
    minijavac(&["--print-ast"], &input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\t\tSystem.out.println((1 + (2 * 3)));\n",
        ));
}

#[test]
fn check_is_the_default_phase() {
    let input = source_file(WELL_TYPED.as_bytes());
    minijavac(&[], &input)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    minijavac(&["--check"], &input).assert().success();
}

#[test]
fn type_errors_point_at_the_source() {
    let input = source_file(
        b"class Main {\n    public static void main(String[] a) {\n        if (5) { } else { }\n    }\n}\n",
    );
    minijavac(&["--check"], &input)
        .assert()
        .failure()
        .stderr(
            predicate::str::contains(
                "mismatched types in if condition: expected 'boolean', found 'int'",
            )
            .and(predicate::str::contains("3:13")),
        );
}

#[test]
fn keep_going_reports_all_errors() {
    let src = b"class Main { public static void main(String[] a) { } }
class A {
    public int f(int x) {
        x = true;
        System.out.println(false);
        return x;
    }
}
";
    let input = source_file(src);

    minijavac(&["--check"], &input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("println argument").not());

    minijavac(&["--check", "--keep-going"], &input)
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("mismatched types in assignment")
                .and(predicate::str::contains("mismatched types in println argument"))
                .and(predicate::str::contains("2 errors")),
        );
}

#[test]
fn dump_class_table() {
    let input = source_file(WELL_TYPED.as_bytes());
    minijavac(&["--dump-class-table"], &input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "class A\n\tfield x : int\n\tmethod get() -> int\nclass B extends A\n\tmethod set(int) -> int\n",
        ));
}

#[test]
fn dump_annotations() {
    let input = source_file(WELL_TYPED.as_bytes());
    minijavac(&["--dump-annotations"], &input)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("get : int (call A.get() -> int)")
                .and(predicate::str::contains("11:33 x : int (field of A)"))
                .and(predicate::str::contains("value : int (param)")),
        );
}

#[test]
fn phase_flags_are_exclusive() {
    let input = source_file(WELL_TYPED.as_bytes());
    minijavac(&["--lextest", "--parsetest"], &input)
        .assert()
        .failure();
}
