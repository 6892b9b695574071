//! Binary smoke tests
//!
//! Run the compiled `solflow` binary in an empty temporary directory with a
//! scrubbed environment so no developer `.env` or credentials leak in.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn solflow(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("solflow").unwrap();
    cmd.current_dir(workdir.path())
        .env_clear()
        .env("PATH", workdir.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_every_subcommand() {
    let workdir = TempDir::new().unwrap();

    solflow(&workdir)
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("requirements")
                .and(predicate::str::contains("whoami"))
                .and(predicate::str::contains("components"))
                .and(predicate::str::contains("bump"))
                .and(predicate::str::contains("export"))
                .and(predicate::str::contains("migrate")),
        );
}

#[test]
fn no_subcommand_prints_usage_hint() {
    let workdir = TempDir::new().unwrap();

    solflow(&workdir)
        .assert()
        .success()
        .stdout(predicate::str::contains("solflow --help"));
}

#[test]
fn requirements_fails_without_pac_on_path() {
    let workdir = TempDir::new().unwrap();

    solflow(&workdir)
        .arg("requirements")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found on PATH"));
}

#[test]
fn whoami_requires_an_environment_url() {
    let workdir = TempDir::new().unwrap();

    solflow(&workdir)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SOLFLOW_ENVIRONMENT_URL"));
}

#[test]
fn env_file_supplies_settings() {
    let workdir = TempDir::new().unwrap();
    std::fs::write(
        workdir.path().join(".env"),
        "SOLFLOW_ENVIRONMENT_URL=ftp://org.example.com\n",
    )
    .unwrap();

    solflow(&workdir)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ftp://org.example.com"));
}

#[test]
fn rejects_unknown_increment_policy() {
    let workdir = TempDir::new().unwrap();

    solflow(&workdir)
        .args(["bump", "flows", "--increment", "huge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("huge"));
}
