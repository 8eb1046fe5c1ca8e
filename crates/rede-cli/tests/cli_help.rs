use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("rede")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("whoami"))
        .stdout(predicate::str::contains("signup"))
        .stdout(predicate::str::contains("feed"))
        .stdout(predicate::str::contains("post"))
        .stdout(predicate::str::contains("profile"));
}

#[test]
fn test_login_help_shows_flags() {
    cargo_bin_cmd!("rede")
        .args(["login", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--email"))
        .stdout(predicate::str::contains("--password"));
}

#[test]
fn test_feed_help_shows_pagination_flags() {
    cargo_bin_cmd!("rede")
        .args(["feed", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--offset"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("rede")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
