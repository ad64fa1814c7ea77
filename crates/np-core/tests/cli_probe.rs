//! CLI tests for the np-core binary.
//!
//! Each test writes its own prober.yml and plugin scripts into a temp
//! directory and passes the file explicitly with `--config`.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the np-core binary, isolated from the caller's config.
fn np_core() -> Command {
    let mut cmd = Command::cargo_bin("np-core").expect("np-core binary should exist");
    cmd.env_remove("NP_CONFIG")
        .env_remove("NP_CONFIG_DIR")
        .env_remove("NP_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn write_plugin(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write_config(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("prober.yml");
    std::fs::write(&path, yaml).unwrap();
    path
}

fn fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let ok = write_plugin(dir.path(), "check_ok", "echo \"OK - $1 | rtt=12ms\"\nexit 0");
    let warn = write_plugin(dir.path(), "check_warn", "echo 'WARNING - slow'\nexit 1");
    let config = write_config(
        dir.path(),
        &format!(
            r#"
modules:
  ok:
    prober: nagios
    nagios:
      check: {ok}
      arguments: ["$target_host$"]
  strict_warn:
    prober: nagios
    nagios:
      check: {warn}
      treat_warnings_as_failure: true
  missing:
    prober: nagios
    nagios:
      check: /nonexistent/check_gone
  http:
    prober: http
"#,
            ok = ok.display(),
            warn = warn.display()
        ),
    );
    (dir, config)
}

mod probe {
    use super::*;

    #[test]
    fn successful_probe_prints_metrics() {
        let (_dir, config) = fixture();
        np_core()
            .arg("--config")
            .arg(&config)
            .args(["probe", "--module", "ok", "--target", "https://example.org:8443/x"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "probe_nagios_result{output=\"OK - example.org:8443\"} 0",
            ))
            .stdout(predicate::str::contains("probe_nagios_perfdata{key=\"rtt\"} 12"))
            .stdout(predicate::str::contains("probe_success 1"))
            .stdout(predicate::str::contains("probe_duration_seconds"));
    }

    #[test]
    fn failed_probe_exits_one() {
        let (_dir, config) = fixture();
        np_core()
            .arg("--config")
            .arg(&config)
            .args(["probe", "--module", "strict_warn", "--target", "h"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("probe_success 0"));
    }

    #[test]
    fn unresolvable_check_exits_one() {
        let (_dir, config) = fixture();
        np_core()
            .arg("--config")
            .arg(&config)
            .args(["probe", "--module", "missing", "--target", "h"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                "output=\"Error resolving the Nagios check binary\"} 3",
            ));
    }

    #[test]
    fn unknown_module_is_args_error() {
        let (_dir, config) = fixture();
        np_core()
            .arg("--config")
            .arg(&config)
            .args(["probe", "--module", "nope", "--target", "h"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("[ERR_ARGS] unknown module 'nope'"));
    }

    #[test]
    fn non_nagios_module_is_args_error() {
        let (_dir, config) = fixture();
        np_core()
            .arg("--config")
            .arg(&config)
            .args(["probe", "--module", "http", "--target", "h"])
            .assert()
            .code(10);
    }

    #[test]
    fn malformed_param_is_rejected() {
        let (_dir, config) = fixture();
        np_core()
            .arg("--config")
            .arg(&config)
            .args(["probe", "--module", "ok", "--target", "h", "--param", "novalue"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("expected key=value"));
    }

    #[test]
    fn logs_stay_off_stdout() {
        let (_dir, config) = fixture();
        np_core()
            .arg("--config")
            .arg(&config)
            .args(["-vv", "probe", "--module", "ok", "--target", "h"])
            .assert()
            .success()
            .stdout(predicate::str::contains("running Nagios check").not())
            .stderr(predicate::str::contains("running Nagios check"));
    }
}

mod config {
    use super::*;

    #[test]
    fn check_config_lists_modules() {
        let (_dir, config) = fixture();
        np_core()
            .arg("--config")
            .arg(&config)
            .arg("check-config")
            .assert()
            .success()
            .stdout(predicate::str::contains("configuration OK (CLI argument)"))
            .stdout(predicate::str::contains("module: strict_warn"));
    }

    #[test]
    fn missing_config_file_is_config_error() {
        np_core()
            .args(["--config", "/nonexistent/prober.yml", "check-config"])
            .assert()
            .code(11);
    }

    #[test]
    fn invalid_yaml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let config = write_config(dir.path(), "modules: [oops");
        np_core()
            .arg("--config")
            .arg(&config)
            .args(["probe", "--module", "ok", "--target", "h"])
            .assert()
            .code(11)
            .stderr(predicate::str::contains("[ERR_CONFIG]"))
            .stderr(predicate::str::contains("Invalid YAML"));
    }

    #[test]
    fn insecure_site_accounts_url_is_config_error() {
        let dir = TempDir::new().unwrap();
        let config = write_config(
            dir.path(),
            "site_accounts:\n  url: http://accounts.example.org\n  security:\n    credentials_passphrase: p\n",
        );
        np_core()
            .arg("--config")
            .arg(&config)
            .arg("check-config")
            .assert()
            .code(11);
    }
}

#[test]
fn version_prints_package_version() {
    np_core()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_json() {
    np_core()
        .args(["version", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"np_core_version\""));
}
