//! Shared E2E test helpers for `featgate` binary tests.

use std::path::Path;
use std::time::Duration;

use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Build a bare Command for the `featgate` binary.
pub fn featgate_cmd() -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("featgate");
    cmd.timeout(TIMEOUT_BASIC);
    cmd
}

/// Build a Command preconfigured with one `--dir`.
pub fn featgate_cmd_with_dir(dir: &Path) -> assert_cmd::Command {
    let mut cmd = featgate_cmd();
    cmd.args(["--dir", dir.to_str().expect("valid utf8")]);
    cmd
}

/// Writes one definition file into `dir`.
pub fn write_features(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).expect("write definition file");
}

/// A definition directory covering the common availability cases.
pub fn fixture_dir() -> TempDir {
    let temp = TempDir::new().expect("create fixture dir");
    write_features(
        temp.path(),
        "_api_features.json",
        r#"{
            "tabs": { "dependencies": ["permission:tabs"] },
            "secret": { "internal": true },
            "scoped": { "matches": ["https://example.com/*"] },
            "bleeding": { "channel": "dev" }
        }"#,
    );
    write_features(temp.path(), "_permission_features.json", r#"{ "tabs": {} }"#);
    temp
}
