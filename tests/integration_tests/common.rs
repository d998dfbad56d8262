// shared utilities for integration tests

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

static TEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// create a fresh temporary directory, unique per call
pub fn create_test_dir(name: &str) -> PathBuf {
    let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = env::temp_dir()
        .join("eligibility_integration_tests")
        .join(format!("{}_{}_{}", name, std::process::id(), count));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }

    fs::create_dir_all(&dir).expect("Failed to create test directory");
    dir
}

pub fn cleanup_test_dir(path: &Path) {
    if path.exists() {
        fs::remove_dir_all(path).ok();
    }
}

/// write a JSON document into the test directory and return its path
pub fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap())
        .expect("Failed to write test document");
    path
}

pub fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_eligibility"))
}

/// run eligibility with a config path so the user's own config is never touched
pub fn run_eligibility(args: &[&str], config_path: &Path) -> Output {
    run_eligibility_with_env(args, &[("ELIGIBILITY_CONFIG", config_path.to_str().unwrap())])
}

pub fn run_eligibility_with_env(args: &[&str], env_vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(binary_path());
    cmd.args(args).env_remove("RUST_LOG");

    for (key, value) in env_vars {
        cmd.env(key, value);
    }

    cmd.output().expect("Failed to run eligibility")
}

/// run eligibility feeding `input` on stdin
pub fn run_eligibility_with_stdin(args: &[&str], config_path: &Path, input: &str) -> Output {
    let mut child = Command::new(binary_path())
        .args(args)
        .env("ELIGIBILITY_CONFIG", config_path)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn eligibility");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for eligibility")
}

/// parse the single JSON-RPC line printed on stdout
pub fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout is not JSON ({}): {}", e, stdout))
}
