//! Shared test utilities for integration tests.
//!
//! Provides helpers for writing scratch note files and running the
//! notemark binary against them.

#![allow(dead_code)]

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Writes note into temporary directory and returns its path.
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn write_note(dir: &TempDir, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Runs the notemark binary with given arguments.
///
/// # Errors
///
/// Returns error if the process cannot be spawned
pub fn notemark(args: &[&str], cwd: &Path) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_notemark"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()?)
}

/// Runs the notemark binary feeding `input` on stdin.
///
/// # Errors
///
/// Returns error if the process cannot be spawned or stdin cannot be written
pub fn notemark_stdin(args: &[&str], input: &str) -> Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_notemark"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes())?;
    }

    Ok(child.wait_with_output()?)
}

/// Returns stdout of a finished process as UTF-8.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Returns stderr of a finished process as UTF-8.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
