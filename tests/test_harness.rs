//! Shared fixtures for integration tests: stub executables standing in
//! for `mpirun`/`foamDictionary`, synthetic solver logs, and a
//! recording implementation of the solver control channel.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use foamrun::error::Result;
use foamrun::solver::{SolverControl, StopMode};

/// Write an executable shell script into `dir` and return its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Write a solver log containing one `ExecutionTime` marker per value,
/// in the given (oldest-first) file order.
pub fn write_solver_log(dir: &Path, name: &str, values: &[f64]) -> PathBuf {
    let mut text = String::new();
    for v in values {
        text.push_str("Time = 0.1\n");
        text.push_str(&format!("ExecutionTime = {v} s  ClockTime = {v} s\n"));
    }
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

/// Control channel that records requests instead of touching a case.
#[derive(Default)]
pub struct RecordingControl {
    pub requests: Mutex<Vec<StopMode>>,
}

impl RecordingControl {
    pub fn recorded(&self) -> Vec<StopMode> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SolverControl for RecordingControl {
    async fn request(&self, mode: StopMode) -> Result<()> {
        self.requests.lock().unwrap().push(mode);
        Ok(())
    }
}
