use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::SolverConfig;
use crate::error::{FoamrunError, Result};

/// Dictionary entry controlling solver stop behavior.
pub const STOP_ENTRY: &str = "stopAt";

/// Requested solver stop behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Run until the preset end time
    RunToEnd,
    /// Write in-progress fields at the next safe opportunity, then stop
    WriteAndStop,
}

impl StopMode {
    /// Value written to the dictionary's stop entry.
    pub fn entry_value(&self) -> &'static str {
        match self {
            StopMode::RunToEnd => "endTime",
            StopMode::WriteAndStop => "writeNow",
        }
    }
}

impl fmt::Display for StopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entry_value())
    }
}

/// Stop-request channel to the solver.
///
/// Decouples the watchdog's timing logic from the on-disk dictionary
/// format; the watchdog only ever sends a typed request.
#[async_trait]
pub trait SolverControl: Send + Sync {
    async fn request(&self, mode: StopMode) -> Result<()>;
}

/// Production control: rewrites the `stopAt` entry of the case's
/// controlDict through the external `foamDictionary` tool.
pub struct DictionaryControl {
    program: String,
    control_dict: PathBuf,
}

impl DictionaryControl {
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            program: config.foam_dictionary.clone(),
            control_dict: config.control_dict(),
        }
    }
}

#[async_trait]
impl SolverControl for DictionaryControl {
    async fn request(&self, mode: StopMode) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("-entry")
            .arg(STOP_ENTRY)
            .arg("-set")
            .arg(mode.entry_value())
            .arg(&self.control_dict)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| FoamrunError::StopControl(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FoamrunError::StopControl(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        tracing::info!(
            entry = STOP_ENTRY,
            value = mode.entry_value(),
            dict = %self.control_dict.display(),
            "Updated solver stop entry"
        );
        Ok(())
    }
}
