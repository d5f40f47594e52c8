use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::config::SolverConfig;
use crate::error::{FoamrunError, Result};

/// Enables nested instrumentation regions in the solver's profiling.
pub const NESTED_PROFILING_ENV: &str = "FOAM_NESTED_PROFILING";

/// Spawns the parallel solver in the foreground.
#[derive(Debug, Clone)]
pub struct SolverLauncher {
    config: SolverConfig,
}

impl SolverLauncher {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Full argv of the solver invocation, for reporting and spawning.
    pub fn command_line(&self) -> Vec<String> {
        vec![
            self.config.mpirun.clone(),
            "-np".to_string(),
            self.config.ranks.to_string(),
            self.config.solver.clone(),
            "-parallel".to_string(),
            "-case".to_string(),
            self.config.case_dir.display().to_string(),
        ]
    }

    /// Spawn the solver. Stdio is inherited; the batch scheduler owns
    /// output redirection.
    pub fn spawn(&self) -> Result<Child> {
        let argv = self.command_line();
        tracing::info!(command = %argv.join(" "), "Launching solver");

        Command::new(&argv[0])
            .args(&argv[1..])
            .env(NESTED_PROFILING_ENV, "1")
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| FoamrunError::Launch(format!("{}: {}", argv[0], e)))
    }
}
