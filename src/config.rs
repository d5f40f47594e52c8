use std::path::PathBuf;

use crate::estimator::{FALLBACK_STEP_SECS, SAMPLE_WINDOW};
use crate::walltime::Walltime;
use crate::watchdog::DEFAULT_SAFETY_FACTOR;

/// Configuration for the parallel solver invocation.
///
/// The `mpirun` and `foam_dictionary` program names are configurable so
/// tests can substitute stub executables.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Solver executable, e.g. "reactingFoam"
    pub solver: String,
    /// OpenFOAM case directory containing `system/controlDict`
    pub case_dir: PathBuf,
    /// Number of MPI ranks
    pub ranks: u32,
    /// MPI launcher program
    pub mpirun: String,
    /// Dictionary query/edit tool
    pub foam_dictionary: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solver: "reactingFoam".to_string(),
            case_dir: PathBuf::from("."),
            ranks: 16,
            mpirun: "mpirun".to_string(),
            foam_dictionary: "foamDictionary".to_string(),
        }
    }
}

impl SolverConfig {
    /// Path to the case's `system/controlDict`.
    pub fn control_dict(&self) -> PathBuf {
        self.case_dir.join("system").join("controlDict")
    }

    /// Default solver log location, `<case>/log.<solver>`.
    pub fn default_log(&self) -> PathBuf {
        self.case_dir.join(format!("log.{}", self.solver))
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Reservation length granted by the scheduler
    pub walltime: Walltime,
    /// How many recent execution-time samples to consider
    pub sample_window: usize,
    /// Step-duration guess when the log yields fewer than 2 samples
    pub fallback_step_secs: f64,
    /// Multiplier on the worst observed step when placing the stop margin
    pub safety_factor: f64,
    /// Solver log to scan; `None` means `<case>/log.<solver>`
    pub log_file: Option<PathBuf>,
    pub solver: SolverConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            walltime: Walltime::new(0, 6, 0, 0),
            sample_window: SAMPLE_WINDOW,
            fallback_step_secs: FALLBACK_STEP_SECS,
            safety_factor: DEFAULT_SAFETY_FACTOR,
            log_file: None,
            solver: SolverConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.solver.default_log())
    }
}

/// Leading `#SBATCH` annotations rendered into the submission wrapper.
///
/// These are consumed by the scheduler before foamrun's own logic runs;
/// foamrun only emits them (`foamrun script`).
#[derive(Debug, Clone)]
pub struct BatchDirectives {
    pub job_name: String,
    pub partition: String,
    pub nodes: u32,
    pub ntasks: u32,
    /// Memory per CPU, scheduler syntax (e.g. "3G")
    pub mem_per_cpu: Option<String>,
    /// Stdout/stderr pattern, scheduler syntax (e.g. "%x.o%j")
    pub output: String,
    /// Mail notification events (e.g. "END,FAIL")
    pub mail_type: Option<String>,
    pub mail_user: Option<String>,
    /// Only one job with this name may run at a time
    pub singleton: bool,
}

impl Default for BatchDirectives {
    fn default() -> Self {
        Self {
            job_name: "foamrun".to_string(),
            partition: "compute".to_string(),
            nodes: 1,
            ntasks: 16,
            mem_per_cpu: None,
            output: "%x.o%j".to_string(),
            mail_type: Some("END,FAIL".to_string()),
            mail_user: None,
            singleton: true,
        }
    }
}
