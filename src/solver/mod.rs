//! Solver process management.
//!
//! Two concerns live here:
//! - [`control`]: the typed stop-request interface. The solver is told
//!   to stop by rewriting one entry in its case dictionary; it re-reads
//!   the entry itself at the end of each timestep.
//! - [`launcher`]: building and spawning the parallel solver command
//!   line. The solver runs in the foreground with inherited stdio (the
//!   batch scheduler owns output redirection).

pub mod control;
pub mod launcher;

pub use control::{DictionaryControl, SolverControl, StopMode};
pub use launcher::{SolverLauncher, NESTED_PROFILING_ENV};
