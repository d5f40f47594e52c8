//! Solver launcher behavior observed through a stub MPI launcher.

mod test_harness;

use foamrun::config::SolverConfig;
use foamrun::solver::{SolverLauncher, NESTED_PROFILING_ENV};
use test_harness::write_script;

#[tokio::test]
async fn launcher_passes_argv_and_profiling_env() {
    let dir = tempfile::tempdir().unwrap();
    let argv_file = dir.path().join("argv.txt");
    let env_file = dir.path().join("env.txt");
    let stub = write_script(
        dir.path(),
        "mpirun",
        &format!(
            "echo \"$@\" > {}\necho \"${}\" > {}",
            argv_file.display(),
            NESTED_PROFILING_ENV,
            env_file.display()
        ),
    );

    let launcher = SolverLauncher::new(SolverConfig {
        solver: "reactingFoam".to_string(),
        mpirun: stub.display().to_string(),
        case_dir: dir.path().to_path_buf(),
        ranks: 8,
        ..SolverConfig::default()
    });

    let mut child = launcher.spawn().unwrap();
    let status = child.wait().await.unwrap();
    assert!(status.success());

    let argv = std::fs::read_to_string(&argv_file).unwrap();
    assert_eq!(
        argv.trim(),
        format!("-np 8 reactingFoam -parallel -case {}", dir.path().display())
    );

    let env = std::fs::read_to_string(&env_file).unwrap();
    assert_eq!(env.trim(), "1");
}

#[tokio::test]
async fn launcher_reports_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let stub = write_script(dir.path(), "mpirun", "exit 42");

    let launcher = SolverLauncher::new(SolverConfig {
        mpirun: stub.display().to_string(),
        case_dir: dir.path().to_path_buf(),
        ..SolverConfig::default()
    });

    let mut child = launcher.spawn().unwrap();
    let status = child.wait().await.unwrap();
    assert_eq!(status.code(), Some(42));
}
