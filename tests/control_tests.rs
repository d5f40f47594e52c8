//! DictionaryControl against stub dictionary tools: argument contract,
//! stderr surfacing, and missing-tool failure.

mod test_harness;

use foamrun::config::SolverConfig;
use foamrun::error::FoamrunError;
use foamrun::solver::{DictionaryControl, SolverControl, StopMode};
use test_harness::write_script;

fn stub_config(dir: &std::path::Path, tool_body: &str) -> SolverConfig {
    let tool = write_script(dir, "foamDictionary", tool_body);
    SolverConfig {
        foam_dictionary: tool.display().to_string(),
        case_dir: dir.to_path_buf(),
        ..SolverConfig::default()
    }
}

#[tokio::test]
async fn request_invokes_tool_with_stop_entry() {
    let dir = tempfile::tempdir().unwrap();
    let calls = dir.path().join("calls.txt");
    let config = stub_config(
        dir.path(),
        &format!("echo \"$@\" >> {}", calls.display()),
    );
    let control = DictionaryControl::new(&config);

    control.request(StopMode::WriteAndStop).await.unwrap();
    control.request(StopMode::RunToEnd).await.unwrap();

    let recorded = std::fs::read_to_string(&calls).unwrap();
    let lines: Vec<&str> = recorded.lines().collect();
    assert_eq!(lines.len(), 2);

    let dict = config.control_dict();
    assert_eq!(
        lines[0],
        format!("-entry stopAt -set writeNow {}", dict.display())
    );
    assert_eq!(
        lines[1],
        format!("-entry stopAt -set endTime {}", dict.display())
    );
}

#[tokio::test]
async fn tool_failure_surfaces_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let config = stub_config(dir.path(), "echo 'FATAL: cannot open controlDict' >&2; exit 1");
    let control = DictionaryControl::new(&config);

    let err = control.request(StopMode::WriteAndStop).await.unwrap_err();
    match err {
        FoamrunError::StopControl(msg) => {
            assert!(msg.contains("FATAL: cannot open controlDict"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_tool_is_stop_control_error() {
    let config = SolverConfig {
        foam_dictionary: "definitely-not-foamDictionary".to_string(),
        ..SolverConfig::default()
    };
    let control = DictionaryControl::new(&config);

    let err = control.request(StopMode::RunToEnd).await.unwrap_err();
    assert!(matches!(err, FoamrunError::StopControl(_)));
}
