use super::*;

#[test]
fn test_describe_joins_base_and_call_args() {
    let runner = CommandRunner::new("npx", vec!["wrangler".to_string()], 300);
    assert_eq!(
        runner.describe(&["d1", "list", "--json"]),
        "npx wrangler d1 list --json"
    );
}

#[test]
fn test_zero_timeout_disables_limit() {
    let runner = CommandRunner::new("npx", vec![], 0);
    assert!(runner.timeout.is_none());

    let runner = CommandRunner::new("npx", vec![], 12);
    assert_eq!(runner.timeout, Some(Duration::from_secs(12)));
}

#[tokio::test]
async fn test_missing_program_is_spawn_error() {
    let runner = CommandRunner::new("mig-definitely-not-a-real-binary", vec![], 5);
    let err = runner.run(&["--version"]).await.unwrap_err();
    assert!(matches!(err, ToolError::Spawn { .. }));
}

#[cfg(unix)]
#[tokio::test]
async fn test_captures_stdout_and_stderr() {
    let runner = CommandRunner::new("sh", vec!["-c".to_string()], 10);
    let output = runner
        .run(&["echo out; echo err 1>&2; exit 3"])
        .await
        .unwrap();

    assert!(!output.success);
    assert_eq!(output.exit_code, 3);
    assert_eq!(output.stdout.trim(), "out");
    assert_eq!(output.stderr.trim(), "err");
    assert_eq!(output.diagnostics(), "err");
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_checked_maps_non_zero_exit() {
    let runner = CommandRunner::new("sh", vec!["-c".to_string()], 10);
    let err = runner
        .run_checked(&["echo 'no such database' 1>&2; exit 1"])
        .await
        .unwrap_err();

    match err {
        ToolError::CommandFailed {
            exit_code, stderr, ..
        } => {
            assert_eq!(exit_code, 1);
            assert_eq!(stderr, "no such database");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_hung_process_times_out() {
    let runner = CommandRunner::new("sleep", vec![], 1);
    let err = runner.run(&["30"]).await.unwrap_err();
    assert!(matches!(
        err,
        ToolError::Timeout {
            timeout_secs: 1,
            ..
        }
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_timeout_kills_grandchildren() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("applied");
    let runner = CommandRunner::new("sh", vec!["-c".to_string()], 1);
    let script = format!("sh -c 'sleep 2; touch \"{}\"'; true", marker.display());

    let err = runner.run(&[script]).await.unwrap_err();
    assert!(matches!(err, ToolError::Timeout { .. }));

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(
        !marker.exists(),
        "process spawned by the tool kept running after the timeout"
    );
}

#[test]
fn test_diagnostics_falls_back_to_stdout() {
    let output = CommandOutput {
        success: false,
        exit_code: 1,
        stdout: "  error in stdout \n".to_string(),
        stderr: "\n".to_string(),
    };
    assert_eq!(output.diagnostics(), "error in stdout");
}
