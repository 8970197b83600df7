// SPDX-License-Identifier: MIT

use super::*;
use crate::runner::RunnerError;

#[tokio::test]
async fn captures_stdout_and_exit_code() {
    let runner = SystemRunner::new();
    let ctx = OpCtx::new();
    let out = runner.run(&ctx, "sh", &["-c", "echo hello"]).await.unwrap();
    assert!(out.success());
    assert_eq!(out.stdout_str().trim(), "hello");
}

#[tokio::test]
async fn nonzero_exit_is_data_not_error() {
    let runner = SystemRunner::new();
    let ctx = OpCtx::new();
    let out = runner
        .run(&ctx, "sh", &["-c", "echo oops >&2; exit 3"])
        .await
        .unwrap();
    assert_eq!(out.code, 3);
    assert_eq!(out.stderr_str().trim(), "oops");
}

#[tokio::test]
async fn execute_turns_nonzero_into_error() {
    let runner = SystemRunner::new();
    let ctx = OpCtx::new();
    let err = runner
        .execute(&ctx, "sh", &["-c", "exit 2"])
        .await
        .unwrap_err();
    match err {
        RunnerError::NonZeroExit { code, .. } => assert_eq!(code, 2),
        other => panic!("expected NonZeroExit, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_binary_is_not_found() {
    let runner = SystemRunner::new();
    let ctx = OpCtx::new();
    let err = runner
        .run(&ctx, "definitely-no-such-binary-here", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::NotFound(_)));
}

#[tokio::test]
async fn canceled_context_short_circuits() {
    let runner = SystemRunner::new();
    let ctx = OpCtx::new();
    ctx.cancel();
    let err = runner.run(&ctx, "sh", &["-c", "echo hi"]).await.unwrap_err();
    assert!(matches!(err, RunnerError::Canceled));
}

#[tokio::test]
async fn cancel_during_run_kills_the_child() {
    let runner = SystemRunner::new();
    let ctx = OpCtx::new();
    let canceler = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        canceler.cancel();
    });
    let start = std::time::Instant::now();
    let err = runner.run(&ctx, "sleep", &["30"]).await.unwrap_err();
    assert!(matches!(err, RunnerError::Canceled));
    assert!(start.elapsed() < std::time::Duration::from_secs(5));
}

#[tokio::test]
async fn deadline_expiry_is_a_timeout() {
    let runner = SystemRunner::new();
    let ctx = OpCtx::with_timeout(std::time::Duration::from_millis(50));
    let err = runner.run(&ctx, "sleep", &["30"]).await.unwrap_err();
    assert!(matches!(err, RunnerError::Timeout { .. }));
}

#[tokio::test]
async fn look_path_finds_sh() {
    let runner = SystemRunner::new();
    assert!(runner.look_path("sh").is_some());
    assert!(runner.look_path("definitely-no-such-binary-here").is_none());
}
