// SPDX-License-Identifier: MIT

use super::*;
use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(5);

struct Fixture {
    _dir: TempDir,
    source: std::path::PathBuf,
    target: std::path::PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("managed");
        let target = dir.path().join("home");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        Self {
            _dir: dir,
            source,
            target,
        }
    }

    fn write_source(&self, rel: &str, contents: &str) {
        let path = self.source.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn resource(&self) -> DotfileResource {
        let scanner = DotfileScanner::new(
            &self.source,
            &self.target,
            &[".DS_Store".to_string()],
            &[".config".to_string()],
        )
        .unwrap();
        DotfileResource::new(scanner, TIMEOUT)
    }
}

#[tokio::test]
async fn missing_dotfile_reconciles_and_deploys() {
    let fx = Fixture::new();
    fx.write_source("zshrc", "export EDITOR=vim\n");
    let resource = fx.resource();

    let configured = resource.desired().unwrap();
    let actual = resource.actual(&OpCtx::new()).await.unwrap();
    let reconciliation = resource.reconcile(&configured, &actual).unwrap();
    assert_eq!(reconciliation.missing.len(), 1);

    let plan = resource.plan(&reconciliation).unwrap();
    let result = resource.apply(&OpCtx::new(), &plan[0], false).await;
    assert_eq!(result.status, ItemStatus::Deployed);
    assert_eq!(
        std::fs::read_to_string(fx.target.join(".zshrc")).unwrap(),
        "export EDITOR=vim\n"
    );
}

#[tokio::test]
async fn plan_lists_missing_before_degraded() {
    let fx = Fixture::new();
    fx.write_source("aaa_drifted", "source\n");
    fx.write_source("zzz_missing", "x\n");
    std::fs::write(fx.target.join(".aaa_drifted"), "edited\n").unwrap();
    let resource = fx.resource();

    let configured = resource.desired().unwrap();
    let actual = resource.actual(&OpCtx::new()).await.unwrap();
    let reconciliation = resource.reconcile(&configured, &actual).unwrap();
    let plan = resource.plan(&reconciliation).unwrap();

    let states: Vec<ItemState> = plan.iter().map(|i| i.state).collect();
    assert_eq!(states, [ItemState::Missing, ItemState::Degraded]);
}

#[tokio::test]
async fn dry_run_reports_would_deploy_and_writes_nothing() {
    let fx = Fixture::new();
    fx.write_source("zshrc", "x\n");
    let resource = fx.resource();

    let configured = resource.desired().unwrap();
    let reconciliation = resource.reconcile(&configured, &[]).unwrap();
    let plan = resource.plan(&reconciliation).unwrap();
    let result = resource.apply(&OpCtx::new(), &plan[0], true).await;

    assert_eq!(result.status, ItemStatus::WouldDeploy);
    assert!(!fx.target.join(".zshrc").exists());
}

#[tokio::test]
async fn drift_repair_round_trip() {
    let fx = Fixture::new();
    fx.write_source("zshrc", "source\n");
    std::fs::write(fx.target.join(".zshrc"), "drifted\n").unwrap();
    let resource = fx.resource();

    let configured = resource.desired().unwrap();
    let actual = resource.actual(&OpCtx::new()).await.unwrap();
    let reconciliation = resource.reconcile(&configured, &actual).unwrap();
    assert_eq!(reconciliation.degraded_count(), 1);

    let plan = resource.plan(&reconciliation).unwrap();
    let result = resource.apply(&OpCtx::new(), &plan[0], false).await;
    assert_eq!(result.status, ItemStatus::Deployed);

    // After repair the item is managed again.
    let actual = resource.actual(&OpCtx::new()).await.unwrap();
    let reconciliation = resource.reconcile(&configured, &actual).unwrap();
    assert_eq!(reconciliation.degraded_count(), 0);
    assert!(reconciliation.is_converged());
}

#[tokio::test]
async fn unreadable_source_is_an_item_failure() {
    let fx = Fixture::new();
    fx.write_source("zshrc", "x\n");
    let resource = fx.resource();
    let configured = resource.desired().unwrap();
    let reconciliation = resource.reconcile(&configured, &[]).unwrap();
    let plan = resource.plan(&reconciliation).unwrap();

    // The source disappears between scan and apply.
    std::fs::remove_file(fx.source.join("zshrc")).unwrap();
    let result = resource.apply(&OpCtx::new(), &plan[0], false).await;
    assert_eq!(result.status, ItemStatus::Failed);
    assert_eq!(result.error_kind.as_deref(), Some("io"));
}

#[tokio::test]
async fn canceled_context_short_circuits_deploys() {
    let fx = Fixture::new();
    fx.write_source("zshrc", "x\n");
    let resource = fx.resource();
    let configured = resource.desired().unwrap();
    let reconciliation = resource.reconcile(&configured, &[]).unwrap();
    let plan = resource.plan(&reconciliation).unwrap();

    let ctx = OpCtx::new();
    ctx.cancel();
    let result = resource.apply(&ctx, &plan[0], false).await;
    assert_eq!(result.status, ItemStatus::Canceled);
    assert!(!fx.target.join(".zshrc").exists());
}
