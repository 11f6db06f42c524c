//! `--dry-run`: check the configuration against this host without backing up.

use std::path::{Component, Path, PathBuf};

use crate::app::AppContext;
use crate::domain::AppError;
use crate::domain::backup_config::BackupConfig;
use crate::domain::preflight::{PreflightIssue, render_report, run_preflight};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunOutcome {
    pub issues: Vec<PreflightIssue>,
    pub report: String,
}

impl DryRunOutcome {
    /// 1 when anything was reported, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.issues.is_empty() { 0 } else { 1 }
    }
}

fn under_root(root: &Path, path: &Path) -> PathBuf {
    let relative: PathBuf = path.components().filter(|c| !matches!(c, Component::RootDir)).collect();
    root.join(relative)
}

pub fn execute(ctx: &AppContext) -> Result<DryRunOutcome, AppError> {
    let config = BackupConfig::load(ctx.config_path(), ctx.base_dir())?;
    ctx.logger().debug(&format!(
        "dry-run with {} collectors enabled",
        config.enabled_collectors().count()
    ));

    let root = &ctx.system().host_root;
    let issues = run_preflight(&config, &|path: &Path| under_root(root, path).exists());
    for issue in &issues {
        ctx.logger().debug(&issue.render());
    }

    let report = render_report(ctx.config_path(), &issues);
    Ok(DryRunOutcome { issues, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Sandbox;
    use std::fs;

    #[test]
    fn host_paths_are_probed_under_root() {
        assert_eq!(under_root(Path::new("/tmp/x"), Path::new("/etc/pve")), PathBuf::from("/tmp/x/etc/pve"));
        assert_eq!(under_root(Path::new("/"), Path::new("/etc/pve")), PathBuf::from("/etc/pve"));
    }

    #[test]
    fn missing_paths_are_reported() {
        let sandbox = Sandbox::new();
        fs::write(sandbox.config_path(), "BACKUP_CEPH_CONFIG=true\nBACKUP_ZFS_CONFIG=true\n").unwrap();
        fs::create_dir_all(sandbox.path("etc/zfs")).unwrap();

        let outcome = execute(&sandbox.context()).unwrap();
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(outcome.issues.len(), 1);
        assert!(outcome.report.contains("set BACKUP_CEPH_CONFIG=false to disable"));
        assert!(!outcome.report.contains("BACKUP_ZFS_CONFIG"));
    }

    #[test]
    fn clean_host_exits_zero() {
        let sandbox = Sandbox::new();
        fs::write(sandbox.config_path(), "BACKUP_ZFS_CONFIG=true\n").unwrap();
        fs::create_dir_all(sandbox.path("etc/zfs")).unwrap();
        assert_eq!(execute(&sandbox.context()).unwrap().exit_code(), 0);
    }

    #[test]
    fn missing_config_is_an_error() {
        let sandbox = Sandbox::new();
        assert!(matches!(execute(&sandbox.context()), Err(AppError::MissingConfig { .. })));
    }
}
