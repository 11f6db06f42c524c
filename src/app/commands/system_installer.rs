//! Host-side reconciliation after the configuration is in place.
//!
//! Every step here is best effort: failures are logged as warnings and the
//! install carries on.

use std::collections::BTreeSet;
use std::fs::{self, DirBuilder};
use std::os::unix::fs::{DirBuilderExt, symlink};
use std::path::{Path, PathBuf};

use crate::app::AppContext;
use crate::domain::cron::{CronOverrides, CronOwnership, reconcile_crontab, resolve_schedule};
use crate::domain::layout::{PRESERVED_ON_RESET, clean_path};
use crate::domain::{APP_NAME, AppError, CronTime, env_template};
use crate::ports::CommandSpec;

const NO_CRONTAB_MARKER: &str = "no crontab for";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerReport {
    pub removed_legacy_links: Vec<PathBuf>,
    /// Symlink created for the executable, when that step succeeded.
    pub exec_link: Option<PathBuf>,
    /// Schedule written to the crontab, when that step succeeded.
    pub cron_schedule: Option<String>,
}

/// Run the reconciliations in their fixed order.
pub fn execute(ctx: &AppContext, cron_time: Option<CronTime>) -> InstallerReport {
    ensure_directories(ctx);
    let removed_legacy_links = cleanup_legacy_symlinks(ctx);
    let exec_link = ensure_exec_symlink(ctx);
    let cron_schedule = reconcile_cron(ctx, cron_time);
    InstallerReport { removed_legacy_links, exec_link, cron_schedule }
}

/// Make sure the runtime directories exist under the installation root.
pub fn ensure_directories(ctx: &AppContext) {
    let layout = ctx.layout();
    for (dir, mode) in [(layout.log_dir(), 0o755), (layout.backup_dir(), 0o755), (layout.identity_dir(), 0o700)] {
        if dir.is_dir() {
            continue;
        }
        if let Err(err) = DirBuilder::new().recursive(true).mode(mode).create(&dir) {
            ctx.logger().warning(&format!("could not create {}: {}", dir.display(), err));
        }
    }
}

fn legacy_targets(ctx: &AppContext) -> BTreeSet<PathBuf> {
    let mut targets = BTreeSet::new();
    for script in &ctx.system().legacy_scripts {
        targets.insert(clean_path(script));
        if let Ok(resolved) = fs::canonicalize(script) {
            targets.insert(resolved);
        }
    }
    targets
}

/// Where a symlink points, resolved as far as the filesystem allows.
fn link_target(link: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(link) {
        return Some(resolved);
    }
    let raw = fs::read_link(link).ok()?;
    let joined = if raw.is_absolute() { raw } else { link.parent()?.join(raw) };
    Some(clean_path(&joined))
}

/// Remove symlinks in the bin dirs that point at legacy scripts.
pub fn cleanup_legacy_symlinks(ctx: &AppContext) -> Vec<PathBuf> {
    let targets = legacy_targets(ctx);
    let mut removed = Vec::new();

    for dir in &ctx.system().bin_dirs {
        let Ok(entries) = fs::read_dir(dir) else {
            ctx.logger().debug(&format!("skipping unreadable directory {}", dir.display()));
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let is_link = fs::symlink_metadata(&path).is_ok_and(|meta| meta.file_type().is_symlink());
            if !is_link || !link_target(&path).is_some_and(|target| targets.contains(&target)) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    ctx.logger().info(&format!("removed legacy symlink {}", path.display()));
                    removed.push(path);
                }
                Err(err) => ctx
                    .logger()
                    .warning(&format!("could not remove legacy symlink {}: {}", path.display(), err)),
            }
        }
    }
    removed
}

/// Point the well-known link path at the running executable.
pub fn ensure_exec_symlink(ctx: &AppContext) -> Option<PathBuf> {
    let exec = ctx.exec();
    if !exec.is_known() {
        ctx.logger().warning("executable path unknown; skipping symlink creation");
        return None;
    }
    let link = &ctx.system().link_path;

    if already_points_at(link, &exec.exec_path) {
        ctx.logger().info(&format!("{} already resolves to {}", link.display(), exec.exec_path.display()));
        return Some(link.clone());
    }
    if fs::symlink_metadata(link).is_ok()
        && let Err(err) = fs::remove_file(link)
    {
        ctx.logger().warning(&format!("could not replace {}: {}", link.display(), err));
        return None;
    }
    match symlink(&exec.exec_path, link) {
        Ok(()) => {
            ctx.logger().info(&format!("{} -> {}", link.display(), exec.exec_path.display()));
            Some(link.clone())
        }
        Err(err) => {
            ctx.logger().warning(&format!("could not create symlink {}: {}", link.display(), err));
            None
        }
    }
}

/// True when `link` is, or already leads to, the executable itself.
fn already_points_at(link: &Path, exec_path: &Path) -> bool {
    if fs::read_link(link).is_ok_and(|target| target == exec_path) {
        return true;
    }
    match (fs::canonicalize(link), fs::canonicalize(exec_path)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn read_crontab(ctx: &AppContext) -> Result<String, AppError> {
    let output = ctx.runner().run(&CommandSpec::new("crontab", &["-l"]))?;
    if output.success() {
        return Ok(output.stdout);
    }
    if output.combined().contains(NO_CRONTAB_MARKER) {
        return Ok(String::new());
    }
    Err(AppError::ChildProcess { command: "crontab -l".into(), details: output.combined().trim().to_string() })
}

/// Overrides from the environment, then from cron keys left in the config file.
fn cron_overrides(ctx: &AppContext) -> CronOverrides {
    let env = CronOverrides::from_env();
    if env != CronOverrides::default() {
        return env;
    }
    let Ok(content) = fs::read_to_string(ctx.config_path()) else {
        return env;
    };
    let values = env_template::parse(&content);
    let read = |key: &str| values.get(key).map(|v| env_template::unquote(v).to_string()).filter(|v| !v.is_empty());
    CronOverrides { schedule: read("CRON_SCHEDULE"), hour: read("CRON_HOUR"), minute: read("CRON_MINUTE") }
}

/// Replace previous entries for this tool with one daily job.
pub fn reconcile_cron(ctx: &AppContext, cron_time: Option<CronTime>) -> Option<String> {
    let exec = ctx.exec();
    if !exec.is_known() {
        ctx.logger().warning("executable path unknown; skipping cron setup");
        return None;
    }

    let existing = match read_crontab(ctx) {
        Ok(content) => content,
        Err(err) => {
            ctx.logger().warning(&format!("could not read crontab, leaving it untouched: {}", err));
            return None;
        }
    };

    let link = &ctx.system().link_path;
    let command = if fs::symlink_metadata(link).is_ok() { link.clone() } else { exec.exec_path.clone() };
    let legacy: Vec<&Path> = ctx.system().legacy_scripts.iter().map(PathBuf::as_path).collect();
    let ownership = CronOwnership { exec_name: APP_NAME, exec_path: Some(exec.exec_path.as_path()), legacy_paths: &legacy };
    let schedule = resolve_schedule(cron_time, &cron_overrides(ctx));
    let updated = reconcile_crontab(&existing, &ownership, &schedule, &command.to_string_lossy());

    match ctx.runner().run(&CommandSpec::new("crontab", &["-"]).with_stdin(&updated)) {
        Ok(output) if output.success() => {
            ctx.logger().info(&format!("cron entry set: {} {}", schedule, command.display()));
            Some(schedule)
        }
        Ok(output) => {
            ctx.logger().warning(&format!("crontab update failed: {}", output.combined().trim()));
            None
        }
        Err(err) => {
            ctx.logger().warning(&format!("crontab update failed: {}", err));
            None
        }
    }
}

fn clear_immutable(ctx: &AppContext, path: &Path) {
    let target = path.to_string_lossy();
    let args: Vec<&str> = if path.is_dir() { vec!["-R", "-i", &*target] } else { vec!["-i", &*target] };
    match ctx.runner().run(&CommandSpec::new("chattr", &args)) {
        Ok(output) if !output.success() => {
            ctx.logger().debug(&format!("chattr -i {}: {}", path.display(), output.combined().trim()))
        }
        Ok(_) => {}
        Err(err) => ctx.logger().debug(&format!("chattr unavailable: {}", err)),
    }
}

/// Empty the installation root except the preserved directories.
pub fn reset_base_dir(ctx: &AppContext) -> Result<Vec<PathBuf>, AppError> {
    let base = ctx.base_dir();
    let cleaned = clean_path(base);
    if base.as_os_str().is_empty() || cleaned == Path::new(".") || cleaned == Path::new("/") {
        return Err(AppError::validation(format!("refusing to reset unsafe base directory '{}'", base.display())));
    }
    if !base.is_dir() {
        return Ok(Vec::new());
    }

    let mut removed = Vec::new();
    for entry in fs::read_dir(base)?.flatten() {
        let name = entry.file_name();
        if PRESERVED_ON_RESET.iter().any(|keep| name == *keep) {
            continue;
        }
        let path = entry.path();
        clear_immutable(ctx, &path);
        let is_dir = fs::symlink_metadata(&path).is_ok_and(|meta| meta.is_dir());
        let result = if is_dir { fs::remove_dir_all(&path) } else { fs::remove_file(&path) };
        match result {
            Ok(()) => removed.push(path),
            Err(err) => ctx.logger().warning(&format!("could not remove {}: {}", path.display(), err)),
        }
    }
    removed.sort();
    Ok(removed)
}
