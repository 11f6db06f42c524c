//! Shared testing utilities for proxsave CLI tests.

use assert_cmd::Command;
use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated installation root plus a `crontab` stand-in on `PATH`.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    bin_dir: PathBuf,
    crontab_log: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let bin_dir = root.path().join("bin");
        fs::create_dir_all(&bin_dir).expect("Failed to create fake bin dir");
        fs::create_dir_all(root.path().join("base/env")).expect("Failed to create env dir");

        let crontab_log = root.path().join("crontab.log");
        let script = format!("#!/bin/sh\necho \"$@\" >> \"{}\"\nexit 0\n", crontab_log.display());
        let crontab = bin_dir.join("crontab");
        fs::write(&crontab, script).expect("Failed to write fake crontab");
        fs::set_permissions(&crontab, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake crontab");

        Self { root, bin_dir, crontab_log }
    }

    pub fn base_dir(&self) -> PathBuf {
        self.root.path().join("base")
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir().join("env/backup.env")
    }

    pub fn config_arg(&self) -> String {
        self.config_path().to_string_lossy().into_owned()
    }

    pub fn recipient_path(&self) -> PathBuf {
        self.base_dir().join("identity/age/recipient.txt")
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.config_path(), content).expect("Failed to write config");
    }

    pub fn write(&self, path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent dir");
        fs::write(path, content).expect("Failed to write file");
    }

    /// Whether anything invoked the fake `crontab`.
    pub fn crontab_called(&self) -> bool {
        self.crontab_log.exists()
    }

    /// Build a command for the compiled `proxsave` binary.
    pub fn cli(&self) -> Command {
        let mut path = self.bin_dir.clone().into_os_string();
        if let Some(existing) = env::var_os("PATH") {
            path.push(":");
            path.push(existing);
        }
        let mut cmd = Command::cargo_bin("proxsave").expect("Failed to locate proxsave binary");
        cmd.current_dir(self.root.path())
            .env("PATH", path)
            .env_remove("RUST_LOG")
            .env_remove("CRON_SCHEDULE")
            .env_remove("CRON_HOUR")
            .env_remove("CRON_MINUTE")
            .env_remove("TELEGRAM_BOT_API_URL");
        cmd
    }
}
