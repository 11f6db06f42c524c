use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use crate::app::{AppContext, SystemPaths};
use crate::domain::{AppError, ExecInfo};
use crate::ports::{BotApi, CommandOutput, CommandRunner, CommandSpec, Logger};
use crate::testing::{FakeBotApi, FakeCommandRunner, FakeRecipientCrypto, MemoryLogger};

impl CommandRunner for Arc<FakeCommandRunner> {
    fn run(&self, spec: &CommandSpec<'_>) -> Result<CommandOutput, AppError> {
        self.as_ref().run(spec)
    }
}

impl Logger for Arc<MemoryLogger> {
    fn debug(&self, message: &str) {
        self.as_ref().debug(message)
    }

    fn info(&self, message: &str) {
        self.as_ref().info(message)
    }

    fn warning(&self, message: &str) {
        self.as_ref().warning(message)
    }

    fn error(&self, message: &str) {
        self.as_ref().error(message)
    }
}

/// A throwaway host: installation root, bin dirs and an executable, all under
/// one temp dir, with fakes shared between the test and the context.
pub struct Sandbox {
    pub root: TempDir,
    pub runner: Arc<FakeCommandRunner>,
    pub logger: Arc<MemoryLogger>,
    pub bot: Arc<FakeBotApi>,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        Self::with(FakeCommandRunner::new(), FakeBotApi::default())
    }

    pub fn with(runner: FakeCommandRunner, bot: FakeBotApi) -> Self {
        let root = TempDir::new().unwrap();
        for dir in ["opt/proxsave/env", "opt/proxsave/build", "usr/local/bin", "usr/bin", "legacy", "etc"] {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        let exec = root.path().join("opt/proxsave/build/proxsave");
        fs::write(&exec, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&exec, fs::Permissions::from_mode(0o755)).unwrap();
        Self { root, runner: Arc::new(runner), logger: Arc::new(MemoryLogger::default()), bot: Arc::new(bot) }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    pub fn base_dir(&self) -> PathBuf {
        self.path("opt/proxsave")
    }

    pub fn exec_path(&self) -> PathBuf {
        self.path("opt/proxsave/build/proxsave")
    }

    pub fn config_path(&self) -> PathBuf {
        self.path("opt/proxsave/env/backup.env")
    }

    pub fn system_paths(&self) -> SystemPaths {
        SystemPaths {
            bin_dirs: vec![self.path("usr/local/bin"), self.path("usr/bin")],
            link_path: self.path("usr/local/bin/proxsave"),
            legacy_scripts: vec![self.path("legacy/proxmox-backup.sh")],
            machine_id: self.path("etc/machine-id"),
            hostname: self.path("etc/hostname"),
            host_root: self.root.path().to_path_buf(),
        }
    }

    pub fn context(&self) -> AppContext {
        self.context_with_exec(ExecInfo::from_exec_path(self.exec_path()))
    }

    pub fn context_with_exec(&self, exec: ExecInfo) -> AppContext {
        let bot: Arc<dyn BotApi> = self.bot.clone();
        AppContext::new(
            self.base_dir(),
            exec,
            Box::new(Arc::clone(&self.runner)),
            bot,
            Box::new(FakeRecipientCrypto),
            Box::new(Arc::clone(&self.logger)),
        )
        .with_system_paths(self.system_paths())
    }
}
