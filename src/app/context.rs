use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::{APP_NAME, ExecInfo, InstallLayout};
use crate::ports::{BotApi, CommandRunner, Logger, RecipientCrypto};

/// Host locations the installer touches outside the installation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPaths {
    /// Directories scanned for stale symlinks to legacy scripts.
    pub bin_dirs: Vec<PathBuf>,
    /// Where the executable symlink goes.
    pub link_path: PathBuf,
    /// Scripts of the shell installation this tool replaces.
    pub legacy_scripts: Vec<PathBuf>,
    pub machine_id: PathBuf,
    pub hostname: PathBuf,
    /// Prefix prepended to probed host paths during `--dry-run`.
    pub host_root: PathBuf,
}

impl Default for SystemPaths {
    fn default() -> Self {
        let legacy_base = Path::new("/opt/proxmox-backup/script");
        Self {
            bin_dirs: vec![PathBuf::from("/usr/local/bin"), PathBuf::from("/usr/bin")],
            link_path: Path::new("/usr/local/bin").join(APP_NAME),
            legacy_scripts: ["proxmox-backup.sh", "proxmox-restore.sh", "security-check.sh", "fix-permissions.sh"]
                .into_iter()
                .map(|name| legacy_base.join(name))
                .collect(),
            machine_id: PathBuf::from("/etc/machine-id"),
            hostname: PathBuf::from("/etc/hostname"),
            host_root: PathBuf::from("/"),
        }
    }
}

/// Application context holding dependencies for command execution.
pub struct AppContext {
    layout: InstallLayout,
    config_path: PathBuf,
    exec: ExecInfo,
    system: SystemPaths,
    runner: Box<dyn CommandRunner>,
    bot: Arc<dyn BotApi>,
    crypto: Box<dyn RecipientCrypto>,
    logger: Box<dyn Logger>,
}

impl AppContext {
    /// Create a new application context rooted at `base_dir`.
    pub fn new(
        base_dir: impl Into<PathBuf>,
        exec: ExecInfo,
        runner: Box<dyn CommandRunner>,
        bot: Arc<dyn BotApi>,
        crypto: Box<dyn RecipientCrypto>,
        logger: Box<dyn Logger>,
    ) -> Self {
        let layout = InstallLayout::new(base_dir);
        let config_path = layout.config_path();
        Self { layout, config_path, exec, system: SystemPaths::default(), runner, bot, crypto, logger }
    }

    pub fn with_config_path(mut self, config_path: impl Into<PathBuf>) -> Self {
        self.config_path = config_path.into();
        self
    }

    pub fn with_system_paths(mut self, system: SystemPaths) -> Self {
        self.system = system;
        self
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    pub fn base_dir(&self) -> &Path {
        self.layout.base_dir()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exec(&self) -> &ExecInfo {
        &self.exec
    }

    pub fn system(&self) -> &SystemPaths {
        &self.system
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    pub fn bot(&self) -> Arc<dyn BotApi> {
        Arc::clone(&self.bot)
    }

    pub fn crypto(&self) -> &dyn RecipientCrypto {
        self.crypto.as_ref()
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }
}
