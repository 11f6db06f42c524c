//! Filesystem layout of an installation and path helpers.

use std::path::{Component, Path, PathBuf};

pub const APP_NAME: &str = "proxsave";
pub const DEFAULT_BASE_DIR: &str = "/opt/proxsave";

pub const ENV_DIR: &str = "env";
pub const IDENTITY_DIR: &str = "identity";
pub const BUILD_DIR: &str = "build";
pub const LOG_DIR: &str = "log";
pub const BACKUP_DIR: &str = "backup";
pub const SCRIPT_DIR: &str = "script";
pub const CONFIG_FILE: &str = "backup.env";

/// Directories a new-install reset must leave in place.
pub const PRESERVED_ON_RESET: [&str; 3] = [ENV_DIR, IDENTITY_DIR, BUILD_DIR];

/// Paths derived from one installation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    base_dir: PathBuf,
}

impl InstallLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn env_dir(&self) -> PathBuf {
        self.base_dir.join(ENV_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.env_dir().join(CONFIG_FILE)
    }

    pub fn identity_dir(&self) -> PathBuf {
        self.base_dir.join(IDENTITY_DIR)
    }

    pub fn recipient_path(&self) -> PathBuf {
        self.identity_dir().join("age").join("recipient.txt")
    }

    pub fn server_identity_path(&self) -> PathBuf {
        self.identity_dir().join(".server_identity")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join(LOG_DIR)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join(BACKUP_DIR)
    }

    /// Resolve a config value that may be relative to the installation root.
    pub fn resolve(&self, value: &str) -> PathBuf {
        let expanded = value.replace("${BASE_DIR}", &self.base_dir.to_string_lossy());
        let path = PathBuf::from(expanded);
        if path.is_absolute() { clean_path(&path) } else { clean_path(&self.base_dir.join(path)) }
    }
}

/// Lexically normalise a path: drop `.`, fold `..`, strip trailing slashes.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::RootDir | Component::Prefix(_) => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !path.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
        }
    }
    if out.as_os_str().is_empty() { PathBuf::from(".") } else { out }
}

/// Append `p` and `p/**` to an exclusion list; blank paths leave it alone.
pub fn add_path_exclusion(mut list: Vec<String>, path: &str) -> Vec<String> {
    if path.trim().is_empty() {
        return list;
    }
    let cleaned = clean_path(Path::new(path.trim())).to_string_lossy().into_owned();
    let glob = format!("{}/**", cleaned.trim_end_matches('/'));
    list.push(cleaned);
    list.push(glob);
    list
}
