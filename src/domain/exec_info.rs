use std::path::{Path, PathBuf};

use crate::domain::layout::{ENV_DIR, SCRIPT_DIR};

/// Where the running program lives and which installation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecInfo {
    /// Canonical path of the executable, symlinks resolved. Empty when unknown.
    pub exec_path: PathBuf,
    pub exec_dir: PathBuf,
    pub base_dir: PathBuf,
    /// True when `base_dir` came from finding an `env/` or `script/` marker.
    pub has_base: bool,
}

impl ExecInfo {
    pub fn from_exec_path(exec_path: PathBuf) -> Self {
        let exec_dir = exec_path.parent().map(Path::to_path_buf).unwrap_or_default();
        let (base_dir, has_base) = match find_marked_base(&exec_dir) {
            Some(found) => (found, true),
            None => (exec_dir.parent().map(Path::to_path_buf).unwrap_or_default(), false),
        };
        Self { exec_path, exec_dir, base_dir, has_base }
    }

    pub fn is_known(&self) -> bool {
        !self.exec_path.as_os_str().is_empty()
    }
}

/// Nearest directory, starting at `start`, holding an `env/` or `script/` child.
pub fn find_marked_base(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .filter(|dir| !dir.as_os_str().is_empty())
        .find(|dir| dir.join(ENV_DIR).is_dir() || dir.join(SCRIPT_DIR).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn base_dir_is_nearest_ancestor_with_env() {
        let root = TempDir::new().unwrap();
        let base = root.path().join("opt/proxsave");
        fs::create_dir_all(base.join("env")).unwrap();
        fs::create_dir_all(base.join("build/bin")).unwrap();

        let info = ExecInfo::from_exec_path(base.join("build/bin/proxsave"));
        assert_eq!(info.exec_dir, base.join("build/bin"));
        assert_eq!(info.base_dir, base);
        assert!(info.has_base);
    }

    #[test]
    fn script_dir_also_marks_base() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("script")).unwrap();
        fs::create_dir_all(root.path().join("build")).unwrap();

        let info = ExecInfo::from_exec_path(root.path().join("build/proxsave"));
        assert_eq!(info.base_dir, root.path());
    }

    #[test]
    fn falls_back_to_parent_of_exec_dir() {
        let root = TempDir::new().unwrap();
        let bin = root.path().join("a/b/bin");
        fs::create_dir_all(&bin).unwrap();

        let info = ExecInfo::from_exec_path(bin.join("proxsave"));
        // A marker above the temp dir would legitimately win; nothing inside it may.
        if info.has_base {
            assert!(!info.base_dir.starts_with(root.path()));
        } else {
            assert_eq!(info.base_dir, root.path().join("a/b"));
        }
    }

    #[test]
    fn default_is_unknown() {
        assert!(!ExecInfo::default().is_known());
    }
}
