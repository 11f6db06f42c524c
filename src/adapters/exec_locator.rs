//! Locates the running executable and the installation it belongs to.

use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::domain::exec_info::ExecInfo;
use crate::domain::layout::clean_path;
use crate::ports::Logger;

const PROC_SELF_EXE: &str = "/proc/self/exe";

/// Raw hints about where the current program was started from.
#[derive(Debug, Clone, Default)]
pub struct ExecHints {
    pub current_exe: Option<PathBuf>,
    pub proc_self_exe: Option<PathBuf>,
    pub argv0: Option<String>,
    pub path_var: Option<OsString>,
    pub cwd: Option<PathBuf>,
}

impl ExecHints {
    pub fn from_process() -> Self {
        Self {
            current_exe: std::env::current_exe().ok(),
            proc_self_exe: fs::read_link(PROC_SELF_EXE).ok(),
            argv0: std::env::args().next(),
            path_var: std::env::var_os("PATH"),
            cwd: std::env::current_dir().ok(),
        }
    }

    /// Candidate paths in strategy order, duplicates removed.
    fn candidates(&self) -> Vec<PathBuf> {
        let mut raw: Vec<PathBuf> = Vec::new();
        raw.extend(self.current_exe.clone());
        raw.extend(self.proc_self_exe.clone());

        if let Some(argv0) = self.argv0.as_deref().filter(|value| !value.is_empty()) {
            let as_is = PathBuf::from(argv0);
            raw.push(as_is.clone());
            if let Some(cwd) = &self.cwd
                && !as_is.is_absolute()
            {
                raw.push(cwd.join(&as_is));
            }
            if !argv0.contains('/')
                && let Some(cwd) = &self.cwd
                && let Ok(found) = which::which_in(argv0, self.path_var.clone(), cwd)
            {
                raw.push(found);
            }
        }

        let mut seen = Vec::new();
        for path in raw {
            let cleaned = clean_path(&path);
            if !seen.contains(&cleaned) {
                seen.push(cleaned);
            }
        }
        seen
    }
}

fn is_executable_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

/// Resolve the executable from `hints`; an unknown `ExecInfo` when nothing qualifies.
pub fn locate(hints: &ExecHints, logger: &dyn Logger) -> ExecInfo {
    for candidate in hints.candidates() {
        let Ok(resolved) = fs::canonicalize(&candidate) else {
            logger.debug(&format!("exec candidate {} does not resolve", candidate.display()));
            continue;
        };
        if is_executable_file(&resolved) {
            logger.debug(&format!("running executable resolved to {}", resolved.display()));
            return ExecInfo::from_exec_path(resolved);
        }
    }

    logger.warning("unable to determine the path of the running executable; symlink and cron setup will be skipped");
    ExecInfo::default()
}

/// Process-wide snapshot, resolved on first use.
pub fn exec_info(logger: &dyn Logger) -> &'static ExecInfo {
    static INFO: OnceLock<ExecInfo> = OnceLock::new();
    INFO.get_or_init(|| locate(&ExecHints::from_process(), logger))
}
