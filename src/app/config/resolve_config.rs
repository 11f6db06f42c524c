use std::path::{Path, PathBuf};

use crate::domain::{AppError, DEFAULT_BASE_DIR};
use crate::ports::Logger;

/// Normalise a `--config` argument. Relative paths stay relative.
pub fn resolve_install_config_path(raw: &str) -> Result<PathBuf, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("configuration path cannot be empty"));
    }
    Ok(PathBuf::from(trimmed))
}

/// Succeed when `path` is a regular file; warn and fail otherwise.
pub fn ensure_config_exists(path: &Path, logger: &dyn Logger) -> Result<(), AppError> {
    if path.as_os_str().is_empty() {
        return Err(AppError::validation("configuration path cannot be empty"));
    }
    if path.is_file() {
        return Ok(());
    }
    logger.warning(&format!("configuration file not found: {}", path.display()));
    Err(AppError::MissingConfig { path: path.to_path_buf() })
}

/// Installation root for a config at `<base>/env/backup.env`.
pub fn detect_base_dir(config_path: &Path) -> PathBuf {
    let base = config_path.parent().and_then(Path::parent).unwrap_or(Path::new(""));
    let degenerate = base.as_os_str().is_empty() || base == Path::new(".") || base == Path::new("/");
    if degenerate { PathBuf::from(DEFAULT_BASE_DIR) } else { base.to_path_buf() }
}
