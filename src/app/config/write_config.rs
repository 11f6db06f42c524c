use std::fs::{self, DirBuilder, OpenOptions, Permissions};
use std::io::Write;
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::domain::AppError;

const PRIVATE_DIR_MODE: u32 = 0o700;
const PRIVATE_FILE_MODE: u32 = 0o600;

fn ensure_private_parent(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        DirBuilder::new().recursive(true).mode(PRIVATE_DIR_MODE).create(parent)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replace `path` with `content` via `path.tmp` and a rename, mode 0600.
///
/// Readers see either the old file or the new one. The temp file is removed
/// when any step after its creation fails.
pub fn write_config_atomic(path: &Path, content: &str) -> Result<(), AppError> {
    ensure_private_parent(path)?;
    let tmp = tmp_path(path);

    let result = (|| -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(PRIVATE_FILE_MODE)
            .open(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::set_permissions(&tmp, Permissions::from_mode(PRIVATE_FILE_MODE))?;
        fs::rename(&tmp, path)
    })();

    if let Err(err) = result {
        let _ = fs::remove_file(&tmp);
        return Err(AppError::Io(err));
    }
    Ok(())
}

/// Write a small secret-ish file (recipients, server id) with mode 0600.
pub fn write_private_file(path: &Path, content: &str, append: bool) -> Result<(), AppError> {
    ensure_private_parent(path)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .mode(PRIVATE_FILE_MODE)
        .open(path)?;
    file.write_all(content.as_bytes())?;
    fs::set_permissions(path, Permissions::from_mode(PRIVATE_FILE_MODE))?;
    Ok(())
}

/// Copy `path` to `path.bak-YYYYMMDD-HHMMSS` next to it.
pub fn backup_existing_config(path: &Path, now: DateTime<Local>) -> Result<PathBuf, AppError> {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".bak-{}", now.format("%Y%m%d-%H%M%S")));
    let backup = PathBuf::from(name);
    fs::copy(path, &backup)?;
    fs::set_permissions(&backup, Permissions::from_mode(PRIVATE_FILE_MODE))?;
    Ok(backup)
}
