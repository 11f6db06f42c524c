//! The backup engine's view of a configuration file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::AppError;
use crate::domain::config_applier::{
    KEY_CLOUD_ENABLED, KEY_CLOUD_LOG_PATH, KEY_CLOUD_REMOTE, KEY_ENCRYPT_ARCHIVE,
    KEY_SECONDARY_ENABLED, KEY_SECONDARY_LOG_PATH, KEY_SECONDARY_PATH,
};
use crate::domain::env_template::{self, unquote};
use crate::domain::layout::{InstallLayout, add_path_exclusion};
use crate::domain::template_derivation::parse_bool;

pub const KEY_LOG_LEVEL: &str = "LOG_LEVEL";
pub const KEY_BACKUP_PATH: &str = "BACKUP_PATH";
pub const KEY_LOG_PATH: &str = "LOG_PATH";
pub const KEY_EXCLUDE_PATTERNS: &str = "BACKUP_EXCLUDE_PATTERNS";
pub const KEY_AGE_RECIPIENT_FILE: &str = "AGE_RECIPIENT_FILE";
pub const KEY_AGE_RECIPIENT: &str = "AGE_RECIPIENT";

const COLLECTOR_PREFIX: &str = "BACKUP_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupConfig {
    pub base_dir: PathBuf,
    pub log_level: String,
    pub backup_path: PathBuf,
    pub log_path: PathBuf,
    pub secondary_enabled: bool,
    pub secondary_path: Option<PathBuf>,
    pub secondary_log_path: Option<PathBuf>,
    pub cloud_enabled: bool,
    pub cloud_remote: String,
    pub cloud_log_path: String,
    pub encrypt_archive: bool,
    pub age_recipient_file: PathBuf,
    /// Recipients given inline in the file, in addition to the recipient file.
    pub age_recipients: Vec<String>,
    /// `BACKUP_*` collector toggles.
    pub collectors: BTreeMap<String, bool>,
    /// Glob patterns the archive must skip, including its own output paths.
    pub exclude_patterns: Vec<String>,
}

impl BackupConfig {
    pub fn from_template(content: &str, base_dir: &Path) -> Self {
        let values = env_template::parse(content);
        let layout = InstallLayout::new(base_dir);
        let text = |key: &str| values.get(key).map(|v| unquote(v).to_string()).unwrap_or_default();
        let flag = |key: &str| values.get(key).is_some_and(|v| parse_bool(v));
        let path_or = |key: &str, fallback: PathBuf| {
            let raw = text(key);
            if raw.is_empty() { fallback } else { layout.resolve(&raw) }
        };
        let optional_path = |key: &str| {
            let raw = text(key);
            (!raw.is_empty()).then(|| layout.resolve(&raw))
        };

        let backup_path = path_or(KEY_BACKUP_PATH, layout.backup_dir());
        let log_path = path_or(KEY_LOG_PATH, layout.log_dir());
        let secondary_path = optional_path(KEY_SECONDARY_PATH);
        let secondary_log_path = optional_path(KEY_SECONDARY_LOG_PATH);

        let collectors = values
            .iter()
            .filter(|(key, _)| key.starts_with(COLLECTOR_PREFIX))
            .filter(|(key, _)| !matches!(key.as_str(), KEY_BACKUP_PATH | KEY_EXCLUDE_PATTERNS))
            .map(|(key, value)| (key.clone(), parse_bool(value)))
            .collect();

        let mut exclude_patterns = Vec::new();
        for path in [Some(&backup_path), Some(&log_path), secondary_path.as_ref(), secondary_log_path.as_ref()]
            .into_iter()
            .flatten()
        {
            exclude_patterns = add_path_exclusion(exclude_patterns, &path.to_string_lossy());
        }
        exclude_patterns.extend(text(KEY_EXCLUDE_PATTERNS).split_whitespace().map(String::from));

        Self {
            base_dir: base_dir.to_path_buf(),
            log_level: Some(text(KEY_LOG_LEVEL)).filter(|v| !v.is_empty()).unwrap_or_else(|| "info".into()),
            backup_path,
            log_path,
            secondary_enabled: flag(KEY_SECONDARY_ENABLED),
            secondary_path,
            secondary_log_path,
            cloud_enabled: flag(KEY_CLOUD_ENABLED),
            cloud_remote: text(KEY_CLOUD_REMOTE),
            cloud_log_path: text(KEY_CLOUD_LOG_PATH),
            encrypt_archive: flag(KEY_ENCRYPT_ARCHIVE),
            age_recipient_file: path_or(KEY_AGE_RECIPIENT_FILE, layout.recipient_path()),
            age_recipients: text(KEY_AGE_RECIPIENT)
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect(),
            collectors,
            exclude_patterns,
        }
    }

    pub fn load(path: &Path, base_dir: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => AppError::MissingConfig { path: path.to_path_buf() },
            _ => AppError::Io(err),
        })?;
        Ok(Self::from_template(&content, base_dir))
    }

    pub fn enabled_collectors(&self) -> impl Iterator<Item = &str> {
        self.collectors.iter().filter(|(_, on)| **on).map(|(key, _)| key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::assets::env_template_assets::default_template;

    #[test]
    fn default_template_resolves_against_base_dir() {
        let config = BackupConfig::from_template(default_template(), Path::new("/opt/proxsave"));
        assert_eq!(config.backup_path, PathBuf::from("/opt/proxsave/backup"));
        assert_eq!(config.age_recipient_file, PathBuf::from("/opt/proxsave/identity/age/recipient.txt"));
        assert!(!config.encrypt_archive);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.collectors.get("BACKUP_CLUSTER_CONFIG"), Some(&true));
        assert!(!config.collectors.contains_key("BACKUP_PATH"));
        assert!(config.enabled_collectors().any(|key| key == "BACKUP_FIREWALL_RULES"));
    }

    #[test]
    fn output_paths_are_excluded() {
        let content = "BACKUP_PATH=/var/backups/px/\nLOG_PATH=log\nSECONDARY_ENABLED=true\nSECONDARY_PATH=/mnt/sec\nBACKUP_EXCLUDE_PATTERNS=*.iso /tmp/**\n";
        let config = BackupConfig::from_template(content, Path::new("/opt/proxsave"));
        assert_eq!(
            config.exclude_patterns,
            vec![
                "/var/backups/px",
                "/var/backups/px/**",
                "/opt/proxsave/log",
                "/opt/proxsave/log/**",
                "/mnt/sec",
                "/mnt/sec/**",
                "*.iso",
                "/tmp/**",
            ]
        );
        assert!(config.secondary_enabled);
    }

    #[test]
    fn inline_recipients_are_split() {
        let config = BackupConfig::from_template("AGE_RECIPIENT=age1a, age1b,,\n", Path::new("/opt/p"));
        assert_eq!(config.age_recipients, vec!["age1a", "age1b"]);
    }

    #[test]
    fn missing_file_is_missing_config() {
        let err = BackupConfig::load(Path::new("/nonexistent/backup.env"), Path::new("/opt/p")).unwrap_err();
        assert!(matches!(err, AppError::MissingConfig { .. }));
    }
}
