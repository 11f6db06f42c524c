//! Prefill state for "edit existing" installs, derived from a parsed template.

use std::collections::BTreeMap;

use crate::domain::env_template::unquote;

/// Wizard defaults read back out of an existing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplatePrefill {
    pub secondary_enabled: bool,
    pub secondary_path: String,
    pub secondary_log_path: String,
    pub cloud_enabled: bool,
    pub cloud_remote: String,
    pub cloud_log_path: String,
    pub firewall_enabled: bool,
    pub telegram_enabled: bool,
    pub email_enabled: bool,
    pub encryption_enabled: bool,
}

const SECONDARY_ENABLED: &[&str] = &["SECONDARY_ENABLED", "ENABLE_SECONDARY_BACKUP"];
const SECONDARY_PATH: &[&str] = &["SECONDARY_PATH", "SECONDARY_BACKUP_PATH"];
const SECONDARY_LOG_PATH: &[&str] = &["SECONDARY_LOG_PATH"];
const CLOUD_ENABLED: &[&str] = &["CLOUD_ENABLED", "ENABLE_CLOUD_BACKUP"];
const CLOUD_REMOTE: &[&str] = &["CLOUD_REMOTE", "RCLONE_REMOTE"];
const CLOUD_LOG_PATH: &[&str] = &["CLOUD_LOG_PATH", "CLOUD_LOG_REMOTE"];
const FIREWALL: &[&str] = &["BACKUP_FIREWALL_RULES"];
const TELEGRAM: &[&str] = &["TELEGRAM_ENABLED", "ENABLE_TELEGRAM"];
const EMAIL: &[&str] = &["EMAIL_ENABLED", "ENABLE_EMAIL"];
const ENCRYPTION: &[&str] = &["ENCRYPT_ARCHIVE", "ENABLE_ENCRYPTION"];

/// Case-insensitive `true/false/yes/no/1/0`; anything else is `false`.
pub fn parse_bool(raw: &str) -> bool {
    matches!(unquote(raw.trim()).to_ascii_lowercase().as_str(), "true" | "yes" | "1")
}

/// First alias present in the map, in the order given.
pub fn lookup<'a>(values: &'a BTreeMap<String, String>, aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|key| values.get(*key)).map(|value| unquote(value))
}

fn flag(values: &BTreeMap<String, String>, aliases: &[&str]) -> bool {
    lookup(values, aliases).is_some_and(parse_bool)
}

fn text(values: &BTreeMap<String, String>, aliases: &[&str]) -> String {
    lookup(values, aliases).unwrap_or_default().to_string()
}

pub fn derive_prefill(values: &BTreeMap<String, String>) -> TemplatePrefill {
    TemplatePrefill {
        secondary_enabled: flag(values, SECONDARY_ENABLED),
        secondary_path: text(values, SECONDARY_PATH),
        secondary_log_path: text(values, SECONDARY_LOG_PATH),
        cloud_enabled: flag(values, CLOUD_ENABLED),
        cloud_remote: text(values, CLOUD_REMOTE),
        cloud_log_path: text(values, CLOUD_LOG_PATH),
        firewall_enabled: flag(values, FIREWALL),
        telegram_enabled: flag(values, TELEGRAM),
        email_enabled: flag(values, EMAIL),
        encryption_enabled: flag(values, ENCRYPTION),
    }
}
