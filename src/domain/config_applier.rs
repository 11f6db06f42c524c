//! Projection of [`InstallDecisions`] onto an env template.
//!
//! The order of edits is fixed so the same decisions over the same template
//! always produce the same bytes, and re-applying is a no-op.

use crate::domain::env_template::{self, sanitize_value};
use crate::domain::install_decisions::InstallDecisions;

pub const KEY_BASE_DIR: &str = "BASE_DIR";
pub const KEY_SECONDARY_ENABLED: &str = "SECONDARY_ENABLED";
pub const KEY_SECONDARY_PATH: &str = "SECONDARY_PATH";
pub const KEY_SECONDARY_LOG_PATH: &str = "SECONDARY_LOG_PATH";
pub const KEY_CLOUD_ENABLED: &str = "CLOUD_ENABLED";
pub const KEY_CLOUD_REMOTE: &str = "CLOUD_REMOTE";
pub const KEY_CLOUD_LOG_PATH: &str = "CLOUD_LOG_PATH";
pub const KEY_FIREWALL: &str = "BACKUP_FIREWALL_RULES";
pub const KEY_TELEGRAM_ENABLED: &str = "TELEGRAM_ENABLED";
pub const KEY_BOT_TELEGRAM_TYPE: &str = "BOT_TELEGRAM_TYPE";
pub const KEY_EMAIL_ENABLED: &str = "EMAIL_ENABLED";
pub const KEY_EMAIL_DELIVERY_METHOD: &str = "EMAIL_DELIVERY_METHOD";
pub const KEY_EMAIL_FALLBACK_SENDMAIL: &str = "EMAIL_FALLBACK_SENDMAIL";
pub const KEY_ENCRYPT_ARCHIVE: &str = "ENCRYPT_ARCHIVE";
pub const KEY_CRON_SCHEDULE: &str = "CRON_SCHEDULE";
pub const KEY_CRON_HOUR: &str = "CRON_HOUR";
pub const KEY_CRON_MINUTE: &str = "CRON_MINUTE";

/// Keys that describe the host rather than the backup and never get baked in.
const AMBIENT_KEYS: [&str; 4] = [KEY_BASE_DIR, KEY_CRON_SCHEDULE, KEY_CRON_HOUR, KEY_CRON_MINUTE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyOptions {
    /// Write `CRON_SCHEDULE/HOUR/MINUTE` into the file (line-prompt wizard only).
    pub persist_cron: bool,
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn is_unset(template: &str, key: &str) -> bool {
    env_template::parse(template).get(key).is_none_or(|value| env_template::unquote(value).is_empty())
}

pub fn apply_decisions(base: &str, decisions: &InstallDecisions, options: ApplyOptions) -> String {
    let set = |template: &str, key: &str, value: &str| {
        env_template::set(template, key, &sanitize_value(value))
    };

    let mut out = base.to_string();

    for key in AMBIENT_KEYS {
        out = env_template::unset(&out, key);
    }

    let secondary = &decisions.secondary;
    if secondary.enabled {
        out = set(&out, KEY_SECONDARY_ENABLED, "true");
        out = set(&out, KEY_SECONDARY_PATH, &secondary.path.to_string_lossy());
        out = set(&out, KEY_SECONDARY_LOG_PATH, &secondary.log_path.to_string_lossy());
    } else {
        out = set(&out, KEY_SECONDARY_ENABLED, "false");
        out = set(&out, KEY_SECONDARY_PATH, "");
        out = set(&out, KEY_SECONDARY_LOG_PATH, "");
    }

    let cloud = &decisions.cloud;
    if cloud.enabled {
        out = set(&out, KEY_CLOUD_ENABLED, "true");
        out = set(&out, KEY_CLOUD_REMOTE, &cloud.remote);
        out = set(&out, KEY_CLOUD_LOG_PATH, &cloud.log_remote);
    } else {
        out = set(&out, KEY_CLOUD_ENABLED, "false");
        out = set(&out, KEY_CLOUD_REMOTE, "");
        out = set(&out, KEY_CLOUD_LOG_PATH, "");
    }

    if let Some(enabled) = decisions.firewall_enabled.as_bool() {
        out = set(&out, KEY_FIREWALL, bool_str(enabled));
    }

    let telegram = decisions.notifications.telegram();
    let email = decisions.notifications.email();
    out = set(&out, KEY_TELEGRAM_ENABLED, bool_str(telegram));
    if telegram && is_unset(base, KEY_BOT_TELEGRAM_TYPE) {
        out = set(&out, KEY_BOT_TELEGRAM_TYPE, "centralized");
    }
    out = set(&out, KEY_EMAIL_ENABLED, bool_str(email));
    if email {
        if is_unset(base, KEY_EMAIL_DELIVERY_METHOD) {
            out = set(&out, KEY_EMAIL_DELIVERY_METHOD, "relay");
        }
        if is_unset(base, KEY_EMAIL_FALLBACK_SENDMAIL) {
            out = set(&out, KEY_EMAIL_FALLBACK_SENDMAIL, "true");
        }
    }

    out = set(&out, KEY_ENCRYPT_ARCHIVE, bool_str(decisions.encryption_enabled));

    if options.persist_cron {
        let time = decisions.cron_time;
        out = set(&out, KEY_CRON_SCHEDULE, &time.schedule());
        out = set(&out, KEY_CRON_HOUR, &time.hour.to_string());
        out = set(&out, KEY_CRON_MINUTE, &time.minute.to_string());
    }

    out
}
