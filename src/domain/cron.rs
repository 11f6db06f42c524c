//! Crontab rewriting rules: which lines go, which schedule, which command.

use std::path::Path;

use crate::domain::install_decisions::{CronTime, DEFAULT_CRON_TIME};

pub const ENV_CRON_SCHEDULE: &str = "CRON_SCHEDULE";
pub const ENV_CRON_HOUR: &str = "CRON_HOUR";
pub const ENV_CRON_MINUTE: &str = "CRON_MINUTE";

/// Script name of the shell installation this tool replaces.
pub const LEGACY_SCRIPT_NAME: &str = "proxmox-backup.sh";

/// Cron-related overrides read from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CronOverrides {
    pub schedule: Option<String>,
    pub hour: Option<String>,
    pub minute: Option<String>,
}

impl CronOverrides {
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|value| !value.trim().is_empty());
        Self {
            schedule: read(ENV_CRON_SCHEDULE),
            hour: read(ENV_CRON_HOUR),
            minute: read(ENV_CRON_MINUTE),
        }
    }

    fn schedule(&self) -> Option<String> {
        if let Some(raw) = &self.schedule {
            let fields: Vec<&str> = raw.split_whitespace().collect();
            if fields.len() == 5 {
                return Some(fields.join(" "));
            }
        }
        if self.hour.is_some() || self.minute.is_some() {
            let hour = self.hour.as_deref().unwrap_or("2").trim();
            let minute = self.minute.as_deref().unwrap_or("0").trim();
            if let Ok(Some(time)) = CronTime::parse(&format!("{}:{}", hour, minute)) {
                return Some(time.schedule());
            }
        }
        None
    }
}

/// Schedule for the new entry: explicit decision, then environment, then 02:00.
pub fn resolve_schedule(decided: Option<CronTime>, overrides: &CronOverrides) -> String {
    decided
        .map(|time| time.schedule())
        .or_else(|| overrides.schedule())
        .unwrap_or_else(|| DEFAULT_CRON_TIME.schedule())
}

/// What marks a crontab line as belonging to a previous installation.
#[derive(Debug, Clone, Default)]
pub struct CronOwnership<'a> {
    /// Name of the new executable; paths ending in it or in `<name>.sh` are ours.
    pub exec_name: &'a str,
    /// Resolved executable path, when known.
    pub exec_path: Option<&'a Path>,
    /// Well-known legacy script paths.
    pub legacy_paths: &'a [&'a Path],
}

impl CronOwnership<'_> {
    fn owns(&self, line: &str) -> bool {
        if line.contains(LEGACY_SCRIPT_NAME) {
            return true;
        }
        if self.legacy_paths.iter().any(|legacy| line.contains(&*legacy.to_string_lossy())) {
            return true;
        }
        let shell_script = format!("{}.sh", self.exec_name);
        line.split_whitespace().any(|token| {
            let token_path = Path::new(token);
            token_path
                .file_name()
                .is_some_and(|name| name == self.exec_name || name == shell_script.as_str())
                || self.exec_path.is_some_and(|exec| token_path == exec)
        })
    }
}

/// Rewrite `existing` so it holds exactly one job of ours, appended last.
pub fn reconcile_crontab(
    existing: &str,
    ownership: &CronOwnership<'_>,
    schedule: &str,
    command: &str,
) -> String {
    let normalized = existing.replace("\r\n", "\n");
    let mut kept: Vec<&str> = normalized
        .split('\n')
        .filter(|line| {
            let trimmed = line.trim_start();
            trimmed.starts_with('#') || !ownership.owns(trimmed)
        })
        .collect();
    while kept.last().is_some_and(|line| line.trim().is_empty()) {
        kept.pop();
    }

    let mut out = String::new();
    for line in kept {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&format!("{} {}\n", schedule, command));
    out
}
