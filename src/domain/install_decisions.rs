//! The record of answers an install wizard produces.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::AppError;

pub const DEFAULT_CRON_TIME: CronTime = CronTime { hour: 2, minute: 0 };

/// A daily `HH:MM` slot in 24h time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CronTime {
    pub hour: u8,
    pub minute: u8,
}

impl CronTime {
    /// Parse `HH:MM` (one or two digits each side). Blank input is `None`.
    pub fn parse(raw: &str) -> Result<Option<Self>, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let invalid = || AppError::validation(format!("'{}' is not a valid HH:MM time", raw));
        let (hour, minute) = raw.split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || minute.is_empty() || hour.len() > 2 || minute.len() > 2 {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(Some(Self { hour, minute }))
    }

    /// Five-field cron expression running once a day at this time.
    pub fn schedule(&self) -> String {
        format!("{} {} * * *", self.minute, self.hour)
    }
}

impl fmt::Display for CronTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// `"HH:MM"` to `"MM HH * * *"`, or an empty string when out of range.
pub fn cron_to_schedule(raw: &str) -> String {
    match CronTime::parse(raw) {
        Ok(Some(time)) => time.schedule(),
        _ => String::new(),
    }
}

/// A yes/no answer that may also be left unanswered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    #[default]
    Unset,
    True,
    False,
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value { TriState::True } else { TriState::False }
    }
}

impl TriState {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            TriState::Unset => None,
            TriState::True => Some(true),
            TriState::False => Some(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationMode {
    #[default]
    None,
    Telegram,
    Email,
    Both,
}

impl NotificationMode {
    pub fn from_flags(telegram: bool, email: bool) -> Self {
        match (telegram, email) {
            (false, false) => NotificationMode::None,
            (true, false) => NotificationMode::Telegram,
            (false, true) => NotificationMode::Email,
            (true, true) => NotificationMode::Both,
        }
    }

    pub fn telegram(self) -> bool {
        matches!(self, NotificationMode::Telegram | NotificationMode::Both)
    }

    pub fn email(self) -> bool {
        matches!(self, NotificationMode::Email | NotificationMode::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecondaryDecision {
    pub enabled: bool,
    pub path: PathBuf,
    pub log_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CloudDecision {
    pub enabled: bool,
    pub remote: String,
    pub log_remote: String,
}

/// Everything the operator decided during one wizard run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDecisions {
    pub base_dir: PathBuf,
    pub secondary: SecondaryDecision,
    pub cloud: CloudDecision,
    pub firewall_enabled: TriState,
    pub notifications: NotificationMode,
    pub encryption_enabled: bool,
    pub cron_time: CronTime,
}

impl InstallDecisions {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            secondary: SecondaryDecision::default(),
            cloud: CloudDecision::default(),
            firewall_enabled: TriState::Unset,
            notifications: NotificationMode::None,
            encryption_enabled: false,
            cron_time: DEFAULT_CRON_TIME,
        }
    }

    /// Check the cross-field invariants before anything is written.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.base_dir.is_absolute() {
            return Err(AppError::validation(format!(
                "base directory must be absolute: {}",
                self.base_dir.display()
            )));
        }
        if self.secondary.enabled {
            require_absolute("secondary backup path", &self.secondary.path)?;
            require_absolute("secondary log path", &self.secondary.log_path)?;
        }
        if self.cloud.enabled {
            if self.cloud.remote.trim().is_empty() {
                return Err(AppError::validation("cloud backup remote is required"));
            }
            if self.cloud.log_remote.trim().is_empty() {
                return Err(AppError::validation("cloud log remote is required"));
            }
        }
        Ok(())
    }
}

fn require_absolute(label: &str, path: &Path) -> Result<(), AppError> {
    if path.as_os_str().is_empty() {
        return Err(AppError::validation(format!("{} is required", label)));
    }
    if !path.is_absolute() {
        return Err(AppError::validation(format!(
            "{} must be absolute: {}",
            label,
            path.display()
        )));
    }
    Ok(())
}
