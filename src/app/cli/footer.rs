//! Closing banner printed after install and newkey runs.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use crate::app::api::InstallReport;
use crate::domain::AppError;
use crate::domain::format::format_bytes;

const GREEN: &str = "\x1b[32m";
const MAGENTA: &str = "\x1b[35m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// What the success footer lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FooterSummary {
    pub title: String,
    pub config_path: Option<PathBuf>,
    pub exec_path: Option<PathBuf>,
    pub cron_schedule: Option<String>,
    pub notes: Vec<String>,
    pub next_steps: Vec<String>,
}

impl FooterSummary {
    pub fn from_install(report: &InstallReport, exec_path: Option<PathBuf>) -> Self {
        let mut notes = Vec::new();
        if let Some(backup) = &report.config_backup {
            notes.push(format!("Previous configuration saved as {}", backup.display()));
        }
        if report.pairing.as_ref().is_some_and(|p| p.skipped_verification) {
            notes.push("Notification pairing was not verified.".to_string());
        }
        if let Some(audit) = report.audit.as_ref().filter(|a| !a.disabled.is_empty()) {
            notes.push(format!("Disabled after dry-run: {}", audit.disabled.join(", ")));
        }

        let mut next_steps = vec![
            format!("Review {}", report.config_path.display()),
            "Run `proxsave --dry-run` to check the configuration".to_string(),
        ];
        if report.installer.cron_schedule.is_none() {
            next_steps.push("Add a cron entry for proxsave by hand".to_string());
        }

        Self {
            title: "Installation completed".to_string(),
            config_path: Some(report.config_path.clone()),
            exec_path,
            cron_schedule: report.installer.cron_schedule.clone(),
            notes,
            next_steps,
        }
    }
}

/// How a run ended, as far as the banner is concerned.
#[derive(Debug)]
pub enum Outcome<'a> {
    Success(&'a FooterSummary),
    Aborted,
    Failed(&'a AppError),
}

impl Outcome<'_> {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success(_) => 0,
            Outcome::Aborted | Outcome::Failed(_) => 1,
        }
    }
}

pub fn render(outcome: &Outcome<'_>) -> String {
    let mut out = String::new();
    match outcome {
        Outcome::Success(summary) => {
            let _ = writeln!(out, "\n{BOLD}{GREEN}✅ {}{RESET}", summary.title);
            if let Some(path) = &summary.config_path {
                let _ = writeln!(out, "  Configuration: {}", path.display());
            }
            if let Some(path) = &summary.exec_path {
                match fs::metadata(path) {
                    Ok(meta) => {
                        let _ = writeln!(out, "  Executable:    {} ({})", path.display(), format_bytes(meta.len()));
                    }
                    Err(_) => {
                        let _ = writeln!(out, "  Executable:    {}", path.display());
                    }
                }
            }
            if let Some(schedule) = &summary.cron_schedule {
                let _ = writeln!(out, "  Cron schedule: {}", schedule);
            }
            for note in &summary.notes {
                let _ = writeln!(out, "  • {}", note);
            }
            if !summary.next_steps.is_empty() {
                let _ = writeln!(out, "\nNext steps:");
                for (idx, step) in summary.next_steps.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {}", idx + 1, step);
                }
            }
        }
        Outcome::Aborted => {
            let _ = writeln!(out, "\n{BOLD}{MAGENTA}⚠️ Installation aborted by user{RESET}");
        }
        Outcome::Failed(err) => {
            let _ = writeln!(out, "\n{BOLD}{RED}❌ Installation failed: {}{RESET}", err);
        }
    }
    out
}

/// Banner and exit code for a command result.
pub fn finish(result: Result<FooterSummary, AppError>) -> i32 {
    let outcome = match &result {
        Ok(summary) => Outcome::Success(summary),
        Err(err) if err.is_user_abort() => Outcome::Aborted,
        Err(err) => Outcome::Failed(err),
    };
    print!("{}", render(&outcome));
    outcome.exit_code()
}
