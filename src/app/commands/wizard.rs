//! Install wizard: turns prompt answers into [`InstallDecisions`].

use std::path::{Path, PathBuf};

use crate::domain::install_decisions::DEFAULT_CRON_TIME;
use crate::domain::template_derivation::TemplatePrefill;
use crate::domain::{
    AppError, CloudDecision, InstallDecisions, NotificationMode, SecondaryDecision, TriState,
};
use crate::ports::Prompter;

/// Which front-end is asking; decides the firewall prompt and cron persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    /// Plain line prompts (`--cli`).
    Cli,
    /// Interactive form widgets.
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingConfigAction {
    Overwrite,
    Edit,
    Keep,
}

const EXISTING_OPTIONS: [&str; 3] = [
    "Overwrite with a fresh configuration",
    "Edit the existing configuration",
    "Keep it and skip the wizard",
];

const FIREWALL_OPTIONS: [&str; 3] = ["Keep the template default", "Yes", "No"];

pub fn choose_existing_action(
    prompter: &mut dyn Prompter,
    config_path: &Path,
) -> Result<ExistingConfigAction, AppError> {
    let question = format!("A configuration already exists at {}. What now?", config_path.display());
    Ok(match prompter.choice(&question, &EXISTING_OPTIONS, 1)? {
        0 => ExistingConfigAction::Overwrite,
        1 => ExistingConfigAction::Edit,
        _ => ExistingConfigAction::Keep,
    })
}

fn absolute_path(
    prompter: &mut dyn Prompter,
    question: &str,
    default: &str,
) -> Result<PathBuf, AppError> {
    let mut default = Some(default.to_string()).filter(|value| !value.is_empty());
    loop {
        let answer = prompter.non_empty(question, default.as_deref())?;
        let path = PathBuf::from(&answer);
        if path.is_absolute() {
            return Ok(path);
        }
        prompter.note(&format!("'{}' is not an absolute path.", answer));
        // A relative default would loop forever.
        default = None;
    }
}

fn optional_default(value: &str) -> Option<&str> {
    Some(value).filter(|value| !value.is_empty())
}

/// Ask every install question, starting from `prefill`.
pub fn collect_decisions(
    prompter: &mut dyn Prompter,
    base_dir: &Path,
    prefill: &TemplatePrefill,
    mode: WizardMode,
) -> Result<InstallDecisions, AppError> {
    let mut decisions = InstallDecisions::new(base_dir);

    if prompter.yes_no("Enable secondary backup?", prefill.secondary_enabled)? {
        decisions.secondary = SecondaryDecision {
            enabled: true,
            path: absolute_path(prompter, "Secondary backup path", &prefill.secondary_path)?,
            log_path: absolute_path(prompter, "Secondary log path", &prefill.secondary_log_path)?,
        };
    }

    if prompter.yes_no("Enable cloud backup (rclone)?", prefill.cloud_enabled)? {
        decisions.cloud = CloudDecision {
            enabled: true,
            remote: prompter.non_empty("Cloud backup remote", optional_default(&prefill.cloud_remote))?,
            log_remote: prompter
                .non_empty("Cloud log remote", optional_default(&prefill.cloud_log_path))?,
        };
    }

    decisions.firewall_enabled = match mode {
        WizardMode::Cli => {
            TriState::from(prompter.yes_no("Back up firewall rules?", prefill.firewall_enabled)?)
        }
        WizardMode::Interactive => {
            match prompter.choice("Back up firewall rules?", &FIREWALL_OPTIONS, 0)? {
                1 => TriState::True,
                2 => TriState::False,
                _ => TriState::Unset,
            }
        }
    };

    let telegram = prompter.yes_no("Enable Telegram notifications?", prefill.telegram_enabled)?;
    let email = prompter.yes_no("Enable email notifications?", prefill.email_enabled)?;
    decisions.notifications = NotificationMode::from_flags(telegram, email);

    decisions.encryption_enabled =
        prompter.yes_no("Enable archive encryption (AGE)?", prefill.encryption_enabled)?;

    decisions.cron_time = prompter.hhmm("Daily backup time (HH:MM)", DEFAULT_CRON_TIME)?;

    decisions.validate()?;
    Ok(decisions)
}
