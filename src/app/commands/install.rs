//! `--install` / `--new-install`: wizard, config write, host setup and the
//! optional follow-ups, in that order.

use std::fs;
use std::path::PathBuf;

use chrono::Local;

use crate::adapters::assets::env_template_assets::default_template;
use crate::app::AppContext;
use crate::app::commands::notification_pairing;
use crate::app::commands::post_install_audit::{self, AuditReport};
use crate::app::commands::recipient_setup::{RecipientsReady, ensure_recipients_ready};
use crate::app::commands::system_installer::{self, InstallerReport, reset_base_dir};
use crate::app::commands::wizard::{ExistingConfigAction, WizardMode, choose_existing_action, collect_decisions};
use crate::app::config::{backup_existing_config, write_config_atomic};
use crate::domain::backup_config::BackupConfig;
use crate::domain::config_applier::{ApplyOptions, KEY_BOT_TELEGRAM_TYPE, KEY_TELEGRAM_ENABLED, apply_decisions};
use crate::domain::pairing::PairingOutcome;
use crate::domain::template_derivation::{derive_prefill, parse_bool};
use crate::domain::{AppError, CronTime, env_template};
use crate::ports::Prompter;

/// Bot flavour that talks to the operator's own bot and needs no pairing.
const PERSONAL_BOT: &str = "personal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    pub mode: WizardMode,
    /// Empty the installation root (minus preserved dirs) first.
    pub reset: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub config_path: PathBuf,
    /// What the operator chose for a pre-existing config, if there was one.
    pub existing_action: Option<ExistingConfigAction>,
    pub config_backup: Option<PathBuf>,
    pub reset_removed: Vec<PathBuf>,
    pub installer: InstallerReport,
    pub recipients: RecipientsReady,
    pub pairing: Option<PairingOutcome>,
    pub audit: Option<AuditReport>,
}

pub fn execute(
    ctx: &AppContext,
    prompter: &mut dyn Prompter,
    options: InstallOptions,
) -> Result<InstallReport, AppError> {
    let reset_removed = if options.reset { confirm_and_reset(ctx, prompter)? } else { Vec::new() };

    let config_path = ctx.config_path().to_path_buf();
    let existing_action =
        if config_path.exists() { Some(choose_existing_action(prompter, &config_path)?) } else { None };

    let mut config_backup = None;
    let cron_time = match existing_action {
        Some(ExistingConfigAction::Keep) => {
            ctx.logger().info(&format!("keeping {}", config_path.display()));
            None
        }
        Some(ExistingConfigAction::Edit) => {
            let base = fs::read_to_string(&config_path)?;
            Some(run_wizard(ctx, prompter, &base, options.mode)?)
        }
        Some(ExistingConfigAction::Overwrite) => {
            let decided = run_wizard_deferred(ctx, prompter, default_template(), options.mode)?;
            let backup = backup_existing_config(&config_path, Local::now())?;
            ctx.logger().info(&format!("previous config saved as {}", backup.display()));
            config_backup = Some(backup);
            Some(decided.write(ctx)?)
        }
        None => Some(run_wizard(ctx, prompter, default_template(), options.mode)?),
    };

    let installer = system_installer::execute(ctx, cron_time);

    let content = fs::read_to_string(&config_path)?;
    let config = BackupConfig::from_template(&content, ctx.base_dir());
    let recipients = ensure_recipients_ready(ctx, prompter, &config)?;
    let pairing = run_pairing(ctx, prompter, &content)?;
    let audit = run_audit(ctx, prompter)?;

    Ok(InstallReport {
        config_path,
        existing_action,
        config_backup,
        reset_removed,
        installer,
        recipients,
        pairing,
        audit,
    })
}

fn confirm_and_reset(ctx: &AppContext, prompter: &mut dyn Prompter) -> Result<Vec<PathBuf>, AppError> {
    let question = format!(
        "Everything under {} except env/, identity/ and build/ will be deleted. Continue?",
        ctx.base_dir().display()
    );
    if !prompter.yes_no(&question, false)? {
        return Err(AppError::UserAborted);
    }
    let removed = reset_base_dir(ctx)?;
    ctx.logger().info(&format!("removed {} entries from {}", removed.len(), ctx.base_dir().display()));
    Ok(removed)
}

/// Config content decided by the wizard but not yet on disk.
struct DecidedConfig {
    content: String,
    cron_time: CronTime,
}

impl DecidedConfig {
    fn write(self, ctx: &AppContext) -> Result<CronTime, AppError> {
        write_config_atomic(ctx.config_path(), &self.content)?;
        ctx.logger().info(&format!("configuration written to {}", ctx.config_path().display()));
        Ok(self.cron_time)
    }
}

fn run_wizard_deferred(
    ctx: &AppContext,
    prompter: &mut dyn Prompter,
    base: &str,
    mode: WizardMode,
) -> Result<DecidedConfig, AppError> {
    let prefill = derive_prefill(&env_template::parse(base));
    let decisions = collect_decisions(prompter, ctx.base_dir(), &prefill, mode)?;
    let options = ApplyOptions { persist_cron: mode == WizardMode::Cli };
    Ok(DecidedConfig { content: apply_decisions(base, &decisions, options), cron_time: decisions.cron_time })
}

fn run_wizard(
    ctx: &AppContext,
    prompter: &mut dyn Prompter,
    base: &str,
    mode: WizardMode,
) -> Result<CronTime, AppError> {
    run_wizard_deferred(ctx, prompter, base, mode)?.write(ctx)
}

fn run_pairing(
    ctx: &AppContext,
    prompter: &mut dyn Prompter,
    content: &str,
) -> Result<Option<PairingOutcome>, AppError> {
    let values = env_template::parse(content);
    if !values.get(KEY_TELEGRAM_ENABLED).is_some_and(|v| parse_bool(v)) {
        return Ok(None);
    }
    let bot_type = values.get(KEY_BOT_TELEGRAM_TYPE).map(|v| env_template::unquote(v)).unwrap_or_default();
    if bot_type.eq_ignore_ascii_case(PERSONAL_BOT) {
        ctx.logger().info("personal Telegram bot configured; no pairing needed");
        return Ok(None);
    }

    match notification_pairing::execute(ctx, prompter) {
        Ok(outcome) => Ok(Some(outcome)),
        Err(err) if err.is_user_abort() => Err(err),
        Err(err) => {
            ctx.logger().warning(&format!("notification pairing skipped: {}", err));
            Ok(Some(PairingOutcome { verified: false, skipped_verification: true }))
        }
    }
}

fn run_audit(ctx: &AppContext, prompter: &mut dyn Prompter) -> Result<Option<AuditReport>, AppError> {
    if !ctx.exec().is_known() {
        return Ok(None);
    }
    if !prompter.yes_no("Run a dry-run now to check the configuration against this host?", false)? {
        return Ok(None);
    }
    match post_install_audit::execute(ctx, prompter) {
        Ok(report) => Ok(Some(report)),
        Err(err) if err.is_user_abort() => Err(err),
        Err(err) => {
            ctx.logger().warning(&format!("post-install audit failed: {}", err));
            Ok(None)
        }
    }
}
