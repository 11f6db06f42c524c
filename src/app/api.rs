//! API Facade for the application.
//!
//! Builds the production adapters into an [`AppContext`] and hands it to the
//! command modules.

use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::exec_locator::exec_info;
use crate::adapters::{
    AgeRecipientCrypto, BotApiConfig, DialoguerPrompter, HttpBotApi, LinePrompter, ProcessRunner,
    TracingLogger,
};
use crate::app::AppContext;
use crate::app::commands::{dry_run, install, recipient_setup};
use crate::app::config::{detect_base_dir, ensure_config_exists, resolve_install_config_path};
use crate::domain::{DEFAULT_BASE_DIR, ExecInfo};
use crate::ports::Prompter;

pub use crate::app::commands::dry_run::DryRunOutcome;
pub use crate::app::commands::install::{InstallOptions, InstallReport};
pub use crate::app::commands::wizard::WizardMode;
pub use crate::domain::AppError;

/// Where the installation lives, from `--config` or from the executable.
fn resolve_paths(config: Option<&str>, exec: &ExecInfo) -> Result<(PathBuf, Option<PathBuf>), AppError> {
    if let Some(raw) = config {
        let path = resolve_install_config_path(raw)?;
        return Ok((detect_base_dir(&path), Some(path)));
    }
    let base = if exec.has_base { exec.base_dir.clone() } else { PathBuf::from(DEFAULT_BASE_DIR) };
    Ok((base, None))
}

/// Create an `AppContext` backed by the real host.
pub fn create_context(config: Option<&str>) -> Result<AppContext, AppError> {
    let exec = exec_info(&TracingLogger).clone();
    let (base_dir, config_path) = resolve_paths(config, &exec)?;
    let bot = HttpBotApi::new(&BotApiConfig::from_env()?)?;

    let ctx = AppContext::new(
        base_dir,
        exec,
        Box::new(ProcessRunner),
        Arc::new(bot),
        Box::new(AgeRecipientCrypto::new()),
        Box::new(TracingLogger),
    );
    Ok(match config_path {
        Some(path) => ctx.with_config_path(path),
        None => ctx,
    })
}

fn create_prompter(mode: WizardMode) -> Box<dyn Prompter> {
    match mode {
        WizardMode::Cli => Box::new(LinePrompter::stdio()),
        WizardMode::Interactive => Box::new(DialoguerPrompter::new()),
    }
}

/// Run the install wizard and everything after it.
pub fn install(config: Option<&str>, options: InstallOptions) -> Result<(AppContext, InstallReport), AppError> {
    let ctx = create_context(config)?;
    let mut prompter = create_prompter(options.mode);
    let report = install::execute(&ctx, prompter.as_mut(), options)?;
    Ok((ctx, report))
}

/// Replace the encryption recipients.
pub fn newkey(config: Option<&str>, mode: WizardMode) -> Result<(PathBuf, Vec<String>), AppError> {
    let ctx = create_context(config)?;
    let mut prompter = create_prompter(mode);
    recipient_setup::execute_newkey(&ctx, prompter.as_mut())
}

/// Check the configuration against this host.
pub fn dry_run(config: Option<&str>) -> Result<DryRunOutcome, AppError> {
    let ctx = create_context(config)?;
    ensure_config_exists(ctx.config_path(), ctx.logger())?;
    dry_run::execute(&ctx)
}
