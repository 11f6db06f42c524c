//! Post-install audit: run the installed binary in dry-run mode and offer to
//! switch off collectors it reports as unusable on this host.

use std::fs;
use std::time::Duration;

use crate::adapters::assets::env_template_assets::default_template_keys;
use crate::app::AppContext;
use crate::app::config::write_config_atomic;
use crate::domain::AppError;
use crate::domain::audit::{AuditSuggestion, apply_suggestions, collect_suggestions};
use crate::ports::{CommandSpec, Prompter};

const DRY_RUN_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub exit_code: Option<i32>,
    pub suggestions: Vec<AuditSuggestion>,
    /// Keys set to `false` in the config.
    pub disabled: Vec<String>,
}

/// Run the dry-run and collect suggestions without touching the config.
pub fn audit(ctx: &AppContext) -> Result<(Option<i32>, Vec<AuditSuggestion>), AppError> {
    let exec = ctx.exec().exec_path.to_string_lossy().into_owned();
    let config = ctx.config_path().to_string_lossy().into_owned();
    let args = ["--dry-run", "--log-level", "warning", "--config", config.as_str()];

    ctx.logger().info(&format!("running {} --dry-run", exec));
    let output = ctx.runner().run(&CommandSpec::new(&exec, &args).with_timeout(DRY_RUN_TIMEOUT))?;
    if output.timed_out {
        ctx.logger().warning(&format!("dry-run killed after {}s", DRY_RUN_TIMEOUT.as_secs()));
    } else if !output.success() {
        ctx.logger().debug(&format!("dry-run exited with {:?}", output.status));
    }

    let current = fs::read_to_string(ctx.config_path())?;
    let suggestions = collect_suggestions(&output.combined(), default_template_keys(), &current);
    Ok((output.status, suggestions))
}

/// Audit, ask about each suggestion, and write the accepted ones back.
pub fn execute(ctx: &AppContext, prompter: &mut dyn Prompter) -> Result<AuditReport, AppError> {
    let (exit_code, suggestions) = audit(ctx)?;
    if suggestions.is_empty() {
        prompter.note("The dry-run found nothing to disable.");
        return Ok(AuditReport { exit_code, ..AuditReport::default() });
    }

    let mut disabled = Vec::new();
    for suggestion in &suggestions {
        let details: Vec<&str> = suggestion.messages.iter().map(String::as_str).collect();
        prompter.note(&details.join("\n"));
        if prompter.yes_no(&format!("Set {}=false?", suggestion.key), true)? {
            disabled.push(suggestion.key.clone());
        }
    }

    if !disabled.is_empty() {
        let current = fs::read_to_string(ctx.config_path())?;
        write_config_atomic(ctx.config_path(), &apply_suggestions(&current, &disabled))?;
        ctx.logger().info(&format!("disabled {}", disabled.join(", ")));
    }

    Ok(AuditReport { exit_code, suggestions, disabled })
}
