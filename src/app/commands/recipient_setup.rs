//! Encryption recipient provisioning (`--newkey` and encrypted installs).

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::AppContext;
use crate::app::config::write_private_file;
use crate::domain::backup_config::BackupConfig;
use crate::domain::recipient::{
    RecipientSetupState, SetupType, recipient_lines, validate_passphrase, validate_private_key,
    validate_public_key,
};
use crate::domain::AppError;
use crate::ports::Prompter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientsReady {
    /// Encryption is off; nothing to check.
    NotNeeded,
    /// Recipients were already configured and valid.
    Existing(usize),
    /// The operator just created recipients.
    Created(Vec<String>),
}

/// Walk the operator through one recipient, re-asking on invalid input.
pub fn collect_recipient(
    ctx: &AppContext,
    prompter: &mut dyn Prompter,
) -> Result<RecipientSetupState, AppError> {
    let labels: Vec<&str> = SetupType::ALL.iter().map(|t| t.label()).collect();
    let setup_type = SetupType::ALL[prompter.choice("How do you want to set up encryption?", &labels, 0)?];

    loop {
        let mut state = RecipientSetupState::new(setup_type);
        let collected = match setup_type {
            SetupType::Existing => {
                let key = prompter.non_empty("AGE public key (age1... or ssh-...)", None)?;
                let checked = validate_public_key(&key, ctx.crypto());
                state.public_key = Some(key);
                checked
            }
            SetupType::Passphrase => {
                let passphrase = prompter.secret("Passphrase")?;
                let confirmation = prompter.secret("Confirm passphrase")?;
                let checked = validate_passphrase(&passphrase, &confirmation);
                state.passphrase = Some(passphrase);
                checked
            }
            SetupType::PrivateKey => {
                let key = prompter.secret("AGE private key (AGE-SECRET-KEY-1...)")?;
                let checked = validate_private_key(&key);
                state.private_key = Some(key);
                checked
            }
        };

        match collected.and_then(|()| state.resolve(ctx.crypto())) {
            Ok(resolved) => return Ok(resolved),
            Err(AppError::Recipient(message)) => prompter.note(&message),
            Err(err) => return Err(err),
        }
    }
}

/// Write one recipient line, replacing or appending.
pub fn write_recipient(path: &Path, recipient: &str, append: bool) -> Result<(), AppError> {
    write_private_file(path, &format!("{}\n", recipient.trim()), append)
}

/// Collect recipients until the operator stops adding more.
fn run_setup(
    ctx: &AppContext,
    prompter: &mut dyn Prompter,
    path: &Path,
) -> Result<Vec<String>, AppError> {
    let mut written = Vec::new();
    loop {
        let state = collect_recipient(ctx, prompter)?;
        write_recipient(path, &state.recipient_key, !written.is_empty())?;
        ctx.logger().info(&format!("recipient written to {}", path.display()));
        written.push(state.recipient_key);

        if !prompter.yes_no("Add another recipient?", false)? {
            return Ok(written);
        }
    }
}

fn recipient_path(ctx: &AppContext) -> PathBuf {
    match fs::read_to_string(ctx.config_path()) {
        Ok(content) => BackupConfig::from_template(&content, ctx.base_dir()).age_recipient_file,
        Err(_) => ctx.layout().recipient_path(),
    }
}

/// `--newkey`: replace the recipient file after confirmation.
pub fn execute_newkey(
    ctx: &AppContext,
    prompter: &mut dyn Prompter,
) -> Result<(PathBuf, Vec<String>), AppError> {
    let path = recipient_path(ctx);
    if path.exists() {
        let question = format!("A recipient file already exists at {}.", path.display());
        if prompter.choice(&question, &["Overwrite", "Cancel"], 1)? != 0 {
            return Err(AppError::UserAborted);
        }
    }
    let written = run_setup(ctx, prompter, &path)?;
    Ok((path, written))
}

/// Make sure an encrypted install has at least one valid recipient.
pub fn ensure_recipients_ready(
    ctx: &AppContext,
    prompter: &mut dyn Prompter,
    config: &BackupConfig,
) -> Result<RecipientsReady, AppError> {
    if !config.encrypt_archive {
        return Ok(RecipientsReady::NotNeeded);
    }

    for recipient in &config.age_recipients {
        ctx.crypto().validate_recipient(recipient)?;
    }

    let path = &config.age_recipient_file;
    let content = fs::read_to_string(path).unwrap_or_default();
    let lines = recipient_lines(&content);
    for line in &lines {
        ctx.crypto().validate_recipient(line).map_err(|err| {
            AppError::recipient(format!("{} in {}", err, path.display()))
        })?;
    }

    let existing = lines.len() + config.age_recipients.len();
    if existing > 0 {
        return Ok(RecipientsReady::Existing(existing));
    }

    prompter.note("Archive encryption is enabled but no recipient is configured yet.");
    Ok(RecipientsReady::Created(run_setup(ctx, prompter, path)?))
}
