//! Recipient provisioning state and its validation rules.

use crate::domain::AppError;
use crate::ports::RecipientCrypto;

pub const PRIVATE_KEY_PREFIX: &str = "AGE-SECRET-KEY-1";
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// How the operator wants to provide the encryption recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupType {
    /// Paste an existing public recipient.
    Existing,
    /// Derive one from a passphrase.
    Passphrase,
    /// Derive one from an AGE private key.
    PrivateKey,
}

impl SetupType {
    pub const ALL: [SetupType; 3] = [SetupType::Existing, SetupType::Passphrase, SetupType::PrivateKey];

    pub fn label(self) -> &'static str {
        match self {
            SetupType::Existing => "Use an existing AGE public key",
            SetupType::Passphrase => "Derive a key from a passphrase",
            SetupType::PrivateKey => "Import an AGE private key",
        }
    }
}

/// Answers collected for one recipient, before and after derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientSetupState {
    pub setup_type: SetupType,
    pub public_key: Option<String>,
    pub passphrase: Option<String>,
    pub private_key: Option<String>,
    /// The line that ends up in the recipient file.
    pub recipient_key: String,
}

impl RecipientSetupState {
    pub fn new(setup_type: SetupType) -> Self {
        Self { setup_type, public_key: None, passphrase: None, private_key: None, recipient_key: String::new() }
    }

    /// Validate the collected input and fill in `recipient_key`.
    pub fn resolve(mut self, crypto: &dyn RecipientCrypto) -> Result<Self, AppError> {
        self.recipient_key = match self.setup_type {
            SetupType::Existing => {
                let key = self.public_key.as_deref().unwrap_or_default();
                validate_public_key(key, crypto)?;
                key.trim().to_string()
            }
            SetupType::Passphrase => {
                let passphrase = self.passphrase.as_deref().unwrap_or_default();
                crypto.recipient_from_passphrase(passphrase)?
            }
            SetupType::PrivateKey => {
                let key = self.private_key.as_deref().unwrap_or_default();
                validate_private_key(key)?;
                crypto.recipient_from_private_key(key.trim())?
            }
        };
        // Secrets are not needed once the recipient is known.
        self.passphrase = None;
        self.private_key = None;
        Ok(self)
    }
}

pub fn validate_public_key(key: &str, crypto: &dyn RecipientCrypto) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Err(AppError::recipient("public key cannot be empty"));
    }
    crypto.validate_recipient(key.trim())
}

pub fn validate_passphrase(passphrase: &str, confirmation: &str) -> Result<(), AppError> {
    if passphrase.is_empty() {
        return Err(AppError::recipient("passphrase cannot be empty"));
    }
    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(AppError::recipient(format!(
            "passphrase must be at least {} characters",
            MIN_PASSPHRASE_LEN
        )));
    }
    if passphrase != confirmation {
        return Err(AppError::recipient("passphrases do not match"));
    }
    Ok(())
}

pub fn validate_private_key(key: &str) -> Result<(), AppError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::recipient("private key cannot be empty"));
    }
    if !key.starts_with(PRIVATE_KEY_PREFIX) {
        return Err(AppError::recipient(format!("private key must start with {}", PRIVATE_KEY_PREFIX)));
    }
    Ok(())
}

/// Recipient lines of a recipient file; blanks and comments skipped.
pub fn recipient_lines(content: &str) -> Vec<&str> {
    content.lines().map(str::trim).filter(|line| !line.is_empty() && !line.starts_with('#')).collect()
}
