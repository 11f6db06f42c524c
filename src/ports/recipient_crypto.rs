use crate::domain::AppError;

/// Port for the archive-encryption primitives the recipient wizard needs.
pub trait RecipientCrypto {
    /// Accept an `age1…` recipient or an SSH public key line.
    fn validate_recipient(&self, recipient: &str) -> Result<(), AppError>;

    /// Public recipient for an `AGE-SECRET-KEY-1…` identity.
    fn recipient_from_private_key(&self, private_key: &str) -> Result<String, AppError>;

    /// Deterministic recipient derived from a passphrase.
    fn recipient_from_passphrase(&self, passphrase: &str) -> Result<String, AppError>;
}
