use crate::domain::AppError;
use crate::ports::RecipientCrypto;

/// Deterministic stand-in producing readable fake recipients.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeRecipientCrypto;

impl RecipientCrypto for FakeRecipientCrypto {
    fn validate_recipient(&self, recipient: &str) -> Result<(), AppError> {
        if recipient.starts_with("age1") || recipient.starts_with("ssh-ed25519 ") {
            Ok(())
        } else {
            Err(AppError::recipient(format!("invalid recipient '{}'", recipient)))
        }
    }

    fn recipient_from_private_key(&self, private_key: &str) -> Result<String, AppError> {
        let suffix = private_key.trim_start_matches("AGE-SECRET-KEY-1").to_ascii_lowercase();
        Ok(format!("age1fromkey{}", suffix))
    }

    fn recipient_from_passphrase(&self, passphrase: &str) -> Result<String, AppError> {
        Ok(format!("age1frompass{}", passphrase.len()))
    }
}
