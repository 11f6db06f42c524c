//! Recipient handling backed by the `age` crate.

use std::str::FromStr;

use argon2::Argon2;
use bech32::{ToBase32, Variant};
use zeroize::{Zeroize, Zeroizing};

use crate::domain::AppError;
use crate::domain::recipient::PRIVATE_KEY_PREFIX;
use crate::ports::RecipientCrypto;

const IDENTITY_HRP: &str = "age-secret-key-";
/// Fixed salt so the same passphrase always maps to the same recipient.
const PASSPHRASE_SALT: &[u8] = b"proxsave-recipient-v1";

#[derive(Debug, Default, Clone, Copy)]
pub struct AgeRecipientCrypto;

impl AgeRecipientCrypto {
    pub fn new() -> Self {
        Self
    }
}

fn identity_to_recipient(encoded: &str) -> Result<String, AppError> {
    let identity = age::x25519::Identity::from_str(encoded)
        .map_err(|e| AppError::recipient(format!("invalid AGE private key: {}", e)))?;
    Ok(identity.to_public().to_string())
}

impl RecipientCrypto for AgeRecipientCrypto {
    fn validate_recipient(&self, recipient: &str) -> Result<(), AppError> {
        let recipient = recipient.trim();
        if age::x25519::Recipient::from_str(recipient).is_ok()
            || age::ssh::Recipient::from_str(recipient).is_ok()
        {
            return Ok(());
        }
        Err(AppError::recipient(format!(
            "'{}' is not a valid AGE recipient (age1...) or SSH public key",
            recipient
        )))
    }

    fn recipient_from_private_key(&self, private_key: &str) -> Result<String, AppError> {
        let private_key = private_key.trim();
        if !private_key.starts_with(PRIVATE_KEY_PREFIX) {
            return Err(AppError::recipient(format!(
                "private key must start with {}",
                PRIVATE_KEY_PREFIX
            )));
        }
        identity_to_recipient(private_key)
    }

    fn recipient_from_passphrase(&self, passphrase: &str) -> Result<String, AppError> {
        let mut secret = [0u8; 32];
        let derived = Argon2::default()
            .hash_password_into(passphrase.as_bytes(), PASSPHRASE_SALT, &mut secret)
            .map_err(|e| AppError::recipient(format!("passphrase derivation failed: {}", e)));
        if let Err(err) = derived {
            secret.zeroize();
            return Err(err);
        }

        let encoded = bech32::encode(IDENTITY_HRP, secret.to_base32(), Variant::Bech32);
        secret.zeroize();
        let encoded = Zeroizing::new(
            encoded
                .map_err(|e| AppError::recipient(format!("key encoding failed: {}", e)))?
                .to_ascii_uppercase(),
        );
        identity_to_recipient(&encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use age::secrecy::ExposeSecret;

    #[test]
    fn generated_identity_round_trips() {
        let identity = age::x25519::Identity::generate();
        let secret = identity.to_string();
        let crypto = AgeRecipientCrypto::new();

        let recipient = crypto.recipient_from_private_key(secret.expose_secret()).unwrap();
        assert_eq!(recipient, identity.to_public().to_string());
        crypto.validate_recipient(&recipient).unwrap();
    }

    #[test]
    fn passphrase_derivation_is_deterministic() {
        let crypto = AgeRecipientCrypto::new();
        let first = crypto.recipient_from_passphrase("correct horse battery").unwrap();
        let second = crypto.recipient_from_passphrase("correct horse battery").unwrap();
        let other = crypto.recipient_from_passphrase("correct horse battery!").unwrap();

        assert!(first.starts_with("age1"));
        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn ssh_keys_are_accepted() {
        let key = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIHsKLqeplhpW+uObz5dvMgjz1OxfM/XXUB+VHtZ6isGN alice@rust";
        AgeRecipientCrypto::new().validate_recipient(key).unwrap();
    }

    #[test]
    fn garbage_is_rejected() {
        let crypto = AgeRecipientCrypto::new();
        assert!(matches!(crypto.validate_recipient("age1nope"), Err(AppError::Recipient(_))));
        assert!(crypto.recipient_from_private_key("not-a-key").is_err());
        assert!(crypto.recipient_from_private_key("AGE-SECRET-KEY-1XYZ").is_err());
    }
}
