use crate::domain::AppError;

/// Answer from the notification bot's registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationProbe {
    pub status: u16,
    pub message: Option<String>,
}

/// Port for the remote "is this server paired?" check.
pub trait BotApi: Send + Sync {
    /// Ask the bot whether `server_id` is registered. Transport failures are
    /// `AppError::RemotePairing` with no status.
    fn check_registration(&self, server_id: &str) -> Result<RegistrationProbe, AppError>;
}
