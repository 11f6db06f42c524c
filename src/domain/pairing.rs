//! State of the notification-bot pairing check.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::AppError;
use crate::ports::RegistrationProbe;

/// What the last completed probe said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingStatus {
    Idle,
    Checking,
    Verified,
    /// The bot has not seen this server yet (403/409).
    NotPaired,
    /// The bot rejected the id itself (422).
    InvalidId(String),
    /// Network trouble or an unexpected status; worth retrying.
    Transient(String),
}

impl PairingStatus {
    pub fn from_probe(result: Result<RegistrationProbe, AppError>) -> Self {
        match result {
            Ok(probe) => match probe.status {
                200 => PairingStatus::Verified,
                403 | 409 => PairingStatus::NotPaired,
                422 => PairingStatus::InvalidId(
                    probe.message.unwrap_or_else(|| "the bot rejected this server id".into()),
                ),
                other => PairingStatus::Transient(
                    probe.message.unwrap_or_else(|| format!("unexpected status {}", other)),
                ),
            },
            Err(err) => PairingStatus::Transient(err.to_string()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            PairingStatus::Idle => "Not checked yet.".into(),
            PairingStatus::Checking => "Checking...".into(),
            PairingStatus::Verified => "Server paired with the bot.".into(),
            PairingStatus::NotPaired => {
                "Not paired yet: open the bot, send /start and enter the server id.".into()
            }
            PairingStatus::InvalidId(message) => format!("Server id rejected: {}", message),
            PairingStatus::Transient(message) => format!("Check failed, try again: {}", message),
        }
    }
}

/// Result handed back to the install driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairingOutcome {
    pub verified: bool,
    pub skipped_verification: bool,
}

/// One pairing dialog. At most one probe is in flight; once closing, late
/// results are dropped.
#[derive(Debug)]
pub struct PairingSession {
    server_id: String,
    status: PairingStatus,
    in_flight: bool,
    closing: Arc<AtomicBool>,
    skipped: bool,
    attempts: u32,
}

impl PairingSession {
    pub fn new(server_id: impl Into<String>) -> Self {
        Self {
            server_id: server_id.into(),
            status: PairingStatus::Idle,
            in_flight: false,
            closing: Arc::new(AtomicBool::new(false)),
            skipped: false,
            attempts: 0,
        }
    }

    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    pub fn status(&self) -> &PairingStatus {
        &self.status
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Shared flag a background probe checks before reporting.
    pub fn closing_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closing)
    }

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }

    /// Start a check. Returns `false` (and changes nothing) while a probe is
    /// pending or after the session closed.
    pub fn begin_check(&mut self) -> bool {
        if self.in_flight || self.is_closing() {
            return false;
        }
        self.in_flight = true;
        self.attempts += 1;
        self.status = PairingStatus::Checking;
        true
    }

    /// Record a finished probe. Ignored once the session is closing.
    pub fn complete(&mut self, result: Result<RegistrationProbe, AppError>) -> bool {
        if self.is_closing() {
            return false;
        }
        self.in_flight = false;
        self.status = PairingStatus::from_probe(result);
        true
    }

    pub fn skip(&mut self) {
        self.skipped = true;
        self.close();
    }

    pub fn close(&mut self) {
        self.closing.store(true, Ordering::SeqCst);
    }

    pub fn outcome(&self) -> PairingOutcome {
        let verified = self.status == PairingStatus::Verified;
        PairingOutcome { verified, skipped_verification: self.skipped && !verified }
    }
}
