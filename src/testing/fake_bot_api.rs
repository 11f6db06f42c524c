use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::AppError;
use crate::ports::{BotApi, RegistrationProbe};

/// Bot API double answering from a queue; an empty queue answers 403.
#[derive(Default)]
pub struct FakeBotApi {
    responses: Mutex<VecDeque<Result<u16, String>>>,
    pub calls: AtomicUsize,
    pub last_server_id: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl FakeBotApi {
    pub fn new(responses: impl IntoIterator<Item = Result<u16, String>>) -> Self {
        Self { responses: Mutex::new(responses.into_iter().collect()), ..Self::default() }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BotApi for FakeBotApi {
    fn check_registration(&self, server_id: &str) -> Result<RegistrationProbe, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_server_id.lock().unwrap() = Some(server_id.to_string());
        match self.responses.lock().unwrap().pop_front().unwrap_or(Ok(403)) {
            Ok(status) => Ok(RegistrationProbe { status, message: None }),
            Err(message) => Err(AppError::RemotePairing { message, status: None }),
        }
    }
}
