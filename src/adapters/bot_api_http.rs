//! Notification bot client using reqwest.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

use crate::domain::AppError;
use crate::ports::{BotApi, RegistrationProbe};

pub const DEFAULT_BOT_API_URL: &str = "https://bot.tis24.it:1443";
pub const BOT_API_URL_ENV: &str = "TELEGRAM_BOT_API_URL";
const REGISTRATION_PATH: &str = "api/check-registration";

#[derive(Debug, Clone)]
pub struct BotApiConfig {
    pub base_url: Url,
    pub timeout_secs: u64,
}

impl Default for BotApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BOT_API_URL).expect("default bot URL is valid"),
            timeout_secs: 10,
        }
    }
}

impl BotApiConfig {
    /// Default configuration with the base URL taken from the environment when set.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(BOT_API_URL_ENV)
            && !raw.trim().is_empty()
        {
            config.base_url = Url::parse(raw.trim()).map_err(|e| {
                AppError::validation(format!("{} is not a valid URL: {}", BOT_API_URL_ENV, e))
            })?;
        }
        Ok(config)
    }
}

#[derive(Clone)]
pub struct HttpBotApi {
    endpoint: Url,
    client: Client,
}

impl std::fmt::Debug for HttpBotApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBotApi").field("endpoint", &self.endpoint).finish()
    }
}

impl HttpBotApi {
    pub fn new(config: &BotApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::RemotePairing {
                message: format!("Failed to create HTTP client: {}", e),
                status: None,
            })?;

        let mut base = config.base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let endpoint = base.join(REGISTRATION_PATH).map_err(|e| {
            AppError::validation(format!("invalid bot API URL {}: {}", config.base_url, e))
        })?;

        Ok(Self { endpoint, client })
    }
}

impl BotApi for HttpBotApi {
    fn check_registration(&self, server_id: &str) -> Result<RegistrationProbe, AppError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("server_id", server_id)])
            .send()
            .map_err(|e| AppError::RemotePairing {
                message: format!("HTTP request failed: {}", e),
                status: None,
            })?;

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        Ok(RegistrationProbe { status, message: extract_message(&body) })
    }
}

#[derive(Debug, Deserialize)]
struct RegistrationResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Text(String),
    Detail {
        #[serde(default)]
        message: Option<String>,
    },
    Other(serde_json::Value),
}

fn extract_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed: RegistrationResponse = serde_json::from_str(body).ok()?;
    let from_error = match parsed.error {
        Some(ErrorBody::Text(text)) => Some(text),
        Some(ErrorBody::Detail { message }) => message,
        Some(ErrorBody::Other(_)) | None => None,
    };
    from_error.or(parsed.message)
}
