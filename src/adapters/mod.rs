pub mod age_crypto;
pub mod assets;
pub mod bot_api_http;
pub mod dialoguer_prompter;
pub mod exec_locator;
pub mod line_prompter;
pub mod process_runner;
pub mod tracing_logger;

pub use age_crypto::AgeRecipientCrypto;
pub use bot_api_http::{BotApiConfig, HttpBotApi};
pub use dialoguer_prompter::DialoguerPrompter;
pub use line_prompter::LinePrompter;
pub use process_runner::ProcessRunner;
pub use tracing_logger::TracingLogger;
