mod bot_api;
mod command_runner;
mod logger;
mod prompter;
mod recipient_crypto;

pub use bot_api::{BotApi, RegistrationProbe};
pub use command_runner::{CommandOutput, CommandRunner, CommandSpec};
pub use logger::Logger;
pub use prompter::Prompter;
pub use recipient_crypto::RecipientCrypto;
