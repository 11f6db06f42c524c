mod fake_bot_api;
mod fake_command_runner;
mod fake_recipient_crypto;
mod memory_logger;
mod sandbox;
mod scripted_prompter;

#[allow(unused_imports)]
pub use fake_bot_api::FakeBotApi;
#[allow(unused_imports)]
pub use fake_command_runner::{FakeCommandRunner, RecordedCommand};
#[allow(unused_imports)]
pub use fake_recipient_crypto::FakeRecipientCrypto;
#[allow(unused_imports)]
pub use memory_logger::MemoryLogger;
#[allow(unused_imports)]
pub use scripted_prompter::{Answer, ScriptedPrompter};
#[allow(unused_imports)]
pub use sandbox::Sandbox;
