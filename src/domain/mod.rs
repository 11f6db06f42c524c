pub mod audit;
pub mod backup_config;
pub mod config_applier;
pub mod cron;
pub mod env_template;
pub mod error;
pub mod exec_info;
pub mod format;
pub mod install_decisions;
pub mod layout;
pub mod pairing;
pub mod preflight;
pub mod recipient;
pub mod server_identity;
pub mod template_derivation;

pub use error::AppError;
pub use exec_info::ExecInfo;
pub use install_decisions::{
    CloudDecision, CronTime, InstallDecisions, NotificationMode, SecondaryDecision, TriState,
};
pub use layout::{APP_NAME, DEFAULT_BASE_DIR, InstallLayout};
