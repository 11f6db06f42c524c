//! Locating, checking and writing the installation's configuration file.
//!
//! Pure template editing lives in `domain::env_template` and
//! `domain::config_applier`.

mod resolve_config;
mod write_config;

pub use resolve_config::{detect_base_dir, ensure_config_exists, resolve_install_config_path};
pub use write_config::{backup_existing_config, write_config_atomic, write_private_file};
