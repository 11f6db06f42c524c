//! proxsave: installer and configuration wizard for Proxmox backups.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    DryRunOutcome, InstallOptions, InstallReport, WizardMode, create_context, dry_run, install,
    newkey,
};
pub use domain::AppError;
