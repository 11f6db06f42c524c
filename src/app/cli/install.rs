//! Install and newkey command implementations.

use crate::app::api::{self, InstallOptions, WizardMode};
use crate::app::cli::footer::{self, FooterSummary};

pub fn run_install(config: Option<&str>, mode: WizardMode, reset: bool) -> i32 {
    let result = api::install(config, InstallOptions { mode, reset }).map(|(ctx, report)| {
        let exec = ctx.exec();
        FooterSummary::from_install(&report, exec.is_known().then(|| exec.exec_path.clone()))
    });
    footer::finish(result)
}

pub fn run_newkey(config: Option<&str>, mode: WizardMode) -> i32 {
    let result = api::newkey(config, mode).map(|(path, recipients)| FooterSummary {
        title: "Encryption recipients updated".to_string(),
        notes: vec![format!("{} recipient(s) written to {}", recipients.len(), path.display())],
        ..FooterSummary::default()
    });
    footer::finish(result)
}
