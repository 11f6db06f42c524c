//! Dry-run command implementation.

use crate::app::api;

/// Print the preflight report; 1 on findings, 2 when the config cannot be read.
pub fn run_dry_run(config: Option<&str>) -> i32 {
    match api::dry_run(config) {
        Ok(outcome) => {
            print!("{}", outcome.report);
            outcome.exit_code()
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    }
}
