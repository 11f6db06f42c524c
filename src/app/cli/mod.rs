//! CLI Adapter.

mod dry_run;
pub mod footer;
mod install;

use clap::{ArgGroup, CommandFactory, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::api::WizardMode;

#[derive(Parser)]
#[command(name = "proxsave")]
#[command(version)]
#[command(about = "Install and configure proxsave backups on a Proxmox host", long_about = None)]
#[command(group(ArgGroup::new("mode").args(["install", "new_install", "newkey", "dry_run"])))]
struct Cli {
    /// Run the install wizard; asks before touching an existing config
    #[arg(long)]
    install: bool,
    /// Reset the installation directory (keeps env/, identity/, build/) and install
    #[arg(long)]
    new_install: bool,
    /// Replace the archive encryption recipients
    #[arg(long)]
    newkey: bool,
    /// Check the configuration against this host without backing anything up
    #[arg(long)]
    dry_run: bool,
    /// Use plain line prompts instead of interactive widgets
    #[arg(long)]
    cli: bool,
    /// Configuration file (default: <base>/env/backup.env)
    #[arg(long, value_name = "PATH")]
    config: Option<String>,
    /// Log verbosity; RUST_LOG takes precedence when set
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let mode = if cli.cli { WizardMode::Cli } else { WizardMode::Interactive };
    let config = cli.config.as_deref();

    let exit_code = if cli.install {
        install::run_install(config, mode, false)
    } else if cli.new_install {
        install::run_install(config, mode, true)
    } else if cli.newkey {
        install::run_newkey(config, mode)
    } else if cli.dry_run {
        dry_run::run_dry_run(config)
    } else {
        let _ = Cli::command().print_help();
        println!();
        0
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_flags_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["proxsave", "--install", "--newkey"]).is_err());
        assert!(Cli::try_parse_from(["proxsave", "--dry-run", "--new-install"]).is_err());
    }

    #[test]
    fn install_with_cli_and_config() {
        let cli = Cli::try_parse_from(["proxsave", "--install", "--cli", "--config", "/srv/env/backup.env"]).unwrap();
        assert!(cli.install && cli.cli);
        assert_eq!(cli.config.as_deref(), Some("/srv/env/backup.env"));
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn warning_level_maps_to_tracing_warn() {
        let cli = Cli::try_parse_from(["proxsave", "--dry-run", "--log-level", "warning"]).unwrap();
        assert_eq!(cli.log_level.directive(), "warn");
        assert!(Cli::try_parse_from(["proxsave", "--log-level", "verbose"]).is_err());
    }

    #[test]
    fn clap_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
