use std::time::Duration;

use crate::domain::AppError;

/// Captured result of a finished (or killed) child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal or the timeout.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout followed by stderr, the way an operator would see them.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !out.is_empty() && !out.ends_with('\n') && !self.stderr.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.stderr);
        out
    }
}

/// A single process invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandSpec<'a> {
    pub program: &'a str,
    pub args: &'a [&'a str],
    pub stdin: Option<&'a str>,
    pub timeout: Option<Duration>,
}

impl<'a> CommandSpec<'a> {
    pub fn new(program: &'a str, args: &'a [&'a str]) -> Self {
        Self { program, args, stdin: None, timeout: None }
    }

    pub fn with_stdin(mut self, stdin: &'a str) -> Self {
        self.stdin = Some(stdin);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.to_string()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Port for launching external programs (`crontab`, `chattr`, the dry-run binary).
///
/// A non-zero exit is reported through `CommandOutput::status`, not as an error;
/// only a failure to launch or wait returns `AppError::ChildProcess`.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec<'_>) -> Result<CommandOutput, AppError>;
}
