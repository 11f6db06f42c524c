use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::{CommandOutput, CommandRunner, CommandSpec};

/// Recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

/// In-memory stand-in for `crontab`, `chattr` and the dry-run binary.
#[derive(Default)]
pub struct FakeCommandRunner {
    pub crontab: Mutex<Option<String>>,
    pub dry_run_output: Mutex<Option<CommandOutput>>,
    pub fail_launch: Mutex<bool>,
    pub calls: Mutex<Vec<RecordedCommand>>,
}

#[allow(dead_code)]
impl FakeCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crontab(self, content: &str) -> Self {
        *self.crontab.lock().unwrap() = Some(content.to_string());
        self
    }

    pub fn with_dry_run_output(self, output: CommandOutput) -> Self {
        *self.dry_run_output.lock().unwrap() = Some(output);
        self
    }

    pub fn failing_launch(self) -> Self {
        *self.fail_launch.lock().unwrap() = true;
        self
    }

    pub fn current_crontab(&self) -> Option<String> {
        self.crontab.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<RecordedCommand> {
        self.calls().into_iter().filter(|c| c.program == program).collect()
    }
}

impl CommandRunner for FakeCommandRunner {
    fn run(&self, spec: &CommandSpec<'_>) -> Result<CommandOutput, AppError> {
        self.calls.lock().unwrap().push(RecordedCommand {
            program: spec.program.to_string(),
            args: spec.args.iter().map(|a| a.to_string()).collect(),
            stdin: spec.stdin.map(str::to_string),
        });

        if *self.fail_launch.lock().unwrap() {
            return Err(AppError::ChildProcess {
                command: spec.display(),
                details: "No such file or directory (os error 2)".into(),
            });
        }

        match (spec.program, spec.args) {
            ("crontab", ["-l"]) => Ok(match self.crontab.lock().unwrap().clone() {
                Some(content) => CommandOutput { status: Some(0), stdout: content, ..Default::default() },
                None => CommandOutput {
                    status: Some(1),
                    stderr: "no crontab for root\n".into(),
                    ..Default::default()
                },
            }),
            ("crontab", ["-"]) => {
                *self.crontab.lock().unwrap() = Some(spec.stdin.unwrap_or_default().to_string());
                Ok(CommandOutput { status: Some(0), ..Default::default() })
            }
            ("chattr", _) => Ok(CommandOutput { status: Some(0), ..Default::default() }),
            _ => Ok(self
                .dry_run_output
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(CommandOutput { status: Some(0), ..Default::default() })),
        }
    }
}
