//! Child-process adapter with stdin feeding and a hard timeout.

use std::io::{ErrorKind, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::domain::AppError;
use crate::ports::{CommandOutput, CommandRunner, CommandSpec};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

fn launch_error(spec: &CommandSpec<'_>, err: impl std::fmt::Display) -> AppError {
    AppError::ChildProcess { command: spec.display(), details: err.to_string() }
}

fn drain<R: Read + Send + 'static>(reader: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut reader) = reader {
            let _ = reader.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Stdin goes through its own thread so a child that writes before it reads
/// cannot block us.
fn feed(stdin: Option<ChildStdin>, input: Option<&str>) -> thread::JoinHandle<std::io::Result<()>> {
    let payload = input.map(|text| text.as_bytes().to_vec());
    thread::spawn(move || match (stdin, payload) {
        (Some(mut stdin), Some(payload)) => stdin.write_all(&payload),
        _ => Ok(()),
    })
}

fn wait_with_deadline(child: &mut Child, timeout: Option<Duration>) -> std::io::Result<(Option<i32>, bool)> {
    let Some(timeout) = timeout else {
        return Ok((child.wait()?.code(), false));
    };
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status.code(), false));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok((None, true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec<'_>) -> Result<CommandOutput, AppError> {
        let mut command = Command::new(spec.program);
        command
            .args(spec.args)
            .stdin(if spec.stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|e| launch_error(spec, e))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let writer = feed(child.stdin.take(), spec.stdin);

        let (status, timed_out) = match wait_with_deadline(&mut child, spec.timeout) {
            Ok(result) => result,
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(launch_error(spec, err));
            }
        };
        // The child is reaped, so its pipe ends are closed and every thread finishes.
        let written = writer.join().unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();
        if let Err(err) = written
            && !timed_out
            && err.kind() != ErrorKind::BrokenPipe
        {
            return Err(launch_error(spec, format!("writing stdin failed: {}", err)));
        }

        Ok(CommandOutput { status, stdout, stderr, timed_out })
    }
}
