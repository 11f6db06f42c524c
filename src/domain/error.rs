use std::io;

use thiserror::Error;

/// Library-wide error type for proxsave installer operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure on a config, recipient or identity file.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The operator cancelled a prompt, closed stdin, or declined to continue.
    #[error("installation aborted by user")]
    UserAborted,

    /// A required field is missing or invalid after the wizard ran.
    #[error("invalid configuration: {0}")]
    ConfigValidation(String),

    /// The configuration file the command needs does not exist.
    #[error("missing configuration file: {}", path.display())]
    MissingConfig { path: std::path::PathBuf },

    /// A prompt front-end failed for a reason other than cancellation.
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// A recipient string, passphrase or private key was rejected.
    #[error("{0}")]
    Recipient(String),

    /// A child process could not be launched or waited on.
    #[error("failed to run '{command}': {details}")]
    ChildProcess { command: String, details: String },

    /// The notification bot could not be reached or answered unexpectedly.
    #[error("pairing check failed: {message}")]
    RemotePairing { message: String, status: Option<u16> },
}

impl AppError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::ConfigValidation(message.into())
    }

    pub fn recipient<S: Into<String>>(message: S) -> Self {
        AppError::Recipient(message.into())
    }

    /// True when the error means "the operator walked away", not "something broke".
    pub fn is_user_abort(&self) -> bool {
        matches!(self, AppError::UserAborted)
    }

    /// Classify an I/O error raised while reading a prompt answer.
    ///
    /// End-of-file, a closed pipe, an interrupted read and a bad descriptor all
    /// mean there is nobody left to answer, so they become `UserAborted`.
    pub fn from_prompt_io(err: io::Error) -> Self {
        if is_closed_input(&err) { AppError::UserAborted } else { AppError::Prompt(err.to_string()) }
    }
}

fn is_closed_input(err: &io::Error) -> bool {
    match err.kind() {
        io::ErrorKind::UnexpectedEof | io::ErrorKind::BrokenPipe | io::ErrorKind::Interrupted => {
            true
        }
        _ => err.raw_os_error() == Some(libc::EBADF),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_stdin_maps_to_user_abort() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert!(AppError::from_prompt_io(eof).is_user_abort());

        let bad_fd = io::Error::from_raw_os_error(libc::EBADF);
        assert!(AppError::from_prompt_io(bad_fd).is_user_abort());
    }

    #[test]
    fn other_prompt_failures_are_not_aborts() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = AppError::from_prompt_io(denied);
        assert!(!err.is_user_abort());
        assert!(err.to_string().contains("prompt failed"));
    }
}
