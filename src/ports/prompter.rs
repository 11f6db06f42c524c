use crate::domain::AppError;
use crate::domain::install_decisions::CronTime;

/// Prompt primitives shared by the line-based and the interactive front-ends.
///
/// Every method returns `AppError::UserAborted` when the operator cancels or
/// input is closed.
pub trait Prompter {
    /// Ask a yes/no question.
    fn yes_no(&mut self, question: &str, default: bool) -> Result<bool, AppError>;

    /// Ask for a value that is non-empty after sanitizing.
    fn non_empty(&mut self, question: &str, default: Option<&str>) -> Result<String, AppError>;

    /// Pick one of `options`, returning its index.
    fn choice(&mut self, question: &str, options: &[&str], default: usize)
    -> Result<usize, AppError>;

    /// Ask for a daily `HH:MM` time; blank input yields `default`.
    fn hhmm(&mut self, question: &str, default: CronTime) -> Result<CronTime, AppError>;

    /// Ask for a secret without echoing it where the front-end can.
    fn secret(&mut self, question: &str) -> Result<String, AppError>;

    /// Show an informational line.
    fn note(&mut self, message: &str);
}
