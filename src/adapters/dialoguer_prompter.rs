//! Interactive form front-end built on dialoguer widgets.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Error as DialoguerError, Input, Password, Select};

use crate::domain::AppError;
use crate::domain::env_template::sanitize_value;
use crate::domain::install_decisions::CronTime;
use crate::ports::Prompter;

pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self { theme: ColorfulTheme::default() }
    }
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn map_err(err: DialoguerError) -> AppError {
    match err {
        DialoguerError::IO(io_err) => AppError::from_prompt_io(io_err),
    }
}

fn cancelled<T>(value: Option<T>) -> Result<T, AppError> {
    value.ok_or(AppError::UserAborted)
}

impl Prompter for DialoguerPrompter {
    fn yes_no(&mut self, question: &str, default: bool) -> Result<bool, AppError> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(default)
            .interact_opt()
            .map_err(map_err)?;
        cancelled(answer)
    }

    fn non_empty(&mut self, question: &str, default: Option<&str>) -> Result<String, AppError> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(question);
        if let Some(value) = default.filter(|value| !value.is_empty()) {
            input = input.default(value.to_string());
        }
        let answer = input
            .validate_with(|value: &String| -> Result<(), &str> {
                if sanitize_value(value).is_empty() { Err("a value is required") } else { Ok(()) }
            })
            .interact_text()
            .map_err(map_err)?;
        Ok(sanitize_value(&answer))
    }

    fn choice(
        &mut self,
        question: &str,
        options: &[&str],
        default: usize,
    ) -> Result<usize, AppError> {
        let answer = Select::with_theme(&self.theme)
            .with_prompt(question)
            .items(options)
            .default(default)
            .interact_opt()
            .map_err(map_err)?;
        cancelled(answer)
    }

    fn hhmm(&mut self, question: &str, default: CronTime) -> Result<CronTime, AppError> {
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(question)
            .default(default.to_string())
            .validate_with(|value: &String| -> Result<(), String> {
                CronTime::parse(value).map(|_| ()).map_err(|err| err.to_string())
            })
            .interact_text()
            .map_err(map_err)?;
        Ok(CronTime::parse(&answer)?.unwrap_or(default))
    }

    fn secret(&mut self, question: &str) -> Result<String, AppError> {
        Password::with_theme(&self.theme)
            .with_prompt(question)
            .allow_empty_password(true)
            .interact()
            .map_err(map_err)
    }

    fn note(&mut self, message: &str) {
        println!("{}", message);
    }
}
