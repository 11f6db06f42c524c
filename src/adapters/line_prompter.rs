//! Plain line-based prompts (`--cli`), usable with piped stdin.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Password;

use crate::adapters::dialoguer_prompter::map_err;
use crate::domain::AppError;
use crate::domain::env_template::sanitize_value;
use crate::domain::install_decisions::CronTime;
use crate::ports::Prompter;

pub struct LinePrompter<R: BufRead, W: Write> {
    input: R,
    output: W,
    /// Read secrets from the terminal with echo off instead of from `input`.
    hide_secrets: bool,
}

impl LinePrompter<io::StdinLock<'static>, io::Stdout> {
    /// Secrets are read without echo when stdin is a terminal; piped input is
    /// read as plain lines.
    pub fn stdio() -> Self {
        let hide_secrets = io::stdin().is_terminal();
        Self::new(io::stdin().lock(), io::stdout()).with_hidden_secrets(hide_secrets)
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output, hide_secrets: false }
    }

    pub fn with_hidden_secrets(mut self, hide_secrets: bool) -> Self {
        self.hide_secrets = hide_secrets;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.output, "{}", prompt).map_err(AppError::from_prompt_io)?;
        self.output.flush().map_err(AppError::from_prompt_io)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(AppError::from_prompt_io)?;
        if read == 0 {
            return Err(AppError::UserAborted);
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn say(&mut self, message: &str) {
        let _ = writeln!(self.output, "{}", message);
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn yes_no(&mut self, question: &str, default: bool) -> Result<bool, AppError> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.ask(&format!("{} {}: ", question, hint))?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer 'y' or 'n'."),
            }
        }
    }

    fn non_empty(&mut self, question: &str, default: Option<&str>) -> Result<String, AppError> {
        let prompt = match default {
            Some(value) if !value.is_empty() => format!("{} [{}]: ", question, value),
            _ => format!("{}: ", question),
        };
        loop {
            let answer = sanitize_value(&self.ask(&prompt)?);
            if !answer.is_empty() {
                return Ok(answer);
            }
            if let Some(value) = default.filter(|value| !value.is_empty()) {
                return Ok(value.to_string());
            }
            self.say("A value is required.");
        }
    }

    fn choice(
        &mut self,
        question: &str,
        options: &[&str],
        default: usize,
    ) -> Result<usize, AppError> {
        self.say(question);
        for (index, option) in options.iter().enumerate() {
            self.say(&format!("  [{}] {}", index + 1, option));
        }
        loop {
            let answer = self.ask(&format!("Choice [{}]: ", default + 1))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => self.say(&format!("Enter a number between 1 and {}.", options.len())),
            }
        }
    }

    fn hhmm(&mut self, question: &str, default: CronTime) -> Result<CronTime, AppError> {
        loop {
            let answer = self.ask(&format!("{} [{}]: ", question, default))?;
            match CronTime::parse(&answer) {
                Ok(Some(time)) => return Ok(time),
                Ok(None) => return Ok(default),
                Err(err) => self.say(&format!("{}; use HH:MM between 00:00 and 23:59.", err)),
            }
        }
    }

    fn secret(&mut self, question: &str) -> Result<String, AppError> {
        if self.hide_secrets {
            let answer =
                Password::new().with_prompt(question).allow_empty_password(true).interact().map_err(map_err)?;
            return Ok(answer.trim().to_string());
        }
        let answer = self.ask(&format!("{}: ", question))?;
        Ok(answer.trim().to_string())
    }

    fn note(&mut self, message: &str) {
        self.say(message);
    }
}
