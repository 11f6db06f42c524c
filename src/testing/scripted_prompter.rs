use std::collections::VecDeque;

use crate::domain::AppError;
use crate::domain::install_decisions::CronTime;
use crate::ports::Prompter;

/// One canned answer. Running out of answers behaves like closed stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Answer {
    Yes,
    No,
    /// Accept whatever default the prompt offers.
    Default,
    Text(String),
    Choice(usize),
    Abort,
}

#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub questions: Vec<String>,
    pub notes: Vec<String>,
}

#[allow(dead_code)]
impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self { answers: answers.into_iter().collect(), ..Self::default() }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, question: &str) -> Result<Answer, AppError> {
        self.questions.push(question.to_string());
        match self.answers.pop_front() {
            None | Some(Answer::Abort) => Err(AppError::UserAborted),
            Some(answer) => Ok(answer),
        }
    }

    fn unexpected(question: &str, answer: &Answer) -> AppError {
        AppError::Prompt(format!("scripted answer {:?} does not fit '{}'", answer, question))
    }
}

impl Prompter for ScriptedPrompter {
    fn yes_no(&mut self, question: &str, default: bool) -> Result<bool, AppError> {
        match self.next(question)? {
            Answer::Yes => Ok(true),
            Answer::No => Ok(false),
            Answer::Default => Ok(default),
            other => Err(Self::unexpected(question, &other)),
        }
    }

    fn non_empty(&mut self, question: &str, default: Option<&str>) -> Result<String, AppError> {
        match self.next(question)? {
            Answer::Text(value) => Ok(value),
            Answer::Default => {
                default.map(str::to_string).ok_or_else(|| Self::unexpected(question, &Answer::Default))
            }
            other => Err(Self::unexpected(question, &other)),
        }
    }

    fn choice(
        &mut self,
        question: &str,
        options: &[&str],
        default: usize,
    ) -> Result<usize, AppError> {
        match self.next(question)? {
            Answer::Choice(index) if index < options.len() => Ok(index),
            Answer::Default => Ok(default),
            other => Err(Self::unexpected(question, &other)),
        }
    }

    fn hhmm(&mut self, question: &str, default: CronTime) -> Result<CronTime, AppError> {
        match self.next(question)? {
            Answer::Default => Ok(default),
            Answer::Text(raw) => Ok(CronTime::parse(&raw)?.unwrap_or(default)),
            other => Err(Self::unexpected(question, &other)),
        }
    }

    fn secret(&mut self, question: &str) -> Result<String, AppError> {
        match self.next(question)? {
            Answer::Text(value) => Ok(value),
            other => Err(Self::unexpected(question, &other)),
        }
    }

    fn note(&mut self, message: &str) {
        self.notes.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_answer_needs_an_offered_default() {
        let mut prompter = ScriptedPrompter::new([Answer::Default, Answer::Default]);
        assert_eq!(prompter.non_empty("Path", Some("/mnt/x")).unwrap(), "/mnt/x");
        assert!(matches!(prompter.non_empty("Remote", None), Err(AppError::Prompt(_))));
    }
}
