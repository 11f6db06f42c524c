use std::sync::Mutex;

use crate::ports::Logger;

/// Logger that keeps every line for assertions.
#[derive(Default)]
pub struct MemoryLogger {
    pub lines: Mutex<Vec<(&'static str, String)>>,
}

#[allow(dead_code)]
impl MemoryLogger {
    fn push(&self, level: &'static str, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at_level("warning")
    }

    pub fn errors(&self) -> Vec<String> {
        self.at_level("error")
    }

    pub fn at_level(&self, level: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn debug(&self, message: &str) {
        self.push("debug", message);
    }

    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn warning(&self, message: &str) {
        self.push("warning", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }
}
