//! Extraction of "set KEY=false" hints from a dry-run transcript.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::env_template;
use crate::domain::template_derivation::parse_bool;

pub const SUMMARY_HEADER: &str = "WARNINGS/ERRORS DURING RUN";
const COLLECTOR_PREFIX: &str = "BACKUP_";

/// One collector toggle the dry-run suggests switching off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSuggestion {
    pub key: String,
    pub messages: BTreeSet<String>,
}

fn disable_hint() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bset\s+([A-Z0-9_]+)=false\b").expect("valid hint regex"))
}

fn ansi_sgr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid SGR regex"))
}

pub fn strip_ansi(line: &str) -> String {
    ansi_sgr().replace_all(line, "").into_owned()
}

fn is_separator(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c == '=')
}

/// Issue lines of a dry-run transcript.
///
/// Lines of the summary block when one is present, otherwise every line that
/// carries a disable hint.
pub fn issue_lines(output: &str) -> Vec<String> {
    let lines: Vec<String> = output.lines().map(strip_ansi).collect();

    if let Some(start) = lines.iter().position(|line| line.contains(SUMMARY_HEADER)) {
        return lines[start + 1..]
            .iter()
            .take_while(|line| !is_separator(line))
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
    }

    lines
        .into_iter()
        .filter(|line| disable_hint().is_match(line))
        .map(|line| line.trim().to_string())
        .collect()
}

/// Keys named by `set KEY=false` hints in one line, uppercased.
pub fn hinted_keys(line: &str) -> Vec<String> {
    disable_hint().captures_iter(line).map(|caps| caps[1].to_ascii_uppercase()).collect()
}

/// Group hints into suggestions for toggles that are known and currently on.
pub fn collect_suggestions(
    output: &str,
    known_keys: &BTreeSet<String>,
    current_config: &str,
) -> Vec<AuditSuggestion> {
    let current = env_template::parse(current_config);
    let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for line in issue_lines(output) {
        for key in hinted_keys(&line) {
            let enabled = current.get(&key).is_some_and(|value| parse_bool(value));
            if key.starts_with(COLLECTOR_PREFIX) && known_keys.contains(&key) && enabled {
                grouped.entry(key).or_default().insert(line.clone());
            }
        }
    }

    grouped.into_iter().map(|(key, messages)| AuditSuggestion { key, messages }).collect()
}

/// Set every selected key to `false`.
pub fn apply_suggestions(template: &str, keys: &[String]) -> String {
    keys.iter().fold(template.to_string(), |out, key| env_template::set(&out, key, "false"))
}
