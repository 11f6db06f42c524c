//! Line-oriented `KEY=VALUE` template editing.
//!
//! Edits touch only the assignment they target. Comments, blank lines, ordering
//! and the spacing of every other line survive byte-for-byte.

use std::collections::BTreeMap;

/// A parsed view of one assignment line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Assignment<'a> {
    key: &'a str,
    /// Everything up to and including the first `=`.
    head: &'a str,
    /// Raw value text between `=` and the trailing comment (untrimmed).
    value: &'a str,
    /// Whitespace plus `# comment` that followed the value, if any.
    comment: &'a str,
}

fn parse_assignment(line: &str) -> Option<Assignment<'_>> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let eq = line.find('=')?;
    let left = line[..eq].trim();
    let key = match left.strip_prefix("export") {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => left,
    };
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let rest = &line[eq + 1..];
    let split = trailing_comment_start(rest).unwrap_or(rest.len());
    let (value, comment) = rest.split_at(split);
    Some(Assignment { key, head: &line[..=eq], value, comment })
}

/// Byte offset where the trailing comment (including its leading whitespace) begins.
fn trailing_comment_start(rest: &str) -> Option<usize> {
    let mut in_single = false;
    let mut in_double = false;
    let mut prev_ws = false;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '#' if prev_ws && !in_single && !in_double => {
                let start = rest[..idx].trim_end_matches([' ', '\t']).len();
                return Some(start);
            }
            _ => {}
        }
        prev_ws = ch == ' ' || ch == '\t';
    }
    None
}

/// Split into `(content, terminator)` pairs, keeping `\n` / `\r\n` intact.
fn lines_with_endings(template: &str) -> impl Iterator<Item = (&str, &str)> {
    template.split_inclusive('\n').map(|raw| {
        if let Some(body) = raw.strip_suffix("\r\n") {
            (body, "\r\n")
        } else if let Some(body) = raw.strip_suffix('\n') {
            (body, "\n")
        } else {
            (raw, "")
        }
    })
}

/// Rewrite the first assignment of `key`, or append `KEY=VALUE` when absent.
///
/// The value is written verbatim; run it through [`sanitize_value`] first.
pub fn set(template: &str, key: &str, value: &str) -> String {
    let mut out = String::with_capacity(template.len() + key.len() + value.len() + 2);
    let mut replaced = false;

    for (line, ending) in lines_with_endings(template) {
        match parse_assignment(line) {
            Some(assignment) if !replaced && assignment.key == key => {
                out.push_str(assignment.head);
                out.push_str(value);
                out.push_str(assignment.comment);
                replaced = true;
            }
            _ => out.push_str(line),
        }
        out.push_str(ending);
    }

    if !replaced {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }

    out
}

/// Drop every assignment whose key matches `key` case-insensitively.
pub fn unset(template: &str, key: &str) -> String {
    let mut out = String::with_capacity(template.len());
    for (line, ending) in lines_with_endings(template) {
        if let Some(assignment) = parse_assignment(line)
            && assignment.key.eq_ignore_ascii_case(key)
        {
            continue;
        }
        out.push_str(line);
        out.push_str(ending);
    }
    out
}

/// Collect `UPPERCASE_KEY -> trimmed value`; later duplicates win.
pub fn parse(template: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    for (line, _) in lines_with_endings(template) {
        if let Some(assignment) = parse_assignment(line) {
            values.insert(assignment.key.to_ascii_uppercase(), assignment.value.trim().to_string());
        }
    }
    values
}

/// Strip newline, carriage return and NUL characters, then trim.
pub fn sanitize_value(value: &str) -> String {
    let cleaned: String = value.chars().filter(|c| !matches!(c, '\n' | '\r' | '\0')).collect();
    cleaned.trim().to_string()
}

/// Set a key after sanitizing its value.
pub fn set_sanitized(template: &str, key: &str, value: &str) -> String {
    set(template, key, &sanitize_value(value))
}

/// Whether the template carries an assignment for `key` at all.
pub fn contains_key(template: &str, key: &str) -> bool {
    lines_with_endings(template)
        .filter_map(|(line, _)| parse_assignment(line))
        .any(|assignment| assignment.key.eq_ignore_ascii_case(key))
}

/// Remove matching surrounding quotes from a parsed value.
pub fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && ((bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\''))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = concat!(
        "# proxsave configuration\n",
        "\n",
        "SECONDARY_ENABLED=false   # copy to a second disk\n",
        "  export CLOUD_REMOTE=gdrive:backups\n",
        "FOO=1\n",
        "FOO_BAR=2\n",
    );

    #[test]
    fn set_rewrites_value_and_keeps_trailing_comment() {
        let out = set(SAMPLE, "SECONDARY_ENABLED", "true");
        assert!(out.contains("SECONDARY_ENABLED=true   # copy to a second disk\n"));
        assert_eq!(out.lines().count(), SAMPLE.lines().count());
    }

    #[test]
    fn set_keeps_indentation_and_export_prefix() {
        let out = set(SAMPLE, "CLOUD_REMOTE", "s3:bucket");
        assert!(out.contains("  export CLOUD_REMOTE=s3:bucket\n"));
    }

    #[test]
    fn set_never_matches_a_key_prefix() {
        let out = set(SAMPLE, "FOO", "9");
        assert!(out.contains("FOO=9\n"));
        assert!(out.contains("FOO_BAR=2\n"));

        let out = set("FOO_BAR=2\n", "FOO", "9");
        assert_eq!(out, "FOO_BAR=2\nFOO=9\n");
    }

    #[test]
    fn set_appends_with_missing_trailing_newline() {
        assert_eq!(set("A=1", "B", "2"), "A=1\nB=2\n");
        assert_eq!(set("", "B", "2"), "B=2\n");
    }

    #[test]
    fn set_only_rewrites_first_occurrence() {
        let out = set("A=1\nA=2\n", "A", "3");
        assert_eq!(out, "A=3\nA=2\n");
    }

    #[test]
    fn values_may_contain_equals_signs() {
        let parsed = parse("OPTS=--a=b --c=d\n");
        assert_eq!(parsed["OPTS"], "--a=b --c=d");
    }

    #[test]
    fn hash_without_leading_space_is_part_of_value() {
        let parsed = parse("URL=http://host/#frag\nQUOTED=\"a # b\" # note\n");
        assert_eq!(parsed["URL"], "http://host/#frag");
        assert_eq!(parsed["QUOTED"], "\"a # b\"");
    }

    #[test]
    fn unset_is_case_insensitive_and_exact() {
        let out = unset(SAMPLE, "foo");
        assert!(!out.contains("FOO=1"));
        assert!(out.contains("FOO_BAR=2"));
        assert!(out.starts_with("# proxsave configuration\n\n"));
    }

    #[test]
    fn parse_uppercases_keys_and_last_duplicate_wins() {
        let parsed = parse("export lower=x\nA= 1 \nA=2\n# B=3\n");
        assert_eq!(parsed["LOWER"], "x");
        assert_eq!(parsed["A"], "2");
        assert!(!parsed.contains_key("B"));
    }

    #[test]
    fn crlf_lines_survive_edits() {
        let out = set("A=1\r\nB=2\r\n", "A", "3");
        assert_eq!(out, "A=3\r\nB=2\r\n");
    }

    #[test]
    fn sanitize_removes_control_characters() {
        assert_eq!(sanitize_value("  /mnt/a\nEVIL=1\r\0 "), "/mnt/aEVIL=1");
    }

    #[test]
    fn unquote_strips_matching_quotes_only() {
        assert_eq!(unquote("\"x\""), "x");
        assert_eq!(unquote("'x'"), "x");
        assert_eq!(unquote("\"x'"), "\"x'");
    }

    fn key_strategy() -> impl Strategy<Value = String> {
        "[A-Z][A-Z0-9_]{0,12}"
    }

    fn value_strategy() -> impl Strategy<Value = String> {
        "[ -\"$-~]{0,24}"
    }

    fn template_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec((key_strategy(), value_strategy()), 0..8)
    }

    fn render(entries: &[(String, String)]) -> String {
        let mut out = String::from("# header\n\n");
        for (key, value) in entries {
            out.push_str(&format!("{}={}\n# after {}\n", key, value, key));
        }
        out
    }

    proptest! {
        #[test]
        fn set_then_parse_round_trips(entries in template_strategy(), key in key_strategy(), value in value_strategy()) {
            let mut entries = entries;
            entries.retain(|(k, _)| k != &key);
            entries.push((key.clone(), "old".to_string()));
            let template = render(&entries);

            let out = set_sanitized(&template, &key, &value);
            prop_assert_eq!(parse(&out).get(&key).cloned(), Some(sanitize_value(&value)));

            let before: Vec<&str> = template.lines().collect();
            let after: Vec<&str> = out.lines().collect();
            prop_assert_eq!(before.len(), after.len());
            for (old, new) in before.iter().zip(after.iter()) {
                if !old.starts_with(&format!("{}=", key)) {
                    prop_assert_eq!(old, new);
                }
            }
        }

        #[test]
        fn set_twice_leaves_single_assignment(entries in template_strategy(), key in key_strategy(), v1 in value_strategy(), v2 in value_strategy()) {
            let template = render(&entries);
            let v2 = sanitize_value(&v2);
            let once = set(&template, &key, &sanitize_value(&v1));
            let twice = set(&once, &key, &v2);
            let count = twice
                .lines()
                .filter(|line| parse_assignment(line).is_some_and(|a| a.key == key))
                .count();
            let expected = entries.iter().filter(|(k, _)| k == &key).count().max(1);
            prop_assert_eq!(count, expected);
            let assignment = format!("{}={}", key, v2);
            prop_assert!(twice.lines().any(|line| line == assignment));
        }

        #[test]
        fn trailing_comment_is_retained(key in key_strategy(), value in "[A-Za-z0-9/_.-]{0,16}") {
            let template = format!("{}=x  # keep me\n", key);
            let out = set(&template, &key, &value);
            prop_assert!(out.contains("# keep me"));
        }
    }
}
