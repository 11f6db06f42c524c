use std::collections::BTreeSet;
use std::sync::OnceLock;

use include_dir::{Dir, include_dir};

use crate::domain::env_template;

static TEMPLATES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/templates");

const DEFAULT_TEMPLATE_FILE: &str = "backup.env";

/// The shipped `backup.env`, the canonical list of recognised keys.
pub fn default_template() -> &'static str {
    TEMPLATES_DIR
        .get_file(DEFAULT_TEMPLATE_FILE)
        .and_then(|file| file.contents_utf8())
        .unwrap_or_default()
}

/// Uppercased keys assigned anywhere in the shipped template.
pub fn default_template_keys() -> &'static BTreeSet<String> {
    static KEYS: OnceLock<BTreeSet<String>> = OnceLock::new();
    KEYS.get_or_init(|| env_template::parse(default_template()).into_keys().collect())
}
