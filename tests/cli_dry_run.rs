mod common;

use common::TestContext;
use predicates::prelude::*;

#[test]
fn clean_config_exits_zero() {
    let ctx = TestContext::new();
    ctx.write_config("ENCRYPT_ARCHIVE=false\n");

    ctx.cli()
        .args(["--dry-run", "--config", &ctx.config_arg()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found."));
}

#[test]
fn missing_recipient_is_reported() {
    let ctx = TestContext::new();
    let missing = ctx.base_dir().join("nowhere/recipient.txt");
    ctx.write_config(&format!("ENCRYPT_ARCHIVE=true\nAGE_RECIPIENT_FILE={}\n", missing.display()));

    ctx.cli()
        .args(["--dry-run", "--log-level", "warning", "--config", &ctx.config_arg()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("=== WARNINGS/ERRORS DURING RUN ==="))
        .stdout(predicate::str::contains("no recipient file"));
}

#[test]
fn missing_config_exits_two() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["--dry-run", "--config", &ctx.config_arg()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing configuration file"));
}
