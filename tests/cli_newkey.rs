mod common;

use common::TestContext;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;

#[test]
fn cancel_leaves_recipient_file_untouched() {
    let ctx = TestContext::new();
    let original = "age1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq\n";
    ctx.write(&ctx.recipient_path(), original);

    ctx.cli()
        .args(["--newkey", "--cli", "--config", &ctx.config_arg()])
        .write_stdin("2\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("aborted"));

    assert_eq!(fs::read_to_string(ctx.recipient_path()).unwrap(), original);
}

#[test]
fn overwrite_with_passphrase_writes_derived_recipient() {
    let ctx = TestContext::new();
    ctx.write(&ctx.recipient_path(), "age1old\n");

    ctx.cli()
        .args(["--newkey", "--cli", "--config", &ctx.config_arg()])
        .write_stdin("1\n2\ncorrect horse battery\ncorrect horse battery\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encryption recipients updated"));

    let content = fs::read_to_string(ctx.recipient_path()).unwrap();
    assert!(content.starts_with("age1"));
    assert!(content.ends_with('\n'));
    assert_eq!(content.lines().count(), 1);
    assert_ne!(content, "age1old\n");

    let mode = fs::metadata(ctx.recipient_path()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn same_passphrase_gives_same_recipient() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["--newkey", "--cli", "--config", &ctx.config_arg()])
        .write_stdin("2\nsame passphrase\nsame passphrase\nn\n")
        .assert()
        .success();
    let first = fs::read_to_string(ctx.recipient_path()).unwrap();

    ctx.cli()
        .args(["--newkey", "--cli", "--config", &ctx.config_arg()])
        .write_stdin("1\n2\nsame passphrase\nsame passphrase\nn\n")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(ctx.recipient_path()).unwrap(), first);
}

#[test]
fn invalid_public_key_is_asked_again() {
    let ctx = TestContext::new();
    let key = "age1ql3z7hjy54pw3hyww5ayyfg7zqgvc7w3j2elw8zmrj2kg5sfn9aqmcac8p";

    ctx.cli()
        .args(["--newkey", "--cli", "--config", &ctx.config_arg()])
        .write_stdin(format!("1\nnot-a-key\n{}\nn\n", key))
        .assert()
        .success();

    assert_eq!(fs::read_to_string(ctx.recipient_path()).unwrap(), format!("{}\n", key));
}
