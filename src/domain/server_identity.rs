//! Numeric server id used to address this host in the notification bot.

use sha2::{Digest, Sha256};

pub const SERVER_ID_KEY: &str = "SERVER_ID";
const SERVER_ID_DIGITS: usize = 16;

/// Read the id out of an identity file: `SERVER_ID=<digits>` or a bare digit line.
pub fn parse_server_id(content: &str) -> Option<String> {
    content.lines().map(str::trim).find_map(|line| {
        let value = match line.split_once('=') {
            Some((key, value)) if key.trim().trim_start_matches("export ").trim() == SERVER_ID_KEY => {
                value.trim().trim_matches('"').trim_matches('\'')
            }
            Some(_) => return None,
            None => line,
        };
        is_server_id(value).then(|| value.to_string())
    })
}

fn is_server_id(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Stable 16-digit id for a machine, first digit never zero.
pub fn derive_server_id(machine_id: &str, hostname: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(machine_id.trim().as_bytes());
    hasher.update(b"\n");
    hasher.update(hostname.trim().as_bytes());
    let digest = hasher.finalize();

    let mut value = u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ]);
    let span = 9 * 10u64.pow(SERVER_ID_DIGITS as u32 - 1);
    value = value % span + 10u64.pow(SERVER_ID_DIGITS as u32 - 1);
    value.to_string()
}

pub fn render_identity_file(server_id: &str) -> String {
    format!("{}={}\n", SERVER_ID_KEY, server_id)
}
