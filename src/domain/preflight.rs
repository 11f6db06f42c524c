//! Dry-run preflight: check that what the config asks for exists on the host.

use std::fmt::Write as _;
use std::path::Path;

use crate::domain::audit::SUMMARY_HEADER;
use crate::domain::backup_config::BackupConfig;

/// Host paths behind one collector toggle; any one existing is enough.
#[derive(Debug, Clone, Copy)]
pub struct Collector {
    pub key: &'static str,
    pub label: &'static str,
    pub paths: &'static [&'static str],
}

pub const COLLECTORS: &[Collector] = &[
    Collector { key: "BACKUP_CLUSTER_CONFIG", label: "Proxmox VE cluster config", paths: &["/etc/pve/corosync.conf", "/var/lib/pve-cluster"] },
    Collector { key: "BACKUP_PVE_FIREWALL", label: "Proxmox VE firewall", paths: &["/etc/pve/firewall"] },
    Collector { key: "BACKUP_VZDUMP_CONFIG", label: "vzdump config", paths: &["/etc/vzdump.conf"] },
    Collector { key: "BACKUP_PVE_JOBS", label: "Proxmox VE jobs", paths: &["/etc/pve/jobs.cfg"] },
    Collector { key: "BACKUP_CEPH_CONFIG", label: "Ceph config", paths: &["/etc/ceph"] },
    Collector { key: "BACKUP_ZFS_CONFIG", label: "ZFS config", paths: &["/etc/zfs"] },
    Collector { key: "BACKUP_PBS_DATASTORE_CONFIG", label: "PBS datastores", paths: &["/etc/proxmox-backup/datastore.cfg"] },
    Collector { key: "BACKUP_PBS_USER_CONFIG", label: "PBS users", paths: &["/etc/proxmox-backup/user.cfg"] },
    Collector { key: "BACKUP_NETWORK_CONFIG", label: "network interfaces", paths: &["/etc/network/interfaces"] },
    Collector { key: "BACKUP_APT_SOURCES", label: "APT sources", paths: &["/etc/apt/sources.list", "/etc/apt/sources.list.d"] },
    Collector { key: "BACKUP_CRONTABS", label: "crontabs", paths: &["/etc/crontab", "/var/spool/cron/crontabs"] },
    Collector { key: "BACKUP_SSH_KEYS", label: "SSH keys", paths: &["/root/.ssh", "/etc/ssh"] },
    Collector { key: "BACKUP_ROOT_HOME", label: "root home", paths: &["/root"] },
    Collector { key: "BACKUP_SCRIPT_DIR", label: "local scripts", paths: &["/usr/local/bin"] },
    Collector { key: "BACKUP_FIREWALL_RULES", label: "host firewall rules", paths: &["/etc/iptables", "/etc/nftables.conf"] },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightIssue {
    pub severity: Severity,
    pub message: String,
}

impl PreflightIssue {
    fn warning(message: String) -> Self {
        Self { severity: Severity::Warning, message }
    }

    fn error(message: String) -> Self {
        Self { severity: Severity::Error, message }
    }

    pub fn render(&self) -> String {
        let tag = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        format!("{} {}", tag, self.message)
    }
}

/// Collect issues for `config`, asking `exists` about host paths.
pub fn run_preflight(config: &BackupConfig, exists: &dyn Fn(&Path) -> bool) -> Vec<PreflightIssue> {
    let mut issues = Vec::new();

    for collector in COLLECTORS {
        if config.collectors.get(collector.key) != Some(&true) {
            continue;
        }
        if !collector.paths.iter().any(|path| exists(Path::new(path))) {
            issues.push(PreflightIssue::warning(format!(
                "{} not found ({}); set {}=false to disable",
                collector.label,
                collector.paths.join(", "),
                collector.key
            )));
        }
    }

    if config.secondary_enabled {
        match &config.secondary_path {
            Some(path) if exists(path.as_path()) => {}
            Some(path) => issues.push(PreflightIssue::warning(format!(
                "secondary backup path {} does not exist",
                path.display()
            ))),
            None => issues.push(PreflightIssue::error("SECONDARY_PATH is empty".into())),
        }
    }

    if config.cloud_enabled && config.cloud_remote.is_empty() {
        issues.push(PreflightIssue::error("CLOUD_REMOTE is empty".into()));
    }

    if config.encrypt_archive
        && config.age_recipients.is_empty()
        && !exists(config.age_recipient_file.as_path())
    {
        issues.push(PreflightIssue::error(format!(
            "encryption enabled but no recipient file at {}",
            config.age_recipient_file.display()
        )));
    }

    issues
}

/// Human-readable report; the summary block is only printed when there are issues.
pub fn render_report(config_path: &Path, issues: &[PreflightIssue]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dry run using {}", config_path.display());
    if issues.is_empty() {
        let _ = writeln!(out, "No problems found.");
        return out;
    }
    let _ = writeln!(out, "=== {} ===", SUMMARY_HEADER);
    for issue in issues {
        let _ = writeln!(out, "{}", issue.render());
    }
    let _ = writeln!(out, "{}", "=".repeat(SUMMARY_HEADER.len() + 8));
    out
}
