pub mod dry_run;
pub mod install;
pub mod notification_pairing;
pub mod post_install_audit;
pub mod recipient_setup;
pub mod system_installer;
pub mod wizard;
