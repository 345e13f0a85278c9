mod audit;
mod bundle;
mod escalate;
mod events;
mod exec;
mod fs_utils;
mod inventory;
mod launch;
mod layout;
mod native;

pub use audit::{record_launch_or_fallback, LogSummaryEntry, OperationLog};
pub use bundle::{install_bundle, run_bundle_install};
pub use escalate::{escalation_helper_available, escalation_missing_guidance, ESCALATION_HELPER};
pub use events::{
    drain_events, event_channel, EventReceiver, EventSender, InstallEvent, JobReporter,
};
pub use exec::{CommandOutput, CommandRunner, CommandSpec, CommandWait, SystemRunner};
pub use fs_utils::{
    copy_dir_recursive, directory_size_bytes, move_dir_or_copy, remove_file_if_exists,
};
pub use inventory::{installed_bundles, installed_packages, uninstall_bundle, uninstall_package};
pub use launch::{
    launch_entry_point, needs_sandbox_flag_retry, LaunchOutcome, SANDBOX_DISABLE_FLAG,
};
pub use layout::{default_home, HomeLayout, ENTRY_POINT_NAME, LAUNCHER_NAME};
pub use native::{install_package, run_package_install, PACKAGE_INSTALL_TIMEOUT};
