use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use appcask_core::Settings;
use appcask_installer::{
    default_home, launch_entry_point, record_launch_or_fallback, HomeLayout, LaunchOutcome,
    OperationLog, SystemRunner, SANDBOX_DISABLE_FLAG,
};

fn main() -> ExitCode {
    ExitCode::from(run())
}

fn run() -> u8 {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("usage: appcask-launch <app_name> <entry_point_path> [args...]");
        return 1;
    }

    let app_name = &args[0];
    let entry_point = Path::new(&args[1]);
    let extra_args = &args[2..];

    let Ok(home) = default_home() else {
        eprintln!("error: HOME is not set");
        return 1;
    };
    let layout = HomeLayout::new(home);
    let Ok(log) = OperationLog::open(&layout) else {
        eprintln!("error: could not open log directory");
        return 1;
    };
    let settings = Settings::load(&layout.settings_path()).unwrap_or_default();

    let preview = preview_command(entry_point, extra_args);
    if !entry_point.exists() {
        let detail = format!("entry point not found: {}", entry_point.display());
        record_launch_or_fallback(&log, &layout, app_name, &preview, false, Some(detail.as_str()));
        eprintln!("error: {detail}");
        return 1;
    }
    if !is_executable(entry_point) {
        let detail = format!("entry point is not executable: {}", entry_point.display());
        record_launch_or_fallback(&log, &layout, app_name, &preview, false, Some(detail.as_str()));
        eprintln!("error: {detail}");
        return 1;
    }

    match launch_entry_point(
        &SystemRunner,
        entry_point,
        extra_args,
        settings.launch_grace(),
    ) {
        LaunchOutcome::Started { command } => {
            record_launch_or_fallback(&log, &layout, app_name, &command, true, None);
            0
        }
        LaunchOutcome::Failed {
            command,
            exit_code,
            detail,
        } => {
            record_launch_or_fallback(&log, &layout, app_name, &command, false, Some(detail.as_str()));
            eprintln!("error: {detail}");
            match exit_code {
                Some(code) if (1..=255).contains(&code) => code as u8,
                _ => 1,
            }
        }
    }
}

fn preview_command(entry_point: &Path, extra_args: &[String]) -> Vec<String> {
    let mut command = vec![
        entry_point.display().to_string(),
        SANDBOX_DISABLE_FLAG.to_string(),
    ];
    command.extend(extra_args.iter().cloned());
    command
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
