use std::io;
use std::path::Path;
use std::time::Duration;

use crate::exec::{CommandRunner, CommandSpec, CommandWait};

pub const SANDBOX_DISABLE_FLAG: &str = "--no-sandbox";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Started {
        command: Vec<String>,
    },
    Failed {
        command: Vec<String>,
        exit_code: Option<i32>,
        detail: String,
    },
}

impl LaunchOutcome {
    pub fn success(&self) -> bool {
        matches!(self, Self::Started { .. })
    }

    pub fn command(&self) -> &[String] {
        match self {
            Self::Started { command } | Self::Failed { command, .. } => command,
        }
    }
}

pub fn needs_sandbox_flag_retry(output: &str) -> bool {
    let lowered = output.to_ascii_lowercase();
    lowered.contains("no-sandbox") && lowered.contains("unknown")
}

pub fn launch_entry_point(
    runner: &dyn CommandRunner,
    entry_point: &Path,
    extra_args: &[String],
    grace: Duration,
) -> LaunchOutcome {
    let sandboxed = launch_command(entry_point, extra_args, true);
    match attempt(runner, &sandboxed, grace) {
        Attempt::Started => LaunchOutcome::Started { command: sandboxed },
        Attempt::Exited { exit_code, output } => {
            if !needs_sandbox_flag_retry(&output) {
                return failed(sandboxed, exit_code, exit_detail(exit_code, &output));
            }

            let plain = launch_command(entry_point, extra_args, false);
            match attempt(runner, &plain, grace) {
                Attempt::Started => LaunchOutcome::Started { command: plain },
                Attempt::Exited { exit_code, output } => {
                    failed(plain, exit_code, exit_detail(exit_code, &output))
                }
                Attempt::SpawnError(detail) => failed(plain, None, detail),
            }
        }
        Attempt::SpawnError(detail) => failed(sandboxed, None, detail),
    }
}

enum Attempt {
    Started,
    Exited {
        exit_code: Option<i32>,
        output: String,
    },
    SpawnError(String),
}

fn attempt(runner: &dyn CommandRunner, command: &[String], grace: Duration) -> Attempt {
    let spec = CommandSpec::new(&command[0]).args(command[1..].iter().cloned());
    match runner.run_with_timeout(&spec, grace) {
        Ok(CommandWait::TimedOut) => Attempt::Started,
        Ok(CommandWait::Completed(output)) if output.success() => Attempt::Started,
        Ok(CommandWait::Completed(output)) => Attempt::Exited {
            exit_code: output.exit_code,
            output: output.error_output(),
        },
        Err(err) => Attempt::SpawnError(spawn_error_detail(&command[0], &err)),
    }
}

fn launch_command(entry_point: &Path, extra_args: &[String], with_sandbox_flag: bool) -> Vec<String> {
    let mut command = vec![entry_point.display().to_string()];
    if with_sandbox_flag {
        command.push(SANDBOX_DISABLE_FLAG.to_string());
    }
    command.extend(extra_args.iter().cloned());
    command
}

fn spawn_error_detail(program: &str, err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => format!("entry point not found: {program}"),
        io::ErrorKind::PermissionDenied => format!("permission denied executing: {program}"),
        _ => format!("failed to start {program}: {err}"),
    }
}

fn exit_detail(exit_code: Option<i32>, output: &str) -> String {
    if !output.trim().is_empty() {
        return output.trim().to_string();
    }
    match exit_code {
        Some(code) => format!("process exited with code {code}"),
        None => "process terminated by signal".to_string(),
    }
}

fn failed(command: Vec<String>, exit_code: Option<i32>, detail: String) -> LaunchOutcome {
    LaunchOutcome::Failed {
        command,
        exit_code,
        detail,
    }
}
