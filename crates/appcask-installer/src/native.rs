use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{bounded, Sender};

use appcask_core::{parse_control_fields, PackageStage, PROPERLY_INSTALLED_MARKER};

use crate::audit::OperationLog;
use crate::escalate::{escalation_helper_available, escalation_missing_guidance, ESCALATION_HELPER};
use crate::events::{InstallEvent, JobReporter};
use crate::exec::{CommandRunner, CommandSpec, CommandWait, SystemRunner};
use crate::fs_utils::{make_scratch_dir, set_executable};

pub const PACKAGE_INSTALL_TIMEOUT: Duration = Duration::from_secs(600);
const INSTALL_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);
const TERMINAL_FALLBACK_TIMEOUT: Duration = Duration::from_secs(600);
const PACKAGE_EXTENSION: &str = "deb";

pub fn run_package_install(
    log: OperationLog,
    source: PathBuf,
    sender: Sender<InstallEvent>,
) -> bool {
    let worker_sender = sender.clone();
    let worker = move || {
        let mut reporter = JobReporter::new(worker_sender);
        install_package(&SystemRunner, &source, &mut reporter)
    };

    let reporter = JobReporter::new(sender);
    match run_supervised(PACKAGE_INSTALL_TIMEOUT, worker) {
        Some(Ok((name, version))) => {
            log.record_package_install(&name, &version, true, None);
            reporter.finish(
                true,
                format!("{name} {version} has been successfully installed!"),
            );
            true
        }
        Some(Err(err)) => {
            let reason = format!("{err:#}");
            log.record_operation("error", &format!("Package installation failed: {reason}"));
            reporter.finish(false, reason);
            false
        }
        None => {
            let reason =
                "installation timed out - the process may still be running in the background"
                    .to_string();
            log.record_operation("error", &reason);
            reporter.finish(false, reason);
            false
        }
    }
}

pub(crate) fn run_supervised<T, F>(deadline: Duration, job: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (sender, receiver) = bounded(1);
    thread::spawn(move || {
        let _ = sender.send(job());
    });
    receiver.recv_timeout(deadline).ok()
}

pub fn install_package(
    runner: &dyn CommandRunner,
    source: &Path,
    reporter: &mut JobReporter,
) -> Result<(String, String)> {
    if !escalation_helper_available(runner) {
        return Err(anyhow!(escalation_missing_guidance()));
    }

    reporter.status("Validating package file...");
    reporter.progress(PackageStage::Validate.percent());
    let control_text = validate_package(runner, source)?;

    reporter.status("Extracting package information...");
    reporter.progress(PackageStage::ReadMetadata.percent());
    let control = parse_control_fields(&control_text);
    let name = control
        .get("Package")
        .cloned()
        .ok_or_else(|| anyhow!("package metadata is missing the Package field"))?;
    let version = control
        .get("Version")
        .cloned()
        .ok_or_else(|| anyhow!("package metadata is missing the Version field"))?;

    if package_properly_installed(runner, &name)? {
        reporter.status(format!("Updating {name}..."));
    } else {
        reporter.status(format!("Installing {name}..."));
    }

    reporter.status("Preparing package system...");
    reporter.progress(PackageStage::Prepare.percent());

    reporter.progress(PackageStage::Install.percent());
    run_install_layers(runner, source, reporter)?;

    reporter.status("Verifying installation...");
    reporter.progress(PackageStage::Verify.percent());
    if !package_properly_installed(runner, &name)? {
        return Err(anyhow!(
            "package installation could not be verified: {name}"
        ));
    }

    reporter.status(format!("Successfully installed {name}!"));
    reporter.progress(PackageStage::Done.percent());
    Ok((name, version))
}

fn validate_package(runner: &dyn CommandRunner, source: &Path) -> Result<String> {
    let extension_ok = source
        .extension()
        .and_then(|v| v.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(PACKAGE_EXTENSION))
        .unwrap_or(false);
    if !extension_ok {
        return Err(anyhow!("not a .deb package: {}", source.display()));
    }
    if !source.exists() {
        return Err(anyhow!("package file does not exist: {}", source.display()));
    }

    let spec = CommandSpec::new("dpkg")
        .arg("--info")
        .arg(source.display().to_string());
    let output = runner.run(&spec).context("failed to run dpkg --info")?;
    if !output.success() {
        return Err(anyhow!(
            "invalid package archive: {}",
            output.error_output()
        ));
    }
    Ok(output.stdout)
}

fn package_properly_installed(runner: &dyn CommandRunner, name: &str) -> Result<bool> {
    let spec = CommandSpec::new("dpkg").arg("-l").arg(name);
    let output = runner
        .run(&spec)
        .context("failed to query package status")?;
    if !output.success() {
        return Ok(false);
    }

    Ok(output.stdout.lines().any(|line| {
        let mut parts = line.split_whitespace();
        if parts.next() != Some(PROPERLY_INSTALLED_MARKER) {
            return false;
        }
        parts.next().is_some_and(|package| {
            package == name
                || package
                    .strip_prefix(name)
                    .is_some_and(|rest| rest.starts_with(':'))
        })
    }))
}

fn run_install_layers(
    runner: &dyn CommandRunner,
    source: &Path,
    reporter: &mut JobReporter,
) -> Result<()> {
    reporter.status("Attempting direct installation...");
    match run_elevated_install(runner, source, reporter) {
        Ok(()) => return Ok(()),
        Err(err) => {
            reporter.status(format!("Direct installation failed: {err:#}"));
        }
    }

    reporter.status("Opening terminal for authentication...");
    match run_terminal_install(runner, source) {
        Ok(()) => {
            reporter.status("Package installed via terminal");
            Ok(())
        }
        Err(err) => Err(anyhow!(
            "failed to install the package automatically ({err:#}); install it manually with:\n{}",
            manual_install_instructions(source)
        )),
    }
}

fn run_elevated_install(
    runner: &dyn CommandRunner,
    source: &Path,
    reporter: &mut JobReporter,
) -> Result<()> {
    let commands = [
        CommandSpec::new(ESCALATION_HELPER)
            .args(["dpkg", "-i"])
            .arg(source.display().to_string()),
        CommandSpec::new(ESCALATION_HELPER).args(["apt-get", "install", "-f", "-y"]),
    ];

    for spec in commands {
        reporter.status(format!("Running: {}", spec.rendered()));
        let wait = runner
            .run_with_timeout(&spec, INSTALL_COMMAND_TIMEOUT)
            .with_context(|| format!("failed to start: {}", spec.rendered()))?;
        match wait {
            CommandWait::Completed(output) if output.success() => {}
            CommandWait::Completed(output) => {
                return Err(anyhow!(
                    "command failed ({}): {}",
                    spec.rendered(),
                    output.error_output()
                ));
            }
            CommandWait::TimedOut => {
                return Err(anyhow!(
                    "command timed out after {}s: {}",
                    INSTALL_COMMAND_TIMEOUT.as_secs(),
                    spec.rendered()
                ));
            }
        }
    }
    Ok(())
}

fn run_terminal_install(runner: &dyn CommandRunner, source: &Path) -> Result<()> {
    let (scratch, script_path) = write_install_script(source)?;
    let result = run_terminal_script(runner, &script_path);
    let _ = fs::remove_dir_all(&scratch);
    result
}

fn write_install_script(source: &Path) -> Result<(PathBuf, PathBuf)> {
    let scratch = make_scratch_dir("install")?;
    let script_path = scratch.join("install.sh");
    let file_name = source
        .file_name()
        .and_then(|v| v.to_str())
        .unwrap_or("package.deb");

    let script = format!(
        "#!/bin/bash\n\
         echo \"Installing {file_name}...\"\n\
         dpkg -i \"{path}\"\n\
         echo \"Resolving dependencies...\"\n\
         apt-get install -f -y\n\
         echo \"Installation completed successfully!\"\n",
        path = source.display()
    );
    fs::write(&script_path, script)
        .with_context(|| format!("failed to write install script: {}", script_path.display()))?;
    set_executable(&script_path).with_context(|| {
        format!(
            "failed to mark install script executable: {}",
            script_path.display()
        )
    })?;
    Ok((scratch, script_path))
}

fn run_terminal_script(runner: &dyn CommandRunner, script_path: &Path) -> Result<()> {
    let spec = CommandSpec::new("gnome-terminal")
        .arg("--title=Package Installation")
        .arg("--geometry=80x10")
        .arg("--")
        .args(["bash", "-c"])
        .arg(format!(
            "sudo bash \"{}\"; echo \"Press Enter to close\"; read",
            script_path.display()
        ));

    let wait = runner
        .run_with_timeout(&spec, TERMINAL_FALLBACK_TIMEOUT)
        .context("failed to start terminal installer")?;
    match wait {
        CommandWait::Completed(output) if output.success() => Ok(()),
        CommandWait::Completed(output) => Err(anyhow!(
            "terminal installation failed: {}",
            output.error_output()
        )),
        CommandWait::TimedOut => Err(anyhow!(
            "terminal installation timed out after {}s",
            TERMINAL_FALLBACK_TIMEOUT.as_secs()
        )),
    }
}

fn manual_install_instructions(source: &Path) -> String {
    format!(
        "sudo dpkg -i '{path}'\nsudo apt-get install -f\n\nOr using apt directly:\nsudo apt install '{path}'",
        path = source.display()
    )
}
