use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::Sender;

use appcask_core::{derive_app_name, render_menu_entry, BundleStage};

use crate::audit::OperationLog;
use crate::events::{InstallEvent, JobReporter};
use crate::exec::{CommandRunner, CommandSpec, SystemRunner};
use crate::fs_utils::{copy_dir_recursive, make_scratch_dir, move_dir_or_copy, set_executable};
use crate::layout::{HomeLayout, LAUNCHER_NAME};

const EXTRACTED_PAYLOAD_DIR: &str = "squashfs-root";
const SELF_EXTRACT_FLAG: &str = "--appimage-extract";
const ICON_EXTENSIONS: [&str; 4] = ["png", "svg", "ico", "xpm"];
const ICON_KEYWORDS: [&str; 3] = ["icon", "logo", "app"];

pub fn run_bundle_install(
    layout: HomeLayout,
    log: OperationLog,
    source: PathBuf,
    sender: Sender<InstallEvent>,
) -> bool {
    let mut reporter = JobReporter::new(sender);
    match install_bundle(&layout, &log, &SystemRunner, &source, &mut reporter) {
        Ok(name) => {
            log.record_operation("info", &format!("Installed bundle: {name}"));
            reporter.finish(true, format!("{name} has been successfully installed!"));
            true
        }
        Err(err) => {
            let reason = format!("{err:#}");
            log.record_operation("error", &format!("Bundle installation failed: {reason}"));
            reporter.finish(false, reason);
            false
        }
    }
}

pub fn install_bundle(
    layout: &HomeLayout,
    log: &OperationLog,
    runner: &dyn CommandRunner,
    source: &Path,
    reporter: &mut JobReporter,
) -> Result<String> {
    reporter.status("Extracting application bundle...");
    reporter.progress(BundleStage::Extracting.percent());
    let scratch = extract_bundle(runner, source)?;
    let payload = scratch.join(EXTRACTED_PAYLOAD_DIR);
    if !payload.exists() {
        return Err(anyhow!(
            "extraction did not produce {EXTRACTED_PAYLOAD_DIR}: {}",
            payload.display()
        ));
    }

    reporter.status("Determining application name...");
    reporter.progress(BundleStage::Naming.percent());
    let stem = source
        .file_stem()
        .and_then(|v| v.to_str())
        .ok_or_else(|| anyhow!("bundle path has no usable file name: {}", source.display()))?;
    let name = derive_app_name(stem);

    reporter.progress(BundleStage::Relocating.percent());
    relocate_payload(layout, &name, &payload, reporter)?;
    let _ = fs::remove_dir_all(&scratch);

    reporter.status("Creating menu entry...");
    reporter.progress(BundleStage::MenuEntry.percent());
    let menu_entry = write_menu_entry(layout, log, &name, reporter)?;

    reporter.status("Setting permissions...");
    reporter.progress(BundleStage::Permissions.percent());
    set_permissions(layout, &name, &menu_entry)?;

    reporter.status(format!("Successfully installed {name}!"));
    reporter.progress(BundleStage::Done.percent());
    Ok(name)
}

fn extract_bundle(runner: &dyn CommandRunner, source: &Path) -> Result<PathBuf> {
    set_executable(source)
        .with_context(|| format!("failed to mark bundle executable: {}", source.display()))?;
    let absolute = fs::canonicalize(source)
        .with_context(|| format!("failed to resolve bundle path: {}", source.display()))?;

    let scratch = make_scratch_dir("extract")?;
    let spec = CommandSpec::new(absolute.display().to_string())
        .arg(SELF_EXTRACT_FLAG)
        .current_dir(&scratch);
    let output = runner
        .run(&spec)
        .with_context(|| format!("failed to run bundle self-extraction: {}", source.display()))?;
    if !output.success() {
        return Err(anyhow!(
            "bundle extraction failed (scratch dir kept at {}): {}",
            scratch.display(),
            output.error_output()
        ));
    }
    Ok(scratch)
}

fn relocate_payload(
    layout: &HomeLayout,
    name: &str,
    payload: &Path,
    reporter: &mut JobReporter,
) -> Result<()> {
    let root = layout.applications_root();
    fs::create_dir_all(root)
        .with_context(|| format!("failed to create applications root: {}", root.display()))?;

    let target = layout.bundle_dir(name);
    if !target.exists() {
        reporter.status(format!("Installing {name}..."));
        return move_dir_or_copy(payload, &target);
    }

    reporter.status(format!("Updating existing installation of {name}..."));
    let backup = backup_configuration(layout, name, reporter)?;
    let replace_result = replace_installation(&target, payload);
    let restore_result = restore_configuration(layout, name, backup, reporter);
    replace_result?;
    restore_result
}

fn backup_configuration(
    layout: &HomeLayout,
    name: &str,
    reporter: &mut JobReporter,
) -> Result<Option<PathBuf>> {
    let config_dir = layout.config_dir(name);
    if !config_dir.exists() {
        return Ok(None);
    }

    let backup = layout.config_backup_dir(name);
    if backup.exists() {
        fs::remove_dir_all(&backup).with_context(|| {
            format!(
                "failed to remove stale configuration backup: {}",
                backup.display()
            )
        })?;
    }
    copy_dir_recursive(&config_dir, &backup)
        .with_context(|| format!("failed to back up configuration: {}", config_dir.display()))?;
    reporter.status("Backed up user configuration...");
    Ok(Some(backup))
}

fn replace_installation(target: &Path, payload: &Path) -> Result<()> {
    fs::remove_dir_all(target).with_context(|| {
        format!(
            "failed to remove previous installation: {}",
            target.display()
        )
    })?;
    move_dir_or_copy(payload, target)
}

fn restore_configuration(
    layout: &HomeLayout,
    name: &str,
    backup: Option<PathBuf>,
    reporter: &mut JobReporter,
) -> Result<()> {
    let Some(backup) = backup else {
        return Ok(());
    };
    if !backup.exists() {
        return Ok(());
    }

    let config_dir = layout.config_dir(name);
    if config_dir.exists() {
        fs::remove_dir_all(&config_dir).with_context(|| {
            format!(
                "failed to clear configuration written during the update: {}",
                config_dir.display()
            )
        })?;
    }
    move_dir_or_copy(&backup, &config_dir)
        .with_context(|| format!("failed to restore configuration backup: {}", backup.display()))?;
    reporter.status("Restored user configuration...");
    Ok(())
}

fn write_menu_entry(
    layout: &HomeLayout,
    log: &OperationLog,
    name: &str,
    reporter: &mut JobReporter,
) -> Result<PathBuf> {
    let menu_dir = layout.menu_entry_dir();
    fs::create_dir_all(&menu_dir)
        .with_context(|| format!("failed to create menu entry dir: {}", menu_dir.display()))?;

    let bundle_dir = layout.bundle_dir(name);
    let entry_point = layout.entry_point_path(name);
    let icon = find_icon_file(&bundle_dir).unwrap_or_else(|| entry_point.clone());

    if let Err(err) = ensure_launcher_wrapper(layout, reporter) {
        log.record_operation(
            "warning",
            &format!("could not refresh launcher wrapper: {err:#}"),
        );
    }

    let menu_entry = layout.menu_entry_path(name);
    let rendered = render_menu_entry(name, &layout.launcher_path(), &entry_point, &icon);
    fs::write(&menu_entry, rendered)
        .with_context(|| format!("failed to write menu entry: {}", menu_entry.display()))?;
    Ok(menu_entry)
}

fn find_icon_file(root: &Path) -> Option<PathBuf> {
    let mut keyword_match = None;
    let mut fallback = None;
    scan_for_icons(root, &mut keyword_match, &mut fallback);
    keyword_match.or(fallback)
}

fn scan_for_icons(dir: &Path, keyword_match: &mut Option<PathBuf>, fallback: &mut Option<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();

    for path in paths {
        if keyword_match.is_some() {
            return;
        }
        if path.is_dir() {
            scan_for_icons(&path, keyword_match, fallback);
            continue;
        }

        let Some(extension) = path.extension().and_then(|v| v.to_str()) else {
            continue;
        };
        if !ICON_EXTENSIONS
            .iter()
            .any(|known| extension.eq_ignore_ascii_case(known))
        {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|v| v.to_str()) else {
            continue;
        };
        let lowered = file_name.to_ascii_lowercase();
        if ICON_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
            *keyword_match = Some(path);
            return;
        }
        if fallback.is_none() {
            *fallback = Some(path);
        }
    }
}

fn ensure_launcher_wrapper(layout: &HomeLayout, reporter: &mut JobReporter) -> Result<()> {
    let bin_dir = layout.user_bin_dir();
    fs::create_dir_all(&bin_dir)
        .with_context(|| format!("failed to create {}", bin_dir.display()))?;

    let source = packaged_launcher_path()?;
    if !source.exists() {
        return Err(anyhow!("packaged launcher not found: {}", source.display()));
    }

    let target = layout.launcher_path();
    if target.exists() && !newer_than(&source, &target)? {
        return Ok(());
    }

    fs::copy(&source, &target)
        .with_context(|| format!("failed to install launcher wrapper: {}", target.display()))?;
    set_executable(&target)
        .with_context(|| format!("failed to mark launcher executable: {}", target.display()))?;
    reporter.status("Updated launcher wrapper...");
    Ok(())
}

fn packaged_launcher_path() -> Result<PathBuf> {
    let current = std::env::current_exe().context("failed to resolve current executable")?;
    let dir = current
        .parent()
        .ok_or_else(|| anyhow!("current executable has no parent directory"))?;
    Ok(dir.join(LAUNCHER_NAME))
}

fn newer_than(source: &Path, target: &Path) -> Result<bool> {
    let source_modified = fs::metadata(source)
        .and_then(|metadata| metadata.modified())
        .with_context(|| format!("failed to stat {}", source.display()))?;
    let target_modified = fs::metadata(target)
        .and_then(|metadata| metadata.modified())
        .with_context(|| format!("failed to stat {}", target.display()))?;
    Ok(source_modified > target_modified)
}

fn set_permissions(layout: &HomeLayout, name: &str, menu_entry: &Path) -> Result<()> {
    let entry_point = layout.entry_point_path(name);
    if entry_point.exists() {
        set_executable(&entry_point).with_context(|| {
            format!(
                "failed to set entry point executable: {}",
                entry_point.display()
            )
        })?;
    }
    set_executable(menu_entry).with_context(|| {
        format!(
            "failed to set menu entry executable: {}",
            menu_entry.display()
        )
    })?;
    Ok(())
}
