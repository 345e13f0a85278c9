use std::fs;

use anyhow::{anyhow, Context, Result};

use appcask_core::{parse_package_listing, InstalledBundle, InstalledPackage};

use crate::audit::OperationLog;
use crate::escalate::{escalation_helper_available, escalation_missing_guidance, ESCALATION_HELPER};
use crate::exec::{CommandRunner, CommandSpec};
use crate::fs_utils::{directory_size_bytes, remove_file_if_exists};
use crate::layout::HomeLayout;

pub fn installed_bundles(layout: &HomeLayout) -> Result<Vec<InstalledBundle>> {
    let root = layout.applications_root();
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut bundles = Vec::new();
    for entry in fs::read_dir(root)
        .with_context(|| format!("failed to read applications root: {}", root.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(ToOwned::to_owned) else {
            continue;
        };
        let entry_point = layout.entry_point_path(&name);
        if !entry_point.exists() {
            continue;
        }

        let directory = entry.path();
        let menu_entry_path = layout.menu_entry_path(&name);
        let menu_entry_exists = menu_entry_path.exists();
        bundles.push(InstalledBundle {
            size_bytes: directory_size_bytes(&directory),
            menu_entry: menu_entry_exists.then_some(menu_entry_path),
            name,
            directory,
            entry_point,
        });
    }

    bundles.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(bundles)
}

pub fn installed_packages(runner: &dyn CommandRunner) -> Result<Vec<InstalledPackage>> {
    let output = runner
        .run(&CommandSpec::new("dpkg").arg("-l"))
        .context("failed to query installed packages")?;
    if !output.success() {
        return Err(anyhow!(
            "package listing failed: {}",
            output.error_output()
        ));
    }
    Ok(parse_package_listing(&output.stdout))
}

pub fn uninstall_bundle(layout: &HomeLayout, name: &str) -> Result<()> {
    let directory = layout.bundle_dir(name);
    if directory.exists() {
        fs::remove_dir_all(&directory).with_context(|| {
            format!(
                "failed to remove installation directory: {}",
                directory.display()
            )
        })?;
    }

    remove_file_if_exists(&layout.menu_entry_path(name))
        .with_context(|| format!("failed to remove menu entry for {name}"))?;

    if installed_bundles(layout)?.is_empty() {
        remove_file_if_exists(&layout.launcher_path())
            .context("failed to remove shared launcher wrapper")?;
    }
    Ok(())
}

pub fn uninstall_package(
    runner: &dyn CommandRunner,
    log: &OperationLog,
    name: &str,
) -> Result<()> {
    if !escalation_helper_available(runner) {
        return Err(anyhow!(escalation_missing_guidance()));
    }

    let spec = CommandSpec::new(ESCALATION_HELPER)
        .args(["apt-get", "remove", "-y"])
        .arg(name);
    let output = runner.run(&spec).context("failed to run package removal")?;
    if !output.success() {
        let detail = output.error_output();
        log.record_package_uninstall(name, false, Some(detail.as_str()));
        return Err(anyhow!("failed to uninstall {name}: {detail}"));
    }

    log.record_package_uninstall(name, true, None);
    Ok(())
}
