use std::path::Path;
use std::thread;

use anyhow::{anyhow, Context, Result};

use appcask_core::Settings;
use appcask_installer::{
    default_home, escalation_helper_available, event_channel, installed_bundles,
    installed_packages, launch_entry_point, run_bundle_install, run_package_install,
    uninstall_bundle, uninstall_package, HomeLayout, LaunchOutcome, OperationLog, SystemRunner,
    ESCALATION_HELPER,
};

use crate::completion;
use crate::render;
use crate::{Cli, Commands};

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Install { file } => install_flow(&file),
        Commands::List { json } => list_flow(json),
        Commands::Launch { name, args } => launch_flow(&name, &args),
        Commands::Uninstall { name } => uninstall_flow(&name),
        Commands::UninstallPackage { name } => uninstall_package_flow(&name),
        Commands::Logs {
            app,
            tail,
            clear,
            summary,
        } => logs_flow(app.as_deref(), tail, clear, summary),
        Commands::Doctor => doctor_flow(),
        Commands::Completions { shell } => {
            completion::write_completions(shell, &mut std::io::stdout())
        }
    }
}

fn current_layout() -> Result<(HomeLayout, Settings)> {
    let home = default_home()?;
    let mut layout = HomeLayout::new(home);
    let settings = Settings::load(&layout.settings_path())?;
    if let Some(root) = &settings.applications_root {
        layout = layout.with_applications_root(root);
    }
    Ok((layout, settings))
}

fn install_flow(file: &Path) -> Result<()> {
    let (layout, _settings) = current_layout()?;
    layout.ensure_base_dirs()?;
    let log = OperationLog::open(&layout)?;

    let extension = file
        .extension()
        .and_then(|v| v.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let (sender, receiver) = event_channel();
    let source = file.to_path_buf();
    let worker = match extension.as_str() {
        "appimage" => {
            log.record_operation(
                "info",
                &format!("Selected bundle for installation: {}", file.display()),
            );
            let job_layout = layout.clone();
            let job_log = log.clone();
            thread::spawn(move || run_bundle_install(job_layout, job_log, source, sender))
        }
        "deb" => {
            log.record_operation(
                "info",
                &format!("Selected package for installation: {}", file.display()),
            );
            let job_log = log.clone();
            thread::spawn(move || run_package_install(job_log, source, sender))
        }
        _ => {
            return Err(anyhow!(
                "unsupported file type (expected .AppImage or .deb): {}",
                file.display()
            ));
        }
    };

    let succeeded = render::render_install_events(&receiver);
    let _ = worker.join();

    if succeeded {
        Ok(())
    } else {
        Err(anyhow!("installation failed"))
    }
}

fn list_flow(json: bool) -> Result<()> {
    let (layout, _) = current_layout()?;
    let bundles = installed_bundles(&layout)?;
    let packages = installed_packages(&SystemRunner)?;

    if json {
        let value = serde_json::json!({
            "bundles": bundles
                .iter()
                .map(|bundle| {
                    serde_json::json!({
                        "name": bundle.name,
                        "directory": bundle.directory.display().to_string(),
                        "size_megabytes": bundle.size_megabytes(),
                        "menu_entry": bundle
                            .menu_entry
                            .as_ref()
                            .map(|path| path.display().to_string()),
                    })
                })
                .collect::<Vec<_>>(),
            "packages": packages
                .iter()
                .map(|package| {
                    serde_json::json!({
                        "name": package.name,
                        "version": package.version,
                        "description": package.description,
                    })
                })
                .collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("failed to render listing as JSON")?
        );
        return Ok(());
    }

    for line in render::format_bundle_lines(&bundles) {
        println!("{line}");
    }
    for line in render::format_package_lines(&packages) {
        println!("{line}");
    }
    println!("{}", render::format_listing_summary(&bundles, &packages));
    Ok(())
}

fn launch_flow(name: &str, extra_args: &[String]) -> Result<()> {
    let (layout, settings) = current_layout()?;
    let log = OperationLog::open(&layout)?;

    let bundles = installed_bundles(&layout)?;
    let bundle = bundles
        .iter()
        .find(|bundle| bundle.name == name)
        .ok_or_else(|| anyhow!("no installed bundle named '{name}'"))?;

    log.record_operation("info", &format!("Attempting to launch {name}"));
    let outcome = launch_entry_point(
        &SystemRunner,
        &bundle.entry_point,
        extra_args,
        settings.launch_grace(),
    );
    match &outcome {
        LaunchOutcome::Started { command } => {
            let _ = log.record_launch(name, command, true, None);
            render::print_status("launched", name);
            Ok(())
        }
        LaunchOutcome::Failed {
            command, detail, ..
        } => {
            let _ = log.record_launch(name, command, false, Some(detail.as_str()));
            Err(anyhow!("failed to launch {name}: {detail}"))
        }
    }
}

fn uninstall_flow(name: &str) -> Result<()> {
    let (layout, _) = current_layout()?;
    let log = OperationLog::open(&layout)?;

    let bundles = installed_bundles(&layout)?;
    if !bundles.iter().any(|bundle| bundle.name == name) {
        return Err(anyhow!("no installed bundle named '{name}'"));
    }

    uninstall_bundle(&layout, name)?;
    log.record_operation("info", &format!("Uninstalled bundle: {name}"));
    render::print_status("removed", name);
    Ok(())
}

fn uninstall_package_flow(name: &str) -> Result<()> {
    let (layout, _) = current_layout()?;
    let log = OperationLog::open(&layout)?;

    uninstall_package(&SystemRunner, &log, name)?;
    render::print_status("removed", name);
    Ok(())
}

fn logs_flow(app: Option<&str>, tail: Option<usize>, clear: bool, summary: bool) -> Result<()> {
    let (layout, _) = current_layout()?;
    let log = OperationLog::open(&layout)?;

    if clear {
        log.clear_app_logs(app)?;
        render::print_status("cleared", app.unwrap_or("all application logs"));
        return Ok(());
    }

    if summary {
        for line in render::format_log_summary(&log.summarize_logs()?) {
            println!("{line}");
        }
        return Ok(());
    }

    let contents = match app {
        Some(app) => log.read_app_log(app)?,
        None => log.read_recent_operations(tail.unwrap_or(100))?,
    };
    if contents.is_empty() {
        println!("No log entries found");
    } else {
        println!("{contents}");
    }
    Ok(())
}

fn doctor_flow() -> Result<()> {
    let (layout, settings) = current_layout()?;
    println!("home: {}", layout.home().display());
    println!(
        "applications root: {}",
        layout.applications_root().display()
    );
    println!("menu entries: {}", layout.menu_entry_dir().display());
    println!("launcher: {}", layout.launcher_path().display());
    println!("logs: {}", layout.log_dir().display());
    println!("launch grace: {}s", settings.launch_grace().as_secs());

    let escalation = if escalation_helper_available(&SystemRunner) {
        "available"
    } else {
        "missing"
    };
    println!("escalation helper ({ESCALATION_HELPER}): {escalation}");
    Ok(())
}
