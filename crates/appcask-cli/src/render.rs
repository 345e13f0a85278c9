use std::io::IsTerminal;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};

use appcask_core::{InstalledBundle, InstalledPackage};
use appcask_installer::{EventReceiver, InstallEvent, LogSummaryEntry};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    if std::env::var_os("NO_COLOR").is_some() {
        return OutputStyle::Plain;
    }
    if std::io::stdout().is_terminal() {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

fn status_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightGreen.into()))
        .effects(Effects::BOLD)
}

fn failure_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightRed.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => format!("{status}: {message}"),
        OutputStyle::Rich => format!("{} {message}", colorize(status_style(), status)),
    }
}

pub(crate) fn print_status(status: &str, message: &str) {
    println!(
        "{}",
        render_status_line(current_output_style(), status, message)
    );
}

pub(crate) fn render_install_events(receiver: &EventReceiver) -> bool {
    let style = current_output_style();
    let progress_bar = start_progress(style);

    let mut succeeded = false;
    while let Ok(event) = receiver.recv() {
        match event {
            InstallEvent::Status(message) => match &progress_bar {
                Some(bar) => bar.set_message(message),
                None => println!("{message}"),
            },
            InstallEvent::Progress(percent) => {
                if let Some(bar) = &progress_bar {
                    bar.set_position(u64::from(percent));
                } else {
                    println!("{percent}%");
                }
            }
            InstallEvent::Finished { success, message } => {
                if let Some(bar) = &progress_bar {
                    bar.finish_and_clear();
                }
                if success {
                    println!("{}", render_status_line(style, "installed", &message));
                } else {
                    eprintln!("{}", render_failure_line(style, &message));
                }
                succeeded = success;
                break;
            }
        }
    }
    succeeded
}

fn render_failure_line(style: OutputStyle, message: &str) -> String {
    match style {
        OutputStyle::Plain => format!("failed: {message}"),
        OutputStyle::Rich => format!("{} {message}", colorize(failure_style(), "failed")),
    }
}

fn start_progress(style: OutputStyle) -> Option<ProgressBar> {
    if style != OutputStyle::Rich {
        return None;
    }

    let bar = ProgressBar::new(100);
    if let Ok(template) =
        ProgressStyle::with_template("{spinner:.cyan.bold} {msg:<40} [{bar:20.cyan/blue}] {pos:>3}%")
    {
        bar.set_style(template.progress_chars("=>-"));
    }
    bar.enable_steady_tick(Duration::from_millis(80));
    Some(bar)
}

pub(crate) fn format_bundle_lines(bundles: &[InstalledBundle]) -> Vec<String> {
    bundles
        .iter()
        .map(|bundle| {
            format!(
                "{} ({:.1} MB) [bundle]",
                bundle.name,
                bundle.size_megabytes()
            )
        })
        .collect()
}

pub(crate) fn format_package_lines(packages: &[InstalledPackage]) -> Vec<String> {
    packages
        .iter()
        .map(|package| format!("{} ({}) [package]", package.name, package.version))
        .collect()
}

pub(crate) fn format_listing_summary(
    bundles: &[InstalledBundle],
    packages: &[InstalledPackage],
) -> String {
    format!(
        "Found {} bundle(s) and {} package(s)",
        bundles.len(),
        packages.len()
    )
}

pub(crate) fn format_log_summary(entries: &[LogSummaryEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No log files found".to_string()];
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{} ({}, {:.1} KB, modified {})",
                entry.name, entry.file_name, entry.size_kilobytes, entry.modified
            )
        })
        .collect()
}
