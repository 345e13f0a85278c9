use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use appcask_core::{InstalledBundle, InstalledPackage};
use appcask_installer::LogSummaryEntry;

use crate::render::{
    format_bundle_lines, format_listing_summary, format_log_summary, format_package_lines,
    render_status_line, OutputStyle,
};
use crate::{completion, Cli, Commands};

fn sample_bundle(name: &str, size_bytes: u64) -> InstalledBundle {
    InstalledBundle {
        name: name.to_string(),
        directory: PathBuf::from(format!("/home/u/Applications/{name}")),
        entry_point: PathBuf::from(format!("/home/u/Applications/{name}/AppRun")),
        size_bytes,
        menu_entry: None,
    }
}

fn sample_package(name: &str, version: &str) -> InstalledPackage {
    InstalledPackage {
        name: name.to_string(),
        version: version.to_string(),
        description: "sample".to_string(),
    }
}

#[test]
fn cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn parse_install_command() {
    let cli = Cli::try_parse_from(["appcask", "install", "MyApp-1.2.3.AppImage"])
        .expect("install must parse");
    match cli.command {
        Commands::Install { file } => {
            assert_eq!(file, PathBuf::from("MyApp-1.2.3.AppImage"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_launch_keeps_trailing_args() {
    let cli = Cli::try_parse_from(["appcask", "launch", "MyApp", "--profile", "work"])
        .expect("launch must parse");
    match cli.command {
        Commands::Launch { name, args } => {
            assert_eq!(name, "MyApp");
            assert_eq!(args, vec!["--profile".to_string(), "work".to_string()]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_logs_flags() {
    let cli = Cli::try_parse_from(["appcask", "logs", "MyApp", "--clear"])
        .expect("logs must parse");
    match cli.command {
        Commands::Logs {
            app,
            tail,
            clear,
            summary,
        } => {
            assert_eq!(app.as_deref(), Some("MyApp"));
            assert_eq!(tail, None);
            assert!(clear);
            assert!(!summary);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn status_line_plain_and_rich() {
    assert_eq!(
        render_status_line(OutputStyle::Plain, "installed", "MyApp"),
        "installed: MyApp"
    );
    let rich = render_status_line(OutputStyle::Rich, "installed", "MyApp");
    assert!(rich.contains("installed"));
    assert!(rich.contains("MyApp"));
}

#[test]
fn bundle_lines_include_size_in_megabytes() {
    let lines = format_bundle_lines(&[sample_bundle("MyApp", 2 * 1024 * 1024)]);
    assert_eq!(lines, vec!["MyApp (2.0 MB) [bundle]".to_string()]);
}

#[test]
fn package_lines_include_version() {
    let lines = format_package_lines(&[sample_package("bat", "0.24.0-1")]);
    assert_eq!(lines, vec!["bat (0.24.0-1) [package]".to_string()]);
}

#[test]
fn listing_summary_counts_both_kinds() {
    let summary = format_listing_summary(
        &[sample_bundle("MyApp", 1024)],
        &[sample_package("bat", "1"), sample_package("fd", "2")],
    );
    assert_eq!(summary, "Found 1 bundle(s) and 2 package(s)");
}

#[test]
fn log_summary_lines_render_entries() {
    let lines = format_log_summary(&[LogSummaryEntry {
        name: "appcask main log".to_string(),
        file_name: "appcask.log".to_string(),
        size_kilobytes: 1.5,
        modified: "2026-02-01 10:00:00".to_string(),
    }]);
    assert_eq!(
        lines,
        vec!["appcask main log (appcask.log, 1.5 KB, modified 2026-02-01 10:00:00)".to_string()]
    );

    assert_eq!(
        format_log_summary(&[]),
        vec!["No log files found".to_string()]
    );
}

#[test]
fn completions_generate_script() {
    let mut generated = Vec::new();
    completion::write_completions(Shell::Bash, &mut generated)
        .expect("completions must generate");
    let script = String::from_utf8(generated).expect("completion script must be utf-8");
    assert!(script.contains("appcask"));
}
