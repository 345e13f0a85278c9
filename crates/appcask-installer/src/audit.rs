use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::layout::HomeLayout;

const ENTRY_SEPARATOR: &str =
    "============================================================";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OperationLog {
    layout: HomeLayout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogSummaryEntry {
    pub name: String,
    pub file_name: String,
    pub size_kilobytes: f64,
    pub modified: String,
}

impl OperationLog {
    pub fn open(layout: &HomeLayout) -> Result<Self> {
        for dir in [layout.log_dir(), layout.apps_log_dir()] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log dir: {}", dir.display()))?;
        }
        Ok(Self {
            layout: layout.clone(),
        })
    }

    pub fn record_operation(&self, level: &str, message: &str) {
        let line = format!(
            "{} - {} - {}\n",
            timestamp(),
            level.to_ascii_uppercase(),
            message
        );
        let _ = append(&self.layout.operations_log_path(), &line);
    }

    pub fn record_launch(
        &self,
        app_name: &str,
        command: &[String],
        success: bool,
        error_output: Option<&str>,
    ) -> Result<()> {
        let block = render_record_block(
            "Launch attempt",
            &format!("Command: {}", command.join(" ")),
            success,
            error_output,
        );
        append(&self.layout.app_log_path(app_name), &block)
            .with_context(|| format!("failed to write launch record for {app_name}"))?;

        if success {
            self.record_operation("info", &format!("App launch successfully: {app_name}"));
        } else {
            self.record_operation("info", &format!("App launch failed: {app_name}"));
            if let Some(error_output) = error_output {
                self.record_operation(
                    "error",
                    &format!("App launch error for {app_name}: {error_output}"),
                );
            }
        }
        Ok(())
    }

    pub fn record_package_install(
        &self,
        name: &str,
        version: &str,
        success: bool,
        error_output: Option<&str>,
    ) {
        let block = render_record_block(
            "Installation attempt",
            &format!("Package: {name} {version}"),
            success,
            error_output,
        );
        let _ = append(&self.layout.package_log_path(), &block);

        let status = if success { "successfully" } else { "failed" };
        self.record_operation(
            "info",
            &format!("Package installation {status}: {name} {version}"),
        );
        if !success {
            if let Some(error_output) = error_output {
                self.record_operation(
                    "error",
                    &format!("Package installation error for {name}: {error_output}"),
                );
            }
        }
    }

    pub fn record_package_uninstall(&self, name: &str, success: bool, error_output: Option<&str>) {
        let block = render_record_block(
            "Uninstallation attempt",
            &format!("Package: {name}"),
            success,
            error_output,
        );
        let _ = append(&self.layout.package_log_path(), &block);

        let status = if success { "successfully" } else { "failed" };
        self.record_operation(
            "info",
            &format!("Package uninstallation {status}: {name}"),
        );
        if !success {
            if let Some(error_output) = error_output {
                self.record_operation(
                    "error",
                    &format!("Package uninstallation error for {name}: {error_output}"),
                );
            }
        }
    }

    pub fn read_app_log(&self, app_name: &str) -> Result<String> {
        let path = self.layout.app_log_path(app_name);
        if !path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read app log: {}", path.display()))
    }

    pub fn read_recent_operations(&self, lines: usize) -> Result<String> {
        let path = self.layout.operations_log_path();
        if !path.exists() {
            return Ok(String::new());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read operations log: {}", path.display()))?;
        let all: Vec<&str> = raw.lines().collect();
        let start = all.len().saturating_sub(lines);
        Ok(all[start..].join("\n"))
    }

    pub fn clear_app_logs(&self, app_name: Option<&str>) -> Result<()> {
        match app_name {
            Some(app_name) => {
                let path = self.layout.app_log_path(app_name);
                crate::fs_utils::remove_file_if_exists(&path)
                    .with_context(|| format!("failed to clear app log: {}", path.display()))?;
                self.record_operation("info", &format!("Cleared logs for {app_name}"));
            }
            None => {
                let dir = self.layout.apps_log_dir();
                if dir.exists() {
                    for entry in fs::read_dir(&dir).with_context(|| {
                        format!("failed to read app log dir: {}", dir.display())
                    })? {
                        let entry = entry?;
                        let path = entry.path();
                        if path.extension().and_then(|v| v.to_str()) != Some("log") {
                            continue;
                        }
                        fs::remove_file(&path).with_context(|| {
                            format!("failed to clear app log: {}", path.display())
                        })?;
                    }
                }
                self.record_operation("info", "Cleared all application logs");
            }
        }
        Ok(())
    }

    pub fn summarize_logs(&self) -> Result<Vec<LogSummaryEntry>> {
        let mut summary = Vec::new();

        let main_log = self.layout.operations_log_path();
        if main_log.exists() {
            summary.push(summary_entry("appcask main log", &main_log)?);
        }

        let dir = self.layout.apps_log_dir();
        if dir.exists() {
            let mut app_logs = Vec::new();
            for entry in fs::read_dir(&dir)
                .with_context(|| format!("failed to read app log dir: {}", dir.display()))?
            {
                let entry = entry?;
                let path = entry.path();
                if path.extension().and_then(|v| v.to_str()) != Some("log") {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|v| v.to_str()) else {
                    continue;
                };
                app_logs.push(summary_entry(&format!("{stem} app log"), &path)?);
            }
            app_logs.sort_by(|a, b| a.file_name.cmp(&b.file_name));
            summary.extend(app_logs);
        }

        Ok(summary)
    }
}

pub fn record_launch_or_fallback(
    log: &OperationLog,
    layout: &HomeLayout,
    app_name: &str,
    command: &[String],
    success: bool,
    error_output: Option<&str>,
) {
    if let Err(err) = log.record_launch(app_name, command, success, error_output) {
        let line = format!("{}: Failed to log for {app_name}: {err:#}\n", timestamp());
        let _ = append(&layout.launch_fallback_log_path(), &line);
    }
}

fn summary_entry(name: &str, path: &Path) -> Result<LogSummaryEntry> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to stat log file: {}", path.display()))?;
    let size_kilobytes = ((metadata.len() as f64 / 1024.0) * 10.0).round() / 10.0;
    let modified = metadata
        .modified()
        .map(|value| DateTime::<Local>::from(value).format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default();

    Ok(LogSummaryEntry {
        name: name.to_string(),
        file_name: path
            .file_name()
            .and_then(|v| v.to_str())
            .unwrap_or_default()
            .to_string(),
        size_kilobytes,
        modified,
    })
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn render_record_block(
    kind: &str,
    subject: &str,
    success: bool,
    error_output: Option<&str>,
) -> String {
    let mut block = String::new();
    block.push('\n');
    block.push_str(ENTRY_SEPARATOR);
    block.push('\n');
    block.push_str(&format!("{kind}: {}\n", timestamp()));
    block.push_str(subject);
    block.push('\n');
    block.push_str(&format!(
        "Status: {}\n",
        if success { "SUCCESS" } else { "FAILED" }
    ));
    if !success {
        if let Some(error_output) = error_output {
            block.push_str(&format!("\nError Output:\n{error_output}\n"));
        }
    }
    block.push_str(ENTRY_SEPARATOR);
    block.push('\n');
    block
}

fn append(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file: {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("failed to append log file: {}", path.display()))?;
    file.flush()
        .with_context(|| format!("failed to flush log file: {}", path.display()))?;
    Ok(())
}
