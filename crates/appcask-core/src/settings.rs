use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_LAUNCH_GRACE_SECONDS: u64 = 3;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub applications_root: Option<PathBuf>,
    pub launch_grace_seconds: Option<u64>,
}

impl Settings {
    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse settings")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read settings file: {}", path.display()));
            }
        };

        Self::parse(&raw).with_context(|| format!("failed parsing settings file: {}", path.display()))
    }

    pub fn launch_grace(&self) -> Duration {
        Duration::from_secs(
            self.launch_grace_seconds
                .unwrap_or(DEFAULT_LAUNCH_GRACE_SECONDS),
        )
    }
}
