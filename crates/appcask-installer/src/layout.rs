use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const ENTRY_POINT_NAME: &str = "AppRun";
pub const LAUNCHER_NAME: &str = "appcask-launch";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeLayout {
    home: PathBuf,
    applications_root: PathBuf,
}

impl HomeLayout {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let applications_root = home.join("Applications");
        Self {
            home,
            applications_root,
        }
    }

    pub fn with_applications_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.applications_root = root.into();
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn applications_root(&self) -> &Path {
        &self.applications_root
    }

    pub fn bundle_dir(&self, name: &str) -> PathBuf {
        self.applications_root.join(name)
    }

    pub fn entry_point_path(&self, name: &str) -> PathBuf {
        self.bundle_dir(name).join(ENTRY_POINT_NAME)
    }

    pub fn config_dir(&self, name: &str) -> PathBuf {
        self.home.join(".config").join(name)
    }

    pub fn config_backup_dir(&self, name: &str) -> PathBuf {
        self.home.join(format!(".config_backup_{name}_temp"))
    }

    pub fn settings_path(&self) -> PathBuf {
        self.home.join(".config").join("appcask").join("config.toml")
    }

    pub fn menu_entry_dir(&self) -> PathBuf {
        self.home.join(".local").join("share").join("applications")
    }

    pub fn menu_entry_path(&self, name: &str) -> PathBuf {
        self.menu_entry_dir().join(format!("{name}.desktop"))
    }

    pub fn user_bin_dir(&self) -> PathBuf {
        self.home.join(".local").join("bin")
    }

    pub fn launcher_path(&self) -> PathBuf {
        self.user_bin_dir().join(LAUNCHER_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.home.join(".local").join("share").join("appcask")
    }

    pub fn operations_log_path(&self) -> PathBuf {
        self.log_dir().join("appcask.log")
    }

    pub fn package_log_path(&self) -> PathBuf {
        self.log_dir().join("packages.log")
    }

    pub fn apps_log_dir(&self) -> PathBuf {
        self.log_dir().join("apps")
    }

    pub fn app_log_path(&self, name: &str) -> PathBuf {
        self.apps_log_dir().join(format!("{name}.log"))
    }

    pub fn launch_fallback_log_path(&self) -> PathBuf {
        self.home.join("appcask_launch_errors.log")
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        for dir in [
            self.applications_root.clone(),
            self.menu_entry_dir(),
            self.user_bin_dir(),
            self.log_dir(),
            self.apps_log_dir(),
        ] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}

pub fn default_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set; cannot resolve user home")?;
    Ok(PathBuf::from(home))
}
