use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledBundle {
    pub name: String,
    pub directory: PathBuf,
    pub entry_point: PathBuf,
    pub size_bytes: u64,
    pub menu_entry: Option<PathBuf>,
}

impl InstalledBundle {
    pub fn size_megabytes(&self) -> f64 {
        let megabytes = self.size_bytes as f64 / (1024.0 * 1024.0);
        (megabytes * 10.0).round() / 10.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleStage {
    Extracting,
    Naming,
    Relocating,
    MenuEntry,
    Permissions,
    Done,
}

impl BundleStage {
    pub fn percent(self) -> u8 {
        match self {
            Self::Extracting => 10,
            Self::Naming => 25,
            Self::Relocating => 40,
            Self::MenuEntry => 70,
            Self::Permissions => 90,
            Self::Done => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStage {
    Validate,
    ReadMetadata,
    Prepare,
    Install,
    Verify,
    Done,
}

impl PackageStage {
    pub fn percent(self) -> u8 {
        match self {
            Self::Validate => 10,
            Self::ReadMetadata => 25,
            Self::Prepare => 60,
            Self::Install => 80,
            Self::Verify => 95,
            Self::Done => 100,
        }
    }
}
