mod control;
mod desktop;
mod naming;
mod settings;
mod types;

pub use control::{parse_control_fields, parse_package_listing, PROPERLY_INSTALLED_MARKER};
pub use desktop::render_menu_entry;
pub use naming::derive_app_name;
pub use settings::Settings;
pub use types::{BundleStage, InstalledBundle, InstalledPackage, PackageStage};

#[cfg(test)]
mod tests;
