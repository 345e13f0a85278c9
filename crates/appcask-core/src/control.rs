use std::collections::BTreeMap;

use crate::types::InstalledPackage;

pub const PROPERLY_INSTALLED_MARKER: &str = "ii";

pub fn parse_control_fields(raw: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for line in raw.lines() {
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), value.trim().to_string());
    }
    fields
}

pub fn parse_package_listing(raw: &str) -> Vec<InstalledPackage> {
    let mut packages = Vec::new();
    for line in raw.lines() {
        let mut parts = line.split_whitespace();
        let Some(status) = parts.next() else {
            continue;
        };
        if status != PROPERLY_INSTALLED_MARKER {
            continue;
        }
        let Some(name) = parts.next() else {
            continue;
        };
        let Some(version) = parts.next() else {
            continue;
        };
        let description = parts.collect::<Vec<_>>().join(" ");

        packages.push(InstalledPackage {
            name: name.to_string(),
            version: version.to_string(),
            description,
        });
    }

    packages.sort_by(|a, b| a.name.cmp(&b.name));
    packages
}
