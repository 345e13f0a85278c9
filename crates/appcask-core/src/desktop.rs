use std::path::Path;

pub fn render_menu_entry(
    app_name: &str,
    launcher_path: &Path,
    entry_point: &Path,
    icon_path: &Path,
) -> String {
    let mut entry = String::new();
    entry.push_str("[Desktop Entry]\n");
    entry.push_str(&format!("Name={app_name}\n"));
    entry.push_str(&format!(
        "Exec={} \"{}\" \"{}\"\n",
        launcher_path.display(),
        app_name,
        entry_point.display()
    ));
    entry.push_str(&format!("Icon={}\n", icon_path.display()));
    entry.push_str("Type=Application\n");
    entry.push_str("Categories=Utility;\n");
    entry.push_str("Terminal=false\n");
    entry.push_str("StartupNotify=true\n");
    entry
}
