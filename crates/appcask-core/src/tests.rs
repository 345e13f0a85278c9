use std::path::Path;
use std::time::Duration;

use super::*;

#[test]
fn derive_name_strips_version_and_architecture() {
    assert_eq!(derive_app_name("MyApp-1.2.3-x86_64"), "MyApp");
}

#[test]
fn derive_name_strips_v_prefixed_version_and_qualifier() {
    assert_eq!(derive_app_name("cool_tool_v2"), "cool_tool");
    assert_eq!(derive_app_name("cool_tool_v2.0(beta)"), "cool_tool");
}

#[test]
fn derive_name_keeps_plain_stems_unchanged() {
    assert_eq!(derive_app_name("Inkscape"), "Inkscape");
    assert_eq!(derive_app_name("gimp"), "gimp");
}

#[test]
fn derive_name_strips_bracketed_qualifiers_without_version() {
    assert_eq!(derive_app_name("MyApp(nightly)"), "MyApp");
    assert_eq!(derive_app_name("MyApp[portable]"), "MyApp");
}

#[test]
fn derive_name_keeps_unclosed_bracket_text() {
    assert_eq!(derive_app_name("MyApp(beta"), "MyApp(beta");
}

#[test]
fn derive_name_falls_back_to_raw_stem_when_stripping_empties() {
    assert_eq!(derive_app_name("2.0"), "2.0");
    assert_eq!(derive_app_name("v2ray"), "v2ray");
}

#[test]
fn derive_name_is_idempotent() {
    for stem in [
        "MyApp-1.2.3-x86_64",
        "cool_tool_v2.0(beta)",
        "Inkscape",
        "v2ray",
        "App-2024-beta",
    ] {
        let first = derive_app_name(stem);
        assert_eq!(derive_app_name(&first), first, "not idempotent for {stem}");
    }
}

#[test]
fn derive_name_trims_trailing_separators() {
    assert_eq!(derive_app_name("MyApp-(nightly)"), "MyApp");
    assert_eq!(derive_app_name("tool__[arm]"), "tool");
}

#[test]
fn parse_control_fields_splits_on_first_colon_space() {
    let raw = " Package: ripgrep\n Version: 14.1.0-1\n Description: grep: but faster\n ignored line\n";
    let fields = parse_control_fields(raw);
    assert_eq!(fields.get("Package").map(String::as_str), Some("ripgrep"));
    assert_eq!(fields.get("Version").map(String::as_str), Some("14.1.0-1"));
    assert_eq!(
        fields.get("Description").map(String::as_str),
        Some("grep: but faster")
    );
    assert_eq!(fields.len(), 3);
}

#[test]
fn parse_control_fields_ignores_empty_keys() {
    let fields = parse_control_fields(": orphan value\n");
    assert!(fields.is_empty());
}

#[test]
fn parse_package_listing_keeps_only_properly_installed_rows() {
    let raw = "\
Desired=Unknown/Install/Remove/Purge/Hold
| Status=Not/Inst/Conf-files/Unpacked/halF-conf/Half-inst/trig-aWait/Trig-pend
|/ Err?=(none)/Reinst-required (Status,Err: uppercase=bad)
||/ Name           Version      Architecture Description
+++-==============-============-============-=================================
ii  zlib1g         1.3.dfsg-3   amd64        compression library - runtime
rc  old-tool       0.9-1        amd64        removed but configured
ii  bat            0.24.0-1     amd64        cat clone with wings
";
    let packages = parse_package_listing(raw);
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0].name, "bat");
    assert_eq!(packages[0].version, "0.24.0-1");
    assert_eq!(packages[0].description, "amd64 cat clone with wings");
    assert_eq!(packages[1].name, "zlib1g");
}

#[test]
fn parse_package_listing_sorts_by_name() {
    let raw = "ii  zsh 5.9-4 amd64 shell\nii  bash 5.2-2 amd64 shell\n";
    let packages = parse_package_listing(raw);
    assert_eq!(packages[0].name, "bash");
    assert_eq!(packages[1].name, "zsh");
}

#[test]
fn render_menu_entry_uses_launcher_wrapper_exec() {
    let rendered = render_menu_entry(
        "MyApp",
        Path::new("/home/u/.local/bin/appcask-launch"),
        Path::new("/home/u/Applications/MyApp/AppRun"),
        Path::new("/home/u/Applications/MyApp/icon.png"),
    );
    assert_eq!(
        rendered,
        "[Desktop Entry]\n\
         Name=MyApp\n\
         Exec=/home/u/.local/bin/appcask-launch \"MyApp\" \"/home/u/Applications/MyApp/AppRun\"\n\
         Icon=/home/u/Applications/MyApp/icon.png\n\
         Type=Application\n\
         Categories=Utility;\n\
         Terminal=false\n\
         StartupNotify=true\n"
    );
}

#[test]
fn bundle_stage_percentages_are_monotonic() {
    let stages = [
        BundleStage::Extracting,
        BundleStage::Naming,
        BundleStage::Relocating,
        BundleStage::MenuEntry,
        BundleStage::Permissions,
        BundleStage::Done,
    ];
    for pair in stages.windows(2) {
        assert!(pair[0].percent() < pair[1].percent());
    }
    assert_eq!(BundleStage::Done.percent(), 100);
}

#[test]
fn package_stage_percentages_are_monotonic() {
    let stages = [
        PackageStage::Validate,
        PackageStage::ReadMetadata,
        PackageStage::Prepare,
        PackageStage::Install,
        PackageStage::Verify,
        PackageStage::Done,
    ];
    for pair in stages.windows(2) {
        assert!(pair[0].percent() < pair[1].percent());
    }
    assert_eq!(PackageStage::Done.percent(), 100);
}

#[test]
fn bundle_size_rounds_to_one_decimal() {
    let bundle = InstalledBundle {
        name: "demo".to_string(),
        directory: Path::new("/tmp/demo").to_path_buf(),
        entry_point: Path::new("/tmp/demo/AppRun").to_path_buf(),
        size_bytes: 1_572_864,
        menu_entry: None,
    };
    assert_eq!(bundle.size_megabytes(), 1.5);
}

#[test]
fn settings_parse_defaults_and_overrides() {
    let defaults = Settings::parse("").expect("empty settings must parse");
    assert_eq!(defaults, Settings::default());
    assert_eq!(defaults.launch_grace(), Duration::from_secs(3));

    let parsed = Settings::parse(
        "applications_root = \"/srv/apps\"\nlaunch_grace_seconds = 5\n",
    )
    .expect("settings must parse");
    assert_eq!(
        parsed.applications_root.as_deref(),
        Some(Path::new("/srv/apps"))
    );
    assert_eq!(parsed.launch_grace(), Duration::from_secs(5));
}

#[test]
fn settings_reject_unknown_fields() {
    assert!(Settings::parse("no_such_field = true\n").is_err());
}

#[test]
fn settings_load_missing_file_yields_defaults() {
    let loaded =
        Settings::load(Path::new("/nonexistent/appcask/config.toml")).expect("must default");
    assert_eq!(loaded, Settings::default());
}
