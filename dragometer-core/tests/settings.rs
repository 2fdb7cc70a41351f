use connection::ConnectionKind;
use dragometer_core::settings::SETTINGS_FILE_NAME;
use dragometer_core::{DashboardSettings, PlotRegistry, QueuePolicy, SettingsError};
use std::path::Path;

#[test]
fn defaults_match_the_documented_values() {
    let settings = DashboardSettings::default();
    assert_eq!(settings.window.title, "Dragometer");
    assert_eq!(settings.queue.policy, QueuePolicy::Unbounded);
    assert_eq!(settings.plot.padding, 0.001);
    assert_eq!(settings.screenshot_size(), (900, 320));
    settings.validate().expect("defaults are valid");
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("custom.toml");
    std::fs::write(
        &path,
        r#"
[window]
title = "Platoon"

[queue]
policy = "drop_newest"
capacity = 128

[screenshot]
width = 1920
"#,
    )
    .expect("write settings");

    let settings = DashboardSettings::load(&path).expect("load settings");
    assert_eq!(settings.window.title, "Platoon");
    assert_eq!(settings.window.width, 1000.0);
    let config = settings.queue.connection_config();
    assert_eq!(config.kind, ConnectionKind::DropNewest);
    assert_eq!(config.queue_capacity, 128);
    assert_eq!(settings.screenshot_size(), (1920, 320));
}

#[test]
fn plot_padding_is_an_absolute_margin() {
    let settings =
        DashboardSettings::from_toml_str("[plot]\npadding = 0.5\n", Path::new("padding.toml"))
            .expect("parse settings");
    let mut registry = PlotRegistry::with_padding(settings.plot.padding);
    let plot = registry.add("1").expect("add plot");
    plot.append(0.0, 10.0, 0).expect("append");
    plot.append(1.0, -4.0, 0).expect("append");
    assert_eq!(plot.bounds().y_min, Some(-4.5));
    assert_eq!(plot.bounds().y_max, Some(10.5));
}

#[test]
fn working_directory_file_is_picked_up() {
    let dir = tempfile::tempdir().expect("tempdir");
    let loaded = DashboardSettings::load_or_default(None, dir.path()).expect("defaults");
    assert_eq!(loaded, DashboardSettings::default());

    std::fs::write(
        dir.path().join(SETTINGS_FILE_NAME),
        "[render]\nrepaint_ms = 40\n",
    )
    .expect("write settings");
    let loaded = DashboardSettings::load_or_default(None, dir.path()).expect("load");
    assert_eq!(loaded.render.repaint_ms, 40);
}

#[test]
fn broken_or_invalid_files_are_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[window\ntitle = 3").expect("write settings");
    assert!(matches!(
        DashboardSettings::load(&path),
        Err(SettingsError::Parse { .. })
    ));

    std::fs::write(&path, "[queue]\npolicy = \"block\"\ncapacity = 0\n").expect("write settings");
    assert!(matches!(
        DashboardSettings::load(&path),
        Err(SettingsError::Invalid(_))
    ));

    let missing = dir.path().join("missing.toml");
    assert!(matches!(
        DashboardSettings::load_or_default(Some(&missing), dir.path()),
        Err(SettingsError::Io { .. })
    ));
}
