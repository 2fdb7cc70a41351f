use dragometer_core::{DashboardSettings, PlotRegistry};
use dragometer_gui::{
    capture_image, encode_png, export_screenshots, screenshot_path, GuiConfig, GuiError,
};
use std::path::Path;
use std::time::Duration;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[test]
fn gui_config_defaults() {
    let config = GuiConfig::default();
    assert_eq!(config.title, "Dragometer");
    assert!(config.width > 0.0);
    assert!(config.height > 0.0);
    assert_eq!(config.repaint, Duration::from_millis(16));
    assert_eq!(config.screenshot_size, (900, 320));
    assert_eq!(config.padding, 0.001);
}

#[test]
fn gui_config_follows_settings() {
    let settings = DashboardSettings::from_toml_str(
        "[window]\ntitle = \"Platoon\"\n[screenshot]\ndirectory = \"shots\"\nwidth = 640\n",
        Path::new("dragometer.toml"),
    )
    .unwrap();
    let config = GuiConfig::from(&settings);
    assert_eq!(config.title, "Platoon");
    assert_eq!(config.screenshot_dir, Path::new("shots"));
    assert_eq!(config.screenshot_size, (640, 320));
}

#[test]
fn screenshot_files_are_named_after_plots() {
    let dir = Path::new("out");
    assert_eq!(screenshot_path(dir, "1"), dir.join("1.png"));
    assert_eq!(
        screenshot_path(dir, "vehicle/1\\drag"),
        dir.join("vehicle_1_drag.png")
    );
}

#[test]
fn png_encoding_checks_the_buffer() {
    let rgb = vec![128u8; 4 * 2 * 3];
    let png = encode_png(&rgb, 4, 2).unwrap();
    assert_eq!(png[..8], PNG_SIGNATURE);

    assert!(matches!(encode_png(&rgb, 4, 3), Err(GuiError::Render(_))));
}

#[test]
fn empty_capture_size_is_rejected() {
    let mut registry = PlotRegistry::new();
    registry.add("1").unwrap();
    let plot = registry.get("1").unwrap();
    assert!(matches!(capture_image(plot, 0, 10), Err(GuiError::Render(_))));
}

#[test]
fn exporting_an_empty_dashboard_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("shots");
    let report = export_screenshots(&PlotRegistry::new(), &target, (200, 100));
    assert!(report.saved.is_empty());
    assert!(report.failed.is_empty());
    assert!(target.is_dir());
    assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);
}

#[test]
fn every_plot_is_saved_as_png() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = PlotRegistry::new();
    let plot = registry.add("1").unwrap();
    plot.set_title("Vehicle 1".to_string());
    plot.set_x_axis_title("Timestep".to_string());
    plot.append(0.0, 5.0, 0).unwrap();
    plot.append(2.0, 7.0, 0).unwrap();

    let report = export_screenshots(&registry, dir.path(), (400, 200));
    assert!(report.failed.is_empty(), "{:?}", report.failed);
    assert_eq!(report.saved.len(), 1);

    let path = dir.path().join("1.png");
    assert_eq!(report.saved[0], path);
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes[..8], PNG_SIGNATURE);
}

#[test]
fn unwritable_directory_fails_every_plot() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();

    let mut registry = PlotRegistry::new();
    registry.add("1").unwrap();
    registry.add("2").unwrap();
    let report = export_screenshots(&registry, &blocker.join("shots"), (200, 100));
    assert!(report.saved.is_empty());
    assert_eq!(report.failed.len(), 2);
    assert!(report.summary(&blocker).contains("2 failed"));
}
