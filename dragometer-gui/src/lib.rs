use dragometer_core::{DashboardSettings, DispatchPump};
use eframe::egui;
use std::path::PathBuf;
use std::time::Duration;

mod app;
mod plotter;
mod screenshot;

use app::DashboardApp;
pub use plotter::rendering::{capture_image, encode_png};
pub use screenshot::{export_screenshots, screenshot_path, ScreenshotReport};

#[derive(Debug, Clone)]
pub struct GuiConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub plot_width: f32,
    pub plot_height: f32,
    /// Margin added around auto-scaled Y extremes.
    pub padding: f64,
    pub max_dispatches_per_frame: usize,
    pub repaint: Duration,
    pub screenshot_dir: PathBuf,
    pub screenshot_size: (u32, u32),
}

impl From<&DashboardSettings> for GuiConfig {
    fn from(settings: &DashboardSettings) -> Self {
        Self {
            title: settings.window.title.clone(),
            width: settings.window.width,
            height: settings.window.height,
            plot_width: settings.plot.width,
            plot_height: settings.plot.height,
            padding: settings.plot.padding,
            max_dispatches_per_frame: settings.render.max_dispatches_per_frame,
            repaint: Duration::from_millis(settings.render.repaint_ms),
            screenshot_dir: settings.screenshot.directory.clone(),
            screenshot_size: settings.screenshot_size(),
        }
    }
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self::from(&DashboardSettings::default())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GuiError {
    #[error("gui error: {0}")]
    Gui(String),
    #[error("failed to render plot image: {0}")]
    Render(String),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Opens the dashboard window and blocks until it is closed.
///
/// `on_start` runs once the window exists, before the first frame; it is
/// where the caller starts the producer thread. Dispatches are drained from
/// `pump` on every frame.
pub fn run_gui<F>(config: GuiConfig, pump: DispatchPump, on_start: F) -> Result<(), GuiError>
where
    F: FnOnce() + 'static,
{
    let mut options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([config.width, config.height]),
        ..Default::default()
    };
    // NOTE: Vsync generates hangs and lag on occluded windows.
    options.vsync = false;

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| {
            on_start();
            Box::new(DashboardApp::new(config, pump))
        }),
    )
    .map_err(|err| GuiError::Gui(err.to_string()))
}
