use crate::plotter::rendering::capture_image;
use crate::GuiError;
use dragometer_core::PlotRegistry;
use std::fs;
use std::path::{Path, PathBuf};

/// File a plot's screenshot is written to: `<dir>/<id>.png`.
///
/// Path separators in the id are replaced so every file lands directly in `dir`.
pub fn screenshot_path(dir: &Path, plot_id: &str) -> PathBuf {
    let name: String = plot_id
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    dir.join(format!("{name}.png"))
}

#[derive(Debug, Default)]
pub struct ScreenshotReport {
    pub saved: Vec<PathBuf>,
    pub failed: Vec<(String, GuiError)>,
}

impl ScreenshotReport {
    /// One-line summary for the toolbar status.
    pub fn summary(&self, dir: &Path) -> String {
        match self.failed.first() {
            None => format!(
                "Saved {} screenshot(s) to {}",
                self.saved.len(),
                dir.display()
            ),
            Some((id, err)) => format!(
                "Saved {} screenshot(s), {} failed (plot '{id}': {err})",
                self.saved.len(),
                self.failed.len()
            ),
        }
    }
}

/// Writes a PNG of every plot in `registry` into `dir`.
///
/// A failure on one plot is logged and recorded; the remaining plots are
/// still exported.
pub fn export_screenshots(registry: &PlotRegistry, dir: &Path, size: (u32, u32)) -> ScreenshotReport {
    let mut report = ScreenshotReport::default();
    if let Err(err) = fs::create_dir_all(dir) {
        log::error!("cannot create screenshot directory {}: {err}", dir.display());
        for plot in registry.iter() {
            report.failed.push((
                plot.id().to_string(),
                GuiError::Io {
                    path: dir.to_path_buf(),
                    source: std::io::Error::new(err.kind(), err.to_string()),
                },
            ));
        }
        return report;
    }

    let (width, height) = size;
    for plot in registry.iter() {
        let path = screenshot_path(dir, plot.id());
        let result = capture_image(plot, width, height).and_then(|png| {
            fs::write(&path, png).map_err(|source| GuiError::Io {
                path: path.clone(),
                source,
            })
        });
        match result {
            Ok(()) => {
                log::info!("saved screenshot of plot '{}' to {}", plot.id(), path.display());
                report.saved.push(path);
            }
            Err(err) => {
                log::error!("screenshot of plot '{}' failed: {err}", plot.id());
                report.failed.push((plot.id().to_string(), err));
            }
        }
    }
    report
}
