use connection::{ConnectionConfig, ConnectionKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the settings file picked up from the working directory.
pub const SETTINGS_FILE_NAME: &str = "dragometer.toml";

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Dragometer".to_string(),
            width: 1000.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub width: f32,
    pub height: f32,
    /// Margin added around auto-scaled Y extremes.
    pub padding: f64,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 320.0,
            padding: crate::plot::DEFAULT_PADDING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueuePolicy {
    Unbounded,
    Block,
    DropNewest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    pub policy: QueuePolicy,
    pub capacity: usize,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            policy: QueuePolicy::Unbounded,
            capacity: ConnectionConfig::default().queue_capacity,
        }
    }
}

impl QueueSettings {
    pub fn connection_config(&self) -> ConnectionConfig {
        let kind = match self.policy {
            QueuePolicy::Unbounded => ConnectionKind::Unbounded,
            QueuePolicy::Block => ConnectionKind::Blocking,
            QueuePolicy::DropNewest => ConnectionKind::DropNewest,
        };
        ConnectionConfig {
            kind,
            queue_capacity: self.capacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub max_dispatches_per_frame: usize,
    pub repaint_ms: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_dispatches_per_frame: 50_000,
            repaint_ms: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotSettings {
    pub directory: PathBuf,
    /// Exported image size; the on-screen plot size when unset.
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Default for ScreenshotSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            width: None,
            height: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub window: WindowSettings,
    pub plot: PlotSettings,
    pub queue: QueueSettings,
    pub render: RenderSettings,
    pub screenshot: ScreenshotSettings,
}

impl DashboardSettings {
    pub fn from_toml_str(data: &str, path: &Path) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(data).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let data = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&data, path)
    }

    /// Loads `explicit` if given, else `dragometer.toml` in `dir` when it
    /// exists, else the defaults.
    pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(SETTINGS_FILE_NAME);
        if candidate.is_file() {
            log::info!("using settings from {}", candidate.display());
            return Self::load(&candidate);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.window.width > 0.0 && self.window.height > 0.0) {
            return Err(SettingsError::Invalid(
                "window width and height must be > 0".to_string(),
            ));
        }
        if !(self.plot.width > 0.0 && self.plot.height > 0.0) {
            return Err(SettingsError::Invalid(
                "plot width and height must be > 0".to_string(),
            ));
        }
        if !self.plot.padding.is_finite() || self.plot.padding < 0.0 {
            return Err(SettingsError::Invalid(
                "plot padding must be a finite number >= 0".to_string(),
            ));
        }
        if self.queue.policy != QueuePolicy::Unbounded && self.queue.capacity == 0 {
            return Err(SettingsError::Invalid(
                "queue capacity must be > 0 for bounded policies".to_string(),
            ));
        }
        if self.render.max_dispatches_per_frame == 0 {
            return Err(SettingsError::Invalid(
                "max_dispatches_per_frame must be > 0".to_string(),
            ));
        }
        if self.screenshot.width == Some(0) || self.screenshot.height == Some(0) {
            return Err(SettingsError::Invalid(
                "screenshot width and height must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Pixel size of exported screenshots.
    pub fn screenshot_size(&self) -> (u32, u32) {
        let width = self
            .screenshot
            .width
            .unwrap_or(self.plot.width.round() as u32);
        let height = self
            .screenshot
            .height
            .unwrap_or(self.plot.height.round() as u32);
        (width.max(1), height.max(1))
    }
}
