pub mod controller;
pub mod dispatch;
pub mod plot;
pub mod registry;
pub mod settings;

pub use controller::{dashboard_channel, DashboardController};
pub use dispatch::{Axis, Bound, Dispatch, DispatchPump, DrainReport, PlotOp};
pub use dragometer_plugin::{Dashboard, DashboardError};
pub use plot::{AxisBounds, Plot, RescaleState, Series, ViewBounds, DEFAULT_PADDING};
pub use registry::PlotRegistry;
pub use settings::{DashboardSettings, QueuePolicy, SettingsError};
