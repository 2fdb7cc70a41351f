//! Everything a producer needs to drive a Dragometer dashboard.
//!
//! Producers are written against the [`Dashboard`] trait. Built into the host
//! they receive the controller directly; compiled as a separate `cdylib` they
//! receive a [`ffi::RemoteDashboard`] that forwards across the C ABI. Use
//! [`export_producer!`] to generate the symbols the host looks for.

pub mod error;
pub mod ffi;
pub mod validate;

pub use error::DashboardError;

/// Result returned by a producer entry point.
pub type ProducerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Signature of a producer entry point.
pub type ProducerEntry = fn(&dyn Dashboard) -> ProducerResult;

/// The call surface a producer uses to create and feed plots.
///
/// Every method validates its arguments before returning and fails with
/// [`DashboardError::InvalidArgument`] on malformed input. Accepted calls are
/// applied later on the rendering thread; failures found there (unknown plot,
/// duplicate id, subplot index out of range) are logged by the dashboard and
/// never come back to the caller.
pub trait Dashboard {
    fn add_plot(&self, id: &str) -> Result<(), DashboardError>;

    /// Sets the number of overlaid series. Only allowed before the plot holds data.
    fn set_subplots(&self, id: &str, count: usize) -> Result<(), DashboardError>;

    fn set_title(&self, id: &str, title: &str) -> Result<(), DashboardError>;

    fn set_x_axis_title(&self, id: &str, title: &str) -> Result<(), DashboardError>;

    fn set_y_axis_title(&self, id: &str, title: &str) -> Result<(), DashboardError>;

    /// Fixes the X upper bound. `x_max` must be `>= 0`.
    fn set_x_max(&self, id: &str, x_max: f64) -> Result<(), DashboardError>;

    fn set_y_min(&self, id: &str, y_min: f64) -> Result<(), DashboardError>;

    fn set_y_max(&self, id: &str, y_max: f64) -> Result<(), DashboardError>;

    /// Appends `(x, y)` to the series at `subplot_index`. `x` must be `>= 0`.
    fn plot_on(&self, id: &str, x: f64, y: f64, subplot_index: usize)
        -> Result<(), DashboardError>;

    /// Appends `(x, y)` to the first series.
    fn plot(&self, id: &str, x: f64, y: f64) -> Result<(), DashboardError> {
        self.plot_on(id, x, y, 0)
    }
}

pub mod prelude {
    pub use crate::{Dashboard, DashboardError, ProducerEntry, ProducerResult};
}
