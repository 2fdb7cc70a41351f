use crate::dispatch::{Axis, Bound, Dispatch, DispatchPump, PlotOp};
use connection::{connect, ConnectionConfig, ConnectionSender};
use dragometer_plugin::{validate, Dashboard, DashboardError};

/// Producer-side handle of a dashboard.
///
/// Every call is validated in the caller's thread and then queued for the
/// rendering thread; it returns without waiting for the update to be applied.
#[derive(Debug, Clone)]
pub struct DashboardController {
    sender: ConnectionSender<Dispatch>,
}

/// Creates a controller and the pump that applies its dispatches.
pub fn dashboard_channel(config: &ConnectionConfig) -> (DashboardController, DispatchPump) {
    let (sender, receiver) = connect(config);
    (DashboardController { sender }, DispatchPump::new(receiver))
}

impl DashboardController {
    fn dispatch(&self, plot_id: &str, op: PlotOp) -> Result<(), DashboardError> {
        self.sender
            .send(Dispatch {
                plot_id: plot_id.to_string(),
                op,
            })
            .map(|_| ())
            .map_err(|_| DashboardError::Disconnected)
    }

    fn set_text(&self, id: &str, op: PlotOp) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        self.dispatch(id, op)
    }

    pub fn dropped_count(&self) -> u64 {
        self.sender.dropped_count()
    }
}

impl Dashboard for DashboardController {
    fn add_plot(&self, id: &str) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        self.dispatch(id, PlotOp::AddPlot)
    }

    fn set_subplots(&self, id: &str, count: usize) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        let count = validate::subplot_count(count)?;
        self.dispatch(id, PlotOp::SetSubplots(count))
    }

    fn set_title(&self, id: &str, title: &str) -> Result<(), DashboardError> {
        self.set_text(id, PlotOp::SetTitle(title.to_string()))
    }

    fn set_x_axis_title(&self, id: &str, title: &str) -> Result<(), DashboardError> {
        self.set_text(id, PlotOp::SetAxisTitle(Axis::X, title.to_string()))
    }

    fn set_y_axis_title(&self, id: &str, title: &str) -> Result<(), DashboardError> {
        self.set_text(id, PlotOp::SetAxisTitle(Axis::Y, title.to_string()))
    }

    fn set_x_max(&self, id: &str, x_max: f64) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        let x_max = validate::non_negative("x_max", x_max)?;
        self.dispatch(id, PlotOp::SetBound(Bound::XMax, x_max))
    }

    fn set_y_min(&self, id: &str, y_min: f64) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        let y_min = validate::finite("y_min", y_min)?;
        self.dispatch(id, PlotOp::SetBound(Bound::YMin, y_min))
    }

    fn set_y_max(&self, id: &str, y_max: f64) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        let y_max = validate::finite("y_max", y_max)?;
        self.dispatch(id, PlotOp::SetBound(Bound::YMax, y_max))
    }

    fn plot_on(
        &self,
        id: &str,
        x: f64,
        y: f64,
        subplot_index: usize,
    ) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        let x = validate::non_negative("x", x)?;
        let y = validate::finite("y", y)?;
        self.dispatch(
            id,
            PlotOp::AppendPoint {
                x,
                y,
                subplot: subplot_index,
            },
        )
    }
}
