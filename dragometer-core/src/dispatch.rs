use crate::registry::PlotRegistry;
use connection::ConnectionReceiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    XMax,
    YMin,
    YMax,
}

/// A single already-validated mutation of one plot.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotOp {
    AddPlot,
    SetSubplots(usize),
    SetTitle(String),
    SetAxisTitle(Axis, String),
    SetBound(Bound, f64),
    AppendPoint { x: f64, y: f64, subplot: usize },
}

impl PlotOp {
    pub fn name(&self) -> &'static str {
        match self {
            PlotOp::AddPlot => "add_plot",
            PlotOp::SetSubplots(_) => "set_subplots",
            PlotOp::SetTitle(_) => "set_title",
            PlotOp::SetAxisTitle(Axis::X, _) => "set_x_axis_title",
            PlotOp::SetAxisTitle(Axis::Y, _) => "set_y_axis_title",
            PlotOp::SetBound(Bound::XMax, _) => "set_x_max",
            PlotOp::SetBound(Bound::YMin, _) => "set_y_min",
            PlotOp::SetBound(Bound::YMax, _) => "set_y_max",
            PlotOp::AppendPoint { .. } => "plot",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub plot_id: String,
    pub op: PlotOp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub applied: usize,
    pub failed: usize,
    /// Every producer handle is gone and the queue is empty.
    pub producer_gone: bool,
}

/// Rendering-thread end of the dispatch queue.
#[derive(Debug)]
pub struct DispatchPump {
    receiver: ConnectionReceiver<Dispatch>,
    producer_gone: bool,
}

impl DispatchPump {
    pub(crate) fn new(receiver: ConnectionReceiver<Dispatch>) -> Self {
        Self {
            receiver,
            producer_gone: false,
        }
    }

    /// Applies up to `limit` queued dispatches to `registry`, in submission order.
    ///
    /// Dispatches that fail to apply are logged and counted; they do not stop
    /// the drain.
    pub fn drain(&mut self, registry: &mut PlotRegistry, limit: usize) -> DrainReport {
        let mut report = DrainReport {
            producer_gone: self.producer_gone,
            ..DrainReport::default()
        };
        if self.producer_gone {
            return report;
        }
        while report.applied + report.failed < limit {
            let dispatch = match self.receiver.try_recv() {
                Ok(Some(dispatch)) => dispatch,
                Ok(None) => break,
                Err(_) => {
                    log::info!("producer disconnected from the dashboard");
                    self.producer_gone = true;
                    report.producer_gone = true;
                    break;
                }
            };
            let operation = dispatch.op.name();
            let plot_id = dispatch.plot_id.clone();
            match registry.apply(dispatch) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    log::error!("failed to apply {operation} to plot '{plot_id}': {err}");
                    report.failed += 1;
                }
            }
        }
        report
    }

    pub fn dropped_count(&self) -> u64 {
        self.receiver.dropped_count()
    }
}
