use crate::dispatch::{Axis, Bound, Dispatch, PlotOp};
use crate::plot::{Plot, DEFAULT_PADDING};
use dragometer_plugin::DashboardError;
use std::collections::HashMap;

/// All live plots, keyed by id, kept in the order they were added.
#[derive(Debug)]
pub struct PlotRegistry {
    plots: Vec<Plot>,
    index: HashMap<String, usize>,
    padding: f64,
}

impl Default for PlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotRegistry {
    pub fn new() -> Self {
        Self::with_padding(DEFAULT_PADDING)
    }

    /// Plots created by this registry pad auto-scaled Y bounds by `padding`.
    pub fn with_padding(padding: f64) -> Self {
        Self {
            plots: Vec::new(),
            index: HashMap::new(),
            padding,
        }
    }

    pub fn len(&self) -> usize {
        self.plots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plot> {
        self.plots.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Result<&Plot, DashboardError> {
        self.index
            .get(id)
            .map(|&idx| &self.plots[idx])
            .ok_or_else(|| DashboardError::NotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Plot, DashboardError> {
        match self.index.get(id) {
            Some(&idx) => Ok(&mut self.plots[idx]),
            None => Err(DashboardError::NotFound(id.to_string())),
        }
    }

    pub fn add(&mut self, id: &str) -> Result<&mut Plot, DashboardError> {
        if self.index.contains_key(id) {
            return Err(DashboardError::DuplicateKey(id.to_string()));
        }
        let idx = self.plots.len();
        self.plots.push(Plot::with_padding(id, self.padding));
        self.index.insert(id.to_string(), idx);
        log::debug!("plot '{id}' added");
        Ok(&mut self.plots[idx])
    }

    pub fn apply(&mut self, dispatch: Dispatch) -> Result<(), DashboardError> {
        let Dispatch { plot_id, op } = dispatch;
        if let PlotOp::AddPlot = op {
            self.add(&plot_id)?;
            return Ok(());
        }
        let plot = self.get_mut(&plot_id)?;
        match op {
            PlotOp::AddPlot => unreachable!("plot creation is handled before the lookup"),
            PlotOp::SetSubplots(count) => plot.set_series_count(count)?,
            PlotOp::SetTitle(title) => plot.set_title(title),
            PlotOp::SetAxisTitle(Axis::X, title) => plot.set_x_axis_title(title),
            PlotOp::SetAxisTitle(Axis::Y, title) => plot.set_y_axis_title(title),
            PlotOp::SetBound(Bound::XMax, value) => plot.set_x_max(value),
            PlotOp::SetBound(Bound::YMin, value) => plot.set_y_min(value),
            PlotOp::SetBound(Bound::YMax, value) => plot.set_y_max(value),
            PlotOp::AppendPoint { x, y, subplot } => plot.append(x, y, subplot)?,
        }
        Ok(())
    }
}
