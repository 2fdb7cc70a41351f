use dragometer_plugin::DashboardError;

/// Margin kept between the most extreme Y sample and the auto-scaled Y bound.
pub const DEFAULT_PADDING: f64 = 0.001;

/// One line of a plot: append-only `(x, y)` samples, expected in non-decreasing x.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<(f64, f64)>,
}

impl Series {
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Which bounds still follow the data. A flag never turns back on once cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescaleState {
    pub x_max_auto: bool,
    pub y_min_auto: bool,
    pub y_max_auto: bool,
}

impl Default for RescaleState {
    fn default() -> Self {
        Self {
            x_max_auto: true,
            y_min_auto: true,
            y_max_auto: true,
        }
    }
}

/// Axis bounds as tracked so far; `None` until data or a setter provides one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisBounds {
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

/// The rectangle a plot is drawn in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// State of one chart: titles, shared axes and 1..N series.
#[derive(Debug, Clone)]
pub struct Plot {
    id: String,
    title: String,
    x_axis_title: String,
    y_axis_title: String,
    series: Vec<Series>,
    bounds: AxisBounds,
    rescale: RescaleState,
    observed_y_min: Option<f64>,
    observed_y_max: Option<f64>,
    padding: f64,
}

impl Plot {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_padding(id, DEFAULT_PADDING)
    }

    pub fn with_padding(id: impl Into<String>, padding: f64) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            x_axis_title: String::new(),
            y_axis_title: String::new(),
            series: vec![Series::default()],
            bounds: AxisBounds::default(),
            rescale: RescaleState::default(),
            observed_y_min: None,
            observed_y_max: None,
            padding,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn x_axis_title(&self) -> &str {
        &self.x_axis_title
    }

    pub fn y_axis_title(&self) -> &str {
        &self.y_axis_title
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn bounds(&self) -> AxisBounds {
        self.bounds
    }

    pub fn rescale(&self) -> RescaleState {
        self.rescale
    }

    pub fn has_data(&self) -> bool {
        self.series.iter().any(|series| !series.is_empty())
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn set_x_axis_title(&mut self, title: String) {
        self.x_axis_title = title;
    }

    pub fn set_y_axis_title(&mut self, title: String) {
        self.y_axis_title = title;
    }

    /// Replaces the series with `count` fresh, empty ones.
    ///
    /// Refused once any series holds data, since the samples would be lost.
    pub fn set_series_count(&mut self, count: usize) -> Result<(), DashboardError> {
        if count == 0 {
            return Err(DashboardError::InvalidArgument(
                "count must be >= 1".to_string(),
            ));
        }
        if self.has_data() {
            return Err(DashboardError::SubplotsLocked(self.id.clone()));
        }
        self.series = vec![Series::default(); count];
        Ok(())
    }

    pub fn set_x_max(&mut self, x_max: f64) {
        self.bounds.x_max = Some(x_max);
        self.rescale.x_max_auto = false;
    }

    pub fn set_y_min(&mut self, y_min: f64) {
        self.bounds.y_min = Some(y_min);
        self.rescale.y_min_auto = false;
    }

    pub fn set_y_max(&mut self, y_max: f64) {
        self.bounds.y_max = Some(y_max);
        self.rescale.y_max_auto = false;
    }

    /// Appends a sample to the series at `subplot_index` and moves every
    /// bound that is still automatic.
    pub fn append(&mut self, x: f64, y: f64, subplot_index: usize) -> Result<(), DashboardError> {
        let count = self.series.len();
        if subplot_index >= count {
            return Err(DashboardError::IndexOutOfRange {
                id: self.id.clone(),
                index: subplot_index,
                count,
            });
        }
        if self.rescale.x_max_auto {
            let x_max = self.bounds.x_max.map_or(x, |current| current.max(x));
            self.bounds.x_max = Some(x_max);
        }
        if self.rescale.y_min_auto {
            let y_min = self.observed_y_min.map_or(y, |current| current.min(y));
            self.observed_y_min = Some(y_min);
            self.bounds.y_min = Some(y_min - self.padding);
        }
        if self.rescale.y_max_auto {
            let y_max = self.observed_y_max.map_or(y, |current| current.max(y));
            self.observed_y_max = Some(y_max);
            self.bounds.y_max = Some(y_max + self.padding);
        }
        self.series[subplot_index].points.push((x, y));
        Ok(())
    }

    /// Resolves the tracked bounds into a drawable, non-degenerate rectangle.
    pub fn view_bounds(&self) -> ViewBounds {
        let x_min = 0.0;
        let x_max = match self.bounds.x_max {
            Some(x_max) if x_max > x_min => x_max,
            _ => x_min + 1.0,
        };
        let (lo, hi) = match (self.bounds.y_min, self.bounds.y_max) {
            (Some(lo), Some(hi)) => (lo, hi),
            (Some(lo), None) => (lo, lo + 1.0),
            (None, Some(hi)) => (hi - 1.0, hi),
            (None, None) => (-1.0, 1.0),
        };
        let (y_min, y_max) = if lo < hi {
            (lo, hi)
        } else if lo > hi {
            (hi, lo)
        } else {
            (lo - 1.0, hi + 1.0)
        };
        ViewBounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }
}
