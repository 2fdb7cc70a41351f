use dragometer_plugin::{Dashboard, DashboardError};
use platoon_join::{run_with, PlatoonConfig, FIELD_NAMES};
use std::cell::RefCell;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    AddPlot(String),
    SetSubplots(String, usize),
    SetText(String, String),
    SetXMax(String, f64),
    Plot(String, f64, f64, usize),
}

#[derive(Default)]
struct RecordingDashboard {
    calls: RefCell<Vec<Call>>,
}

impl RecordingDashboard {
    fn record(&self, call: Call) -> Result<(), DashboardError> {
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl Dashboard for RecordingDashboard {
    fn add_plot(&self, id: &str) -> Result<(), DashboardError> {
        self.record(Call::AddPlot(id.to_string()))
    }

    fn set_subplots(&self, id: &str, count: usize) -> Result<(), DashboardError> {
        self.record(Call::SetSubplots(id.to_string(), count))
    }

    fn set_title(&self, id: &str, title: &str) -> Result<(), DashboardError> {
        self.record(Call::SetText(id.to_string(), title.to_string()))
    }

    fn set_x_axis_title(&self, id: &str, title: &str) -> Result<(), DashboardError> {
        self.record(Call::SetText(id.to_string(), title.to_string()))
    }

    fn set_y_axis_title(&self, id: &str, title: &str) -> Result<(), DashboardError> {
        self.record(Call::SetText(id.to_string(), title.to_string()))
    }

    fn set_x_max(&self, id: &str, x_max: f64) -> Result<(), DashboardError> {
        self.record(Call::SetXMax(id.to_string(), x_max))
    }

    fn set_y_min(&self, _id: &str, _y_min: f64) -> Result<(), DashboardError> {
        unreachable!("the example leaves Y auto-scaled")
    }

    fn set_y_max(&self, _id: &str, _y_max: f64) -> Result<(), DashboardError> {
        unreachable!("the example leaves Y auto-scaled")
    }

    fn plot_on(
        &self,
        id: &str,
        x: f64,
        y: f64,
        subplot_index: usize,
    ) -> Result<(), DashboardError> {
        self.record(Call::Plot(id.to_string(), x, y, subplot_index))
    }
}

fn quick_config(dir: &std::path::Path) -> PlatoonConfig {
    PlatoonConfig {
        steps: 25,
        output_dir: dir.to_path_buf(),
        step_delay: Duration::ZERO,
        ..PlatoonConfig::default()
    }
}

#[test]
fn sets_up_both_plots_before_plotting() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dashboard = RecordingDashboard::default();
    run_with(&dashboard, &quick_config(dir.path())).expect("producer runs");

    let calls = dashboard.calls.borrow();
    assert_eq!(calls[0], Call::AddPlot("1".to_string()));
    assert_eq!(calls[1], Call::SetXMax("1".to_string(), 25.0));
    assert_eq!(calls[2], Call::SetSubplots("1".to_string(), 2));
    assert!(calls.contains(&Call::AddPlot("2".to_string())));
    assert!(calls.contains(&Call::SetText(
        "2".to_string(),
        "Battery capacity (Wh)".to_string()
    )));
    let first_plot = calls
        .iter()
        .position(|call| matches!(call, Call::Plot(..)))
        .expect("plots were fed");
    assert_eq!(first_plot, 12);
}

#[test]
fn runs_feed_separate_subplots() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dashboard = RecordingDashboard::default();
    run_with(&dashboard, &quick_config(dir.path())).expect("producer runs");

    let points: Vec<(String, f64, f64, usize)> = dashboard
        .calls
        .borrow()
        .iter()
        .filter_map(|call| match call {
            Call::Plot(id, x, y, subplot) => Some((id.clone(), *x, *y, *subplot)),
            _ => None,
        })
        .collect();
    assert_eq!(points.len(), 2 * 2 * 25);
    let (first_run, second_run) = points.split_at(50);
    assert!(first_run.iter().all(|point| point.3 == 0));
    assert!(second_run.iter().all(|point| point.3 == 1));
    assert!(first_run
        .iter()
        .filter(|point| point.0 == "1")
        .all(|point| point.2 == platoon_join::DRAG_COEFFICIENT));
    assert!(points.iter().all(|point| point.1 >= 1.0 && point.1 <= 25.0));
}

#[test]
fn writes_csv_logs_for_both_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dashboard = RecordingDashboard::default();
    run_with(&dashboard, &quick_config(dir.path())).expect("producer runs");

    for name in ["nodrag.csv", "withdrag.csv"] {
        let contents = std::fs::read_to_string(dir.path().join(name)).expect("csv exists");
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some(FIELD_NAMES.join(",").as_str()));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 25);
        assert!(rows.iter().all(|row| row.split(',').count() == FIELD_NAMES.len()));
        assert!(rows[0].starts_with("1,1,"));
    }
}

#[test]
fn rejects_a_leader_as_tracked_vehicle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dashboard = RecordingDashboard::default();
    let config = PlatoonConfig {
        track: 0,
        ..quick_config(dir.path())
    };
    assert!(run_with(&dashboard, &config).is_err());
    assert!(dashboard.calls.borrow().is_empty());
}
