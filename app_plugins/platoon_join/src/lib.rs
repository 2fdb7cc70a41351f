//! Example producer: a four-car platoon closing its gaps on a freeway,
//! run once without and once with a slipstream device on the tracked car.

mod log_file;
mod simulation;

use dragometer_plugin::{Dashboard, ProducerResult};
use std::path::PathBuf;
use std::time::Duration;

pub use log_file::{CsvLog, LogRow, FIELD_NAMES};
pub use simulation::{Platoon, VehicleState, CRUISING_SPEED, DRAG_COEFFICIENT, TARGET_GAP};

dragometer_plugin::export_producer!(run);

const DRAG_PLOT: &str = "1";
const BATTERY_PLOT: &str = "2";

#[derive(Debug, Clone)]
pub struct PlatoonConfig {
    pub steps: u32,
    pub gaps: Vec<f64>,
    /// Index of the vehicle whose telemetry is plotted and logged.
    pub track: usize,
    pub output_dir: PathBuf,
    pub step_delay: Duration,
}

impl Default for PlatoonConfig {
    fn default() -> Self {
        Self {
            steps: 4000,
            gaps: vec![10.0, 15.0, 20.0],
            track: 1,
            output_dir: PathBuf::from("."),
            step_delay: Duration::from_millis(1),
        }
    }
}

/// Entry point used by the dashboard.
pub fn run(dashboard: &dyn Dashboard) -> ProducerResult {
    run_with(dashboard, &PlatoonConfig::default())
}

pub fn run_with(dashboard: &dyn Dashboard, config: &PlatoonConfig) -> ProducerResult {
    if config.gaps.is_empty() {
        return Err("a platoon needs at least two vehicles".into());
    }
    if config.track == 0 || config.track > config.gaps.len() {
        return Err(format!(
            "tracked vehicle {} must be a follower (1..={})",
            config.track,
            config.gaps.len()
        )
        .into());
    }
    setup_plots(dashboard, config.steps)?;

    log::info!("running platoon without slipstream device");
    simulate(dashboard, config, false, "nodrag.csv")?;
    log::info!("running platoon with slipstream device");
    simulate(dashboard, config, true, "withdrag.csv")?;
    Ok(())
}

fn setup_plots(dashboard: &dyn Dashboard, steps: u32) -> ProducerResult {
    for (id, y_title) in [
        (DRAG_PLOT, "Drag coefficient"),
        (BATTERY_PLOT, "Battery capacity (Wh)"),
    ] {
        dashboard.add_plot(id)?;
        dashboard.set_x_max(id, f64::from(steps))?;
        dashboard.set_subplots(id, 2)?;
        dashboard.set_title(id, "Vehicle 1")?;
        dashboard.set_x_axis_title(id, "Timestep")?;
        dashboard.set_y_axis_title(id, y_title)?;
    }
    Ok(())
}

fn simulate(
    dashboard: &dyn Dashboard,
    config: &PlatoonConfig,
    slipstream_device: bool,
    file_name: &str,
) -> ProducerResult {
    let mut csv = CsvLog::create(&config.output_dir.join(file_name))?;
    let mut platoon = Platoon::new(&config.gaps, config.track, slipstream_device);
    let subplot = usize::from(slipstream_device);

    for step in 1..=config.steps {
        platoon.step();
        let tracked = platoon.tracked();
        dashboard.plot_on(DRAG_PLOT, f64::from(step), tracked.drag_coefficient, subplot)?;
        dashboard.plot_on(BATTERY_PLOT, f64::from(step), tracked.battery_wh, subplot)?;
        csv.write(&LogRow {
            node_id: config.track,
            time: step,
            acceleration: tracked.acceleration,
            speed: tracked.speed,
            distance: platoon.gap_ahead(config.track),
            cd: tracked.drag_coefficient,
            battery: tracked.battery_wh,
            energy: tracked.energy_wh,
        })?;
        if !config.step_delay.is_zero() {
            std::thread::sleep(config.step_delay);
        }
    }
    csv.flush()?;
    Ok(())
}
