/// Desired bumper-to-bumper gap kept by the followers, in meters.
pub const TARGET_GAP: f64 = 1.0;
pub const CRUISING_SPEED: f64 = 130.0 / 3.6;
/// Drag coefficient of the car without any slipstream benefit.
pub const DRAG_COEFFICIENT: f64 = 0.24;

const VEHICLE_LENGTH: f64 = 4.971;
const STEP_SECONDS: f64 = 0.1;
const MAX_ACCELERATION: f64 = 2.5;
const MAX_DECELERATION: f64 = 9.0;
const INITIAL_BATTERY_WH: f64 = 43_000.0;

const AIR_DENSITY: f64 = 1.2;
const FRONTAL_AREA: f64 = 2.2;
const MASS: f64 = 1500.0;
const ROLLING_RESISTANCE: f64 = 0.01;
const GRAVITY: f64 = 9.81;

// CACC gains for C1 = 0.5, xi = 1, omega_n = 0.2.
const CACC_PRECEDING_ACC: f64 = 0.5;
const CACC_LEADER_ACC: f64 = 0.5;
const CACC_PRECEDING_SPEED: f64 = -0.3;
const CACC_LEADER_SPEED: f64 = -0.1;
const CACC_SPACING: f64 = -0.04;
const ACC_SPEED_GAIN: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    /// Front bumper position along the lane.
    pub position: f64,
    pub speed: f64,
    pub acceleration: f64,
    pub drag_coefficient: f64,
    pub battery_wh: f64,
    /// Energy drawn during the last step.
    pub energy_wh: f64,
    pub slipstream_device: bool,
}

/// Leader on ACC at cruising speed, followers on CACC closing to [`TARGET_GAP`].
#[derive(Debug, Clone)]
pub struct Platoon {
    vehicles: Vec<VehicleState>,
    track: usize,
}

impl Platoon {
    /// `gaps[i]` is the initial gap between vehicle `i` and vehicle `i + 1`.
    pub fn new(gaps: &[f64], track: usize, slipstream_device: bool) -> Self {
        let count = gaps.len() + 1;
        let vehicles = (0..count)
            .map(|idx| VehicleState {
                position: gaps[idx..].iter().sum::<f64>()
                    + (count - idx) as f64 * VEHICLE_LENGTH,
                speed: CRUISING_SPEED,
                acceleration: 0.0,
                drag_coefficient: DRAG_COEFFICIENT,
                battery_wh: INITIAL_BATTERY_WH,
                energy_wh: 0.0,
                slipstream_device: slipstream_device && idx == track,
            })
            .collect();
        Self { vehicles, track }
    }

    pub fn vehicles(&self) -> &[VehicleState] {
        &self.vehicles
    }

    pub fn tracked(&self) -> &VehicleState {
        &self.vehicles[self.track]
    }

    /// Gap between vehicle `idx` and the one ahead; 0 for the leader.
    pub fn gap_ahead(&self, idx: usize) -> f64 {
        if idx == 0 {
            return 0.0;
        }
        self.vehicles[idx - 1].position - VEHICLE_LENGTH - self.vehicles[idx].position
    }

    pub fn step(&mut self) {
        let previous = self.vehicles.clone();
        let leader = previous[0];
        for idx in 0..self.vehicles.len() {
            let own = previous[idx];
            let acceleration = if idx == 0 {
                ACC_SPEED_GAIN * (CRUISING_SPEED - own.speed)
            } else {
                let ahead = previous[idx - 1];
                let gap = ahead.position - VEHICLE_LENGTH - own.position;
                let spacing_error = -(gap - TARGET_GAP);
                CACC_PRECEDING_ACC * ahead.acceleration
                    + CACC_LEADER_ACC * leader.acceleration
                    + CACC_PRECEDING_SPEED * (own.speed - ahead.speed)
                    + CACC_LEADER_SPEED * (own.speed - leader.speed)
                    + CACC_SPACING * spacing_error
            }
            .clamp(-MAX_DECELERATION, MAX_ACCELERATION);

            let vehicle = &mut self.vehicles[idx];
            vehicle.acceleration = acceleration;
            vehicle.speed = (own.speed + acceleration * STEP_SECONDS).max(0.0);
            vehicle.position = own.position + vehicle.speed * STEP_SECONDS;
        }
        for idx in 0..self.vehicles.len() {
            let gap = self.gap_ahead(idx);
            let vehicle = &mut self.vehicles[idx];
            vehicle.drag_coefficient = if vehicle.slipstream_device && idx > 0 {
                slipstream_drag(gap)
            } else {
                DRAG_COEFFICIENT
            };
            vehicle.energy_wh = step_energy_wh(vehicle);
            vehicle.battery_wh -= vehicle.energy_wh;
        }
    }
}

/// Drag coefficient felt behind another car at `gap` meters.
fn slipstream_drag(gap: f64) -> f64 {
    DRAG_COEFFICIENT * (1.0 - 0.4 * (-gap.max(0.0) / 6.0).exp())
}

fn step_energy_wh(vehicle: &VehicleState) -> f64 {
    let speed = vehicle.speed;
    let aero = 0.5 * AIR_DENSITY * vehicle.drag_coefficient * FRONTAL_AREA * speed * speed;
    let rolling = MASS * GRAVITY * ROLLING_RESISTANCE;
    let inertial = MASS * vehicle.acceleration;
    // No regeneration: braking draws nothing from the battery.
    let power_w = ((aero + rolling + inertial) * speed).max(0.0);
    power_w * STEP_SECONDS / 3600.0
}
