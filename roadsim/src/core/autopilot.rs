use crate::core::track::Track;
use crate::interfaces::gui_interface::VehicleState;
use serde::Deserialize;

/// * `speed` - (m/s) Constant cruising speed of the player vehicle
/// * `lane_offset` - (m) Lateral target position relative to the road center
/// * `steer_rate` - (1/s) Share of the lateral gap to the target that is closed per second
/// * `vehicle_half_width` - (m) Used to keep the vehicles between the road edges
/// * `rivals` - Number of additional vehicles shown on the minimap
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DrivePars {
    pub speed: f64,
    pub lane_offset: f64,
    pub steer_rate: f64,
    pub vehicle_half_width: f64,
    pub rivals: usize,
}

impl Default for DrivePars {
    fn default() -> Self {
        DrivePars {
            speed: 3000.0,
            lane_offset: 0.0,
            steer_rate: 2.0,
            vehicle_half_width: 40.0,
            rivals: 3,
        }
    }
}

/// Autopilot is a scripted vehicle. It cruises at constant speed and steers toward the road
/// center plus its lane offset, which makes it follow the curves of the track.
#[derive(Debug, Clone)]
pub struct Autopilot {
    speed: f64,
    lane_offset: f64,
    steer_rate: f64,
    half_width: f64,
    state: VehicleState,
}

impl Autopilot {
    pub fn new(drive_pars: &DrivePars, start_z: f64) -> Autopilot {
        Autopilot {
            speed: drive_pars.speed,
            lane_offset: drive_pars.lane_offset,
            steer_rate: drive_pars.steer_rate,
            half_width: drive_pars.vehicle_half_width,
            state: VehicleState {
                x: drive_pars.lane_offset,
                z: start_z,
                heading: 0.0,
            },
        }
    }

    /// rivals creates the rival vehicles. They are spread evenly around the loop, drive on
    /// alternating sides of the road and are slightly slower than the player.
    pub fn rivals(drive_pars: &DrivePars, track: &Track) -> Vec<Autopilot> {
        let spacing = track.total_length() / (drive_pars.rivals + 1) as f64;

        (0..drive_pars.rivals)
            .map(|i| {
                let side = if i % 2 == 0 { -1.0 } else { 1.0 };
                let pars = DrivePars {
                    speed: drive_pars.speed * (0.9 - 0.05 * i as f64).max(0.5),
                    lane_offset: side * track.track_width() / 4.0,
                    ..drive_pars.to_owned()
                };
                Autopilot::new(&pars, (i + 1) as f64 * spacing)
            })
            .collect()
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// step moves the vehicle forward by one time step of size dt (s) and returns its new state.
    /// z is not wrapped, the consumers of the state take care of that.
    pub fn step(&mut self, track: &Track, dt: f64) -> VehicleState {
        let dz = self.speed * dt;
        let z = self.state.z + dz;

        let target_x = track.get_segment(z).center_x() + self.lane_offset;
        let gain = (self.steer_rate * dt).clamp(0.0, 1.0);
        let (x, off_road) =
            track.clamp_to_road(self.state.x + (target_x - self.state.x) * gain, z, self.half_width);

        if off_road {
            tracing::debug!("Autopilot clamped to the road at z = {:.1}m", z);
        }

        let dx = x - self.state.x;
        let heading = if dz.abs() > 0.0 || dx.abs() > 0.0 {
            dx.atan2(dz)
        } else {
            self.state.heading
        };

        self.state = VehicleState { x, z, heading };
        self.state
    }
}
