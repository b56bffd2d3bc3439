pub const MAX_GUI_UPDATE_FREQUENCY: f64 = 60.0;

/// VehicleState is the track-space pose of a vehicle as consumed by the renderer in each frame.
///
/// * `x` - (m) Lateral position, 0.0 is the road center at the start line
/// * `z` - (m) Distance along the track (not necessarily wrapped)
/// * `heading` - (rad) Angle between driving direction and track direction
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleState {
    pub x: f64,
    pub z: f64,
    pub heading: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DriveState {
    pub player: VehicleState,
    pub rivals: Vec<VehicleState>,

    // simulated time since the start of the drive
    pub drive_time: f64,
}
