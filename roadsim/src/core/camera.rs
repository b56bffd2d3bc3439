use crate::error::ConfigError;
use helpers::general::wrap_f64;
use serde::Deserialize;
use std::f64::consts::PI;

/// LateralTracking determines how the camera follows the lateral position of the vehicle.
///
/// * `Direct` - The camera x is set to the vehicle x in every frame
/// * `Elastic` - The camera x moves by `rate` times the remaining gap per frame (rate in ]0, 1])
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum LateralTracking {
    Direct,
    Elastic { rate: f64 },
}

impl Default for LateralTracking {
    fn default() -> Self {
        LateralTracking::Direct
    }
}

/// * `height` - (m) Height of the eye above the road plane
/// * `depth` - Horizon shaping factor
/// * `field_of_view` - (rad) Horizontal field of view
/// * `lateral_tracking` - Lateral follow behavior
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CameraPars {
    pub height: f64,
    pub depth: f64,
    pub field_of_view: f64,
    pub lateral_tracking: LateralTracking,
}

impl Default for CameraPars {
    fn default() -> Self {
        CameraPars {
            height: 1000.0,
            depth: 0.92,
            field_of_view: 1.1,
            lateral_tracking: LateralTracking::Direct,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    x: f64,
    z: f64,
    height: f64,
    depth: f64,
    field_of_view: f64,
    lateral_tracking: LateralTracking,
}

impl Camera {
    pub fn new(camera_pars: &CameraPars) -> Result<Camera, ConfigError> {
        if !(camera_pars.height > 0.0) {
            return Err(ConfigError::NonPositiveCameraValue {
                name: "height",
                value: camera_pars.height,
            });
        }
        if !(camera_pars.depth > 0.0) {
            return Err(ConfigError::NonPositiveCameraValue {
                name: "depth",
                value: camera_pars.depth,
            });
        }
        if !(camera_pars.field_of_view > 0.0 && camera_pars.field_of_view < PI) {
            return Err(ConfigError::InvalidFieldOfView(camera_pars.field_of_view));
        }
        if let LateralTracking::Elastic { rate } = camera_pars.lateral_tracking {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(ConfigError::NonPositiveCameraValue {
                    name: "lateral tracking rate",
                    value: rate,
                });
            }
        }

        Ok(Camera {
            x: 0.0,
            z: 0.0,
            height: camera_pars.height,
            depth: camera_pars.depth,
            field_of_view: camera_pars.field_of_view,
            lateral_tracking: camera_pars.lateral_tracking,
        })
    }

    /// update moves the camera to the vehicle's track-space position. z is wrapped into
    /// [0.0, total_length[.
    pub fn update(&mut self, vehicle_z: f64, vehicle_x: f64, total_length: f64) {
        self.z = wrap_f64(vehicle_z, total_length);

        self.x = match self.lateral_tracking {
            LateralTracking::Direct => vehicle_x,
            LateralTracking::Elastic { rate } => self.x + (vehicle_x - self.x) * rate,
        };
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }
}
