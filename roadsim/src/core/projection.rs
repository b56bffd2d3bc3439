use crate::core::camera::Camera;
use crate::core::track::Point3;
use crate::error::ConfigError;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Viewport, ConfigError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        Ok(Viewport { width, height })
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1280.0,
            height: 720.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub screen_x: f64,
    pub screen_y: f64,
    pub scale: f64,
}

/// base_scale returns the projection scale at unit distance, (width / 2) / tan(fov / 2).
pub fn base_scale(viewport_width: f64, field_of_view: f64) -> f64 {
    viewport_width / 2.0 / (field_of_view / 2.0).tan()
}

/// project maps a track-space point onto the screen.
///
/// * `rel_z` - (m) Distance of the point along the track, relative to the camera
/// * `camera_x` - (m) Lateral camera position
/// * `base_scale` - Projection scale at unit distance, see `base_scale`
///
/// The eye sits `camera_height` above the road plane, such that the effective distance of the
/// point is `rel_z + camera_height`. None is returned if this distance is not positive, i.e. if
/// the point is at or behind the eye plane.
#[allow(clippy::too_many_arguments)]
pub fn project(
    point: &Point3,
    rel_z: f64,
    camera_x: f64,
    base_scale: f64,
    camera_height: f64,
    camera_depth: f64,
    viewport: &Viewport,
) -> Option<ProjectedPoint> {
    let camera_distance = rel_z + camera_height;

    if !(camera_distance > 0.0) {
        return None;
    }

    let scale = base_scale / camera_distance;

    Some(ProjectedPoint {
        screen_x: viewport.center_x() + (point.x - camera_x) * scale,
        // y axis is inverted on screen
        screen_y: viewport.center_y() - (camera_height * camera_depth - point.y) * scale,
        scale,
    })
}

/// Projector holds the camera values used by `project` for one frame, such that the base scale
/// is only calculated once per frame.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    pub viewport: Viewport,
    pub base_scale: f64,
    pub camera_x: f64,
    pub camera_height: f64,
    pub camera_depth: f64,
}

impl Projector {
    pub fn new(camera: &Camera, viewport: Viewport) -> Projector {
        Projector {
            viewport,
            base_scale: base_scale(viewport.width, camera.field_of_view()),
            camera_x: camera.x(),
            camera_height: camera.height(),
            camera_depth: camera.depth(),
        }
    }

    pub fn project(&self, point: &Point3, rel_z: f64) -> Option<ProjectedPoint> {
        project(
            point,
            rel_z,
            self.camera_x,
            self.base_scale,
            self.camera_height,
            self.camera_depth,
            &self.viewport,
        )
    }
}
