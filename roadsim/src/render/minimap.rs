use crate::core::projection::Viewport;
use crate::core::track::Track;
use crate::error::ConfigError;
use crate::render::palette::Palette;
use crate::render::surface::{ScreenPoint, ScreenRect, Surface};
use helpers::general::min_max;
use serde::Deserialize;

/// * `width`, `height` - (px) Size of the panel
/// * `padding` - (px) Distance between panel border and track
/// * `margin` - (px) Distance between panel and viewport border
/// * `edge_width` - (px) Line width of the track edges
/// * `background_alpha` - Opacity of the panel background
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MinimapPars {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub margin: f64,
    pub edge_width: f64,
    pub background_alpha: f64,
}

impl Default for MinimapPars {
    fn default() -> Self {
        MinimapPars {
            width: 200.0,
            height: 150.0,
            padding: 10.0,
            margin: 10.0,
            edge_width: 2.0,
            background_alpha: 0.5,
        }
    }
}

impl MinimapPars {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 2.0 * self.padding && self.height > 2.0 * self.padding) {
            return Err(ConfigError::InvalidRenderPars {
                name: "minimap size",
                value: self.width.min(self.height),
            });
        }
        if !(self.padding >= 0.0) {
            return Err(ConfigError::InvalidRenderPars {
                name: "minimap padding",
                value: self.padding,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Rival,
}

/// Tracked entity shown on the minimap at its track-space position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapEntity {
    pub x: f64,
    pub z: f64,
    pub kind: EntityKind,
}

/// Minimap draws a top-down view of the whole track without perspective. Both axes are fitted to
/// the panel independently, z grows upward from the start line.
#[derive(Debug, Clone)]
pub struct Minimap {
    pars: MinimapPars,
    palette: Palette,
}

/// Mapping from track space to panel coordinates.
struct PanelTransform {
    x_min: f64,
    x_scale: f64,
    z_scale: f64,
    padding: f64,
    height: f64,
}

impl PanelTransform {
    fn apply(&self, x: f64, z: f64) -> ScreenPoint {
        ScreenPoint::new(
            self.padding + (x - self.x_min) * self.x_scale,
            self.height - self.padding - z * self.z_scale,
        )
    }
}

impl Minimap {
    pub fn new(pars: &MinimapPars, palette: &Palette) -> Minimap {
        Minimap {
            pars: pars.to_owned(),
            palette: *palette,
        }
    }

    /// placement returns the panel offset for the upper right corner of the viewport.
    pub fn placement(&self, viewport: &Viewport) -> (f64, f64) {
        (
            viewport.width - self.pars.width - self.pars.margin,
            self.pars.margin,
        )
    }

    fn transform(&self, track: &Track) -> PanelTransform {
        let xs = track
            .segments()
            .iter()
            .flat_map(|s| std::iter::once(s.left.x).chain(std::iter::once(s.right.x)));
        let (mut x_min, mut x_max) = min_max(xs).unwrap_or((-0.5, 0.5));

        if x_max - x_min < f64::EPSILON {
            x_min -= 0.5;
            x_max += 0.5;
        }

        let inner_width = self.pars.width - 2.0 * self.pars.padding;
        let inner_height = self.pars.height - 2.0 * self.pars.padding;

        PanelTransform {
            x_min,
            x_scale: inner_width / (x_max - x_min),
            z_scale: inner_height / track.total_length(),
            padding: self.pars.padding,
            height: self.pars.height,
        }
    }

    /// project_to_panel returns the panel position of a track-space position (z is wrapped).
    pub fn project_to_panel(&self, track: &Track, x: f64, z: f64) -> ScreenPoint {
        self.transform(track).apply(x, track.normalize_z(z))
    }

    /// draw paints the panel in local coordinates, i.e. (0, 0) is the upper left panel corner.
    pub fn draw<S: Surface + ?Sized>(
        &self,
        track: &Track,
        entities: &[MinimapEntity],
        surface: &mut S,
    ) {
        let tf = self.transform(track);

        surface.fill_rect(
            ScreenRect::new(0.0, 0.0, self.pars.width, self.pars.height),
            self.palette
                .minimap_background
                .with_alpha(self.pars.background_alpha),
        );

        let left_edge: Vec<ScreenPoint> = track
            .segments()
            .iter()
            .map(|s| tf.apply(s.left.x, s.left.z))
            .collect();
        let right_edge: Vec<ScreenPoint> = track
            .segments()
            .iter()
            .map(|s| tf.apply(s.right.x, s.right.z))
            .collect();

        surface.stroke_polyline(
            &left_edge,
            self.pars.edge_width,
            self.palette.minimap_edge.into(),
        );
        surface.stroke_polyline(
            &right_edge,
            self.pars.edge_width,
            self.palette.minimap_edge.into(),
        );

        // rivals first, such that the player dot stays on top
        let mut sorted: Vec<&MinimapEntity> = entities.iter().collect();
        sorted.sort_by_key(|e| e.kind == EntityKind::Player);

        for entity in sorted {
            let (color, radius) = match entity.kind {
                EntityKind::Player => (self.palette.minimap_player, 5.0),
                EntityKind::Rival => (self.palette.minimap_rival, 4.0),
            };
            surface.fill_circle(
                tf.apply(entity.x, track.normalize_z(entity.z)),
                radius,
                color.into(),
            );
        }
    }
}
