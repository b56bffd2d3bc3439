use crate::core::camera::Camera;
use crate::core::projection::{ProjectedPoint, Projector, Viewport};
use crate::core::track::{band_is_light, Point3, Segment, Track};
use crate::error::ConfigError;
use crate::render::minimap::{Minimap, MinimapEntity, MinimapPars};
use crate::render::palette::Palette;
use crate::render::sprites::ImageSource;
use crate::render::surface::{OffsetSurface, ScreenPoint, ScreenRect, Surface};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CenterLine {
    Solid,
    /// Drawn on light color bands only
    Dashed,
}

/// * `viewport` - (px) Size of the drawn frame
/// * `draw_distance` - Maximum number of segments looked ahead (bound for long tracks)
/// * `overscan` - Additional segments drawn beyond the visible window to avoid popping
/// * `fog_density` - Exponent of the fog falloff, higher values keep more of the road clear
/// * `rumble_fraction` - Width of each rumble strip as fraction of the road width
/// * `center_line_fraction` - Width of the center line as fraction of the road width
/// * `center_line` - Center line style
/// * `sprite_scale` - (m/px) Track-space size of one decoration image pixel
/// * `minimap` - Minimap panel parameters
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderPars {
    pub viewport: Viewport,
    pub draw_distance: usize,
    pub overscan: usize,
    pub fog_density: f64,
    pub rumble_fraction: f64,
    pub center_line_fraction: f64,
    pub center_line: CenterLine,
    pub sprite_scale: f64,
    pub minimap: MinimapPars,
}

impl Default for RenderPars {
    fn default() -> Self {
        RenderPars {
            viewport: Viewport::default(),
            draw_distance: 300,
            overscan: 10,
            fog_density: 3.0,
            rumble_fraction: 0.1,
            center_line_fraction: 0.02,
            center_line: CenterLine::Dashed,
            sprite_scale: 3.0,
            minimap: MinimapPars::default(),
        }
    }
}

impl RenderPars {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Viewport::new(self.viewport.width, self.viewport.height)?;

        if self.draw_distance == 0 {
            return Err(ConfigError::InvalidRenderPars {
                name: "draw_distance",
                value: 0.0,
            });
        }

        let checks = [
            ("fog_density", self.fog_density, self.fog_density > 0.0),
            (
                "rumble_fraction",
                self.rumble_fraction,
                (0.0..=0.5).contains(&self.rumble_fraction),
            ),
            (
                "center_line_fraction",
                self.center_line_fraction,
                (0.0..=0.5).contains(&self.center_line_fraction),
            ),
            ("sprite_scale", self.sprite_scale, self.sprite_scale > 0.0),
        ];

        for &(name, value, ok) in checks.iter() {
            if !ok || !value.is_finite() {
                return Err(ConfigError::InvalidRenderPars { name, value });
            }
        }

        self.minimap.validate()
    }
}

/// Strip is one projected segment, i.e. the quad between the segment's start (near edge) and the
/// start of the following segment (far edge).
#[derive(Debug, Clone)]
pub struct Strip<'a> {
    /// Position in the visible window, 0 is the segment under the camera
    pub step: usize,
    pub segment: &'a Segment,
    /// (m) Distance of the near edge relative to the camera
    pub rel_z: f64,
    pub near_left: ProjectedPoint,
    pub near_right: ProjectedPoint,
    pub far_left: ProjectedPoint,
    pub far_right: ProjectedPoint,
}

impl<'a> Strip<'a> {
    pub fn near_y(&self) -> f64 {
        self.near_left.screen_y
    }

    pub fn far_y(&self) -> f64 {
        self.far_left.screen_y
    }

    pub fn near_width(&self) -> f64 {
        self.near_right.screen_x - self.near_left.screen_x
    }

    pub fn far_width(&self) -> f64 {
        self.far_right.screen_x - self.far_left.screen_x
    }
}

fn pt(p: &ProjectedPoint, dx: f64) -> ScreenPoint {
    ScreenPoint::new(p.screen_x + dx, p.screen_y)
}

/// fog_opacity returns the opacity of the fog over the strip at the given step of a window with
/// `visible` strips, i.e. 1 - fog_amount with fog_amount = 1 - (step / visible)^density.
pub fn fog_opacity(step: usize, visible: usize, density: f64) -> f64 {
    let fog_amount = 1.0 - (step as f64 / visible as f64).powf(density);
    if fog_amount < 1.0 {
        (1.0 - fog_amount).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// SceneRenderer draws the road as seen from the camera. It is created once and reused for every
/// frame; it only writes to the inserted surfaces and never changes track or camera.
#[derive(Debug)]
pub struct SceneRenderer {
    render_pars: RenderPars,
    palette: Palette,
    minimap: Minimap,
    missing_images: HashSet<String>,
}

impl SceneRenderer {
    pub fn new(render_pars: &RenderPars, palette: &Palette) -> Result<SceneRenderer, ConfigError> {
        render_pars.validate()?;

        Ok(SceneRenderer {
            render_pars: render_pars.to_owned(),
            palette: *palette,
            minimap: Minimap::new(&render_pars.minimap, palette),
            missing_images: HashSet::new(),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.render_pars.viewport
    }

    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    /// visible_count returns the number of strips the fog is normalized to: the whole track or
    /// the look-ahead bound, whichever is smaller.
    pub fn visible_count(&self, track: &Track) -> usize {
        track.segment_count().min(self.render_pars.draw_distance)
    }

    /// build_strips projects the visible window in paint order, i.e. from the farthest to the
    /// nearest strip. Strips with a corner at or behind the eye plane and strips lying entirely
    /// above or below the viewport are left out.
    pub fn build_strips<'t>(&self, track: &'t Track, camera: &Camera) -> Vec<Strip<'t>> {
        let viewport = self.render_pars.viewport;
        let proj = Projector::new(camera, viewport);
        let seg_len = track.segment_length();
        let start_idx = (camera.z() / seg_len).floor() as i64;
        let offset_in_segment = camera.z() - start_idx as f64 * seg_len;
        // every segment is visited once at most, also on tracks shorter than the window
        let window =
            (self.visible_count(track) + self.render_pars.overscan).min(track.segment_count());

        let mut strips = Vec::with_capacity(window);

        for step in (0..window).rev() {
            let current = track.get_segment_by_index(start_idx + step as i64);
            let next = track.get_segment_by_index(start_idx + step as i64 + 1);

            // near edge is measured forward from the camera, the far edge continues it and never
            // spans the wrap
            let rel_z = step as f64 * seg_len - offset_in_segment;
            let far_rel_z = rel_z + seg_len;

            let corners = (
                proj.project(&current.left, rel_z),
                proj.project(&current.right, rel_z),
                proj.project(&next.left, far_rel_z),
                proj.project(&next.right, far_rel_z),
            );

            let (near_left, near_right, far_left, far_right) = match corners {
                (Some(nl), Some(nr), Some(fl), Some(fr)) => (nl, nr, fl, fr),
                _ => continue,
            };

            let top = near_left.screen_y.min(far_left.screen_y);
            let bottom = near_left.screen_y.max(far_left.screen_y);
            if bottom < 0.0 || top >= viewport.height {
                continue;
            }

            strips.push(Strip {
                step,
                segment: current,
                rel_z,
                near_left,
                near_right,
                far_left,
                far_right,
            });
        }

        strips
    }

    /// draw paints sky, road strips, decorations and fog for the current camera position.
    pub fn draw<S: Surface + ?Sized>(
        &mut self,
        track: &Track,
        camera: &Camera,
        images: &dyn ImageSource,
        surface: &mut S,
    ) {
        let viewport = self.render_pars.viewport;
        let proj = Projector::new(camera, viewport);

        // background
        surface.fill_rect(
            ScreenRect::new(0.0, 0.0, viewport.width, viewport.height),
            self.palette.sky.into(),
        );

        let strips = self.build_strips(track, camera);
        let visible = self.visible_count(track);

        tracing::debug!(
            "Drawing {} strips from segment {}",
            strips.len(),
            track.get_segment(camera.z()).index
        );

        for strip in strips.iter() {
            self.draw_strip(track, strip, surface);
            self.draw_decoration(track, strip, &proj, images, surface);

            let opacity = fog_opacity(strip.step, visible, self.render_pars.fog_density);
            if opacity > 0.0 {
                surface.fill_rect(
                    ScreenRect::from_corners(0.0, strip.far_y(), viewport.width, strip.near_y()),
                    self.palette.fog.with_alpha(opacity),
                );
            }
        }
    }

    /// draw_frame draws the scene followed by the minimap panel in the upper right corner.
    pub fn draw_frame<S: Surface + ?Sized>(
        &mut self,
        track: &Track,
        camera: &Camera,
        entities: &[MinimapEntity],
        images: &dyn ImageSource,
        surface: &mut S,
    ) {
        self.draw(track, camera, images, surface);

        let (dx, dy) = self.minimap.placement(&self.render_pars.viewport);
        let mut panel = OffsetSurface::new(surface, dx, dy);
        self.minimap.draw(track, entities, &mut panel);
    }

    fn draw_strip<S: Surface + ?Sized>(&self, track: &Track, strip: &Strip, surface: &mut S) {
        let viewport = self.render_pars.viewport;
        let segment = strip.segment;
        let light = band_is_light(segment.index, track.rumble_length());
        let (nl, nr, fl, fr) = (
            &strip.near_left,
            &strip.near_right,
            &strip.far_left,
            &strip.far_right,
        );

        // grass
        surface.fill_rect(
            ScreenRect::from_corners(0.0, strip.far_y(), viewport.width, strip.near_y()),
            segment.grass_color.into(),
        );

        // road
        surface.fill_polygon(
            &[pt(nl, 0.0), pt(nr, 0.0), pt(fr, 0.0), pt(fl, 0.0)],
            segment.road_color.into(),
        );

        // rumble strips
        let rumble_near = strip.near_width() * self.render_pars.rumble_fraction;
        let rumble_far = strip.far_width() * self.render_pars.rumble_fraction;
        let rumble_color = if light {
            self.palette.rumble_white
        } else {
            self.palette.rumble_red
        };

        surface.fill_polygon(
            &[pt(nl, 0.0), pt(nl, rumble_near), pt(fl, rumble_far), pt(fl, 0.0)],
            rumble_color.into(),
        );
        surface.fill_polygon(
            &[pt(nr, -rumble_near), pt(nr, 0.0), pt(fr, 0.0), pt(fr, -rumble_far)],
            rumble_color.into(),
        );

        // center line
        let draw_line = match self.render_pars.center_line {
            CenterLine::Solid => true,
            CenterLine::Dashed => light,
        };

        if draw_line {
            let half_near = strip.near_width() * self.render_pars.center_line_fraction / 2.0;
            let half_far = strip.far_width() * self.render_pars.center_line_fraction / 2.0;
            let center_near = (nr.screen_x - nl.screen_x) / 2.0;
            let center_far = (fr.screen_x - fl.screen_x) / 2.0;

            surface.fill_polygon(
                &[
                    pt(nl, center_near - half_near),
                    pt(nl, center_near + half_near),
                    pt(fl, center_far + half_far),
                    pt(fl, center_far - half_far),
                ],
                self.palette.center_line.into(),
            );
        }
    }

    fn draw_decoration<S: Surface + ?Sized>(
        &mut self,
        track: &Track,
        strip: &Strip,
        proj: &Projector,
        images: &dyn ImageSource,
        surface: &mut S,
    ) {
        let deco = match &strip.segment.decoration {
            Some(deco) => deco,
            None => return,
        };

        let size = match images.image_size(&deco.image_key) {
            Some(size) => size,
            None => {
                if self.missing_images.insert(deco.image_key.to_owned()) {
                    tracing::warn!(
                        "Decoration image {} is not available, skipping it",
                        deco.image_key
                    );
                }
                return;
            }
        };

        // anchor on the ground in the middle of the segment
        let half_len = track.segment_length() / 2.0;
        let anchor = Point3::new(
            strip.segment.center_x() + deco.offset,
            0.0,
            strip.segment.z() + half_len,
        );

        let p = match proj.project(&anchor, strip.rel_z + half_len) {
            Some(p) => p,
            None => return,
        };

        // nearer decorations (larger scale) are drawn larger, bottom edge on the ground point
        let width = size.width * self.render_pars.sprite_scale * p.scale;
        let height = size.height * self.render_pars.sprite_scale * p.scale;

        surface.draw_image(
            &deco.image_key,
            ScreenRect::new(p.screen_x - width / 2.0, p.screen_y - height, width, height),
        );
    }
}
