use crate::core::camera::{Camera, CameraPars};
use crate::core::track::Track;
use crate::error::ConfigError;
use crate::interfaces::gui_interface::VehicleState;
use crate::render::minimap::{EntityKind, MinimapEntity};
use crate::render::palette::Palette;
use crate::render::scene::{RenderPars, SceneRenderer};
use crate::render::sprites::ImageSource;
use crate::render::surface::Surface;

/// Session ties camera and renderer together. Each tick first moves the camera to the current
/// vehicle state and only then draws the frame, such that a frame never shows a stale camera.
#[derive(Debug)]
pub struct Session {
    camera: Camera,
    renderer: SceneRenderer,
    no_frames: u64,
}

impl Session {
    pub fn new(
        camera_pars: &CameraPars,
        render_pars: &RenderPars,
        palette: &Palette,
    ) -> Result<Session, ConfigError> {
        Ok(Session {
            camera: Camera::new(camera_pars)?,
            renderer: SceneRenderer::new(render_pars, palette)?,
            no_frames: 0,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &SceneRenderer {
        &self.renderer
    }

    pub fn no_frames(&self) -> u64 {
        self.no_frames
    }

    /// tick updates the camera from the player vehicle and draws the frame including the minimap
    /// entities for player and rivals.
    pub fn tick<S: Surface + ?Sized>(
        &mut self,
        track: &Track,
        player: &VehicleState,
        rivals: &[VehicleState],
        images: &dyn ImageSource,
        surface: &mut S,
    ) {
        self.camera.update(player.z, player.x, track.total_length());

        let mut entities = Vec::with_capacity(rivals.len() + 1);
        entities.extend(rivals.iter().map(|r| MinimapEntity {
            x: r.x,
            z: r.z,
            kind: EntityKind::Rival,
        }));
        entities.push(MinimapEntity {
            x: player.x,
            z: player.z,
            kind: EntityKind::Player,
        });

        self.renderer
            .draw_frame(track, &self.camera, &entities, images, surface);
        self.no_frames += 1;
    }
}
