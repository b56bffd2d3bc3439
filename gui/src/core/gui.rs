use crate::core::egui_surface::EguiSurface;
use crate::interfaces::roadsim_interface::RoadsimInterface;
use eframe::{egui, epi};
use flume::Receiver;
use helpers::buffer::RingBuffer;
use roadsim::core::session::Session;
use roadsim::core::track::Track;
use roadsim::interfaces::gui_interface::DriveState;
use roadsim::pre::read_sim_pars::SimPars;
use roadsim::render::palette::Palette;
use roadsim::render::sprites::ProceduralSprites;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
pub struct RoadView {
    pub roadsim_interface: RoadsimInterface,
    pub track: Arc<Track>,
    pub session: Session,
    pub sprites: ProceduralSprites,
    pub prev_update: Instant,
    pub prev_update_durations: RingBuffer<u32>,
}

impl RoadView {
    pub fn new(
        rx: Receiver<DriveState>,
        track: Arc<Track>,
        sim_pars: &SimPars,
    ) -> anyhow::Result<RoadView> {
        let palette = Palette::from_pars(&sim_pars.palette)?;
        let session = Session::new(&sim_pars.camera_pars, &sim_pars.render_pars, &palette)?;

        Ok(RoadView {
            roadsim_interface: RoadsimInterface::new(rx),
            track,
            session,
            sprites: ProceduralSprites::new(),
            prev_update: Instant::now(),
            prev_update_durations: RingBuffer::new(60),
        })
    }

    /// get_dest_rect returns the largest area inside the available rect that has the aspect ratio
    /// of the rendered viewport.
    fn get_dest_rect(&self, available: egui::Rect) -> egui::Rect {
        let viewport = self.session.renderer().viewport();
        let frame_aspect = (viewport.width / viewport.height) as f32;
        let screen_width = available.width();
        let screen_height = available.height();
        let screen_aspect = screen_width / screen_height;

        if screen_aspect > frame_aspect {
            // screen is wider -> fit height
            let new_width = screen_height * frame_aspect;
            let offset_x = (screen_width - new_width) / 2.0;
            egui::Rect::from_min_size(
                egui::Pos2::new(available.min.x + offset_x, available.min.y),
                egui::Vec2::new(new_width, screen_height),
            )
        } else {
            // screen is taller -> fit width
            let new_height = screen_width / frame_aspect;
            let offset_y = (screen_height - new_height) / 2.0;
            egui::Rect::from_min_size(
                egui::Pos2::new(available.min.x, available.min.y + offset_y),
                egui::Vec2::new(screen_width, new_height),
            )
        }
    }

    pub fn set_ui_content(&mut self, ui: &mut egui::Ui) -> egui::Response {
        // PREPARATIONS ----------------------------------------------------------------------------
        // get UI handles
        let (response, painter) =
            ui.allocate_painter(ui.available_size_before_wrap_finite(), egui::Sense::hover());

        // get transformation from frame pixels to pixels in the window
        let viewport = self.session.renderer().viewport();
        let to_screen = egui::emath::RectTransform::from_to(
            egui::Rect::from_min_max(
                egui::Pos2 { x: 0.0, y: 0.0 },
                egui::Pos2 {
                    x: viewport.width as f32,
                    y: viewport.height as f32,
                },
            ),
            self.get_dest_rect(response.rect),
        );

        // DRAWING ---------------------------------------------------------------------------------
        // camera update and rendering of the current frame
        let drive_state = &self.roadsim_interface.drive_state;
        let mut surface = EguiSurface::new(to_screen);

        self.session.tick(
            &self.track,
            &drive_state.player,
            &drive_state.rivals,
            &self.sprites,
            &mut surface,
        );

        // calculate current UI update duration, append it to the buffer, and set update time
        self.prev_update_durations
            .push(self.prev_update.elapsed().as_millis() as u32);
        self.prev_update = Instant::now();

        if self.session.no_frames() % 300 == 0 {
            if let Some(avg) = self.prev_update_durations.get_avg() {
                tracing::debug!("GUI update frequency: {:.0} Hz", 1000.0 / avg.max(1.0));
            }
        }

        // update shapes in UI painter and return response
        painter.extend(surface.into_shapes());
        response
    }
}

impl epi::App for RoadView {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::CtxRef, _frame: &mut epi::Frame) {
        // update drive interface
        self.roadsim_interface.update();

        // update UI content
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                self.set_ui_content(ui);
            });
        });

        // request repaint of the UI
        ctx.request_repaint();
    }

    fn name(&self) -> &str {
        "Road View"
    }
}
