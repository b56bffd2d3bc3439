use eframe::egui;
use eframe::egui::emath::RectTransform;
use roadsim::render::surface::{RgbaColor, ScreenPoint, ScreenRect, Surface};

fn to_color32(color: RgbaColor) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        color.r,
        color.g,
        color.b,
        (color.a * 255.0).round() as u8,
    )
}

/// EguiSurface collects the draw calls of a frame as egui shapes. Frame coordinates (pixels of the
/// configured viewport) are mapped into the window area by `to_screen`.
pub struct EguiSurface {
    shapes: Vec<egui::Shape>,
    to_screen: RectTransform,
}

impl EguiSurface {
    pub fn new(to_screen: RectTransform) -> EguiSurface {
        EguiSurface {
            shapes: vec![],
            to_screen,
        }
    }

    fn pos(&self, p: &ScreenPoint) -> egui::Pos2 {
        self.to_screen
            * egui::Pos2 {
                x: p.x as f32,
                y: p.y as f32,
            }
    }

    fn length(&self, l: f64) -> f32 {
        l as f32 * self.to_screen.scale().x
    }

    pub fn into_shapes(self) -> Vec<egui::Shape> {
        self.shapes
    }
}

impl Surface for EguiSurface {
    fn fill_rect(&mut self, rect: ScreenRect, color: RgbaColor) {
        let rect = egui::Rect::from_min_max(
            self.pos(&ScreenPoint::new(rect.x, rect.y)),
            self.pos(&ScreenPoint::new(rect.right(), rect.bottom())),
        );
        self.shapes
            .push(egui::Shape::rect_filled(rect, 0.0, to_color32(color)));
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], color: RgbaColor) {
        if points.len() < 3 {
            return;
        }
        let points: Vec<egui::Pos2> = points.iter().map(|p| self.pos(p)).collect();
        self.shapes.push(egui::Shape::convex_polygon(
            points,
            to_color32(color),
            egui::Stroke::none(),
        ));
    }

    fn stroke_polyline(&mut self, points: &[ScreenPoint], width: f64, color: RgbaColor) {
        let points: Vec<egui::Pos2> = points.iter().map(|p| self.pos(p)).collect();
        self.shapes.push(egui::Shape::line(
            points,
            egui::Stroke::new(self.length(width), to_color32(color)),
        ));
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: RgbaColor) {
        self.shapes.push(egui::Shape::circle_filled(
            self.pos(&center),
            self.length(radius),
            to_color32(color),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadsim::render::surface::RgbColor;

    #[test]
    fn frame_is_scaled_into_window() {
        let to_screen = RectTransform::from_to(
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1280.0, 720.0)),
            egui::Rect::from_min_max(egui::pos2(10.0, 20.0), egui::pos2(650.0, 380.0)),
        );
        let mut surface = EguiSurface::new(to_screen);

        surface.fill_circle(
            ScreenPoint::new(640.0, 360.0),
            10.0,
            RgbColor::new(255, 0, 0).into(),
        );
        surface.fill_polygon(&[ScreenPoint::new(0.0, 0.0)], RgbColor::new(0, 0, 0).into());

        let shapes = surface.into_shapes();
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            egui::Shape::Circle { center, radius, .. } => {
                assert_eq!(*center, egui::pos2(330.0, 200.0));
                assert_eq!(*radius, 5.0);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn opacity_is_kept() {
        let color = to_color32(RgbColor::new(200, 100, 50).with_alpha(0.5));
        assert_eq!(color.a(), 128);
    }
}
