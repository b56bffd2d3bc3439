use plotters::coord::Shift;
use plotters::prelude::*;
use roadsim::render::surface::{RgbaColor, ScreenPoint, ScreenRect, Surface};
use std::fmt::Debug;

fn to_plotters(color: RgbaColor) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.a)
}

fn coord(p: &ScreenPoint) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

/// PlotSurface draws frames into a plotters drawing area, e.g. a PNG file. Pixel coordinates of
/// the frame are used as backend coordinates directly.
pub struct PlotSurface<'a, DB: DrawingBackend> {
    area: &'a DrawingArea<DB, Shift>,
    no_failed: usize,
}

impl<'a, DB: DrawingBackend> PlotSurface<'a, DB> {
    pub fn new(area: &'a DrawingArea<DB, Shift>) -> Self {
        PlotSurface {
            area,
            no_failed: 0,
        }
    }

    pub fn no_failed(&self) -> usize {
        self.no_failed
    }

    // a failed primitive is dropped, the frame continues
    fn check<E: Debug>(&mut self, res: Result<(), E>) {
        if let Err(err) = res {
            tracing::debug!("Dropped primitive: {:?}", err);
            self.no_failed += 1;
        }
    }
}

impl<'a, DB: DrawingBackend> Surface for PlotSurface<'a, DB> {
    fn fill_rect(&mut self, rect: ScreenRect, color: RgbaColor) {
        let res = self.area.draw(&Rectangle::new(
            [
                coord(&ScreenPoint::new(rect.x, rect.y)),
                coord(&ScreenPoint::new(rect.right(), rect.bottom())),
            ],
            to_plotters(color).filled(),
        ));
        self.check(res);
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], color: RgbaColor) {
        let res = self.area.draw(&Polygon::new(
            points.iter().map(coord).collect::<Vec<(i32, i32)>>(),
            to_plotters(color).filled(),
        ));
        self.check(res);
    }

    fn stroke_polyline(&mut self, points: &[ScreenPoint], width: f64, color: RgbaColor) {
        let res = self.area.draw(&PathElement::new(
            points.iter().map(coord).collect::<Vec<(i32, i32)>>(),
            to_plotters(color).stroke_width(width.round().max(1.0) as u32),
        ));
        self.check(res);
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: RgbaColor) {
        let res = self.area.draw(&Circle::new(
            coord(&center),
            radius.round() as i32,
            to_plotters(color).filled(),
        ));
        self.check(res);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadsim::render::surface::RgbColor;

    #[test]
    fn draws_into_pixel_buffer() {
        let mut buf = vec![0u8; 20 * 10 * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (20, 10)).into_drawing_area();
            let mut surface = PlotSurface::new(&root);
            surface.fill_rect(
                ScreenRect::new(0.0, 0.0, 10.0, 10.0),
                RgbColor::new(255, 0, 0).into(),
            );
            surface.fill_circle(
                ScreenPoint::new(15.0, 5.0),
                2.0,
                RgbColor::new(0, 0, 255).into(),
            );
            assert_eq!(surface.no_failed(), 0);
            root.present().unwrap();
        }

        // upper left pixel is red, the center of the circle is blue
        assert_eq!(&buf[0..3], &[255, 0, 0]);
        let idx = (5 * 20 + 15) * 3;
        assert_eq!(&buf[idx..idx + 3], &[0, 0, 255]);
    }
}
