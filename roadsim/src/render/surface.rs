use crate::render::sprites;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> RgbColor {
        RgbColor { r, g, b }
    }

    pub fn with_alpha(self, a: f64) -> RgbaColor {
        RgbaColor {
            r: self.r,
            g: self.g,
            b: self.b,
            a: a.clamp(0.0, 1.0),
        }
    }
}

/// Color with straight (non-premultiplied) opacity a in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl From<RgbColor> for RgbaColor {
    fn from(color: RgbColor) -> Self {
        color.with_alpha(1.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> ScreenPoint {
        ScreenPoint { x, y }
    }
}

/// Axis-aligned rectangle in screen coordinates (y axis pointing down). width and height are
/// never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> ScreenRect {
        ScreenRect::from_corners(x, y, x + width, y + height)
    }

    /// from_corners creates a rectangle from two opposite corners given in any order.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> ScreenRect {
        ScreenRect {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Surface is the output of the renderers. Implementations exist for the egui viewer, the PNG
/// exporter and for recording draw calls in tests. Calls must not fail: a backend that cannot
/// draw a primitive simply drops it.
pub trait Surface {
    fn fill_rect(&mut self, rect: ScreenRect, color: RgbaColor);

    /// Fill a convex polygon.
    fn fill_polygon(&mut self, points: &[ScreenPoint], color: RgbaColor);

    fn stroke_polyline(&mut self, points: &[ScreenPoint], width: f64, color: RgbaColor);

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: RgbaColor);

    /// Draw the image registered under key into rect. Backends without image support fall back
    /// to the procedural sprite shapes.
    fn draw_image(&mut self, key: &str, rect: ScreenRect) {
        sprites::paint_sprite(self, key, rect);
    }
}

/// OffsetSurface forwards all draw calls to the inner surface, translated by (dx, dy). It is
/// used to draw panels (e.g. the minimap) in local coordinates.
pub struct OffsetSurface<'a, S: Surface + ?Sized> {
    inner: &'a mut S,
    dx: f64,
    dy: f64,
}

impl<'a, S: Surface + ?Sized> OffsetSurface<'a, S> {
    pub fn new(inner: &'a mut S, dx: f64, dy: f64) -> Self {
        OffsetSurface { inner, dx, dy }
    }

    fn shift(&self, p: &ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(p.x + self.dx, p.y + self.dy)
    }

    fn shift_rect(&self, rect: &ScreenRect) -> ScreenRect {
        ScreenRect {
            x: rect.x + self.dx,
            y: rect.y + self.dy,
            ..*rect
        }
    }
}

impl<'a, S: Surface + ?Sized> Surface for OffsetSurface<'a, S> {
    fn fill_rect(&mut self, rect: ScreenRect, color: RgbaColor) {
        let rect = self.shift_rect(&rect);
        self.inner.fill_rect(rect, color);
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], color: RgbaColor) {
        let points: Vec<ScreenPoint> = points.iter().map(|p| self.shift(p)).collect();
        self.inner.fill_polygon(&points, color);
    }

    fn stroke_polyline(&mut self, points: &[ScreenPoint], width: f64, color: RgbaColor) {
        let points: Vec<ScreenPoint> = points.iter().map(|p| self.shift(p)).collect();
        self.inner.stroke_polyline(&points, width, color);
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: RgbaColor) {
        let center = self.shift(&center);
        self.inner.fill_circle(center, radius, color);
    }

    fn draw_image(&mut self, key: &str, rect: ScreenRect) {
        let rect = self.shift_rect(&rect);
        self.inner.draw_image(key, rect);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        rect: ScreenRect,
        color: RgbaColor,
    },
    Polygon {
        points: Vec<ScreenPoint>,
        color: RgbaColor,
    },
    Polyline {
        points: Vec<ScreenPoint>,
        width: f64,
        color: RgbaColor,
    },
    Circle {
        center: ScreenPoint,
        radius: f64,
        color: RgbaColor,
    },
    Image {
        key: String,
        rect: ScreenRect,
    },
}

/// RecordingSurface keeps every draw call in order of submission.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        RecordingSurface::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: ScreenRect, color: RgbaColor) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], color: RgbaColor) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polyline(&mut self, points: &[ScreenPoint], width: f64, color: RgbaColor) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: RgbaColor) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_image(&mut self, key: &str, rect: ScreenRect) {
        self.commands.push(DrawCommand::Image {
            key: key.to_owned(),
            rect,
        });
    }
}
