use crate::render::surface::{RgbColor, ScreenPoint, ScreenRect, Surface};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

/// ImageSource reports which decoration images are ready to be drawn. Readiness is only checked,
/// never awaited: an image that is not ready is skipped for the current frame.
pub trait ImageSource {
    fn image_size(&self, key: &str) -> Option<ImageSize>;
}

/// ProceduralSprites provides the built-in decoration images. They need no loading and are
/// painted from simple shapes by `paint_sprite`.
#[derive(Debug, Clone)]
pub struct ProceduralSprites {
    sizes: HashMap<String, ImageSize>,
}

impl ProceduralSprites {
    pub fn new() -> Self {
        let mut sizes = HashMap::new();
        sizes.insert(
            "tree1".to_owned(),
            ImageSize {
                width: 80.0,
                height: 160.0,
            },
        );
        sizes.insert(
            "bush1".to_owned(),
            ImageSize {
                width: 120.0,
                height: 60.0,
            },
        );
        ProceduralSprites { sizes }
    }

    /// without returns a copy of the sprite set in which the given image is not available.
    pub fn without(mut self, key: &str) -> Self {
        self.sizes.remove(key);
        self
    }
}

impl Default for ProceduralSprites {
    fn default() -> Self {
        ProceduralSprites::new()
    }
}

impl ImageSource for ProceduralSprites {
    fn image_size(&self, key: &str) -> Option<ImageSize> {
        self.sizes.get(key).copied()
    }
}

const FOLIAGE: RgbColor = RgbColor::new(0x1E, 0x7A, 0x1E);
const FOLIAGE_DARK: RgbColor = RgbColor::new(0x14, 0x55, 0x14);
const TRUNK: RgbColor = RgbColor::new(0x6B, 0x45, 0x23);

/// paint_sprite draws the procedural shape of the given image key into rect. Unknown keys are
/// painted as a plain block so that they stay visible.
pub fn paint_sprite<S: Surface + ?Sized>(surface: &mut S, key: &str, rect: ScreenRect) {
    let ScreenRect {
        x,
        y,
        width: w,
        height: h,
    } = rect;

    match key {
        "tree1" => {
            // trunk in the lower fifth, crown above
            surface.fill_rect(
                ScreenRect::new(x + 0.4 * w, y + 0.8 * h, 0.2 * w, 0.2 * h),
                TRUNK.into(),
            );
            surface.fill_polygon(
                &[
                    ScreenPoint::new(x + 0.5 * w, y),
                    ScreenPoint::new(x + w, y + 0.8 * h),
                    ScreenPoint::new(x, y + 0.8 * h),
                ],
                FOLIAGE.into(),
            );
        }
        "bush1" => {
            surface.fill_polygon(
                &[
                    ScreenPoint::new(x, y + h),
                    ScreenPoint::new(x + 0.15 * w, y + 0.2 * h),
                    ScreenPoint::new(x + 0.5 * w, y),
                    ScreenPoint::new(x + 0.85 * w, y + 0.2 * h),
                    ScreenPoint::new(x + w, y + h),
                ],
                FOLIAGE_DARK.into(),
            );
        }
        _ => surface.fill_rect(rect, FOLIAGE.into()),
    }
}
