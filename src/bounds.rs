use eframe::egui::{self, Vec2};

/// Legal range of a translation offset on one axis.
///
/// Offsets are the position of the image's top-left corner relative to the
/// viewport's top-left corner, so they are always `<= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    pub const FIXED: Self = Self { min: 0.0, max: 0.0 };

    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            return self.max;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(self, value: f32) -> bool {
        self.min <= value && value <= self.max
    }

    fn overflow(rendered: f32, viewport: f32) -> Self {
        if rendered <= viewport {
            Self::FIXED
        } else {
            Self {
                min: -(rendered - viewport),
                max: 0.0,
            }
        }
    }
}

/// Bounds for both axes of a pan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanBounds {
    pub x: Bounds,
    pub y: Bounds,
}

impl PanBounds {
    pub const FIXED: Self = Self {
        x: Bounds::FIXED,
        y: Bounds::FIXED,
    };

    pub fn square(bounds: Bounds) -> Self {
        Self { x: bounds, y: bounds }
    }

    pub fn vertical(y: Bounds) -> Self {
        Self { x: Bounds::FIXED, y }
    }

    pub fn clamp(self, offset: Vec2) -> Vec2 {
        egui::vec2(self.x.clamp(offset.x), self.y.clamp(offset.y))
    }

    pub fn contains(self, offset: Vec2) -> bool {
        self.x.contains(offset.x) && self.y.contains(offset.y)
    }
}

/// Pan range for the square avatar viewport at `scale`.
///
/// The image is rendered `viewport * scale` on each axis, so at `scale <= 1`
/// no panning is possible and the range collapses to `{0, 0}`.
pub fn avatar_bounds(viewport: f32, scale: f32) -> Bounds {
    debug_assert!(viewport > 0.0, "viewport must be positive");
    Bounds::overflow(viewport * scale, viewport)
}

/// Vertical pan range for the cover strip.
///
/// `natural_height_at_full_width` must come from a loaded image; see
/// [`natural_height_at_full_width`].
pub fn cover_bounds(natural_height_at_full_width: f32, viewport: f32) -> Bounds {
    Bounds::overflow(natural_height_at_full_width, viewport)
}

/// Rendered height of an image of `natural` size once stretched to
/// `viewport_width` with its aspect ratio preserved.
pub fn natural_height_at_full_width(natural: Vec2, viewport_width: f32) -> f32 {
    let safe = egui::vec2(natural.x.max(1.0), natural.y.max(1.0));
    viewport_width * safe.y / safe.x
}
