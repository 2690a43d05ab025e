//! Read-only reconstruction of stored crops at arbitrary display sizes.
//!
//! Stored offsets are in editing-viewport units. Everything here converts
//! them through [`to_display_offset`] so the reference viewport stays the
//! single scale factor between the editor and any displayed avatar.

use eframe::egui::{self, Vec2};
use serde_json::Value;

use crate::{
    bounds::{cover_bounds, natural_height_at_full_width},
    config::CropConfig,
    crop::{parse_crop, CropMetadata},
};

/// Background-style placement of the scaled image behind a square viewport.
///
/// `size` is the scaled tile, `position` how far into the tile the
/// viewport's top-left corner sits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundLayout {
    pub size: Vec2,
    pub position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AvatarLayout {
    Cropped(BackgroundLayout),
    /// Center the image and scale it to cover the viewport.
    CoverFit,
}

impl AvatarLayout {
    /// The explicit layout, with cover-fit expressed as an uncropped tile.
    pub fn resolve(self, display_size: f32) -> BackgroundLayout {
        match self {
            AvatarLayout::Cropped(layout) => layout,
            AvatarLayout::CoverFit => BackgroundLayout {
                size: egui::vec2(display_size, display_size),
                position: Vec2::ZERO,
            },
        }
    }
}

/// Converts a stored editor offset into a rendered offset at `display_size`:
/// `-stored * (display_size / reference_viewport)`.
pub fn to_display_offset(stored: Vec2, display_size: f32, reference_viewport: f32) -> Vec2 {
    let ratio = display_size / reference_viewport;
    -stored * ratio
}

pub fn crop_layout(
    crop: &CropMetadata,
    display_size: f32,
    reference_viewport: f32,
) -> BackgroundLayout {
    let tile = display_size * crop.scale;
    let slack = (tile - display_size).max(0.0);
    let position = to_display_offset(crop.offset(), display_size, reference_viewport);
    BackgroundLayout {
        size: egui::vec2(tile, tile),
        position: egui::vec2(position.x.clamp(0.0, slack), position.y.clamp(0.0, slack)),
    }
}

/// Lays out a stored crop at `display_size`. A scale outside the editor's
/// zoom range cannot have come from the editor and renders as cover-fit.
pub fn avatar_layout(
    crop: Option<&CropMetadata>,
    display_size: f32,
    config: &CropConfig,
) -> AvatarLayout {
    match crop {
        Some(crop) if (1.0..=config.max_zoom).contains(&crop.scale) => {
            AvatarLayout::Cropped(crop_layout(crop, display_size, config.avatar_viewport))
        }
        Some(crop) => {
            log::debug!("stored avatar scale {} out of range, using cover-fit", crop.scale);
            AvatarLayout::CoverFit
        }
        None => AvatarLayout::CoverFit,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AvatarView {
    Image { src: String, layout: AvatarLayout },
    Placeholder,
}

/// A stored avatar prepared for display at one size.
pub struct CroppedAvatar<'a> {
    src: Option<String>,
    crop: Option<CropMetadata>,
    display_size: f32,
    config: CropConfig,
    on_click: Option<Box<dyn FnMut() + 'a>>,
}

impl<'a> CroppedAvatar<'a> {
    /// `raw_crop` may be an object, a JSON-encoded string, or garbage; the
    /// last renders as cover-fit.
    pub fn new(
        src: Option<&str>,
        raw_crop: Option<&Value>,
        display_size: f32,
        config: &CropConfig,
    ) -> Self {
        Self::with_crop(src, raw_crop.and_then(parse_crop), display_size, config)
    }

    pub fn with_crop(
        src: Option<&str>,
        crop: Option<CropMetadata>,
        display_size: f32,
        config: &CropConfig,
    ) -> Self {
        Self {
            src: src.filter(|s| !s.trim().is_empty()).map(str::to_owned),
            crop,
            display_size,
            config: *config,
            on_click: None,
        }
    }

    pub fn on_click(mut self, handler: impl FnMut() + 'a) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    pub fn display_size(&self) -> f32 {
        self.display_size
    }

    pub fn view(&self) -> AvatarView {
        match &self.src {
            Some(src) => AvatarView::Image {
                src: src.clone(),
                layout: avatar_layout(self.crop.as_ref(), self.display_size, &self.config),
            },
            None => AvatarView::Placeholder,
        }
    }

    /// Fires the click handler, if any. Works for the placeholder too.
    pub fn click(&mut self) -> bool {
        match self.on_click.as_mut() {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

/// Placement of the cover image inside a strip of a given display size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverLayout {
    pub image_height: f32,
    /// Vertical translation of the image, `<= 0`.
    pub translate_y: f32,
}

/// Reconstructs a stored cover offset inside a `display` strip.
///
/// The offset was captured against `reference_height`, which is configured
/// separately from the avatar reference viewport. The result is clamped so
/// the strip stays covered at the new size.
pub fn cover_layout(
    stored_offset_y: f32,
    natural: Vec2,
    display: Vec2,
    reference_height: f32,
) -> CoverLayout {
    let image_height = natural_height_at_full_width(natural, display.x);
    let scaled = stored_offset_y * (display.y / reference_height);
    CoverLayout {
        image_height,
        translate_y: cover_bounds(image_height, display.y).clamp(scaled),
    }
}
