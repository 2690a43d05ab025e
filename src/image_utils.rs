use eframe::egui::{self, Vec2};
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer};
use image::{DynamicImage, Rgba, RgbaImage};
use zune_jpeg::zune_core::bytestream::ZCursor;
use zune_jpeg::JpegDecoder;

use crate::{
    error::{CropError, Result},
    render::{AvatarView, BackgroundLayout, CoverLayout},
};

const PLACEHOLDER_BACKGROUND: Rgba<u8> = Rgba([226, 230, 236, 255]);
const PLACEHOLDER_FIGURE: Rgba<u8> = Rgba([164, 172, 186, 255]);

/// Decodes uploaded bytes, trying zune-jpeg first for JPEG content.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if matches!(image::guess_format(bytes), Ok(image::ImageFormat::Jpeg)) {
        let mut decoder = JpegDecoder::new(ZCursor::new(bytes));
        match decoder.decode() {
            Ok(pixels) => {
                let decoded = decoder.info().and_then(|info| {
                    image::RgbImage::from_raw(info.width as u32, info.height as u32, pixels)
                });
                if let Some(rgb) = decoded {
                    return Ok(DynamicImage::ImageRgb8(rgb));
                }
                log::debug!("zune-jpeg output was not RGB, falling back to image");
            }
            Err(err) => log::debug!("zune-jpeg failed ({err:?}), falling back to image"),
        }
    }
    Ok(image::load_from_memory(bytes)?)
}

pub fn natural_size(image: &DynamicImage) -> Vec2 {
    egui::vec2(image.width() as f32, image.height() as f32)
}

pub fn to_color_image(img: &DynamicImage) -> egui::ColorImage {
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.into_raw();
    egui::ColorImage::from_rgba_unmultiplied(size, &pixels)
}

/// The centered square of an image that a square viewport shows at zoom 1.
/// Returned as `(left, top, side)` in source pixels.
pub fn cover_square(width: u32, height: u32) -> (f64, f64, f64) {
    let side = width.min(height) as f64;
    (
        (width as f64 - side) / 2.0,
        (height as f64 - side) / 2.0,
        side,
    )
}

/// Same region as [`cover_square`], as normalized texture coordinates.
pub fn cover_square_uv(natural: Vec2) -> egui::Rect {
    let (left, top, side) = cover_square(natural.x.max(1.0) as u32, natural.y.max(1.0) as u32);
    let w = natural.x.max(1.0) as f64;
    let h = natural.y.max(1.0) as f64;
    egui::Rect::from_min_max(
        egui::pos2((left / w) as f32, (top / h) as f32),
        egui::pos2(((left + side) / w) as f32, ((top + side) / h) as f32),
    )
}

fn resize_region(
    source: &DynamicImage,
    region: (f64, f64, f64, f64),
    width: u32,
    height: u32,
) -> Result<RgbaImage> {
    let rgba = source.to_rgba8();
    let src = Image::from_vec_u8(rgba.width(), rgba.height(), rgba.into_raw(), PixelType::U8x4)
        .map_err(CropError::resize)?;
    let mut dst = Image::new(width.max(1), height.max(1), PixelType::U8x4);
    let (left, top, w, h) = region;
    let options = ResizeOptions::new().crop(left, top, w, h);
    Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(CropError::resize)?;
    RgbaImage::from_raw(dst.width(), dst.height(), dst.into_vec())
        .ok_or_else(|| CropError::resize("resized buffer has the wrong length"))
}

/// Rasterizes an avatar layout at `display` pixels square.
pub fn render_avatar(
    source: &DynamicImage,
    layout: &BackgroundLayout,
    display: u32,
) -> Result<RgbaImage> {
    let display = display.max(1);
    let tile = (layout.size.x.round() as u32).max(display);
    let (left, top, side) = cover_square(source.width(), source.height());
    let scaled = resize_region(source, (left, top, side, side), tile, tile)?;
    let slack = tile - display;
    let x = (layout.position.x.round().max(0.0) as u32).min(slack);
    let y = (layout.position.y.round().max(0.0) as u32).min(slack);
    Ok(image::imageops::crop_imm(&scaled, x, y, display, display).to_image())
}

/// Rasterizes an avatar view, drawing the placeholder when there is no
/// image or the image could not be provided.
pub fn render_view(
    view: &AvatarView,
    source: Option<&DynamicImage>,
    display: u32,
) -> Result<RgbaImage> {
    match (view, source) {
        (AvatarView::Image { layout, .. }, Some(source)) => {
            render_avatar(source, &layout.resolve(display as f32), display)
        }
        _ => Ok(placeholder(display)),
    }
}

/// Generic head-and-shoulders silhouette.
pub fn placeholder(display: u32) -> RgbaImage {
    let size = display.max(1) as f32;
    let head = (size * 0.5, size * 0.38, size * 0.18);
    let body = (size * 0.5, size * 0.95, size * 0.36);
    RgbaImage::from_fn(display.max(1), display.max(1), |x, y| {
        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
        let inside = |(cx, cy, r): (f32, f32, f32)| (px - cx).powi(2) + (py - cy).powi(2) <= r * r;
        if inside(head) || inside(body) {
            PLACEHOLDER_FIGURE
        } else {
            PLACEHOLDER_BACKGROUND
        }
    })
}

/// Rasterizes a cover strip of `display` size.
pub fn render_cover(
    source: &DynamicImage,
    layout: &CoverLayout,
    display: Vec2,
) -> Result<RgbaImage> {
    let width = display.x.round().max(1.0) as u32;
    let strip = display.y.round().max(1.0) as u32;
    let height = (layout.image_height.round() as u32).max(strip);
    let scaled = resize_region(
        source,
        (0.0, 0.0, source.width() as f64, source.height() as f64),
        width,
        height,
    )?;
    let y = ((-layout.translate_y).round().max(0.0) as u32).min(height - strip);
    Ok(image::imageops::crop_imm(&scaled, 0, y, width, strip).to_image())
}
