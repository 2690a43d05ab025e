#![allow(dead_code)]

use std::{io::Cursor, path::PathBuf};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use profilecrop::{
    crop::ProfileImagePayload,
    editor::validation::ImageFile,
    error::{CropError, Result},
    gateway::PersistenceGateway,
};

pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    let pixel = Rgba(color);
    let buffer = RgbaImage::from_pixel(width, height, pixel);
    DynamicImage::ImageRgba8(buffer)
}

/// Left half red, right half blue.
pub fn split_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    }))
}

pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("failed to encode png");
    bytes
}

pub fn png_file(name: &str, width: u32, height: u32) -> ImageFile {
    ImageFile::new(name, png_bytes(&solid_image(width, height, [10, 20, 30, 255])))
}

/// A PNG whose header sniffs fine but whose body is cut off.
pub fn truncated_png(name: &str) -> ImageFile {
    let mut bytes = png_bytes(&solid_image(16, 16, [10, 20, 30, 255]));
    bytes.truncate(bytes.len() / 2);
    ImageFile::new(name, bytes)
}

pub fn write_image(path: impl Into<PathBuf>, image: &DynamicImage) {
    image
        .save(path.into())
        .expect("failed to write image to disk");
}

#[derive(Default)]
pub struct MemoryGateway {
    pub stored: Vec<ProfileImagePayload>,
    pub fail: bool,
}

impl PersistenceGateway for MemoryGateway {
    fn store(&mut self, payload: &ProfileImagePayload) -> Result<()> {
        if self.fail {
            return Err(CropError::gateway("backend unavailable"));
        }
        self.stored.push(payload.clone());
        Ok(())
    }
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}
