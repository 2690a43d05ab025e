use std::path::Path;

use image::ImageFormat;

use crate::error::{Result, ValidationError};

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "gif", "webp", "tiff", "tif", "ico",
];

/// A file picked by the user, before it is accepted by an editor.
#[derive(Clone, Debug)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self {
            name: path.display().to_string(),
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Checks that `file` is an image within the size ceiling.
///
/// The type is sniffed from the content; the extension only has to agree
/// when one is present.
pub fn validate_image_file(
    file: &ImageFile,
    max_size: u64,
) -> std::result::Result<ImageFormat, ValidationError> {
    if file.bytes.is_empty() {
        return Err(ValidationError::Empty {
            name: file.name.clone(),
        });
    }
    if file.size() > max_size {
        return Err(ValidationError::TooLarge {
            name: file.name.clone(),
            size: file.size(),
            limit: max_size,
        });
    }
    let not_an_image = || ValidationError::NotAnImage {
        name: file.name.clone(),
    };
    if let Some(ext) = Path::new(&file.name).extension().and_then(|e| e.to_str()) {
        if !SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            return Err(not_an_image());
        }
    }
    let format = image::guess_format(&file.bytes).map_err(|_| not_an_image())?;
    if !format.reading_enabled() {
        return Err(not_an_image());
    }
    Ok(format)
}
