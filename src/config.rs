use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};

pub const DEFAULT_AVATAR_VIEWPORT: f32 = 200.0;
pub const DEFAULT_COVER_VIEWPORT_HEIGHT: f32 = 150.0;
pub const DEFAULT_COVER_VIEWPORT_WIDTH: f32 = 600.0;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
pub const DEFAULT_MAX_ZOOM: f32 = 3.0;
pub const DEFAULT_ZOOM_STEP: f32 = 0.1;

/// Reference viewports and limits shared by the editors and the renderers.
///
/// The avatar and cover reference sizes are independent values. A stored
/// crop can only be reconstructed with the same reference it was edited
/// against, so both sides must read them from the same `CropConfig`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfig {
    pub avatar_viewport: f32,
    pub cover_viewport_width: f32,
    pub cover_viewport_height: f32,
    pub max_file_size: u64,
    pub max_zoom: f32,
    pub zoom_step: f32,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            avatar_viewport: DEFAULT_AVATAR_VIEWPORT,
            cover_viewport_width: DEFAULT_COVER_VIEWPORT_WIDTH,
            cover_viewport_height: DEFAULT_COVER_VIEWPORT_HEIGHT,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_step: DEFAULT_ZOOM_STEP,
        }
    }
}

impl CropConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("avatar viewport", self.avatar_viewport),
            ("cover viewport width", self.cover_viewport_width),
            ("cover viewport height", self.cover_viewport_height),
            ("zoom step", self.zoom_step),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CropError::config(format!("{name} must be positive, got {value}")));
            }
        }
        if !self.max_zoom.is_finite() || self.max_zoom < 1.0 {
            return Err(CropError::config(format!(
                "max zoom must be at least 1.0, got {}",
                self.max_zoom
            )));
        }
        if self.max_file_size == 0 {
            return Err(CropError::config("max file size must be non-zero"));
        }
        Ok(())
    }

    /// Clamps a requested zoom into `1.0..=max_zoom`.
    pub fn clamp_zoom(&self, scale: f32) -> f32 {
        if scale.is_nan() {
            return 1.0;
        }
        scale.clamp(1.0, self.max_zoom)
    }
}
