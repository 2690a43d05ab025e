use eframe::egui::{self, Rect, Vec2};

use crate::{
    bounds::{cover_bounds, natural_height_at_full_width, PanBounds},
    config::CropConfig,
    crop::CoverOffset,
    drag::{DragAxes, DragEvent, DragSession},
    editor::{
        validation::{validate_image_file, ImageFile},
        ImageStatus,
    },
    error::ValidationError,
};

#[derive(Clone, Debug, PartialEq)]
struct CoverSnapshot {
    source: Option<String>,
    offset_y: f32,
}

/// Vertical-only pan editor for the cover strip.
///
/// The pan range depends on the image's natural size, so it is unknown
/// until the load event arrives. Until then drags are ignored and the
/// stored offset is held as-is, then clamped once the size is known.
pub struct CoverPanEditor {
    config: CropConfig,
    source: Option<String>,
    status: ImageStatus,
    offset_y: f32,
    drag: DragSession,
    initial: CoverSnapshot,
    replaced: Option<(CoverSnapshot, ImageStatus)>,
}

impl CoverPanEditor {
    pub fn open(config: CropConfig, source: Option<String>, offset: CoverOffset) -> Self {
        let offset_y = if source.is_some() {
            offset.offset_y.min(0.0)
        } else {
            0.0
        };
        Self {
            config,
            status: if source.is_some() {
                ImageStatus::Loading
            } else {
                ImageStatus::Empty
            },
            initial: CoverSnapshot {
                source: source.clone(),
                offset_y,
            },
            source,
            offset_y,
            drag: DragSession::new(DragAxes::Vertical),
            replaced: None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn status(&self) -> &ImageStatus {
        &self.status
    }

    pub fn offset(&self) -> CoverOffset {
        CoverOffset {
            offset_y: self.offset_y,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Rendered height of the image at full viewport width, once loaded.
    pub fn image_height(&self) -> Option<f32> {
        self.status
            .natural_size()
            .map(|natural| natural_height_at_full_width(natural, self.config.cover_viewport_width))
    }

    /// `None` until the image has loaded.
    pub fn bounds(&self) -> Option<PanBounds> {
        let viewport = self.config.cover_viewport_height;
        self.image_height()
            .map(|height| PanBounds::vertical(cover_bounds(height, viewport)))
    }

    pub fn image_rect(&self) -> Option<Rect> {
        self.image_height().map(|height| {
            Rect::from_min_size(
                egui::pos2(0.0, self.offset_y),
                egui::vec2(self.config.cover_viewport_width, height),
            )
        })
    }

    pub fn handle_pointer(&mut self, event: DragEvent) -> Option<f32> {
        let bounds = self.bounds()?;
        let current = egui::vec2(0.0, self.offset_y);
        let emitted = self.drag.handle(event, current, bounds)?;
        self.offset_y = emitted.y;
        Some(self.offset_y)
    }

    pub fn nudge(&mut self, direction: Vec2) {
        let Some(bounds) = self.bounds() else { return };
        let current = egui::vec2(0.0, self.offset_y);
        if let Some(moved) = self.drag.nudge(direction, current, bounds) {
            self.offset_y = moved.y;
        }
    }

    pub fn on_image_replace(&mut self, file: &ImageFile) -> Result<(), ValidationError> {
        let format = validate_image_file(file, self.config.max_file_size)?;
        log::info!("cover replaced with {} ({format:?})", file.name);
        self.drag.cancel();
        if self.replaced.is_none() {
            self.replaced = Some((self.snapshot(), self.status.clone()));
        }
        self.source = Some(file.name.clone());
        self.status = ImageStatus::Loading;
        self.offset_y = 0.0;
        Ok(())
    }

    pub fn on_image_loaded(&mut self, natural: Vec2) {
        if self.source.is_none() {
            return;
        }
        self.replaced = None;
        self.status = ImageStatus::Loaded { natural };
        if let Some(bounds) = self.bounds() {
            self.offset_y = bounds.y.clamp(self.offset_y);
        }
        log::debug!("cover loaded at {natural:?}, offset {}", self.offset_y);
    }

    /// Rolls a replacement that failed to decode back to the previous cover.
    pub fn on_image_failed(&mut self) {
        self.drag.cancel();
        match self.replaced.take() {
            Some((previous, status)) => {
                log::warn!("cover could not be decoded, restoring {:?}", previous.source);
                self.source = previous.source;
                self.status = status;
                self.offset_y = previous.offset_y;
            }
            None if self.source.is_some() => self.status = ImageStatus::Unavailable,
            None => {}
        }
    }

    pub fn on_remove(&mut self) {
        self.drag.cancel();
        self.replaced = None;
        self.source = None;
        self.status = ImageStatus::Empty;
        self.offset_y = 0.0;
    }

    pub fn on_save(&self) -> CoverOffset {
        self.offset()
    }

    pub fn on_cancel(&mut self) {
        self.drag.cancel();
        self.replaced = None;
        let initial = self.initial.clone();
        if initial.source != self.source {
            self.status = match initial.source {
                Some(_) => ImageStatus::Loading,
                None => ImageStatus::Empty,
            };
        }
        self.source = initial.source;
        self.offset_y = initial.offset_y;
    }

    pub fn commit(&mut self) {
        self.initial = self.snapshot();
    }

    fn snapshot(&self) -> CoverSnapshot {
        CoverSnapshot {
            source: self.source.clone(),
            offset_y: self.offset_y,
        }
    }
}
