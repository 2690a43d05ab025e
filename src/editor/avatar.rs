use eframe::egui::{self, Rect, Vec2};

use crate::{
    bounds::{avatar_bounds, PanBounds},
    config::CropConfig,
    crop::CropMetadata,
    drag::{DragAxes, DragEvent, DragSession},
    editor::{
        validation::{validate_image_file, ImageFile},
        ImageStatus,
    },
    error::ValidationError,
};

#[derive(Clone, Debug, PartialEq)]
struct AvatarSnapshot {
    source: Option<String>,
    crop: CropMetadata,
}

/// Pan/zoom editor for the square avatar viewport.
pub struct CropEditor {
    config: CropConfig,
    source: Option<String>,
    status: ImageStatus,
    scale: f32,
    offset: Vec2,
    drag: DragSession,
    initial: AvatarSnapshot,
    /// Last good state while a replacement is waiting for its load event.
    replaced: Option<(AvatarSnapshot, ImageStatus)>,
}

impl CropEditor {
    /// Opens the editor on the currently stored avatar, if any. The stored
    /// crop is clamped into range; a source is considered loading until
    /// [`CropEditor::on_image_loaded`] is called.
    pub fn open(config: CropConfig, source: Option<String>, crop: Option<CropMetadata>) -> Self {
        let mut editor = Self {
            config,
            status: if source.is_some() {
                ImageStatus::Loading
            } else {
                ImageStatus::Empty
            },
            source,
            scale: 1.0,
            offset: Vec2::ZERO,
            drag: DragSession::new(DragAxes::Both),
            initial: AvatarSnapshot {
                source: None,
                crop: CropMetadata::default(),
            },
            replaced: None,
        };
        if editor.source.is_some() {
            if let Some(crop) = crop {
                editor.scale = editor.config.clamp_zoom(crop.scale);
                editor.offset = editor.bounds().clamp(crop.offset());
            }
        }
        editor.initial = editor.snapshot();
        editor
    }

    fn snapshot(&self) -> AvatarSnapshot {
        AvatarSnapshot {
            source: self.source.clone(),
            crop: self.crop(),
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn status(&self) -> &ImageStatus {
        &self.status
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn crop(&self) -> CropMetadata {
        CropMetadata::new(self.scale, self.offset)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    pub fn bounds(&self) -> PanBounds {
        PanBounds::square(avatar_bounds(self.config.avatar_viewport, self.scale))
    }

    /// Where the scaled image sits relative to the viewport's top-left.
    pub fn image_rect(&self) -> Rect {
        let side = self.config.avatar_viewport * self.scale;
        Rect::from_min_size(self.offset.to_pos2(), egui::vec2(side, side))
    }

    pub fn handle_pointer(&mut self, event: DragEvent) -> Option<Vec2> {
        if !self.status.is_loaded() {
            return None;
        }
        let emitted = self.drag.handle(event, self.offset, self.bounds());
        if let Some(offset) = emitted {
            self.offset = offset;
        }
        emitted
    }

    pub fn nudge(&mut self, direction: Vec2) {
        if !self.status.is_loaded() {
            return;
        }
        if let Some(offset) = self.drag.nudge(direction, self.offset, self.bounds()) {
            self.offset = offset;
        }
    }

    /// Applies a new zoom and re-clamps the offset, since a smaller scale
    /// shrinks the legal pan range.
    pub fn on_zoom_change(&mut self, new_scale: f32) {
        self.scale = self.config.clamp_zoom(new_scale);
        self.offset = self.bounds().clamp(self.offset);
        log::debug!("avatar zoom {:.2}, offset {:?}", self.scale, self.offset);
    }

    pub fn zoom_in(&mut self) {
        self.on_zoom_change(self.scale + self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.on_zoom_change(self.scale - self.config.zoom_step);
    }

    /// Accepts a new file. A rejected file leaves every bit of state as it
    /// was; an accepted one starts uncropped and waits for its load event.
    pub fn on_image_replace(&mut self, file: &ImageFile) -> Result<(), ValidationError> {
        let format = validate_image_file(file, self.config.max_file_size)?;
        log::info!("avatar replaced with {} ({format:?})", file.name);
        self.drag.cancel();
        if self.replaced.is_none() {
            self.replaced = Some((self.snapshot(), self.status.clone()));
        }
        self.source = Some(file.name.clone());
        self.status = ImageStatus::Loading;
        self.scale = 1.0;
        self.offset = Vec2::ZERO;
        Ok(())
    }

    pub fn on_image_loaded(&mut self, natural: Vec2) {
        if self.source.is_none() {
            return;
        }
        self.replaced = None;
        self.status = ImageStatus::Loaded { natural };
        self.offset = self.bounds().clamp(self.offset);
    }

    /// The current file passed validation but could not be decoded. A
    /// replacement is rolled back to what the editor showed before it; the
    /// image the editor was opened with keeps its source and crop.
    pub fn on_image_failed(&mut self) {
        self.drag.cancel();
        match self.replaced.take() {
            Some((previous, status)) => {
                log::warn!(
                    "avatar {} could not be decoded, restoring {:?}",
                    self.source.as_deref().unwrap_or_default(),
                    previous.source
                );
                self.source = previous.source;
                self.status = status;
                self.scale = previous.crop.scale;
                self.offset = previous.crop.offset();
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
        self.scale = 1.0;
        self.offset = Vec2::ZERO;
    }

    /// The crop to persist, or `None` when there is no image.
    pub fn on_save(&self) -> Option<CropMetadata> {
        self.source.as_ref().map(|_| self.crop())
    }

    /// Reverts to the state the editor was opened with.
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
        self.scale = initial.crop.scale;
        self.offset = initial.crop.offset();
    }

    /// Marks the current state as the new baseline after a successful save.
    pub fn commit(&mut self) {
        self.initial = self.snapshot();
    }
}
