pub mod avatar;
pub mod cover;
pub mod dialog;
pub mod validation;

use eframe::egui::Vec2;

pub use self::{avatar::CropEditor, cover::CoverPanEditor, dialog::ProfileImageDialog};

/// Load state of an editor's image. Bounds that depend on the natural size
/// are only computed once this is `Loaded`.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageStatus {
    Empty,
    Loading,
    Loaded { natural: Vec2 },
    /// The stored image could not be decoded. Source and crop are kept.
    Unavailable,
}

impl ImageStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ImageStatus::Loaded { .. })
    }

    pub fn natural_size(&self) -> Option<Vec2> {
        match self {
            ImageStatus::Loaded { natural } => Some(*natural),
            _ => None,
        }
    }
}
