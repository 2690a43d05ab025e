use crate::{
    config::CropConfig,
    crop::{CoverOffset, ProfileImagePayload},
    editor::{CoverPanEditor, CropEditor},
    error::Result,
    gateway::PersistenceGateway,
};

/// Avatar and cover editors opened together. The two editors are
/// independent; the dialog only combines their output into one payload.
pub struct ProfileImageDialog {
    pub avatar: CropEditor,
    pub cover: CoverPanEditor,
}

impl ProfileImageDialog {
    pub fn open(config: CropConfig, stored: &ProfileImagePayload) -> Self {
        Self {
            avatar: CropEditor::open(config, stored.avatar.clone(), stored.profile_crop),
            cover: CoverPanEditor::open(
                config,
                stored.cover_image.clone(),
                CoverOffset {
                    offset_y: stored.cover_offset,
                },
            ),
        }
    }

    /// The payload for the current edit state. The crop is only included
    /// when an avatar is set and actually cropped.
    pub fn payload(&self) -> ProfileImagePayload {
        ProfileImagePayload {
            avatar: self.avatar.source().map(str::to_owned),
            cover_image: self.cover.source().map(str::to_owned),
            cover_offset: self.cover.on_save().offset_y,
            profile_crop: self.avatar.on_save().filter(|crop| !crop.is_uncropped()),
        }
    }

    /// Hands the payload to `gateway`. On failure the edit state is kept so
    /// the save can be retried.
    pub fn save(&mut self, gateway: &mut dyn PersistenceGateway) -> Result<ProfileImagePayload> {
        let payload = self.payload();
        if let Err(err) = gateway.store(&payload) {
            log::warn!("saving profile images failed, keeping edits: {err}");
            return Err(err);
        }
        self.avatar.commit();
        self.cover.commit();
        Ok(payload)
    }

    pub fn cancel(&mut self) {
        self.avatar.on_cancel();
        self.cover.on_cancel();
    }
}
