pub mod canvas;
pub mod loader;

use std::{path::Path, time::Duration};

use anyhow::{Context as _, Result};
use eframe::{
    egui::{self, Color32, Vec2},
    App, Frame,
};

use crate::{
    config::CropConfig,
    editor::{validation::ImageFile, ImageStatus, ProfileImageDialog},
    gateway::JsonFileGateway,
    image_utils::placeholder,
    render::CroppedAvatar,
};

use self::{
    canvas::{avatar_preview, avatar_viewport, cover_viewport, KeyboardState},
    loader::{LoadEvent, Loader, Slot},
};

/// Display sizes the avatar is previewed at: list row and profile header.
pub const PREVIEW_SIZES: [f32; 2] = [40.0, 140.0];

const SHORTCUTS: &str = "Ctrl+S: Save | Esc: Cancel | +/-: Zoom | Arrows: Nudge";

pub struct ProfileCropApp {
    pub config: CropConfig,
    pub dialog: ProfileImageDialog,
    pub gateway: JsonFileGateway,
    pub loader: Loader,
    pub avatar_texture: Option<(egui::TextureHandle, Vec2)>,
    pub cover_texture: Option<egui::TextureHandle>,
    pub placeholder: egui::TextureHandle,
    pub avatar_path: String,
    pub cover_path: String,
    pub status: String,
}

impl ProfileCropApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: CropConfig,
        gateway: JsonFileGateway,
        avatar: Option<&Path>,
        cover: Option<&Path>,
    ) -> Result<Self> {
        let stored = gateway
            .load()
            .with_context(|| format!("Unable to read {}", gateway.path().display()))?
            .unwrap_or_default();
        let dialog = ProfileImageDialog::open(config, &stored);
        let placeholder_size = PREVIEW_SIZES[PREVIEW_SIZES.len() - 1] as u32;
        let placeholder = placeholder(placeholder_size);
        let placeholder = cc.egui_ctx.load_texture(
            "profilecrop-placeholder",
            egui::ColorImage::from_rgba_unmultiplied(
                [placeholder.width() as usize, placeholder.height() as usize],
                placeholder.as_raw(),
            ),
            egui::TextureOptions::LINEAR,
        );

        let mut app = Self {
            config,
            avatar_path: stored.avatar.clone().unwrap_or_default(),
            cover_path: stored.cover_image.clone().unwrap_or_default(),
            dialog,
            gateway,
            loader: Loader::new(),
            avatar_texture: None,
            cover_texture: None,
            placeholder,
            status: String::from("Ready"),
        };
        app.sync_sources();
        if let Some(path) = avatar {
            app.avatar_path = path.display().to_string();
            app.replace_image(Slot::Avatar);
        }
        if let Some(path) = cover {
            app.cover_path = path.display().to_string();
            app.replace_image(Slot::Cover);
        }
        Ok(app)
    }

    fn source(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Avatar => self.dialog.avatar.source(),
            Slot::Cover => self.dialog.cover.source(),
        }
    }

    fn status_of(&self, slot: Slot) -> &ImageStatus {
        match slot {
            Slot::Avatar => self.dialog.avatar.status(),
            Slot::Cover => self.dialog.cover.status(),
        }
    }

    fn clear_texture(&mut self, slot: Slot) {
        match slot {
            Slot::Avatar => self.avatar_texture = None,
            Slot::Cover => self.cover_texture = None,
        }
    }

    /// Requests decoding for every slot still waiting on its load event.
    fn sync_sources(&mut self) {
        for slot in [Slot::Avatar, Slot::Cover] {
            let Some(source) = self.source(slot).map(str::to_owned) else {
                self.loader.invalidate(slot);
                self.clear_texture(slot);
                continue;
            };
            if *self.status_of(slot) != ImageStatus::Loading {
                continue;
            }
            self.clear_texture(slot);
            match ImageFile::read(Path::new(&source)) {
                Ok(file) => self.loader.request(slot, file),
                Err(err) => {
                    self.image_failed(slot);
                    self.status = format!("Unable to open {source}: {err}");
                }
            }
        }
    }

    fn replace_image(&mut self, slot: Slot) {
        let path = match slot {
            Slot::Avatar => self.avatar_path.trim().to_owned(),
            Slot::Cover => self.cover_path.trim().to_owned(),
        };
        if path.is_empty() {
            self.status = "Enter an image path first".into();
            return;
        }
        let file = match ImageFile::read(Path::new(&path)) {
            Ok(file) => file,
            Err(err) => {
                self.status = format!("Unable to open {path}: {err}");
                return;
            }
        };
        let accepted = match slot {
            Slot::Avatar => self.dialog.avatar.on_image_replace(&file),
            Slot::Cover => self.dialog.cover.on_image_replace(&file),
        };
        match accepted {
            Ok(()) => {
                self.status = format!("Loading {path}...");
                self.loader.request(slot, file);
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn remove_image(&mut self, slot: Slot) {
        match slot {
            Slot::Avatar => self.dialog.avatar.on_remove(),
            Slot::Cover => self.dialog.cover.on_remove(),
        }
        self.loader.invalidate(slot);
        self.clear_texture(slot);
        self.status = "Image removed".into();
    }

    fn image_failed(&mut self, slot: Slot) {
        match slot {
            Slot::Avatar => self.dialog.avatar.on_image_failed(),
            Slot::Cover => self.dialog.cover.on_image_failed(),
        }
    }

    /// Puts back whatever the slot showed before the file that failed.
    fn restore_after_failure(&mut self, slot: Slot) {
        self.image_failed(slot);
        let source = self.source(slot).unwrap_or_default().to_owned();
        match slot {
            Slot::Avatar => self.avatar_path = source,
            Slot::Cover => self.cover_path = source,
        }
        match self.status_of(slot).clone() {
            ImageStatus::Empty | ImageStatus::Unavailable => self.clear_texture(slot),
            ImageStatus::Loading => self.sync_sources(),
            ImageStatus::Loaded { .. } => {}
        }
    }

    fn handle_load_events(&mut self, ctx: &egui::Context) {
        for event in self.loader.update() {
            match event {
                LoadEvent::Loaded(loaded) => {
                    let texture = ctx.load_texture(
                        format!("profilecrop-{:?}", loaded.slot),
                        loaded.color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    match loaded.slot {
                        Slot::Avatar => {
                            self.avatar_texture = Some((texture, loaded.natural));
                            self.dialog.avatar.on_image_loaded(loaded.natural);
                        }
                        Slot::Cover => {
                            self.cover_texture = Some(texture);
                            self.dialog.cover.on_image_loaded(loaded.natural);
                        }
                    }
                    self.status = format!("Loaded {}", loaded.name);
                }
                LoadEvent::Failed { slot, name, error } => {
                    self.restore_after_failure(slot);
                    self.status = format!("Unable to decode {name}: {error}");
                }
            }
        }
    }

    fn save(&mut self) {
        match self.dialog.save(&mut self.gateway) {
            Ok(payload) => {
                self.status = match payload.profile_crop {
                    Some(crop) => format!(
                        "Saved (zoom {:.2}, offset {:.1}, {:.1}; cover {:.1})",
                        crop.scale, crop.offset_x, crop.offset_y, payload.cover_offset
                    ),
                    None => format!("Saved (cover {:.1})", payload.cover_offset),
                };
            }
            Err(err) => self.status = format!("Save failed, edits kept: {err}"),
        }
    }

    fn cancel(&mut self) {
        self.dialog.cancel();
        self.avatar_path = self.dialog.avatar.source().unwrap_or_default().to_owned();
        self.cover_path = self.dialog.cover.source().unwrap_or_default().to_owned();
        self.sync_sources();
        self.status = "Edits discarded".into();
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let keys = KeyboardState::read(ctx);
        if keys.save {
            self.save();
        }
        if keys.cancel {
            self.cancel();
        }
        if keys.zoom_in {
            self.dialog.avatar.zoom_in();
        }
        if keys.zoom_out {
            self.dialog.avatar.zoom_out();
        }
        self.dialog.avatar.nudge(keys.direction());
    }

    fn image_controls(&mut self, ui: &mut egui::Ui, slot: Slot) {
        ui.horizontal(|ui| {
            let path = match slot {
                Slot::Avatar => &mut self.avatar_path,
                Slot::Cover => &mut self.cover_path,
            };
            ui.add(
                egui::TextEdit::singleline(path)
                    .hint_text("path/to/image.png")
                    .desired_width(320.0),
            );
            if ui.button("Replace").clicked() {
                self.replace_image(slot);
            }
            if ui.button("Remove").clicked() {
                self.remove_image(slot);
            }
        });
    }

    fn previews(&mut self, ui: &mut egui::Ui) {
        let crop = self.dialog.avatar.on_save();
        let source = self.dialog.avatar.source().map(str::to_owned);
        let texture = self
            .avatar_texture
            .as_ref()
            .filter(|_| self.dialog.avatar.status().is_loaded())
            .map(|(texture, natural)| (texture, *natural));
        let mut clicked = None;
        ui.horizontal(|ui| {
            for size in PREVIEW_SIZES {
                let mut avatar =
                    CroppedAvatar::with_crop(source.as_deref(), crop, size, &self.config)
                        .on_click(|| clicked = Some(size));
                let response = avatar_preview(ui, &avatar.view(), size, texture, &self.placeholder);
                if response.clicked() {
                    avatar.click();
                }
            }
        });
        if let Some(size) = clicked {
            self.status = format!("Avatar as shown at {size}px");
        }
    }
}

impl App for ProfileCropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.handle_load_events(ctx);
        self.handle_keyboard(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.monospace(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(SHORTCUTS).color(Color32::from_gray(200)));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Cover");
            self.image_controls(ui, Slot::Cover);
            let cover_size = egui::vec2(
                self.config.cover_viewport_width,
                self.config.cover_viewport_height,
            );
            cover_viewport(ui, &mut self.dialog.cover, cover_size, self.cover_texture.as_ref());

            ui.add_space(16.0);
            ui.heading("Avatar");
            self.image_controls(ui, Slot::Avatar);
            ui.horizontal(|ui| {
                avatar_viewport(
                    ui,
                    &mut self.dialog.avatar,
                    self.avatar_texture.as_ref().map(|(texture, _)| texture),
                );
                ui.vertical(|ui| {
                    let mut scale = self.dialog.avatar.scale();
                    let slider = egui::Slider::new(&mut scale, 1.0..=self.config.max_zoom)
                        .step_by(self.config.zoom_step as f64)
                        .text("Zoom");
                    if ui.add(slider).changed() {
                        self.dialog.avatar.on_zoom_change(scale);
                    }
                    ui.add_space(8.0);
                    self.previews(ui);
                });
            });

            ui.add_space(16.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    self.save();
                }
                if ui.button("Cancel").clicked() {
                    self.cancel();
                }
            });
        });

        let loading = [Slot::Avatar, Slot::Cover]
            .into_iter()
            .any(|slot| *self.status_of(slot) == ImageStatus::Loading);
        if loading {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
