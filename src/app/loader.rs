use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Instant,
};

use eframe::egui::{self, Vec2};

use crate::{
    editor::validation::ImageFile,
    image_utils::{decode_image, natural_size, to_color_image},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Avatar,
    Cover,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Slot::Avatar => 0,
            Slot::Cover => 1,
        }
    }
}

struct LoadRequest {
    slot: Slot,
    generation: u64,
    file: ImageFile,
}

pub struct LoadedImage {
    pub slot: Slot,
    pub name: String,
    pub color_image: egui::ColorImage,
    pub natural: Vec2,
}

pub enum LoadEvent {
    Loaded(LoadedImage),
    Failed { slot: Slot, name: String, error: String },
}

struct LoadResult {
    generation: u64,
    event: LoadEvent,
}

/// Decodes images off the UI thread. Results come back as load events via
/// [`Loader::update`]; a result for a slot that has been re-requested or
/// cleared since is dropped.
pub struct Loader {
    request_tx: Sender<LoadRequest>,
    result_rx: Receiver<LoadResult>,
    generations: [u64; 2],
}

impl Loader {
    pub fn new() -> Self {
        let (request_tx, result_rx) = Self::spawn_decoder();
        Self {
            request_tx,
            result_rx,
            generations: [0; 2],
        }
    }

    fn spawn_decoder() -> (Sender<LoadRequest>, Receiver<LoadResult>) {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (result_tx, result_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let start = Instant::now();
                let LoadRequest {
                    slot,
                    generation,
                    file,
                } = request;
                let event = match decode_image(&file.bytes) {
                    Ok(image) => {
                        let color_image = to_color_image(&image);
                        let natural = natural_size(&image);
                        log::debug!(
                            "decoded {} ({}x{}) in {:?}",
                            file.name,
                            natural.x,
                            natural.y,
                            start.elapsed()
                        );
                        LoadEvent::Loaded(LoadedImage {
                            slot,
                            name: file.name,
                            color_image,
                            natural,
                        })
                    }
                    Err(err) => {
                        log::warn!("failed to decode {}: {err:#}", file.name);
                        LoadEvent::Failed {
                            slot,
                            name: file.name,
                            error: err.to_string(),
                        }
                    }
                };
                if result_tx.send(LoadResult { generation, event }).is_err() {
                    break;
                }
            }
        });
        (request_tx, result_rx)
    }

    pub fn request(&mut self, slot: Slot, file: ImageFile) {
        let generation = self.invalidate(slot);
        let _ = self.request_tx.send(LoadRequest {
            slot,
            generation,
            file,
        });
    }

    /// Forgets any in-flight load for `slot`.
    pub fn invalidate(&mut self, slot: Slot) -> u64 {
        let generation = &mut self.generations[slot.index()];
        *generation += 1;
        *generation
    }

    pub fn update(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            let slot = match &result.event {
                LoadEvent::Loaded(loaded) => loaded.slot,
                LoadEvent::Failed { slot, .. } => *slot,
            };
            if self.generations[slot.index()] == result.generation {
                events.push(result.event);
            }
        }
        events
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
