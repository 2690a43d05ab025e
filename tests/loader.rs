use eframe::egui;
use profilecrop::app::loader::{LoadEvent, Loader, Slot};
use std::{thread, time::Duration};

mod common;
use common::{png_file, truncated_png};

/// Polls the loader until `done` sees the event it is waiting for,
/// returning every event delivered along the way.
fn collect_until(loader: &mut Loader, done: impl Fn(&LoadEvent) -> bool) -> Vec<LoadEvent> {
    let mut events = Vec::new();
    for _ in 0..400 {
        let batch = loader.update();
        let finished = batch.iter().any(&done);
        events.extend(batch);
        if finished {
            return events;
        }
        thread::sleep(Duration::from_millis(25));
    }
    panic!("loader did not deliver the expected event");
}

fn slot_of(event: &LoadEvent) -> Slot {
    match event {
        LoadEvent::Loaded(loaded) => loaded.slot,
        LoadEvent::Failed { slot, .. } => *slot,
    }
}

#[test]
fn loader_delivers_natural_size() {
    let mut loader = Loader::new();
    loader.request(Slot::Avatar, png_file("sample.png", 6, 4));
    let events = collect_until(&mut loader, |event| slot_of(event) == Slot::Avatar);
    assert_eq!(events.len(), 1);
    match &events[0] {
        LoadEvent::Loaded(loaded) => {
            assert_eq!(loaded.slot, Slot::Avatar);
            assert_eq!(loaded.name, "sample.png");
            assert_eq!(loaded.natural, egui::vec2(6.0, 4.0));
            assert_eq!(loaded.color_image.size, [6, 4]);
        }
        LoadEvent::Failed { error, .. } => panic!("unexpected failure: {error}"),
    }
}

#[test]
fn invalidated_loads_are_never_delivered() {
    let mut loader = Loader::new();
    loader.request(Slot::Avatar, png_file("removed.png", 3, 3));
    loader.invalidate(Slot::Avatar);
    // Requests are decoded in order, so the cover result trails the avatar's.
    loader.request(Slot::Cover, png_file("cover.png", 8, 2));
    let events = collect_until(&mut loader, |event| slot_of(event) == Slot::Cover);
    assert!(events.iter().all(|event| slot_of(event) == Slot::Cover));
}

#[test]
fn newer_request_supersedes_older_one() {
    let mut loader = Loader::new();
    loader.request(Slot::Avatar, png_file("first.png", 2, 2));
    loader.request(Slot::Avatar, png_file("second.png", 5, 5));
    let events = collect_until(&mut loader, |event| slot_of(event) == Slot::Avatar);
    assert_eq!(events.len(), 1);
    match &events[0] {
        LoadEvent::Loaded(loaded) => {
            assert_eq!(loaded.name, "second.png");
            assert_eq!(loaded.natural, egui::vec2(5.0, 5.0));
        }
        LoadEvent::Failed { error, .. } => panic!("unexpected failure: {error}"),
    }
}

#[test]
fn undecodable_bytes_report_failure() {
    let mut loader = Loader::new();
    loader.request(Slot::Cover, truncated_png("broken.png"));
    let events = collect_until(&mut loader, |event| slot_of(event) == Slot::Cover);
    match &events[0] {
        LoadEvent::Failed { slot, name, .. } => {
            assert_eq!(*slot, Slot::Cover);
            assert_eq!(name, "broken.png");
        }
        LoadEvent::Loaded(_) => panic!("truncated image decoded"),
    }
}
