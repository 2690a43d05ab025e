use eframe::egui;
use profilecrop::config::CropConfig;
use profilecrop::crop::{CoverOffset, CropMetadata};
use profilecrop::drag::DragEvent;
use profilecrop::editor::validation::{validate_image_file, ImageFile};
use profilecrop::editor::{CoverPanEditor, CropEditor, ImageStatus};
use profilecrop::error::ValidationError;

mod common;
use common::{assert_close, png_file, truncated_png};

fn loaded_avatar(config: CropConfig) -> CropEditor {
    let mut editor = CropEditor::open(config, None, None);
    editor.on_image_replace(&png_file("face.png", 10, 10)).unwrap();
    editor.on_image_loaded(egui::vec2(1000.0, 1000.0));
    editor
}

fn drag(editor: &mut CropEditor, from: (f32, f32), to: (f32, f32)) {
    editor.handle_pointer(DragEvent::PointerDown(egui::pos2(from.0, from.1)));
    editor.handle_pointer(DragEvent::PointerMove(egui::pos2(to.0, to.1)));
    editor.handle_pointer(DragEvent::PointerUp);
}

#[test]
fn avatar_drag_scenario_clamps_to_overflow() {
    let mut editor = loaded_avatar(CropConfig::default());
    editor.on_zoom_change(2.0);
    drag(&mut editor, (0.0, 0.0), (-300.0, -50.0));
    assert_eq!(editor.on_save(), Some(CropMetadata::new(2.0, egui::vec2(-200.0, -50.0))));
    assert!(!editor.is_dragging());
}

#[test]
fn zooming_out_reclamps_the_offset() {
    let mut editor = loaded_avatar(CropConfig::default());
    editor.on_zoom_change(2.0);
    drag(&mut editor, (0.0, 0.0), (-50.0, -50.0));
    assert_eq!(editor.offset(), egui::vec2(-50.0, -50.0));
    editor.on_zoom_change(1.2);
    assert_close(editor.offset().x, -40.0);
    assert_close(editor.offset().y, -40.0);
    editor.on_zoom_change(1.0);
    assert_eq!(editor.offset(), egui::Vec2::ZERO);
}

#[test]
fn zoom_is_limited_to_the_configured_range() {
    let mut editor = loaded_avatar(CropConfig::default());
    editor.on_zoom_change(0.5);
    assert_eq!(editor.scale(), 1.0);
    editor.on_zoom_change(10.0);
    assert_eq!(editor.scale(), CropConfig::default().max_zoom);
}

#[test]
fn drags_before_the_load_event_are_ignored() {
    let mut editor = CropEditor::open(CropConfig::default(), None, None);
    editor.on_image_replace(&png_file("face.png", 4, 4)).unwrap();
    editor.on_zoom_change(2.0);
    assert_eq!(editor.status(), &ImageStatus::Loading);
    assert_eq!(editor.handle_pointer(DragEvent::PointerDown(egui::pos2(0.0, 0.0))), None);
    assert_eq!(editor.handle_pointer(DragEvent::PointerMove(egui::pos2(-80.0, 0.0))), None);
    assert_eq!(editor.offset(), egui::Vec2::ZERO);
}

#[test]
fn replacing_the_image_resets_the_crop() {
    let mut editor = loaded_avatar(CropConfig::default());
    editor.on_zoom_change(2.5);
    drag(&mut editor, (0.0, 0.0), (-70.0, -20.0));
    editor.on_image_replace(&png_file("other.png", 3, 3)).unwrap();
    assert_eq!(editor.crop(), CropMetadata::default());
    assert_eq!(editor.source(), Some("other.png"));
}

#[test]
fn rejected_files_leave_state_untouched() {
    let config = CropConfig {
        max_file_size: 64,
        ..CropConfig::default()
    };
    let mut editor = loaded_avatar(CropConfig::default());
    editor.on_zoom_change(2.0);
    drag(&mut editor, (0.0, 0.0), (-30.0, -30.0));
    let before = editor.crop();

    let text = ImageFile::new("notes.txt", b"hello".to_vec());
    assert!(matches!(
        editor.on_image_replace(&text),
        Err(ValidationError::NotAnImage { .. })
    ));
    assert_eq!(editor.crop(), before);
    assert_eq!(editor.source(), Some("face.png"));

    let mut small = CropEditor::open(config, Some("face.png".into()), Some(before));
    let big = ImageFile::new("big.png", vec![0x89; 65]);
    assert!(matches!(
        small.on_image_replace(&big),
        Err(ValidationError::TooLarge { size: 65, limit: 64, .. })
    ));
    assert_eq!(small.crop(), before);
}

#[test]
fn validation_sniffs_content_not_just_the_name() {
    let disguised = ImageFile::new("photo.png", b"definitely not a png".to_vec());
    assert!(validate_image_file(&disguised, 1024).is_err());
    let empty = ImageFile::new("empty.png", Vec::new());
    assert!(matches!(
        validate_image_file(&empty, 1024),
        Err(ValidationError::Empty { .. })
    ));
    assert_eq!(
        validate_image_file(&png_file("ok.png", 2, 2), 1024 * 1024).unwrap(),
        image::ImageFormat::Png
    );
}

#[test]
fn avif_uploads_are_refused() {
    let mut bytes = png_file("x.png", 2, 2).bytes;
    bytes.truncate(8);
    let avif = ImageFile::new("photo.avif", bytes);
    assert!(matches!(
        validate_image_file(&avif, 1024),
        Err(ValidationError::NotAnImage { .. })
    ));
}

#[test]
fn remove_clears_image_and_crop() {
    let mut editor = loaded_avatar(CropConfig::default());
    editor.on_zoom_change(2.0);
    editor.on_remove();
    assert_eq!(editor.source(), None);
    assert_eq!(editor.status(), &ImageStatus::Empty);
    assert_eq!(editor.on_save(), None);
}

#[test]
fn cancel_reverts_to_the_opening_values() {
    let stored = CropMetadata::new(1.5, egui::vec2(-30.0, -20.0));
    let mut editor = CropEditor::open(CropConfig::default(), Some("face.png".into()), Some(stored));
    editor.on_image_loaded(egui::vec2(800.0, 600.0));
    editor.on_zoom_change(3.0);
    drag(&mut editor, (0.0, 0.0), (-250.0, -250.0));
    editor.on_image_replace(&png_file("new.png", 2, 2)).unwrap();
    editor.on_cancel();
    assert_eq!(editor.source(), Some("face.png"));
    assert_eq!(editor.crop(), stored);
}

#[test]
fn stored_crops_out_of_range_are_clamped_on_open() {
    let stored = CropMetadata::new(1.5, egui::vec2(-500.0, 20.0));
    let editor = CropEditor::open(CropConfig::default(), Some("face.png".into()), Some(stored));
    assert_eq!(editor.offset(), egui::vec2(-100.0, 0.0));
}

#[test]
fn cover_drag_clamps_to_image_overflow() {
    let config = CropConfig::default();
    let mut editor = CoverPanEditor::open(config, None, CoverOffset::default());
    editor.on_image_replace(&png_file("cover.png", 6, 4)).unwrap();
    editor.on_image_loaded(egui::vec2(1500.0, 1000.0));
    assert_eq!(editor.image_height(), Some(400.0));
    editor.handle_pointer(DragEvent::PointerDown(egui::pos2(300.0, 100.0)));
    editor.handle_pointer(DragEvent::PointerMove(egui::pos2(300.0, -900.0)));
    editor.handle_pointer(DragEvent::PointerUp);
    assert_eq!(editor.on_save(), CoverOffset { offset_y: -250.0 });
}

#[test]
fn cover_offset_waits_for_the_load_event() {
    let config = CropConfig::default();
    let stored = CoverOffset { offset_y: -900.0 };
    let mut editor = CoverPanEditor::open(config, Some("cover.png".into()), stored);
    assert_eq!(editor.bounds(), None);
    assert_eq!(editor.handle_pointer(DragEvent::PointerDown(egui::pos2(0.0, 0.0))), None);
    assert_eq!(editor.offset().offset_y, -900.0);
    editor.on_image_loaded(egui::vec2(1200.0, 800.0));
    assert_eq!(editor.offset().offset_y, -250.0);
}

#[test]
fn short_cover_images_cannot_pan() {
    let config = CropConfig::default();
    let mut editor = CoverPanEditor::open(config, Some("wide.png".into()), CoverOffset::default());
    editor.on_image_loaded(egui::vec2(3000.0, 500.0));
    editor.handle_pointer(DragEvent::PointerDown(egui::pos2(0.0, 0.0)));
    editor.handle_pointer(DragEvent::PointerMove(egui::pos2(0.0, -60.0)));
    assert_eq!(editor.offset().offset_y, 0.0);
}

#[test]
fn editors_do_not_share_drag_state() {
    let mut avatar = loaded_avatar(CropConfig::default());
    let mut cover =
        CoverPanEditor::open(CropConfig::default(), Some("c.png".into()), CoverOffset::default());
    cover.on_image_loaded(egui::vec2(600.0, 600.0));
    avatar.on_zoom_change(2.0);
    avatar.handle_pointer(DragEvent::PointerDown(egui::pos2(0.0, 0.0)));
    assert!(avatar.is_dragging());
    assert!(!cover.is_dragging());
    cover.handle_pointer(DragEvent::PointerMove(egui::pos2(0.0, -100.0)));
    assert_eq!(cover.offset().offset_y, 0.0);
}

#[test]
fn undecodable_replacement_restores_the_previous_avatar() {
    let stored = CropMetadata::new(1.5, egui::vec2(-20.0, -30.0));
    let mut editor = CropEditor::open(CropConfig::default(), Some("old.png".into()), Some(stored));
    editor.on_image_loaded(egui::vec2(400.0, 400.0));

    editor.on_image_replace(&truncated_png("broken.png")).unwrap();
    assert_eq!(editor.source(), Some("broken.png"));
    assert_eq!(editor.scale(), 1.0);

    editor.on_image_failed();
    assert_eq!(editor.source(), Some("old.png"));
    assert_eq!(editor.on_save(), Some(stored));
    assert_eq!(
        *editor.status(),
        ImageStatus::Loaded {
            natural: egui::vec2(400.0, 400.0)
        }
    );
    drag(&mut editor, (0.0, 0.0), (-10.0, 0.0));
    assert_eq!(editor.offset(), egui::vec2(-30.0, -30.0));
}

#[test]
fn repeated_replacements_fall_back_to_the_last_loaded_avatar() {
    let mut editor = loaded_avatar(CropConfig::default());
    editor.on_zoom_change(2.0);
    editor.on_image_replace(&png_file("next.png", 4, 4)).unwrap();
    editor.on_image_replace(&truncated_png("broken.png")).unwrap();
    editor.on_image_failed();
    assert_eq!(editor.source(), Some("face.png"));
    assert_eq!(editor.scale(), 2.0);
    assert!(editor.status().is_loaded());
}

#[test]
fn stored_avatar_that_cannot_decode_keeps_its_crop() {
    let stored = CropMetadata::new(2.0, egui::vec2(-40.0, -10.0));
    let mut editor = CropEditor::open(CropConfig::default(), Some("old.png".into()), Some(stored));
    editor.on_image_failed();
    assert_eq!(*editor.status(), ImageStatus::Unavailable);
    assert_eq!(editor.source(), Some("old.png"));
    assert_eq!(editor.on_save(), Some(stored));
    assert_eq!(editor.handle_pointer(DragEvent::PointerDown(egui::pos2(0.0, 0.0))), None);
}

#[test]
fn undecodable_replacement_restores_the_previous_cover() {
    let mut editor = CoverPanEditor::open(
        CropConfig::default(),
        Some("cover.png".into()),
        CoverOffset { offset_y: -60.0 },
    );
    editor.on_image_loaded(egui::vec2(1200.0, 800.0));
    editor.on_image_replace(&truncated_png("broken.png")).unwrap();
    assert_eq!(editor.bounds(), None);

    editor.on_image_failed();
    assert_eq!(editor.source(), Some("cover.png"));
    assert_eq!(editor.on_save(), CoverOffset { offset_y: -60.0 });
    assert!(editor.bounds().is_some());
}
