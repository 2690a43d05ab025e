use std::cell::Cell;

use eframe::egui;
use profilecrop::config::CropConfig;
use profilecrop::crop::{parse_crop, CropMetadata, ProfileImagePayload};
use profilecrop::drag::DragEvent;
use profilecrop::editor::CropEditor;
use profilecrop::render::*;
use serde_json::json;

mod common;
use common::{assert_close, png_file};

fn cropped(view: AvatarView) -> BackgroundLayout {
    match view {
        AvatarView::Image {
            layout: AvatarLayout::Cropped(layout),
            ..
        } => layout,
        other => panic!("expected a cropped layout, got {other:?}"),
    }
}

#[test]
fn reconstruction_at_the_reference_size_negates_the_offset() {
    let config = CropConfig::default();
    let crop = json!({ "scale": 1.5, "offsetX": -30, "offsetY": -20 });
    let layout = cropped(CroppedAvatar::new(Some("x.png"), Some(&crop), 200.0, &config).view());
    assert_eq!(layout.size, egui::vec2(300.0, 300.0));
    assert_close(layout.position.x, 30.0);
    assert_close(layout.position.y, 20.0);
}

#[test]
fn reconstruction_scales_offsets_with_display_size() {
    let config = CropConfig::default();
    let crop = json!({ "scale": 1.5, "offsetX": -30, "offsetY": -20 });
    let layout = cropped(CroppedAvatar::new(Some("x.png"), Some(&crop), 40.0, &config).view());
    assert_close(layout.size.x, 60.0);
    assert_close(layout.size.y, 60.0);
    assert_close(layout.position.x, 6.0);
    assert_close(layout.position.y, 4.0);
}

#[test]
fn display_offset_conversion_uses_the_reference_ratio() {
    let offset = to_display_offset(egui::vec2(-50.0, -10.0), 140.0, 200.0);
    assert_close(offset.x, 35.0);
    assert_close(offset.y, 7.0);
    assert_eq!(to_display_offset(egui::vec2(-50.0, -10.0), 200.0, 200.0), egui::vec2(50.0, 10.0));
}

#[test]
fn malformed_crops_fall_back_to_cover_fit() {
    let config = CropConfig::default();
    let baseline = CroppedAvatar::new(Some("x.png"), None, 140.0, &config).view();
    assert_eq!(
        baseline,
        AvatarView::Image {
            src: "x.png".into(),
            layout: AvatarLayout::CoverFit,
        }
    );
    let garbage = [
        json!("not json"),
        json!("{\"scale\": 2}"),
        json!({ "scale": "big", "offsetX": 0, "offsetY": 0 }),
        json!({ "offsetX": -3, "offsetY": -4 }),
        json!(42),
        json!(null),
        json!({ "scale": 0.5, "offsetX": 0, "offsetY": 0 }),
        json!({ "scale": 1e6, "offsetX": 0, "offsetY": 0 }),
        json!({ "scale": 3.5, "offsetX": -10, "offsetY": -10 }),
        json!("{\"scale\":50,\"offsetX\":0,\"offsetY\":0}"),
    ];
    for raw in &garbage {
        let view = CroppedAvatar::new(Some("x.png"), Some(raw), 140.0, &config).view();
        assert_eq!(view, baseline, "{raw}");
    }
}

#[test]
fn string_encoded_crops_parse_like_objects() {
    let object = json!({ "scale": 2.0, "offsetX": -10.0, "offsetY": -5.0 });
    let encoded = json!(object.to_string());
    assert_eq!(parse_crop(&object), parse_crop(&encoded));
    assert_eq!(
        parse_crop(&encoded),
        Some(CropMetadata::new(2.0, egui::vec2(-10.0, -5.0)))
    );
}

#[test]
fn missing_source_renders_placeholder_and_still_clicks() {
    let config = CropConfig::default();
    let clicks = Cell::new(0);
    let crop = json!({ "scale": 2.0, "offsetX": -10.0, "offsetY": -5.0 });
    for src in [None, Some(""), Some("   ")] {
        let mut avatar = CroppedAvatar::new(src, Some(&crop), 40.0, &config)
            .on_click(|| clicks.set(clicks.get() + 1));
        assert_eq!(avatar.view(), AvatarView::Placeholder);
        assert!(avatar.click());
    }
    assert_eq!(clicks.get(), 3);
}

#[test]
fn click_without_handler_is_a_no_op() {
    let mut avatar = CroppedAvatar::new(None, None, 40.0, &CropConfig::default());
    assert!(!avatar.click());
}

#[test]
fn scale_at_the_zoom_limit_is_still_honored() {
    let config = CropConfig::default();
    let crop = CropMetadata::new(config.max_zoom, egui::vec2(-400.0, -400.0));
    let layout = cropped(CroppedAvatar::with_crop(Some("x.png"), Some(crop), 40.0, &config).view());
    assert_close(layout.size.x, 120.0);
    assert_close(layout.position.x, 80.0);
}

#[test]
fn positions_never_expose_background() {
    let crop = CropMetadata::new(1.5, egui::vec2(-400.0, 25.0));
    let layout = crop_layout(&crop, 100.0, 200.0);
    assert_eq!(layout.position, egui::vec2(50.0, 0.0));
}

#[test]
fn saved_crop_reloads_to_what_the_editor_showed() {
    let config = CropConfig::default();
    let mut editor = CropEditor::open(config, None, None);
    editor.on_image_replace(&png_file("me.png", 4, 4)).unwrap();
    editor.on_image_loaded(egui::vec2(640.0, 480.0));
    editor.on_zoom_change(1.7);
    editor.handle_pointer(DragEvent::PointerDown(egui::pos2(100.0, 100.0)));
    editor.handle_pointer(DragEvent::PointerMove(egui::pos2(37.5, 81.25)));
    editor.handle_pointer(DragEvent::PointerUp);
    let shown = editor.image_rect();

    let payload = ProfileImagePayload {
        avatar: editor.source().map(str::to_owned),
        profile_crop: editor.on_save(),
        ..Default::default()
    };
    let text = serde_json::to_string(&payload).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&text).unwrap();

    let layout = cropped(
        CroppedAvatar::new(
            stored["avatar"].as_str(),
            stored.get("profileCrop"),
            config.avatar_viewport,
            &config,
        )
        .view(),
    );
    assert_eq!(layout.size, shown.size());
    assert_eq!(layout.position, -shown.min.to_vec2());
}

#[test]
fn cover_layout_rescales_with_the_cover_reference() {
    let natural = egui::vec2(1200.0, 800.0);
    let same = cover_layout(-120.0, natural, egui::vec2(600.0, 150.0), 150.0);
    assert_eq!(same, CoverLayout { image_height: 400.0, translate_y: -120.0 });

    let half = cover_layout(-120.0, natural, egui::vec2(300.0, 75.0), 150.0);
    assert_eq!(half.image_height, 200.0);
    assert_eq!(half.translate_y, -60.0);

    let squeezed = cover_layout(-250.0, natural, egui::vec2(600.0, 300.0), 150.0);
    assert_eq!(squeezed.translate_y, -100.0);
}
