use eframe::egui::{self, Color32, Pos2, Rect, Sense, Vec2};

use crate::{
    drag::DragEvent,
    editor::{CoverPanEditor, CropEditor, ImageStatus},
    image_utils::cover_square_uv,
    render::{AvatarView, BackgroundLayout},
};

const VIEWPORT_BACKGROUND: Color32 = Color32::from_gray(32);
const VIEWPORT_STROKE: Color32 = Color32::from_gray(160);
const FULL_UV: Rect = Rect {
    min: Pos2 { x: 0.0, y: 0.0 },
    max: Pos2 { x: 1.0, y: 1.0 },
};

pub struct KeyboardState {
    pub save: bool,
    pub cancel: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
}

impl KeyboardState {
    pub fn read(ctx: &egui::Context) -> Self {
        ctx.input(|input| KeyboardState {
            save: input.modifiers.command && input.key_pressed(egui::Key::S),
            cancel: input.key_pressed(egui::Key::Escape),
            zoom_in: input.key_pressed(egui::Key::Plus) || input.key_pressed(egui::Key::Equals),
            zoom_out: input.key_pressed(egui::Key::Minus),
            move_up: input.key_down(egui::Key::ArrowUp),
            move_down: input.key_down(egui::Key::ArrowDown),
            move_left: input.key_down(egui::Key::ArrowLeft),
            move_right: input.key_down(egui::Key::ArrowRight),
        })
    }

    pub fn direction(&self) -> Vec2 {
        let mut delta = Vec2::ZERO;
        if self.move_up {
            delta.y -= 1.0;
        }
        if self.move_down {
            delta.y += 1.0;
        }
        if self.move_left {
            delta.x -= 1.0;
        }
        if self.move_right {
            delta.x += 1.0;
        }
        delta
    }
}

/// Translates egui pointer state into drag events in viewport coordinates.
///
/// Releases are read from the global pointer state so a drag that leaves
/// the viewport still ends when the button goes up anywhere.
pub fn pointer_events(
    ctx: &egui::Context,
    response: &egui::Response,
    active: bool,
) -> Vec<DragEvent> {
    let origin = response.rect.min;
    let mut events = Vec::new();
    if response.drag_started() {
        let pressed = ctx.input(|i| i.pointer.press_origin());
        if let Some(pointer) = pressed.or_else(|| response.interact_pointer_pos()) {
            events.push(DragEvent::PointerDown((pointer - origin).to_pos2()));
        }
    }
    if active || response.dragged() {
        if let Some(pointer) = ctx.input(|i| i.pointer.latest_pos()) {
            events.push(DragEvent::PointerMove((pointer - origin).to_pos2()));
        }
    }
    if ctx.input(|i| i.pointer.any_released()) {
        events.push(DragEvent::PointerUp);
    }
    events
}

fn viewport_frame(ui: &mut egui::Ui, size: Vec2) -> (egui::Response, egui::Painter) {
    let (rect, response) = ui.allocate_exact_size(size, Sense::drag());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, VIEWPORT_BACKGROUND);
    (response, painter)
}

fn status_text(painter: &egui::Painter, rect: Rect, text: &str) {
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(14.0),
        Color32::WHITE,
    );
}

pub fn avatar_viewport(
    ui: &mut egui::Ui,
    editor: &mut CropEditor,
    texture: Option<&egui::TextureHandle>,
) {
    let side = editor.config().avatar_viewport;
    let (response, painter) = viewport_frame(ui, egui::vec2(side, side));
    let rect = response.rect;
    match (editor.status().natural_size(), texture) {
        (Some(natural), Some(texture)) => {
            let image_rect = editor.image_rect().translate(rect.min.to_vec2());
            painter.image(texture.id(), image_rect, cover_square_uv(natural), Color32::WHITE);
            for event in pointer_events(ui.ctx(), &response, editor.is_dragging()) {
                editor.handle_pointer(event);
            }
        }
        _ if *editor.status() == ImageStatus::Unavailable => {
            status_text(&painter, rect, "Image unavailable")
        }
        _ if editor.source().is_some() => status_text(&painter, rect, "Loading..."),
        _ => status_text(&painter, rect, "No avatar"),
    }
    painter.rect_stroke(rect, 0.0, (1.0, VIEWPORT_STROKE), egui::StrokeKind::Inside);
}

pub fn cover_viewport(
    ui: &mut egui::Ui,
    editor: &mut CoverPanEditor,
    size: Vec2,
    texture: Option<&egui::TextureHandle>,
) {
    let (response, painter) = viewport_frame(ui, size);
    let rect = response.rect;
    match (editor.image_rect(), texture) {
        (Some(image_rect), Some(texture)) => {
            painter.image(
                texture.id(),
                image_rect.translate(rect.min.to_vec2()),
                FULL_UV,
                Color32::WHITE,
            );
            for event in pointer_events(ui.ctx(), &response, editor.is_dragging()) {
                editor.handle_pointer(event);
            }
        }
        _ if *editor.status() == ImageStatus::Unavailable => {
            status_text(&painter, rect, "Image unavailable")
        }
        _ if editor.source().is_some() => status_text(&painter, rect, "Loading..."),
        _ => status_text(&painter, rect, "No cover image"),
    }
    painter.rect_stroke(rect, 0.0, (1.0, VIEWPORT_STROKE), egui::StrokeKind::Inside);
}

/// Draws a reconstructed avatar at `size` points. Returns the response so
/// callers can wire up clicks.
pub fn avatar_preview(
    ui: &mut egui::Ui,
    view: &AvatarView,
    size: f32,
    texture: Option<(&egui::TextureHandle, Vec2)>,
    placeholder: &egui::TextureHandle,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), Sense::click());
    let painter = ui.painter_at(rect);
    match (view, texture) {
        (AvatarView::Image { layout, .. }, Some((texture, natural))) => {
            let BackgroundLayout { size: tile, position } = layout.resolve(size);
            let tile_rect = Rect::from_min_size(rect.min - position, tile);
            painter.image(texture.id(), tile_rect, cover_square_uv(natural), Color32::WHITE);
        }
        _ => {
            painter.image(placeholder.id(), rect, FULL_UV, Color32::WHITE);
        }
    }
    painter.rect_stroke(rect, 0.0, (1.0, VIEWPORT_STROKE), egui::StrokeKind::Inside);
    response
}
