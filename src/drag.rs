use eframe::egui::{self, Pos2, Vec2};

use crate::bounds::PanBounds;

pub const ARROW_MOVE_STEP: f32 = 2.0;

/// Pointer input fed into a [`DragSession`].
///
/// `PointerUp` is expected from a global listener: a release anywhere ends
/// the drag, not only a release over the image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragAxes {
    Both,
    Vertical,
}

impl DragAxes {
    fn mask(self, delta: Vec2) -> Vec2 {
        match self {
            DragAxes::Both => delta,
            DragAxes::Vertical => egui::vec2(0.0, delta.y),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        pointer_origin: Pos2,
        offset_origin: Vec2,
    },
}

impl DragState {
    /// Pure transition: `(state, event) -> (state, emitted offset)`.
    ///
    /// `current` is the live offset (captured as the origin on pointer-down)
    /// and `bounds` the pan range for the current scale. Moves are clamped
    /// into `bounds` before being emitted.
    pub fn step(
        self,
        event: DragEvent,
        axes: DragAxes,
        current: Vec2,
        bounds: PanBounds,
    ) -> (DragState, Option<Vec2>) {
        match (self, event) {
            (DragState::Idle, DragEvent::PointerDown(pointer)) => (
                DragState::Dragging {
                    pointer_origin: pointer,
                    offset_origin: current,
                },
                None,
            ),
            (
                DragState::Dragging {
                    pointer_origin,
                    offset_origin,
                },
                DragEvent::PointerMove(pointer),
            ) => {
                let candidate = offset_origin + axes.mask(pointer - pointer_origin);
                (self, Some(bounds.clamp(candidate)))
            }
            (DragState::Dragging { .. }, DragEvent::PointerUp) => (DragState::Idle, None),
            (state, _) => (state, None),
        }
    }
}

/// Per-editor drag tracking. Each editor owns its own session; nothing here
/// is shared between editors.
#[derive(Clone, Debug)]
pub struct DragSession {
    state: DragState,
    axes: DragAxes,
}

impl DragSession {
    pub fn new(axes: DragAxes) -> Self {
        Self {
            state: DragState::Idle,
            axes,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn axes(&self) -> DragAxes {
        self.axes
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn handle(&mut self, event: DragEvent, current: Vec2, bounds: PanBounds) -> Option<Vec2> {
        let (next, emitted) = self.state.step(event, self.axes, current, bounds);
        if next != self.state {
            match next {
                DragState::Idle => log::trace!("drag released"),
                DragState::Dragging { pointer_origin, .. } => {
                    log::trace!("drag started at {pointer_origin:?}")
                }
            }
        }
        self.state = next;
        emitted
    }

    /// Drops an in-progress drag without emitting anything.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Arrow-key nudge, clamped like a pointer move. Ignored mid-drag.
    pub fn nudge(&self, direction: Vec2, current: Vec2, bounds: PanBounds) -> Option<Vec2> {
        if self.is_active() || direction == Vec2::ZERO {
            return None;
        }
        let moved = bounds.clamp(current + self.axes.mask(direction * ARROW_MOVE_STEP));
        (moved != current).then_some(moved)
    }
}
