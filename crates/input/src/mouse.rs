use cubeview_camera::{Frustum, ViewState};

/// Degrees of orbit per frustum-width of cursor travel.
const VIEW_STEP: f32 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging { last_x: f32, last_y: f32 },
}

/// Mouse-drag orbit: a two-state machine that turns incremental cursor
/// deltas into view-angle updates.
///
/// Sensitivity is the frustum-size to window-size ratio, captured on resize.
/// Each motion event while dragging re-anchors the reference position, so
/// the drag is incremental rather than measured from the press point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseLook {
    state: DragState,
    scale_x: f32,
    scale_y: f32,
}

impl Default for MouseLook {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
            scale_x: 0.0,
            scale_y: 0.0,
        }
    }
}

impl MouseLook {
    /// Refresh the per-axis sensitivity from the window size and frustum.
    /// Zero window dimensions are clamped to one pixel.
    pub fn set_window_size(&mut self, width: u32, height: u32, frustum: &Frustum) {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        self.scale_x = frustum.width() / width;
        self.scale_y = frustum.height() / height;
    }

    /// Button transition: press anchors the drag at the cursor, release
    /// returns to idle.
    pub fn on_button(&mut self, pressed: bool, x: f32, y: f32) {
        self.state = if pressed {
            DragState::Dragging { last_x: x, last_y: y }
        } else {
            DragState::Idle
        };
    }

    /// Motion event. While dragging, applies the scaled delta to the view
    /// angles and re-anchors; returns whether a redraw is needed.
    pub fn on_motion(&mut self, x: f32, y: f32, view: &mut ViewState) -> bool {
        let DragState::Dragging { last_x, last_y } = self.state else {
            return false;
        };
        let dx = (x - last_x) * self.scale_x * VIEW_STEP;
        let dy = (y - last_y) * self.scale_y * VIEW_STEP;
        view.orbit(dx, dy);
        self.state = DragState::Dragging { last_x: x, last_y: y };
        true
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }
}
