//! Pointer handling for the overlay surface.
//!
//! One pointer-down starts both a potential pan and a potential click. The
//! drag state machine moves the overlay; click classification runs on the
//! matching pointer-up against wherever the overlay sits at that moment.

use std::{cell::Cell, rc::Rc};

use shared::domain::CellCoord;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Screen-space translation of the overlay relative to the base surface.
/// Deliberately unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanOffset {
    pub top: f32,
    pub left: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(ScreenPoint),
    Move(ScreenPoint),
    Up(ScreenPoint),
    /// The pointer left the overlay surface.
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { anchor: ScreenPoint },
}

/// Keeps the controller's pointer listeners attached while alive.
pub struct ListenerGuard {
    attached: Rc<Cell<usize>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.attached.set(self.attached.get().saturating_sub(1));
        debug!("overlay pointer listeners detached");
    }
}

pub struct InteractionController {
    state: DragState,
    committed: PanOffset,
    displayed: PanOffset,
    surface_origin: ScreenPoint,
    box_size: f32,
    click_armed: bool,
    attached: Rc<Cell<usize>>,
}

impl InteractionController {
    pub fn new(box_size: u32) -> Self {
        Self {
            state: DragState::Idle,
            committed: PanOffset::default(),
            displayed: PanOffset::default(),
            surface_origin: ScreenPoint::default(),
            box_size: box_size as f32,
            click_armed: false,
            attached: Rc::new(Cell::new(0)),
        }
    }

    /// Starts delivering pointer events. Events arriving after every guard is
    /// dropped are discarded and any half-finished gesture is abandoned.
    pub fn attach(&self) -> ListenerGuard {
        self.attached.set(self.attached.get() + 1);
        debug!("overlay pointer listeners attached");
        ListenerGuard {
            attached: Rc::clone(&self.attached),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get() > 0
    }

    /// Screen position of the surfaces' shared top-left corner before panning.
    pub fn set_surface_origin(&mut self, origin: ScreenPoint) {
        self.surface_origin = origin;
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Last committed pan offset.
    pub fn pan_offset(&self) -> PanOffset {
        self.committed
    }

    /// Offset the overlay is currently drawn at, including an uncommitted drag.
    pub fn displayed_offset(&self) -> PanOffset {
        self.displayed
    }

    /// Current on-screen top-left corner of the overlay.
    pub fn overlay_origin(&self) -> ScreenPoint {
        ScreenPoint {
            x: self.surface_origin.x + self.displayed.left,
            y: self.surface_origin.y + self.displayed.top,
        }
    }

    /// Feeds one pointer event through the state machine. Returns the board
    /// coordinate when the event completes a click on the grid.
    pub fn handle(&mut self, event: PointerEvent) -> Option<CellCoord> {
        if !self.is_attached() {
            self.reset_gesture();
            return None;
        }

        match event {
            PointerEvent::Down(point) => {
                self.displayed = self.committed;
                self.state = DragState::Dragging { anchor: point };
                self.click_armed = true;
                None
            }
            PointerEvent::Move(point) => {
                if let DragState::Dragging { anchor } = self.state {
                    self.displayed = PanOffset {
                        top: self.committed.top + (point.y - anchor.y),
                        left: self.committed.left + (point.x - anchor.x),
                    };
                }
                None
            }
            PointerEvent::Up(point) => {
                if let DragState::Dragging { .. } = self.state {
                    self.committed = self.displayed;
                    self.state = DragState::Idle;
                    debug!(top = self.committed.top, left = self.committed.left, "pan committed");
                }
                if !std::mem::take(&mut self.click_armed) {
                    return None;
                }
                self.classify(point)
            }
            PointerEvent::Leave => {
                if let DragState::Dragging { .. } = self.state {
                    debug!("drag aborted: pointer left overlay");
                }
                self.state = DragState::Idle;
                self.displayed = self.committed;
                None
            }
        }
    }

    /// Maps a screen point to the board coordinate under it on the overlay as
    /// currently displayed. Points off the grid map to nothing.
    pub fn classify(&self, point: ScreenPoint) -> Option<CellCoord> {
        let origin = self.overlay_origin();
        let board_x = ((point.x - origin.x) / self.box_size).floor();
        let board_y = ((point.y - origin.y) / self.box_size).floor();
        if !board_x.is_finite() || !board_y.is_finite() {
            return None;
        }
        CellCoord::new(board_x as i64, board_y as i64).ok()
    }

    fn reset_gesture(&mut self) {
        self.state = DragState::Idle;
        self.displayed = self.committed;
        self.click_armed = false;
    }
}

#[cfg(test)]
#[path = "tests/interaction_tests.rs"]
mod tests;
