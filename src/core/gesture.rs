//! Pointer gesture state machine: Idle / DraggingNode / PanningCanvas.
//!
//! Entered on pointer-down, exited unconditionally on pointer-up. The
//! machine itself is renderer-agnostic — `input::pointer` feeds it Bevy
//! events, but any event loop supplying screen coordinates and hit-test
//! results could drive it. Hover is tracked separately in
//! `core::resources::HoveredDevice`; it is not a gesture.

use bevy::prelude::*;

use crate::core::model::NodeId;
use crate::core::viewport::ViewTransform;

/// The three mutually exclusive interaction modes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    DraggingNode {
        id: NodeId,
        /// Model-space pointer position minus the node's position at
        /// grab time, so the node doesn't jump to the pointer.
        grab_offset: Vec2,
        /// Whether any motion happened — motion suppresses the
        /// click-to-navigate action on release.
        moved: bool,
    },
    PanningCanvas {
        start_screen: Vec2,
        start_pan: Vec2,
    },
}

/// State write requested by a pointer-move while a gesture is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// Write this model-space position through the position store.
    MoveNode { id: NodeId, to: Vec2 },
    /// Overwrite the viewport pan.
    SetPan(Vec2),
}

impl Gesture {
    /// Pointer-down. A hit on a device (its id and current model-space
    /// position) begins a drag; empty canvas begins a pan.
    pub fn press(&mut self, hit: Option<(NodeId, Vec2)>, screen: Vec2, view: &ViewTransform) {
        *self = match hit {
            Some((id, node_pos)) => Gesture::DraggingNode {
                id,
                grab_offset: view.to_model_space(screen) - node_pos,
                moved: false,
            },
            None => Gesture::PanningCanvas { start_screen: screen, start_pan: view.pan },
        };
    }

    /// Pointer-move while the button is held.
    pub fn pointer_move(&mut self, screen: Vec2, view: &ViewTransform) -> Option<GestureAction> {
        match self {
            Gesture::Idle => None,
            Gesture::DraggingNode { id, grab_offset, moved } => {
                *moved = true;
                Some(GestureAction::MoveNode {
                    id: *id,
                    to: view.to_model_space(screen) - *grab_offset,
                })
            }
            Gesture::PanningCanvas { start_screen, start_pan } => {
                Some(GestureAction::SetPan(*start_pan + (screen - *start_screen)))
            }
        }
    }

    /// Pointer-up. Ends the gesture unconditionally; returns the device
    /// to navigate to when the gesture was a motionless click on a node.
    pub fn release(&mut self) -> Option<NodeId> {
        let clicked = match *self {
            Gesture::DraggingNode { id, moved: false, .. } => Some(id),
            _ => None,
        };
        *self = Gesture::Idle;
        clicked
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_preserves_grab_offset() {
        // Node at (100,100), pointer grabs at model (105,103): the first
        // move to (110,103) must land the node at (105,100), keeping the
        // original offset instead of snapping to the pointer.
        let view = ViewTransform::default();
        let mut gesture = Gesture::default();
        gesture.press(Some((7, Vec2::new(100.0, 100.0))), Vec2::new(105.0, 103.0), &view);

        let action = gesture.pointer_move(Vec2::new(110.0, 103.0), &view);
        assert_eq!(
            action,
            Some(GestureAction::MoveNode { id: 7, to: Vec2::new(105.0, 100.0) })
        );
    }

    #[test]
    fn drag_offset_respects_zoom() {
        let mut view = ViewTransform::default();
        view.zoom = 2.0;
        // Node at model (50,50) is at screen (100,100); grab at screen
        // (104,100) = model (52,50) → offset (2,0).
        let mut gesture = Gesture::default();
        gesture.press(Some((3, Vec2::new(50.0, 50.0))), Vec2::new(104.0, 100.0), &view);
        let action = gesture.pointer_move(Vec2::new(124.0, 100.0), &view);
        assert_eq!(
            action,
            Some(GestureAction::MoveNode { id: 3, to: Vec2::new(60.0, 50.0) })
        );
    }

    #[test]
    fn motionless_click_navigates() {
        let view = ViewTransform::default();
        let mut gesture = Gesture::default();
        gesture.press(Some((42, Vec2::ZERO)), Vec2::ZERO, &view);
        assert_eq!(gesture.release(), Some(42));
        assert!(gesture.is_idle());
    }

    #[test]
    fn motion_suppresses_navigation() {
        let view = ViewTransform::default();
        let mut gesture = Gesture::default();
        gesture.press(Some((42, Vec2::ZERO)), Vec2::ZERO, &view);
        gesture.pointer_move(Vec2::new(1.0, 0.0), &view);
        assert_eq!(gesture.release(), None);
    }

    #[test]
    fn empty_canvas_press_pans() {
        let mut view = ViewTransform::default();
        view.pan = Vec2::new(10.0, 20.0);
        let mut gesture = Gesture::default();
        gesture.press(None, Vec2::new(200.0, 200.0), &view);

        let action = gesture.pointer_move(Vec2::new(230.0, 190.0), &view);
        assert_eq!(action, Some(GestureAction::SetPan(Vec2::new(40.0, 10.0))));
        assert_eq!(gesture.release(), None);
    }

    #[test]
    fn pan_accumulates_from_gesture_start_not_last_frame() {
        let view = ViewTransform::default();
        let mut gesture = Gesture::default();
        gesture.press(None, Vec2::ZERO, &view);
        gesture.pointer_move(Vec2::new(5.0, 5.0), &view);
        let action = gesture.pointer_move(Vec2::new(8.0, 2.0), &view);
        // Still measured against the press position.
        assert_eq!(action, Some(GestureAction::SetPan(Vec2::new(8.0, 2.0))));
    }

    #[test]
    fn idle_move_is_inert() {
        let view = ViewTransform::default();
        let mut gesture = Gesture::default();
        assert_eq!(gesture.pointer_move(Vec2::new(9.0, 9.0), &view), None);
        assert_eq!(gesture.release(), None);
    }
}
