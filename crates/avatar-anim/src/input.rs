//! Pointer input mapping
//!
//! Turns raw winit mouse events into the drag and zoom gestures consumed by
//! the rotation engine.

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// A pointer gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// The drag button was pressed
    DragStarted,
    /// The pointer moved by `(dx, dy)` pixels while the drag button is held
    Dragged { dx: f32, dy: f32 },
    /// The drag button was released
    DragEnded,
    /// One scroll step; positive zooms in, negative zooms out
    Scrolled(f32),
}

/// Tracks button and cursor state to derive pointer gestures
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    dragging: bool,
    last_position: Option<PhysicalPosition<f64>>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the drag button is currently held
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Handle a mouse button event. Only the left button drags.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) -> Option<PointerEvent> {
        if button != MouseButton::Left {
            return None;
        }
        match (state, self.dragging) {
            (ElementState::Pressed, false) => {
                self.dragging = true;
                Some(PointerEvent::DragStarted)
            }
            (ElementState::Released, true) => {
                self.dragging = false;
                Some(PointerEvent::DragEnded)
            }
            _ => None,
        }
    }

    /// Handle a cursor move. Yields a delta only while dragging and once a
    /// previous position is known.
    pub fn on_cursor_moved(&mut self, position: PhysicalPosition<f64>) -> Option<PointerEvent> {
        let previous = self.last_position.replace(position);
        if !self.dragging {
            return None;
        }
        let previous = previous?;
        let dx = (position.x - previous.x) as f32;
        let dy = (position.y - previous.y) as f32;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(PointerEvent::Dragged { dx, dy })
    }

    /// Handle a scroll wheel event, reduced to a single signed step
    pub fn on_wheel(&mut self, delta: MouseScrollDelta) -> Option<PointerEvent> {
        let amount = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
        };
        if amount == 0.0 {
            return None;
        }
        Some(PointerEvent::Scrolled(amount.signum()))
    }

    /// The window lost focus: end any drag in progress
    pub fn on_focus_lost(&mut self) -> Option<PointerEvent> {
        self.last_position = None;
        if self.dragging {
            self.dragging = false;
            Some(PointerEvent::DragEnded)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_cycle() {
        let mut tracker = PointerTracker::new();
        assert!(tracker
            .on_cursor_moved(PhysicalPosition::new(10.0, 10.0))
            .is_none());

        assert_eq!(
            tracker.on_button(MouseButton::Left, ElementState::Pressed),
            Some(PointerEvent::DragStarted)
        );
        assert_eq!(
            tracker.on_cursor_moved(PhysicalPosition::new(14.0, 7.0)),
            Some(PointerEvent::Dragged { dx: 4.0, dy: -3.0 })
        );
        assert_eq!(
            tracker.on_button(MouseButton::Left, ElementState::Released),
            Some(PointerEvent::DragEnded)
        );
        assert!(tracker
            .on_cursor_moved(PhysicalPosition::new(30.0, 30.0))
            .is_none());
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut tracker = PointerTracker::new();
        assert!(tracker
            .on_button(MouseButton::Right, ElementState::Pressed)
            .is_none());
        assert!(!tracker.is_dragging());
        assert!(tracker
            .on_button(MouseButton::Left, ElementState::Released)
            .is_none());
    }

    #[test]
    fn test_wheel_sign_only() {
        let mut tracker = PointerTracker::new();
        assert_eq!(
            tracker.on_wheel(MouseScrollDelta::LineDelta(0.0, 3.0)),
            Some(PointerEvent::Scrolled(1.0))
        );
        assert_eq!(
            tracker.on_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -42.0))),
            Some(PointerEvent::Scrolled(-1.0))
        );
        assert!(tracker
            .on_wheel(MouseScrollDelta::LineDelta(2.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_focus_lost_ends_drag() {
        let mut tracker = PointerTracker::new();
        tracker.on_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(tracker.on_focus_lost(), Some(PointerEvent::DragEnded));
        assert!(tracker.on_focus_lost().is_none());
    }
}
