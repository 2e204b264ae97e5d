//! Drag-to-trash deletion.
//!
//! A block is picked up, released somewhere, and if the release point falls
//! inside the trash target the user is asked to confirm. Storage and view
//! side effects belong to the caller (see `CalendarController::drag_end`);
//! this module only tracks which step the interaction is in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::EventKey;

/// Pointer position on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Inclusive on all four edges.
    pub fn contains(&self, point: Point) -> bool {
        (self.left..=self.right).contains(&point.x) && (self.top..=self.bottom).contains(&point.y)
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect {
            left: 0,
            top: 0,
            right: 80,
            bottom: 40,
        }
    }
}

/// Yes/no prompt shown before a dropped event is deleted.
pub trait Confirm {
    fn confirm(&mut self, key: &EventKey) -> bool;
}

impl<F: FnMut(&EventKey) -> bool> Confirm for F {
    fn confirm(&mut self, key: &EventKey) -> bool {
        self(key)
    }
}

/// Outcome of a notification. A failure is logged by the caller and never
/// rolls the deletion back.
pub type NotifyResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Fire-and-forget signal after an event has been deleted (e.g. a sound).
pub trait Notifier {
    fn deleted(&mut self, key: &EventKey) -> NotifyResult;
}

/// Notifier that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn deleted(&mut self, _key: &EventKey) -> NotifyResult {
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DragError {
    #[error("Another drag is still in progress for {0}")]
    Busy(EventKey),

    #[error("No block is shown for {0}")]
    UnknownBlock(EventKey),

    #[error("No event is being dragged")]
    NotDragging,

    #[error("No deletion is waiting for confirmation")]
    NotConfirming,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(EventKey),
    /// Dropped on the trash, waiting for the user's answer
    Confirming(EventKey),
}

/// Where a released block ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Release {
    OnTrash(EventKey),
    Elsewhere(EventKey),
}

/// Final result of a confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Committed(EventKey),
    Cancelled(EventKey),
}

#[derive(Debug, Default)]
pub struct DragDelete {
    state: DragState,
}

impl DragDelete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// Pick up the block stored under `key`.
    pub fn begin(&mut self, key: EventKey) -> Result<(), DragError> {
        match &self.state {
            DragState::Idle => {
                self.state = DragState::Dragging(key);
                Ok(())
            }
            DragState::Dragging(current) | DragState::Confirming(current) => {
                Err(DragError::Busy(current.clone()))
            }
        }
    }

    /// Release the dragged block at `point`. A drop inside `trash` moves on
    /// to confirmation; anywhere else ends the interaction.
    pub fn release(&mut self, point: Point, trash: Rect) -> Result<Release, DragError> {
        let DragState::Dragging(key) = &self.state else {
            return Err(DragError::NotDragging);
        };
        let key = key.clone();

        if trash.contains(point) {
            self.state = DragState::Confirming(key.clone());
            Ok(Release::OnTrash(key))
        } else {
            self.state = DragState::Idle;
            Ok(Release::Elsewhere(key))
        }
    }

    /// Apply the user's answer. Both outcomes return to `Idle`.
    pub fn resolve(&mut self, confirmed: bool) -> Result<Resolution, DragError> {
        match std::mem::take(&mut self.state) {
            DragState::Confirming(key) if confirmed => Ok(Resolution::Committed(key)),
            DragState::Confirming(key) => Ok(Resolution::Cancelled(key)),
            other => {
                self.state = other;
                Err(DragError::NotConfirming)
            }
        }
    }

    /// Abandon a drag that has not been dropped yet.
    pub fn cancel_drag(&mut self) {
        if matches!(self.state, DragState::Dragging(_)) {
            self.state = DragState::Idle;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> EventKey {
        EventKey::parse("event-2025-03-17-09:00").unwrap()
    }

    fn trash() -> Rect {
        Rect {
            left: 100,
            top: 10,
            right: 140,
            bottom: 50,
        }
    }

    #[test]
    fn test_rect_contains_is_inclusive() {
        let rect = trash();
        assert!(rect.contains(Point::new(100, 10)));
        assert!(rect.contains(Point::new(140, 50)));
        assert!(rect.contains(Point::new(120, 30)));
        assert!(!rect.contains(Point::new(99, 30)));
        assert!(!rect.contains(Point::new(120, 51)));
    }

    #[test]
    fn test_drop_on_trash_then_confirm() {
        let mut drag = DragDelete::new();
        drag.begin(key()).unwrap();
        assert_eq!(drag.state(), &DragState::Dragging(key()));

        let release = drag.release(Point::new(120, 30), trash()).unwrap();
        assert_eq!(release, Release::OnTrash(key()));
        assert_eq!(drag.state(), &DragState::Confirming(key()));

        assert_eq!(drag.resolve(true).unwrap(), Resolution::Committed(key()));
        assert!(drag.is_idle());
    }

    #[test]
    fn test_drop_on_trash_then_decline() {
        let mut drag = DragDelete::new();
        drag.begin(key()).unwrap();
        drag.release(Point::new(140, 50), trash()).unwrap();

        assert_eq!(drag.resolve(false).unwrap(), Resolution::Cancelled(key()));
        assert!(drag.is_idle());
    }

    #[test]
    fn test_drop_elsewhere_returns_to_idle() {
        let mut drag = DragDelete::new();
        drag.begin(key()).unwrap();

        let release = drag.release(Point::new(0, 0), trash()).unwrap();
        assert_eq!(release, Release::Elsewhere(key()));
        assert!(drag.is_idle());
        assert_eq!(drag.resolve(true), Err(DragError::NotConfirming));
    }

    #[test]
    fn test_no_new_drag_while_confirming() {
        let mut drag = DragDelete::new();
        drag.begin(key()).unwrap();
        drag.release(Point::new(120, 30), trash()).unwrap();

        let other = EventKey::parse("event-2025-03-18-09:00").unwrap();
        assert_eq!(drag.begin(other), Err(DragError::Busy(key())));
        assert_eq!(drag.state(), &DragState::Confirming(key()));
    }

    #[test]
    fn test_release_without_drag() {
        let mut drag = DragDelete::new();
        assert_eq!(
            drag.release(Point::new(120, 30), trash()),
            Err(DragError::NotDragging)
        );
    }

    #[test]
    fn test_resolve_while_dragging_keeps_state() {
        let mut drag = DragDelete::new();
        drag.begin(key()).unwrap();

        assert_eq!(drag.resolve(true), Err(DragError::NotConfirming));
        assert_eq!(drag.state(), &DragState::Dragging(key()));

        drag.cancel_drag();
        assert!(drag.is_idle());
    }

    #[test]
    fn test_closure_as_confirm() {
        let mut asked = Vec::new();
        let mut confirm = |k: &EventKey| {
            asked.push(k.clone());
            true
        };
        assert!(Confirm::confirm(&mut confirm, &key()));
        assert_eq!(asked, vec![key()]);
    }
}
