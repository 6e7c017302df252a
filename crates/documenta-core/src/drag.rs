//! Drag-and-drop reordering gesture.
//!
//! A gesture is driven by pointer events and only touches the store when the
//! pointer is released over the canvas, so no partial reorder is ever
//! visible. Positions are in canvas coordinates, y growing downward from the
//! top of the first block.

use crate::block::BlockId;
use crate::store::ContentStore;
use kurbo::Point;

/// Pointer travel (Manhattan length, in pixels) before a press becomes a drag.
pub const MIN_DRAG_DISTANCE: f64 = 10.0;

/// State of an in-progress gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No gesture.
    #[default]
    Idle,
    /// Pointer is down on a block but has not travelled far enough to drag.
    Pressed { source: BlockId, origin: Point },
    /// The block is being dragged.
    Dragging {
        source: BlockId,
        origin: Point,
        current: Point,
    },
}

/// How a gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The source block was moved. `drop_index` is the slot under the
    /// pointer before the move; `new_index` is where the block ended up.
    Dropped {
        source: BlockId,
        drop_index: usize,
        new_index: usize,
    },
    /// Released outside the canvas, aborted, or the source is gone.
    Cancelled,
    /// Released before passing the drag threshold.
    Click,
}

fn manhattan_length(a: Point, b: Point) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Gesture tracker for reordering blocks by dragging.
#[derive(Debug, Clone, Default)]
pub struct DragGesture {
    state: DragState,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pointer pressed inside `source`'s container.
    pub fn press(&mut self, source: BlockId, position: Point) {
        self.state = DragState::Pressed {
            source,
            origin: position,
        };
    }

    /// Pointer moved with the button held. Returns true while dragging.
    pub fn pointer_moved(&mut self, position: Point) -> bool {
        match self.state {
            DragState::Idle => false,
            DragState::Pressed { source, origin } => {
                if manhattan_length(position, origin) < MIN_DRAG_DISTANCE {
                    return false;
                }
                log::debug!("drag started for block {}", source);
                self.state = DragState::Dragging {
                    source,
                    origin,
                    current: position,
                };
                true
            }
            DragState::Dragging { ref mut current, .. } => {
                *current = position;
                true
            }
        }
    }

    /// Slot a drop at the current pointer position would land in, for
    /// highlighting. `None` unless dragging.
    pub fn drop_target(&self, store: &ContentStore) -> Option<usize> {
        match self.state {
            DragState::Dragging { current, .. } => Some(store.index_for_position(current.y)),
            _ => None,
        }
    }

    /// Abort the gesture without touching the store.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Pointer released. Moves the source block if it was dropped on the
    /// canvas; the gesture returns to idle in every case.
    pub fn release(
        &mut self,
        store: &mut ContentStore,
        position: Point,
        inside_canvas: bool,
    ) -> DragOutcome {
        let state = std::mem::take(&mut self.state);
        match state {
            DragState::Idle => DragOutcome::Cancelled,
            DragState::Pressed { .. } => DragOutcome::Click,
            DragState::Dragging { source, .. } => {
                if !inside_canvas {
                    return DragOutcome::Cancelled;
                }
                let drop_index = store.index_for_position(position.y);
                if !store.move_to_drop_index(source, drop_index) {
                    log::debug!("drop ignored, block {} is no longer on the canvas", source);
                    return DragOutcome::Cancelled;
                }
                match store.index_of(source) {
                    Some(new_index) => DragOutcome::Dropped {
                        source,
                        drop_index,
                        new_index,
                    },
                    None => DragOutcome::Cancelled,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three 100px blocks: centres at 50, 150, 250.
    fn abc() -> (ContentStore, BlockId, BlockId, BlockId) {
        let mut store = ContentStore::new();
        let a = store.add_text("A");
        let b = store.add_text("B");
        let c = store.add_text("C");
        (store, a, b, c)
    }

    fn drag(gesture: &mut DragGesture, source: BlockId, from: Point, to: Point) {
        gesture.press(source, from);
        assert!(gesture.pointer_moved(to));
    }

    #[test]
    fn test_small_move_stays_pressed() {
        let (_, a, ..) = abc();
        let mut gesture = DragGesture::new();
        gesture.press(a, Point::new(10.0, 10.0));
        assert!(!gesture.pointer_moved(Point::new(14.0, 15.0)));
        assert!(matches!(gesture.state(), DragState::Pressed { .. }));
        assert!(gesture.pointer_moved(Point::new(14.0, 16.0)));
        assert!(gesture.is_dragging());
    }

    #[test]
    fn test_click_does_not_move() {
        let (mut store, a, b, c) = abc();
        let mut gesture = DragGesture::new();
        gesture.press(a, Point::new(10.0, 10.0));
        let outcome = gesture.release(&mut store, Point::new(10.0, 10.0), true);
        assert_eq!(outcome, DragOutcome::Click);
        assert_eq!(store.ids(), &[a, b, c]);
        assert_eq!(gesture.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_at_end() {
        let (mut store, a, b, c) = abc();
        let mut gesture = DragGesture::new();
        drag(&mut gesture, a, Point::new(10.0, 10.0), Point::new(10.0, 200.0));
        assert_eq!(gesture.drop_target(&store), Some(2));

        let outcome = gesture.release(&mut store, Point::new(10.0, 290.0), true);
        assert_eq!(
            outcome,
            DragOutcome::Dropped {
                source: a,
                drop_index: 3,
                new_index: 2
            }
        );
        assert_eq!(store.ids(), &[b, c, a]);
    }

    #[test]
    fn test_drop_upward() {
        let (mut store, a, b, c) = abc();
        let mut gesture = DragGesture::new();
        drag(&mut gesture, c, Point::new(10.0, 250.0), Point::new(10.0, 20.0));
        let outcome = gesture.release(&mut store, Point::new(10.0, 20.0), true);
        assert!(matches!(outcome, DragOutcome::Dropped { new_index: 0, .. }));
        assert_eq!(store.ids(), &[c, a, b]);
    }

    #[test]
    fn test_drop_between_neighbours() {
        // Dragging A to just above C's centre lands it between B and C.
        let (mut store, a, b, c) = abc();
        let mut gesture = DragGesture::new();
        drag(&mut gesture, a, Point::new(10.0, 10.0), Point::new(10.0, 240.0));
        gesture.release(&mut store, Point::new(10.0, 240.0), true);
        assert_eq!(store.ids(), &[b, a, c]);
    }

    #[test]
    fn test_release_outside_cancels() {
        let (mut store, a, b, c) = abc();
        let mut gesture = DragGesture::new();
        drag(&mut gesture, a, Point::new(10.0, 10.0), Point::new(10.0, 290.0));
        let outcome = gesture.release(&mut store, Point::new(10.0, 290.0), false);
        assert_eq!(outcome, DragOutcome::Cancelled);
        assert_eq!(store.ids(), &[a, b, c]);
    }

    #[test]
    fn test_stale_source_is_silent_noop() {
        let (mut store, a, b, c) = abc();
        let mut gesture = DragGesture::new();
        drag(&mut gesture, b, Point::new(10.0, 150.0), Point::new(10.0, 0.0));
        store.remove(b);

        let outcome = gesture.release(&mut store, Point::new(10.0, 0.0), true);
        assert_eq!(outcome, DragOutcome::Cancelled);
        assert_eq!(store.ids(), &[a, c]);
        assert_eq!(gesture.state(), DragState::Idle);
    }

    #[test]
    fn test_cancel_resets() {
        let (mut store, a, ..) = abc();
        let mut gesture = DragGesture::new();
        drag(&mut gesture, a, Point::new(0.0, 0.0), Point::new(0.0, 100.0));
        gesture.cancel();
        assert!(gesture.drop_target(&store).is_none());
        assert_eq!(
            gesture.release(&mut store, Point::new(0.0, 290.0), true),
            DragOutcome::Cancelled
        );
    }

    #[test]
    fn test_store_untouched_mid_drag() {
        let (store, a, b, c) = abc();
        let mut gesture = DragGesture::new();
        drag(&mut gesture, a, Point::new(0.0, 0.0), Point::new(0.0, 120.0));
        gesture.pointer_moved(Point::new(0.0, 280.0));
        assert_eq!(store.ids(), &[a, b, c]);
        assert_eq!(gesture.drop_target(&store), Some(3));
    }
}
