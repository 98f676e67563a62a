//! Swipe gestures from mouse drags.
//!
//! A press records the start point; the matching release turns the movement
//! into a direction when its dominant axis covers at least the threshold.
//! Coordinates are terminal columns and rows.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    start: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start: None,
        }
    }

    pub fn press(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    /// Finish a gesture. Short drags and releases without a press yield `None`.
    pub fn release(&mut self, x: f32, y: f32) -> Option<Direction> {
        let (start_x, start_y) = self.start.take()?;
        let dx = x - start_x;
        let dy = y - start_y;

        if dx.abs().max(dy.abs()) < self.threshold {
            return None;
        }

        if dx.abs() > dy.abs() {
            Some(if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            Some(if dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            })
        }
    }

    /// Feed a raw terminal mouse event
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        let (x, y) = (f32::from(event.column), f32::from(event.row));
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press(x, y);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => self.release(x, y),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn swipe(from: (f32, f32), to: (f32, f32)) -> Option<Direction> {
        let mut tracker = SwipeTracker::new(30.0);
        tracker.press(from.0, from.1);
        tracker.release(to.0, to.1)
    }

    #[test]
    fn test_horizontal_swipes() {
        assert_eq!(swipe((10.0, 10.0), (50.0, 15.0)), Some(Direction::Right));
        assert_eq!(swipe((50.0, 10.0), (10.0, 0.0)), Some(Direction::Left));
    }

    #[test]
    fn test_vertical_swipes() {
        assert_eq!(swipe((10.0, 10.0), (12.0, 45.0)), Some(Direction::Down));
        assert_eq!(swipe((10.0, 45.0), (0.0, 5.0)), Some(Direction::Up));
    }

    #[test]
    fn test_short_swipe_ignored() {
        assert_eq!(swipe((10.0, 10.0), (39.0, 10.0)), None);
        assert_eq!(swipe((10.0, 10.0), (40.0, 10.0)), Some(Direction::Right));
    }

    #[test]
    fn test_diagonal_tie_is_vertical() {
        assert_eq!(swipe((0.0, 0.0), (40.0, 40.0)), Some(Direction::Down));
    }

    #[test]
    fn test_release_without_press() {
        let mut tracker = SwipeTracker::new(30.0);
        assert_eq!(tracker.release(100.0, 100.0), None);

        tracker.press(0.0, 0.0);
        assert_eq!(tracker.release(0.0, 50.0), Some(Direction::Down));
        // start point is consumed by the release
        assert_eq!(tracker.release(0.0, 100.0), None);
    }

    #[test]
    fn test_press_at_origin_counts() {
        assert_eq!(swipe((0.0, 0.0), (35.0, 0.0)), Some(Direction::Right));
    }

    #[test]
    fn test_mouse_events() {
        let mut tracker = SwipeTracker::new(5.0);
        let event = |kind, column, row| MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        assert_eq!(
            tracker.handle_mouse_event(event(MouseEventKind::Down(MouseButton::Left), 20, 5)),
            None
        );
        assert_eq!(
            tracker.handle_mouse_event(event(MouseEventKind::Drag(MouseButton::Left), 12, 5)),
            None
        );
        assert_eq!(
            tracker.handle_mouse_event(event(MouseEventKind::Up(MouseButton::Left), 10, 6)),
            Some(Direction::Left)
        );
    }
}
