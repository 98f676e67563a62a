use serde::{Deserialize, Serialize};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Maps a raw vector back to a direction. Anything other than one of the
    /// four unit vectors yields `None`.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Accepts `requested` unless it reverses `current`, in which case `current`
/// is kept. Re-submitting the current direction is accepted.
pub fn propose_direction(current: Direction, requested: Direction) -> Direction {
    if current.is_opposite(requested) {
        current
    } else {
        requested
    }
}

/// A request queued by an input source for the engine to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ChangeDirection(Direction),
    Start,
    Pause,
    Restart,
    /// Context-sensitive action bound to Space, resolved against the phase at
    /// the moment the command is applied
    Toggle,
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        Command::ChangeDirection(direction)
    }
}
