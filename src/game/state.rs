use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// True if the two positions differ by exactly one unit step
    pub fn is_adjacent(&self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
}

impl Snake {
    /// A single-segment snake
    pub fn new(head: Position) -> Self {
        Self { body: vec![head] }
    }

    /// Build a snake from explicit segments, head first. Returns `None` for an
    /// empty body.
    pub fn from_segments(body: Vec<Position>) -> Option<Self> {
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Prepend `new_head`, dropping the tail unless the snake grows
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Lifecycle phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Idle,
    Playing,
    Paused,
    GameOver,
}

impl GamePhase {
    pub fn label(&self) -> &'static str {
        match self {
            GamePhase::Idle => "Ready",
            GamePhase::Playing => "Playing",
            GamePhase::Paused => "Paused",
            GamePhase::GameOver => "Game Over",
        }
    }
}

/// Complete game state, read by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub phase: GamePhase,
    pub snake: Snake,
    pub food: Position,
    pub grid_size: i32,
    pub score: u32,
    pub high_score: u32,
    /// Direction the snake moved on the last tick
    pub heading: Direction,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, grid_size: i32) -> Self {
        Self {
            phase: GamePhase::Idle,
            snake,
            food,
            grid_size,
            score: 0,
            high_score: 0,
            heading: Direction::Right,
        }
    }
}
