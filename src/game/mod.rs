//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine is driven by commands and ticks; timers and input live in the caller.

pub mod action;
pub mod collision;
pub mod config;
pub mod engine;
pub mod food;
pub mod schedule;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction, propose_direction};
pub use collision::detect_collision;
pub use config::GameConfig;
pub use engine::{GameEngine, TickResult};
pub use food::place_food;
pub use schedule::{TickSchedule, tick_period};
pub use state::{CollisionType, GamePhase, GameState, Position, Snake};
