//! Terminal Snake
//!
//! This library provides:
//! - Core game logic: engine, collision, food placement, tick schedule (game module)
//! - Keyboard and swipe input adapters (input module)
//! - TUI rendering (render module)
//! - High score persistence (store module)
//! - The interactive driver loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod store;
