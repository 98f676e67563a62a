use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::state::Position;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square game grid
    pub grid_size: i32,
    /// Where the single-segment snake starts after a restart
    pub initial_head: Position,
    /// Food position for the very first round
    pub initial_food: Position,
    /// Points awarded per food eaten
    pub food_reward: u32,

    // Speed ramp
    /// Tick period at score 0, in milliseconds
    pub base_tick_ms: u64,
    /// Fastest allowed tick period, in milliseconds
    pub min_tick_ms: u64,
    /// How much faster each speed step gets, in milliseconds
    pub speed_step_ms: u64,
    /// Score needed per speed step
    pub points_per_speed_step: u32,

    /// Minimum dominant-axis drag distance recognised as a swipe
    pub swipe_threshold: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 25,
            initial_head: Position::new(10, 10),
            initial_food: Position::new(15, 15),
            food_reward: 10,
            base_tick_ms: 200,
            min_tick_ms: 50,
            speed_step_ms: 10,
            points_per_speed_step: 50,
            swipe_threshold: 30.0,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: i32) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Read a JSON config file. Missing fields fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // a 1x1 board leaves no cell for the first food
        if self.grid_size < 2 {
            bail!("grid_size must be at least 2, got {}", self.grid_size);
        }
        if !self.contains(self.initial_head) {
            bail!(
                "initial_head ({}, {}) lies outside a {}x{} grid",
                self.initial_head.x,
                self.initial_head.y,
                self.grid_size,
                self.grid_size
            );
        }
        if self.points_per_speed_step == 0 {
            bail!("points_per_speed_step must be at least 1");
        }
        if self.min_tick_ms == 0 {
            bail!("min_tick_ms must be at least 1");
        }
        if self.min_tick_ms > self.base_tick_ms {
            bail!(
                "min_tick_ms ({}) exceeds base_tick_ms ({})",
                self.min_tick_ms,
                self.base_tick_ms
            );
        }
        if self.swipe_threshold.is_nan() || self.swipe_threshold <= 0.0 {
            bail!("swipe_threshold must be positive");
        }
        Ok(())
    }

    /// Whether `pos` lies on the grid
    pub fn contains(&self, pos: Position) -> bool {
        (0..self.grid_size).contains(&pos.x) && (0..self.grid_size).contains(&pos.y)
    }
}
