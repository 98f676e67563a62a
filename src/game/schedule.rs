use std::time::Duration;

use super::config::GameConfig;

/// Handle describing the tick timer a driver should be running.
///
/// Issued by the engine while a round is playing. `epoch` changes every time
/// the engine enters or leaves the playing phase and on restart, so a timer
/// built from an older handle can be recognised as stale and its ticks
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    pub epoch: u64,
    pub period: Duration,
}

/// Tick period for a given score: one speed step faster per
/// `points_per_speed_step` points, never below `min_tick_ms` or 1ms.
pub fn tick_period(config: &GameConfig, score: u32) -> Duration {
    let steps = u64::from(score / config.points_per_speed_step.max(1));
    let ms = config
        .base_tick_ms
        .saturating_sub(steps.saturating_mul(config.speed_step_ms))
        .max(config.min_tick_ms)
        .max(1);
    Duration::from_millis(ms)
}
