use std::time::Duration;
use tokio::time::Instant;

use crate::game::GamePhase;

/// Session statistics shown alongside the board
pub struct GameMetrics {
    /// Play time banked from earlier stretches of the current round
    round_time: Duration,
    /// Set while the round is being played
    running_since: Option<Instant>,
    last_phase: GamePhase,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_time: Duration::ZERO,
            running_since: None,
            last_phase: GamePhase::Idle,
            games_played: 0,
        }
    }

    /// Track the engine phase. The round clock only runs while playing and
    /// resets when a new round is set up.
    pub fn observe(&mut self, phase: GamePhase) {
        if phase == self.last_phase {
            return;
        }

        if let Some(since) = self.running_since.take() {
            self.round_time += since.elapsed();
        }

        match phase {
            GamePhase::Playing => self.running_since = Some(Instant::now()),
            GamePhase::GameOver => self.games_played += 1,
            GamePhase::Idle => self.round_time = Duration::ZERO,
            GamePhase::Paused => {}
        }

        self.last_phase = phase;
    }

    pub fn elapsed(&self) -> Duration {
        self.round_time + self.running_since.map_or(Duration::ZERO, |since| since.elapsed())
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed().as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
