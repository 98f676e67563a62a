use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::game::TickSchedule;

/// Driver-side timer that mirrors the engine's [`TickSchedule`].
///
/// Whenever the engine hands out a different schedule (or none) the old
/// interval is dropped, which cancels it, and a new one is built.
#[derive(Default)]
pub struct TickTimer {
    current: Option<(TickSchedule, Interval)>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&self) -> Option<TickSchedule> {
        self.current.as_ref().map(|(schedule, _)| *schedule)
    }

    /// Rebuild the interval if `wanted` differs from the running schedule.
    /// Returns true when the timer changed.
    pub fn sync(&mut self, wanted: Option<TickSchedule>) -> bool {
        if self.schedule() == wanted {
            return false;
        }

        self.current = wanted.map(|schedule| {
            // first tick one full period from now, not immediately
            let mut interval = interval_at(Instant::now() + schedule.period, schedule.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            (schedule, interval)
        });
        true
    }

    /// Wait for the next tick. Never resolves while no schedule is active.
    pub async fn tick(&mut self) -> TickSchedule {
        match &mut self.current {
            Some((schedule, interval)) => {
                let schedule = *schedule;
                interval.tick().await;
                schedule
            }
            None => std::future::pending().await,
        }
    }
}
