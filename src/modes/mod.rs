pub mod human;
pub mod tick_timer;

pub use human::{HumanMode, InputMessage};
pub use tick_timer::TickTimer;
