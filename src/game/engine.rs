use super::{
    action::{Command, Direction, propose_direction},
    collision::detect_collision,
    config::GameConfig,
    food::place_food,
    schedule::{TickSchedule, tick_period},
    state::{CollisionType, GamePhase, GameState, Snake},
};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

/// Result of a game tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickResult {
    /// Whether the simulation ran at all (false outside the playing phase)
    pub advanced: bool,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Whether this tick raised the high score
    pub high_score_raised: bool,
    /// Whether the snake now covers every cell, which ends the round
    pub board_filled: bool,
}

/// The game engine that owns the state and handles all game logic
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    /// Last direction accepted by the guard; used by the next tick
    direction: Direction,
    epoch: u64,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let snake = Snake::new(config.initial_head);
        let food = if config.contains(config.initial_food) && !snake.contains(config.initial_food)
        {
            config.initial_food
        } else {
            place_food(&mut rng, &snake.body, config.grid_size)
        };
        let state = GameState::new(snake, food, config.grid_size);

        Self {
            config,
            state,
            direction: Direction::Right,
            epoch: 0,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// The committed direction the next tick will move in
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Seed the high score, e.g. from persistent storage. Never lowers it.
    pub fn restore_high_score(&mut self, high_score: u32) {
        self.state.high_score = self.state.high_score.max(high_score);
    }

    /// Idle or paused -> playing. Leaves snake, food and score alone.
    pub fn start(&mut self) {
        if matches!(self.state.phase, GamePhase::Idle | GamePhase::Paused) {
            self.set_phase(GamePhase::Playing);
        }
    }

    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.set_phase(GamePhase::Paused);
        }
    }

    /// Back to idle with a fresh single-segment snake. The high score survives.
    pub fn restart(&mut self) {
        self.set_phase(GamePhase::Idle);
        // A restart from idle must still invalidate outstanding schedules
        self.epoch += 1;

        self.state.snake = Snake::new(self.config.initial_head);
        self.direction = Direction::Right;
        self.state.heading = Direction::Right;
        self.state.score = 0;
        self.state.food = place_food(&mut self.rng, &self.state.snake.body, self.config.grid_size);
        debug!("restart: food at ({}, {})", self.state.food.x, self.state.food.y);
    }

    /// Apply the direction guard against the committed direction. Accepted in
    /// every phase; only observable on the next tick while playing.
    pub fn change_direction(&mut self, requested: Direction) {
        self.direction = propose_direction(self.direction, requested);
    }

    /// The Space-key action: start, pause, resume or restart depending on phase
    pub fn toggle(&mut self) {
        match self.state.phase {
            GamePhase::Idle | GamePhase::Paused => self.start(),
            GamePhase::Playing => self.pause(),
            GamePhase::GameOver => self.restart(),
        }
    }

    /// Apply one queued command
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::ChangeDirection(direction) => self.change_direction(direction),
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Restart => self.restart(),
            Command::Toggle => self.toggle(),
        }
    }

    /// Advance the simulation by one step. No-op unless playing.
    pub fn tick(&mut self) -> TickResult {
        if self.state.phase != GamePhase::Playing {
            return TickResult::default();
        }

        let new_head = self.state.snake.head().moved_in_direction(self.direction);

        if let Some(collision_type) =
            detect_collision(new_head, &self.state.snake.body, self.config.grid_size)
        {
            info!(
                "game over ({:?}) with score {}, length {}",
                collision_type,
                self.state.score,
                self.state.snake.len()
            );
            self.set_phase(GamePhase::GameOver);
            return TickResult {
                advanced: true,
                collision_type: Some(collision_type),
                ..TickResult::default()
            };
        }

        let ate_food = new_head == self.state.food;
        self.state.snake.advance(new_head, ate_food);
        self.state.heading = self.direction;

        let mut high_score_raised = false;
        if ate_food {
            self.state.score += self.config.food_reward;
            if self.state.score > self.state.high_score {
                self.state.high_score = self.state.score;
                high_score_raised = true;
            }

            let cells = (self.config.grid_size as usize).pow(2);
            if self.state.snake.len() >= cells {
                // no free cell is left for food
                info!("board filled with score {}", self.state.score);
                self.set_phase(GamePhase::GameOver);
                return TickResult {
                    advanced: true,
                    ate_food,
                    collision_type: None,
                    high_score_raised,
                    board_filled: true,
                };
            }

            self.state.food =
                place_food(&mut self.rng, &self.state.snake.body, self.config.grid_size);
            debug!(
                "ate food, score {}, next food at ({}, {})",
                self.state.score, self.state.food.x, self.state.food.y
            );
        }

        TickResult {
            advanced: true,
            ate_food,
            collision_type: None,
            high_score_raised,
            board_filled: false,
        }
    }

    /// Tick on behalf of a timer built from `schedule`. Ticks from a stale
    /// schedule are dropped.
    pub fn tick_scheduled(&mut self, schedule: &TickSchedule) -> TickResult {
        if schedule.epoch != self.epoch {
            debug!(
                "dropping tick from stale schedule {} (current {})",
                schedule.epoch, self.epoch
            );
            return TickResult::default();
        }
        self.tick()
    }

    /// The timer the driver should run right now, if any
    pub fn schedule(&self) -> Option<TickSchedule> {
        (self.state.phase == GamePhase::Playing).then(|| TickSchedule {
            epoch: self.epoch,
            period: self.tick_period(),
        })
    }

    /// Current tick period given the score
    pub fn tick_period(&self) -> Duration {
        tick_period(&self.config, self.state.score)
    }

    fn set_phase(&mut self, phase: GamePhase) {
        let old = self.state.phase;
        if old == phase {
            return;
        }
        if (old == GamePhase::Playing) != (phase == GamePhase::Playing) {
            self.epoch += 1;
        }
        debug!("phase {:?} -> {:?}", old, phase);
        self.state.phase = phase;
    }
}

#[cfg(test)]
use super::state::Position;

#[cfg(test)]
impl GameEngine {
    /// Replace snake, committed direction and food for scenario tests
    fn load(&mut self, body: Vec<Position>, direction: Direction, food: Position) {
        self.state.snake = Snake::from_segments(body).unwrap();
        self.direction = direction;
        self.state.heading = direction;
        self.state.food = food;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 1)
    }

    fn playing_engine() -> GameEngine {
        let mut engine = engine();
        engine.start();
        engine
    }

    #[test]
    fn test_initial_state() {
        let engine = engine();
        let state = engine.state();

        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.snake.body, vec![p(10, 10)]);
        assert_eq!(state.food, p(15, 15));
        assert_eq!(state.score, 0);
        assert_eq!(state.grid_size, 25);
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.schedule(), None);
    }

    #[test]
    fn test_phase_transitions() {
        let mut engine = engine();

        engine.pause();
        assert_eq!(engine.phase(), GamePhase::Idle);

        engine.start();
        assert_eq!(engine.phase(), GamePhase::Playing);

        engine.pause();
        assert_eq!(engine.phase(), GamePhase::Paused);

        engine.pause();
        assert_eq!(engine.phase(), GamePhase::Paused);

        engine.start();
        assert_eq!(engine.phase(), GamePhase::Playing);

        engine.restart();
        assert_eq!(engine.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_start_does_not_touch_game_data() {
        let mut engine = playing_engine();
        engine.tick();
        engine.pause();
        let before = engine.state().clone();

        engine.start();

        let after = engine.state();
        assert_eq!(after.snake, before.snake);
        assert_eq!(after.food, before.food);
        assert_eq!(after.score, before.score);
    }

    #[test]
    fn test_start_is_ignored_after_game_over() {
        let mut engine = playing_engine();
        engine.load(vec![p(24, 10)], Direction::Right, p(0, 0));
        engine.tick();
        assert_eq!(engine.phase(), GamePhase::GameOver);

        engine.start();
        assert_eq!(engine.phase(), GamePhase::GameOver);
        engine.pause();
        assert_eq!(engine.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_tick_outside_playing_changes_nothing() {
        let mut engine = engine();
        for phase in [GamePhase::Idle, GamePhase::Paused, GamePhase::GameOver] {
            engine.restart();
            match phase {
                GamePhase::Paused => {
                    engine.start();
                    engine.pause();
                }
                GamePhase::GameOver => {
                    engine.start();
                    engine.load(vec![p(0, 0)], Direction::Up, p(3, 3));
                    engine.tick();
                }
                _ => {}
            }
            assert_eq!(engine.phase(), phase);

            let before = engine.state().clone();
            let result = engine.tick();
            assert!(!result.advanced);
            assert_eq!(engine.state(), &before);
        }
    }

    #[test]
    fn test_scenario_plain_move() {
        let mut engine = playing_engine();
        engine.load(vec![p(10, 10)], Direction::Right, p(15, 15));

        let result = engine.tick();

        assert!(result.advanced);
        assert!(!result.ate_food);
        assert_eq!(engine.state().snake.body, vec![p(11, 10)]);
        assert_eq!(engine.state().score, 0);
    }

    #[test]
    fn test_scenario_eat_food() {
        let mut engine = playing_engine();
        engine.load(vec![p(5, 5), p(4, 5)], Direction::Right, p(6, 5));

        let result = engine.tick();

        assert!(result.ate_food);
        assert!(result.high_score_raised);
        let state = engine.state();
        assert_eq!(state.snake.body, vec![p(6, 5), p(5, 5), p(4, 5)]);
        assert_eq!(state.score, 10);
        assert_eq!(state.high_score, 10);
        assert!(!state.snake.contains(state.food));
    }

    #[test]
    fn test_scenario_wall() {
        let mut engine = playing_engine();
        engine.load(vec![p(24, 10)], Direction::Right, p(0, 0));

        let result = engine.tick();

        assert_eq!(result.collision_type, Some(CollisionType::Wall));
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.state().snake.body, vec![p(24, 10)]);
        assert_eq!(engine.state().food, p(0, 0));
    }

    #[test]
    fn test_scenario_self_collision() {
        let mut engine = playing_engine();
        let body = vec![p(5, 5), p(5, 6), p(6, 6), p(6, 5)];
        engine.load(body.clone(), Direction::Right, p(0, 0));
        engine.change_direction(Direction::Down);

        let result = engine.tick();

        assert_eq!(result.collision_type, Some(CollisionType::SelfCollision));
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.state().snake.body, body);
    }

    #[test]
    fn test_moving_onto_vacating_tail_collides() {
        let mut engine = playing_engine();
        // Head (5,5) moving up would reach (5,4), which is the tail
        engine.load(
            vec![p(5, 5), p(6, 5), p(6, 4), p(5, 4)],
            Direction::Up,
            p(0, 0),
        );

        let result = engine.tick();

        assert_eq!(result.collision_type, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_scenario_restart_keeps_high_score() {
        let mut engine = playing_engine();
        engine.load(vec![p(5, 5), p(4, 5)], Direction::Right, p(6, 5));
        engine.tick();
        engine.load(vec![p(24, 10)], Direction::Right, p(0, 0));
        engine.tick();
        assert_eq!(engine.phase(), GamePhase::GameOver);

        engine.restart();

        let state = engine.state();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.snake.body, vec![p(10, 10)]);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 10);
        assert_eq!(engine.direction(), Direction::Right);
        assert!(!state.snake.contains(state.food));
    }

    #[test]
    fn test_filling_the_board_ends_the_round() {
        let config = GameConfig {
            grid_size: 2,
            initial_head: p(0, 0),
            ..Default::default()
        };
        let mut engine = GameEngine::with_seed(config, 3);
        engine.start();
        engine.load(vec![p(1, 0), p(1, 1), p(0, 1)], Direction::Left, p(0, 0));

        let result = engine.tick();

        assert!(result.ate_food);
        assert!(result.board_filled);
        assert_eq!(result.collision_type, None);
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.state().snake.len(), 4);
        assert_eq!(engine.state().score, 10);

        engine.restart();
        assert_eq!(engine.state().snake.body, vec![p(0, 0)]);
        assert_ne!(engine.state().food, p(0, 0));
    }

    #[test]
    fn test_restored_high_score_is_not_lowered() {
        let mut engine = engine();
        engine.restore_high_score(120);
        engine.restore_high_score(30);
        assert_eq!(engine.state().high_score, 120);

        engine.start();
        engine.load(vec![p(5, 5)], Direction::Right, p(6, 5));
        let result = engine.tick();
        assert!(!result.high_score_raised);
        assert_eq!(engine.state().high_score, 120);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut engine = playing_engine();
        engine.load(vec![p(5, 5), p(4, 5)], Direction::Right, p(0, 0));

        engine.change_direction(Direction::Left);
        assert_eq!(engine.direction(), Direction::Right);

        engine.tick();
        assert_eq!(engine.state().snake.head(), p(6, 5));
    }

    #[test]
    fn test_direction_changes_while_idle_apply_on_first_tick() {
        let mut engine = engine();
        engine.change_direction(Direction::Down);
        engine.start();
        engine.tick();
        assert_eq!(engine.state().snake.head(), p(10, 11));
        assert_eq!(engine.state().heading, Direction::Down);
    }

    #[test]
    fn test_last_direction_before_tick_wins() {
        let mut engine = playing_engine();
        engine.change_direction(Direction::Up);
        engine.change_direction(Direction::Right);
        engine.change_direction(Direction::Down);
        engine.tick();
        assert_eq!(engine.state().snake.head(), p(10, 11));
    }

    #[test]
    fn test_toggle_follows_phase() {
        let mut engine = engine();

        engine.apply(Command::Toggle);
        assert_eq!(engine.phase(), GamePhase::Playing);
        engine.apply(Command::Toggle);
        assert_eq!(engine.phase(), GamePhase::Paused);
        engine.apply(Command::Toggle);
        assert_eq!(engine.phase(), GamePhase::Playing);

        engine.load(vec![p(24, 10)], Direction::Right, p(0, 0));
        engine.tick();
        assert_eq!(engine.phase(), GamePhase::GameOver);

        engine.apply(Command::Toggle);
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert_eq!(engine.state().snake.body, vec![p(10, 10)]);
    }

    #[test]
    fn test_apply_commands() {
        let mut engine = engine();
        engine.apply(Command::Start);
        engine.apply(Command::ChangeDirection(Direction::Up));
        assert_eq!(engine.direction(), Direction::Up);
        engine.apply(Command::Pause);
        assert_eq!(engine.phase(), GamePhase::Paused);
        engine.apply(Command::Restart);
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert_eq!(engine.direction(), Direction::Right);
    }

    #[test]
    fn test_schedule_only_while_playing() {
        let mut engine = engine();
        assert!(engine.schedule().is_none());

        engine.start();
        let schedule = engine.schedule().unwrap();
        assert_eq!(schedule.period, Duration::from_millis(200));

        engine.pause();
        assert!(engine.schedule().is_none());

        engine.start();
        assert_ne!(engine.schedule().unwrap().epoch, schedule.epoch);
    }

    #[test]
    fn test_stale_schedule_cannot_tick_after_restart() {
        let mut engine = playing_engine();
        let stale = engine.schedule().unwrap();

        engine.restart();
        engine.start();
        let fresh = engine.schedule().unwrap();
        assert_ne!(stale, fresh);

        let before = engine.state().clone();
        assert!(!engine.tick_scheduled(&stale).advanced);
        assert_eq!(engine.state(), &before);

        assert!(engine.tick_scheduled(&fresh).advanced);
        assert_eq!(engine.state().snake.head(), p(11, 10));
    }

    #[test]
    fn test_restart_while_idle_invalidates_schedule() {
        let mut engine = playing_engine();
        let first = engine.schedule().unwrap();
        engine.restart();
        engine.restart();
        engine.start();
        assert_ne!(engine.schedule().unwrap().epoch, first.epoch);
    }

    #[test]
    fn test_period_follows_score() {
        let mut engine = playing_engine();
        engine.state.score = 100;
        assert_eq!(engine.tick_period(), Duration::from_millis(180));
        assert_eq!(
            engine.schedule().unwrap().period,
            Duration::from_millis(180)
        );
    }

    /// Random play: growth, snake shape, food placement and high score
    /// invariants hold on every step.
    #[test]
    fn test_random_play_invariants() {
        let directions = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];

        for seed in 0..50 {
            let mut engine = GameEngine::with_seed(GameConfig::default(), seed);
            let mut driver = StdRng::seed_from_u64(seed + 1000);
            let mut high_score = 0;

            for _ in 0..400 {
                match driver.gen_range(0..10) {
                    0 => engine.apply(Command::Toggle),
                    1 => engine.apply(Command::Restart),
                    2..=4 => {
                        let dir = directions[driver.gen_range(0..4)];
                        let committed = engine.direction();
                        engine.change_direction(dir);
                        if dir == committed.opposite() {
                            assert_eq!(engine.direction(), committed);
                        }
                    }
                    _ => engine.start(),
                }

                let before = engine.state().clone();
                let result = engine.tick();
                let after = engine.state();

                if result.advanced && result.collision_type.is_none() {
                    let expected = before.snake.len() + usize::from(result.ate_food);
                    assert_eq!(after.snake.len(), expected);
                    if result.ate_food {
                        assert_eq!(after.score, before.score + 10);
                    }
                } else {
                    assert_eq!(after.snake, before.snake);
                    assert_eq!(after.score, before.score);
                }

                let body = &after.snake.body;
                assert!(!body.contains(&after.food));
                for (i, seg) in body.iter().enumerate() {
                    assert!(!body[i + 1..].contains(seg));
                }
                for pair in body.windows(2) {
                    assert!(pair[0].is_adjacent(pair[1]));
                }

                assert!(after.high_score >= high_score);
                assert!(after.high_score >= after.score);
                high_score = after.high_score;
            }
        }
    }
}
