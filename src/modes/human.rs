use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{error, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::interval;

use super::tick_timer::TickTimer;
use crate::game::{Command, GameEngine, GamePhase, TickSchedule};
use crate::input::{InputHandler, KeyAction, SwipeTracker};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::store::{HIGH_SCORE_KEY, ScoreStore};

/// Message sent from the input task to the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMessage {
    Command(Command),
    Quit,
}

pub struct HumanMode<S: ScoreStore> {
    engine: GameEngine,
    store: S,
    metrics: GameMetrics,
    renderer: Renderer,
    should_quit: bool,
}

impl<S: ScoreStore> HumanMode<S> {
    pub fn new(mut engine: GameEngine, store: S) -> Self {
        engine.restore_high_score(store.get(HIGH_SCORE_KEY));

        Self {
            engine,
            store,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(
            "Starting game on a {0}x{0} grid, high score {1}",
            self.engine.config().grid_size,
            self.engine.state().high_score
        );

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!("Leaving after {} games", self.metrics.games_played);
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel();
        let (phase_tx, phase_rx) = watch::channel(self.engine.phase());
        let input_task = spawn_input_task(
            input_tx,
            phase_rx,
            self.engine.config().swipe_threshold,
        );

        let mut tick_timer = TickTimer::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        let result = loop {
            tokio::select! {
                biased;

                // Queued input is applied before a pending tick
                message = input_rx.recv() => {
                    match message {
                        Some(message) => self.handle_message(message),
                        None => {
                            warn!("Input task stopped, quitting");
                            self.should_quit = true;
                        }
                    }
                }

                // Game logic tick
                schedule = tick_timer.tick() => {
                    self.on_tick(&schedule);
                }

                // Render frame
                _ = render_timer.tick() => {
                    let period = self.engine.tick_period();
                    let drawn = terminal.draw(|frame| {
                        self.renderer.render(frame, self.engine.state(), &self.metrics, period);
                    });
                    if let Err(e) = drawn {
                        break Err(anyhow::Error::new(e).context("Failed to draw frame"));
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            // Follow the engine: restart, pause or a speed step swaps the timer
            tick_timer.sync(self.engine.schedule());
            self.metrics.observe(self.engine.phase());
            phase_tx.send_replace(self.engine.phase());

            if self.should_quit {
                break Ok(());
            }
        };

        input_task.abort();
        result
    }

    fn handle_message(&mut self, message: InputMessage) {
        match message {
            InputMessage::Command(command) => self.engine.apply(command),
            InputMessage::Quit => self.should_quit = true,
        }
    }

    fn on_tick(&mut self, schedule: &TickSchedule) {
        let result = self.engine.tick_scheduled(schedule);

        if result.high_score_raised {
            let high_score = self.engine.state().high_score;
            if let Err(e) = self.store.set(HIGH_SCORE_KEY, high_score) {
                error!("Error saving high score: {:#}", e);
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Read terminal events on their own task and queue them for the game loop
fn spawn_input_task(
    tx: mpsc::UnboundedSender<InputMessage>,
    phase: watch::Receiver<GamePhase>,
    swipe_threshold: f32,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let handler = InputHandler::new();
        let mut swipe = SwipeTracker::new(swipe_threshold);
        let mut events = EventStream::new();

        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    error!("Terminal event error: {}", e);
                    break;
                }
            };

            let current = *phase.borrow();
            if let Some(message) = translate_event(&handler, &mut swipe, current, event) {
                if tx.send(message).is_err() {
                    break;
                }
            }
        }
    })
}

/// Map a terminal event to a message. Swipes only steer a running game.
fn translate_event(
    handler: &InputHandler,
    swipe: &mut SwipeTracker,
    phase: GamePhase,
    event: Event,
) -> Option<InputMessage> {
    match event {
        Event::Key(key) => {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return None;
            }
            match handler.handle_key_event(key) {
                KeyAction::GameCommand(command) => Some(InputMessage::Command(command)),
                KeyAction::Quit => Some(InputMessage::Quit),
                KeyAction::None => None,
            }
        }
        Event::Mouse(mouse) => {
            let direction = swipe.handle_mouse_event(mouse)?;
            (phase == GamePhase::Playing)
                .then_some(InputMessage::Command(Command::ChangeDirection(direction)))
        }
        _ => None,
    }
}
