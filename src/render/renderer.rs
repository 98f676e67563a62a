use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use std::time::Duration;

use crate::game::{Direction as Heading, GamePhase, GameState, Position};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
        tick_period: Duration,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics, tick_period);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        let grid = self.render_grid(state);
        frame.render_widget(grid, game_area);

        if let Some(overlay) = self.render_overlay(state) {
            let area = centered_rect(game_area, 46, 9);
            frame.render_widget(Clear, area);
            frame.render_widget(overlay, area);
        }

        let controls = self.render_controls(state.phase);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::new();
        let head = state.snake.head();

        for y in 0..state.grid_size {
            let mut spans = Vec::new();

            for x in 0..state.grid_size {
                let pos = Position::new(x, y);

                let cell = if pos == head {
                    Span::styled(
                        head_glyph(state.heading),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.contains(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        state: &GameState,
        metrics: &GameMetrics,
        tick_period: Duration,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled(state.phase.label(), label.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(state.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", tick_period.as_millis()), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(metrics.games_played.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_overlay(&self, state: &GameState) -> Option<Paragraph<'_>> {
        let key = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
        let hint = Style::default().fg(Color::Gray);

        let (title, color, mut lines) = match state.phase {
            GamePhase::Playing => return None,
            GamePhase::Idle => (
                "SNAKE",
                Color::Cyan,
                vec![Line::from("Eat the food, avoid walls and your tail")],
            ),
            GamePhase::Paused => ("PAUSED", Color::Yellow, Vec::new()),
            GamePhase::GameOver => {
                let mut lines = vec![Line::from(vec![
                    Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                    Span::styled(
                        state.score.to_string(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])];
                if state.score > 0 && state.score == state.high_score {
                    lines.push(Line::from(Span::styled(
                        "New high score!",
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )));
                }
                ("GAME OVER", Color::Red, lines)
            }
        };

        let action = match state.phase {
            GamePhase::Idle => " to start",
            GamePhase::Paused => " to resume",
            _ => " to play again",
        };

        lines.insert(
            0,
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        );
        lines.insert(1, Line::from(""));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Press ", hint),
            Span::styled("Space", key),
            Span::styled(action, hint),
        ]));

        Some(
            Paragraph::new(lines).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
        )
    }

    fn render_controls(&self, phase: GamePhase) -> Paragraph<'_> {
        let space_action = match phase {
            GamePhase::Playing => " pause | ",
            GamePhase::GameOver => " new game | ",
            _ => " start | ",
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw("/"),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" or swipe to move | "),
            Span::styled("Space", Style::default().fg(Color::Green)),
            Span::raw(space_action),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Head cell pointing the way the snake last moved
fn head_glyph(heading: Heading) -> &'static str {
    match heading {
        Heading::Up => "▲ ",
        Heading::Down => "▼ ",
        Heading::Left => "◀ ",
        Heading::Right => "▶ ",
    }
}

/// A `width` x `height` rect centred in `area`, clipped to it
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
