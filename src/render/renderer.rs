use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{
    Difficulty, GameOverReason, Position, PowerUpKind, RenderSnapshot, SessionState,
};

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &RenderSnapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot);
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

        match snapshot.state {
            SessionState::Idle => frame.render_widget(self.render_title(snapshot), game_area),
            SessionState::Playing => frame.render_widget(self.render_grid(snapshot), game_area),
            SessionState::GameOver => {
                frame.render_widget(self.render_game_over(snapshot), game_area)
            }
        }

        let controls = self.render_controls(snapshot.state);
        frame.render_widget(controls, chunks[2]);
    }

    fn power_up_style(kind: PowerUpKind) -> (&'static str, Color) {
        match kind {
            PowerUpKind::SpeedBoost => ("» ", Color::Yellow),
            PowerUpKind::SlowDown => ("« ", Color::Cyan),
            PowerUpKind::Invincibility => ("★ ", Color::Magenta),
            PowerUpKind::ScoreMultiplier => ("×2", Color::LightRed),
        }
    }

    fn render_grid(&self, snapshot: &RenderSnapshot) -> Paragraph<'_> {
        let (head_color, body_color) = if snapshot.invincible {
            (Color::LightMagenta, Color::Magenta)
        } else {
            (Color::Cyan, Color::Green)
        };

        let mut lines = Vec::new();

        for y in 0..snapshot.grid_size {
            let mut spans = Vec::new();

            for x in 0..snapshot.grid_size {
                let pos = Position::new(x as i32, y as i32);

                let cell = if Some(pos) == snapshot.head() {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(head_color)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(body_color))
                } else if Some(pos) == snapshot.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if let Some((_, kind)) = snapshot.power_up.filter(|(at, _)| *at == pos) {
                    let (symbol, color) = Self::power_up_style(kind);
                    Span::styled(
                        symbol,
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
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
                    .title(format!(" Snake [{}] ", snapshot.difficulty.as_str())),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &RenderSnapshot) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{:04}", snapshot.score),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{:04}", snapshot.high_score),
                Style::default().fg(Color::White),
            ),
        ];

        if let Some((kind, remaining)) = snapshot.active_effect {
            let (_, color) = Self::power_up_style(kind);
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                format!("{} {:.1}s", kind.name().to_uppercase(), remaining.as_secs_f32()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_title(&self, snapshot: &RenderSnapshot) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];

        for (index, difficulty) in Difficulty::ALL.iter().enumerate() {
            let style = if *difficulty == snapshot.difficulty {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };
            text.push(Line::from(vec![Span::styled(
                format!(" {} {} ", index + 1, difficulty.as_str()),
                style,
            )]));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![Span::styled(
            "Press SPACE or ENTER to start",
            Style::default().fg(Color::Gray),
        )]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_game_over(&self, snapshot: &RenderSnapshot) -> Paragraph<'_> {
        let (headline, color) = match snapshot.game_over_reason {
            Some(GameOverReason::BoardFull) => ("BOARD CLEARED", Color::Green),
            _ => ("GAME OVER", Color::Red),
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "M",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for menu or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self, state: SessionState) -> Paragraph<'_> {
        let text = match state {
            SessionState::Idle => vec![Line::from(vec![
                Span::styled("1-3", Style::default().fg(Color::Cyan)),
                Span::raw(" difficulty | "),
                Span::styled("SPACE", Style::default().fg(Color::Cyan)),
                Span::raw(" to start | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])],
            _ => vec![Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])],
        };

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
