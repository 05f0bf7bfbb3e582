//! Profile screen: the player's answer statistics.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use tracing::{info, instrument, warn};

use crate::api::{ProfileStats, ServiceError};
use crate::tui::screen::{Screen, ScreenTransition};

/// State for the profile view.
#[derive(Debug)]
pub struct ProfileScreen {
    username: String,
    stats: Option<ProfileStats>,
    error: Option<String>,
}

impl ProfileScreen {
    /// Creates the view from a fetch result.
    #[instrument(skip(result))]
    pub fn new(username: String, result: Result<ProfileStats, ServiceError>) -> Self {
        let (stats, error) = match result {
            Ok(stats) => {
                info!(attempted = stats.questions_attempted, "ProfileScreen initialized");
                (Some(stats), None)
            }
            Err(e) => {
                warn!(error = %e, "Profile unavailable");
                (None, Some(e.user_message()))
            }
        };
        Self {
            username,
            stats,
            error,
        }
    }
}

impl Screen for ProfileScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(area);

        let name = self
            .stats
            .as_ref()
            .and_then(|s| s.username.as_deref())
            .unwrap_or(&self.username);
        let title = Paragraph::new(format!("Profile | {}", name))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let body = match (&self.stats, &self.error) {
            (Some(stats), _) => vec![
                Line::from(format!("Questions attempted: {}", stats.questions_attempted)),
                Line::styled(
                    format!("Correct answers:     {}", stats.correct_answers),
                    Style::default().fg(Color::Green),
                ),
                Line::styled(
                    format!("Wrong answers:       {}", stats.wrong_answers),
                    Style::default().fg(Color::Red),
                ),
                Line::from(format!("Accuracy:            {:.1}%", stats.accuracy())),
            ],
            (None, Some(error)) => {
                vec![Line::styled(error.clone(), Style::default().fg(Color::Red))]
            }
            (None, None) => vec![Line::from("No statistics available")],
        };
        let body = Paragraph::new(body).block(Block::default().borders(Borders::ALL).title("Stats"));
        frame.render_widget(body, chunks[1]);

        let help = Paragraph::new("Esc / b: Back to Menu | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B') => {
                info!("Returning to menu from profile");
                ScreenTransition::GoToMenu
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
