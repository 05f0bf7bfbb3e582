//! Leaderboard screen: top players with medals.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use tracing::{info, instrument, warn};

use crate::api::{RankedEntry, ServiceError};
use crate::tui::screen::{Screen, ScreenTransition};

/// State for the leaderboard view.
#[derive(Debug)]
pub struct LeaderboardScreen {
    entries: Vec<RankedEntry>,
    error: Option<String>,
    signed_in: bool,
}

impl LeaderboardScreen {
    /// Creates the view from a fetch result.
    #[instrument(skip(result))]
    pub fn new(result: Result<Vec<RankedEntry>, ServiceError>, signed_in: bool) -> Self {
        let (entries, error) = match result {
            Ok(entries) => {
                info!(count = entries.len(), "LeaderboardScreen initialized");
                (entries, None)
            }
            Err(e) => {
                warn!(error = %e, "Leaderboard unavailable");
                (Vec::new(), Some(e.user_message()))
            }
        };
        Self {
            entries,
            error,
            signed_in,
        }
    }
}

impl Screen for LeaderboardScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("🏆 Top Globetrotters")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        if let Some(error) = &self.error {
            let message = Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
        } else if self.entries.is_empty() {
            let message = Paragraph::new("No scores yet. Be the first!")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
        } else {
            let header = Row::new(vec![
                Cell::from("Rank").style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from("Player").style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from("Score").style(Style::default().add_modifier(Modifier::BOLD)),
            ])
            .style(Style::default().fg(Color::Yellow));

            let rows: Vec<Row> = self
                .entries
                .iter()
                .map(|entry| {
                    let rank = match entry.medal() {
                        Some(medal) => format!("{} {}", medal, entry.rank()),
                        None => format!("   {}", entry.rank()),
                    };
                    Row::new(vec![
                        Cell::from(rank),
                        Cell::from(entry.username().as_str()),
                        Cell::from(entry.score().to_string()),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Percentage(20),
                Constraint::Percentage(55),
                Constraint::Percentage(25),
            ];
            let table = Table::new(rows, widths)
                .header(header)
                .block(Block::default().borders(Borders::ALL).title("Leaderboard"));
            frame.render_widget(table, chunks[1]);
        }

        let help = if self.signed_in {
            "r: Refresh | Esc / b: Back to Menu | q: Quit"
        } else {
            "r: Refresh | Esc / b: Back | q: Quit"
        };
        let help = Paragraph::new(help)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B') => {
                if self.signed_in {
                    ScreenTransition::GoToMenu
                } else {
                    ScreenTransition::GoToSignIn
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => ScreenTransition::GoToLeaderboard,
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
