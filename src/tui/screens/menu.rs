//! Main menu screen, shown after sign-in.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{debug, info, instrument};

use crate::tui::screen::{Screen, ScreenTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
enum MenuItem {
    #[strum(to_string = "Play")]
    Play,
    #[strum(to_string = "Leaderboard")]
    Leaderboard,
    #[strum(to_string = "My Profile")]
    Profile,
    #[strum(to_string = "Sign Out")]
    SignOut,
    #[strum(to_string = "Quit")]
    Quit,
}

impl MenuItem {
    fn transition(self) -> ScreenTransition {
        match self {
            Self::Play => ScreenTransition::GoToGame,
            Self::Leaderboard => ScreenTransition::GoToLeaderboard,
            Self::Profile => ScreenTransition::GoToProfile,
            Self::SignOut => ScreenTransition::SignOut,
            Self::Quit => ScreenTransition::Quit,
        }
    }
}

/// State for the main menu.
#[derive(Debug)]
pub struct MenuScreen {
    username: String,
    items: Vec<MenuItem>,
    list_state: ListState,
}

impl MenuScreen {
    /// Creates the menu for the signed-in player.
    #[instrument]
    pub fn new(username: String) -> Self {
        debug!("Initializing MenuScreen");
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            username,
            items: MenuItem::iter().collect(),
            list_state,
        }
    }

    fn select_previous(&mut self) {
        let i = match self.list_state.selected() {
            Some(i) if i > 0 => i - 1,
            _ => self.items.len() - 1,
        };
        self.list_state.select(Some(i));
    }

    fn select_next(&mut self) {
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.items.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }
}

impl Screen for MenuScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(7),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new(format!("🌍 Globetrotter | Welcome, {}", self.username))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| ListItem::new(item.to_string()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = self.list_state;
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let help = Paragraph::new("↑↓: Select | Enter: Confirm | p: Play | l: Leaderboard | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Up => {
                self.select_previous();
                ScreenTransition::Stay
            }
            KeyCode::Down => {
                self.select_next();
                ScreenTransition::Stay
            }
            KeyCode::Enter => {
                let item = self
                    .list_state
                    .selected()
                    .and_then(|i| self.items.get(i).copied());
                match item {
                    Some(item) => {
                        info!(item = %item, "Menu item chosen");
                        item.transition()
                    }
                    None => ScreenTransition::Stay,
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') => ScreenTransition::GoToGame,
            KeyCode::Char('l') | KeyCode::Char('L') => ScreenTransition::GoToLeaderboard,
            KeyCode::Char('s') | KeyCode::Char('S') => ScreenTransition::GoToProfile,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
