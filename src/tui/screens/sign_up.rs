//! Sign-up screen.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info, instrument};

use crate::auth::{FeedbackDebounce, SignUpForm, is_valid_email};
use crate::tui::screen::{Screen, ScreenTransition};
use crate::tui::widgets::{TextField, center_rect, checklist};

const FIELD_COUNT: usize = 3;

/// State for the account creation form.
#[derive(Debug)]
pub struct SignUpScreen {
    fields: [TextField; FIELD_COUNT],
    debounces: [FeedbackDebounce; FIELD_COUNT],
    feedback: [bool; FIELD_COUNT],
    focus: usize,
    error: Option<String>,
    submitting: bool,
}

impl SignUpScreen {
    const NAME: usize = 0;
    const EMAIL: usize = 1;
    const PASSWORD: usize = 2;

    /// Creates an empty form.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing SignUpScreen");
        Self {
            fields: [
                TextField::new("Name"),
                TextField::new("Email"),
                TextField::masked("Password"),
            ],
            debounces: [FeedbackDebounce::sign_up(); FIELD_COUNT],
            feedback: [false; FIELD_COUNT],
            focus: Self::NAME,
            error: None,
            submitting: false,
        }
    }

    /// Shows a failure from the sign-up request and re-enables the form.
    #[instrument(skip(self))]
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.submitting = false;
    }

    /// True while a sign-up request is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn form(&self) -> SignUpForm {
        SignUpForm {
            name: self.fields[Self::NAME].value().to_string(),
            email: self.fields[Self::EMAIL].value().to_string(),
            password: self.fields[Self::PASSWORD].value().to_string(),
        }
    }

    fn field_hint(&self, index: usize) -> Vec<Line<'static>> {
        if !self.feedback[index] {
            return Vec::new();
        }
        let form = self.form();
        match index {
            Self::NAME if form.name.trim().is_empty() => {
                vec![Line::styled("Name is required", Style::default().fg(Color::Red))]
            }
            Self::EMAIL if !is_valid_email(&form.email) => vec![Line::styled(
                "Please enter a valid email address",
                Style::default().fg(Color::Red),
            )],
            Self::PASSWORD => checklist(&form.password_checks().items()),
            _ => Vec::new(),
        }
    }
}

impl Default for SignUpScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for SignUpScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let area = center_rect(60, 26, frame.area());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(7),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Join the Adventure")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        for (i, field) in self.fields.iter().enumerate() {
            field.render(frame, chunks[i + 1], self.focus == i);
        }

        let mut status = self.field_hint(self.focus);
        if let Some(error) = &self.error {
            status.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
        }
        if self.submitting {
            status.push(Line::styled(
                "Creating account...",
                Style::default().fg(Color::Cyan),
            ));
        }
        frame.render_widget(Paragraph::new(status), chunks[4]);

        let help = Paragraph::new("Tab: Next field | Enter: Sign up | F2: Sign in | Esc: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[5]);
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        if self.submitting {
            return ScreenTransition::Stay;
        }
        match key.code {
            KeyCode::Esc => ScreenTransition::Quit,
            KeyCode::F(2) => ScreenTransition::GoToSignIn,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELD_COUNT;
                ScreenTransition::Stay
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
                ScreenTransition::Stay
            }
            KeyCode::Enter => {
                let form = self.form();
                if let Some(problem) = form.first_error() {
                    self.feedback = [true; FIELD_COUNT];
                    self.error = Some(problem.to_string());
                    return ScreenTransition::Stay;
                }
                info!(email = %form.email, "Submitting sign-up");
                self.submitting = true;
                self.error = None;
                ScreenTransition::SubmitSignUp {
                    name: form.name.trim().to_string(),
                    email: form.email,
                    password: form.password,
                }
            }
            KeyCode::Char(c) => {
                self.fields[self.focus].push(c);
                self.debounces[self.focus].touch(Instant::now());
                self.feedback[self.focus] = false;
                self.error = None;
                ScreenTransition::Stay
            }
            KeyCode::Backspace => {
                self.fields[self.focus].pop();
                self.debounces[self.focus].touch(Instant::now());
                self.feedback[self.focus] = false;
                ScreenTransition::Stay
            }
            _ => ScreenTransition::Stay,
        }
    }

    fn tick(&mut self, now: Instant) -> ScreenTransition {
        for (shown, debounce) in self.feedback.iter_mut().zip(&self.debounces) {
            if debounce.visible(now) {
                *shown = true;
            }
        }
        ScreenTransition::Stay
    }
}
