//! Sign-in screen: email and password with delayed validation hints.

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

use crate::auth::{FeedbackDebounce, PasswordChecks, SignInForm, is_valid_email};
use crate::tui::screen::{Screen, ScreenTransition};
use crate::tui::widgets::{TextField, center_rect, checklist};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
}

/// State for the sign-in form.
#[derive(Debug)]
pub struct SignInScreen {
    email: TextField,
    password: TextField,
    focus: Field,
    email_debounce: FeedbackDebounce,
    password_debounce: FeedbackDebounce,
    show_email_feedback: bool,
    show_password_feedback: bool,
    notice: Option<String>,
    error: Option<String>,
    submitting: bool,
}

impl SignInScreen {
    /// Creates an empty form, optionally with a notice (for example after a
    /// redirect from a protected screen).
    #[instrument]
    pub fn new(notice: Option<String>) -> Self {
        debug!("Initializing SignInScreen");
        Self {
            email: TextField::new("Email"),
            password: TextField::masked("Password"),
            focus: Field::Email,
            email_debounce: FeedbackDebounce::sign_in(),
            password_debounce: FeedbackDebounce::sign_in(),
            show_email_feedback: false,
            show_password_feedback: false,
            notice,
            error: None,
            submitting: false,
        }
    }

    /// Shows a failure from the sign-in request and re-enables the form.
    #[instrument(skip(self))]
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.submitting = false;
    }

    /// True while a sign-in request is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn form(&self) -> SignInForm {
        SignInForm {
            email: self.email.value().to_string(),
            password: self.password.value().to_string(),
        }
    }

    fn edit(&mut self, key: KeyCode) {
        let now = Instant::now();
        let (field, debounce, shown) = match self.focus {
            Field::Email => (
                &mut self.email,
                &mut self.email_debounce,
                &mut self.show_email_feedback,
            ),
            Field::Password => (
                &mut self.password,
                &mut self.password_debounce,
                &mut self.show_password_feedback,
            ),
        };
        match key {
            KeyCode::Char(c) => field.push(c),
            KeyCode::Backspace => field.pop(),
            _ => return,
        }
        debounce.touch(now);
        *shown = false;
        self.error = None;
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
    }
}

impl Screen for SignInScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let area = center_rect(60, 22, frame.area());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Welcome Back, Traveller")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        self.email.render(frame, chunks[1], self.focus == Field::Email);
        let email_hint = if self.show_email_feedback && !is_valid_email(self.email.value()) {
            Line::styled("Please enter a valid email address", Style::default().fg(Color::Red))
        } else {
            Line::default()
        };
        frame.render_widget(Paragraph::new(email_hint), chunks[2]);

        self.password
            .render(frame, chunks[3], self.focus == Field::Password);

        let mut status: Vec<Line> = Vec::new();
        if self.show_password_feedback {
            status.extend(checklist(
                &PasswordChecks::evaluate(self.password.value()).items(),
            ));
        }
        if let Some(notice) = &self.notice {
            status.push(Line::styled(notice.clone(), Style::default().fg(Color::Yellow)));
        }
        if let Some(error) = &self.error {
            status.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
        }
        if self.submitting {
            status.push(Line::styled("Signing in...", Style::default().fg(Color::Cyan)));
        }
        frame.render_widget(Paragraph::new(status), chunks[4]);

        let help = Paragraph::new("Tab: Switch field | Enter: Sign in | F2: Sign up | Esc: Quit")
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
            KeyCode::F(2) => ScreenTransition::GoToSignUp,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.toggle_focus();
                ScreenTransition::Stay
            }
            KeyCode::Enter => {
                let form = self.form();
                if !form.can_submit() {
                    self.show_email_feedback = true;
                    self.show_password_feedback = true;
                    self.error = Some("Enter a valid email and password".to_string());
                    return ScreenTransition::Stay;
                }
                info!(email = %form.email, "Submitting sign-in");
                self.submitting = true;
                self.error = None;
                ScreenTransition::SubmitSignIn {
                    email: form.email,
                    password: form.password,
                }
            }
            code @ (KeyCode::Char(_) | KeyCode::Backspace) => {
                self.edit(code);
                ScreenTransition::Stay
            }
            _ => ScreenTransition::Stay,
        }
    }

    fn tick(&mut self, now: Instant) -> ScreenTransition {
        if self.email_debounce.visible(now) {
            self.show_email_feedback = true;
        }
        if self.password_debounce.visible(now) {
            self.show_password_feedback = true;
        }
        ScreenTransition::Stay
    }
}
