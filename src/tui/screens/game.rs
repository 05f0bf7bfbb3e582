//! Game screen: clues, options, feedback and the final summary.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::{debug, info, instrument, warn};

use crate::game::{
    RoundPhase, ScoreBadge, SessionController, SessionStatus, SessionUpdate, ShareSummary,
};
use crate::tui::screen::{Screen, ScreenTransition};

/// What the player sees after a verdict arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Feedback {
    correct: bool,
    fact: String,
}

/// State for a running game.
#[derive(Debug)]
pub struct GameScreen {
    session: SessionController,
    share_url: String,
    selected: usize,
    feedback: Option<Feedback>,
    error: Option<String>,
    summary: Option<ShareSummary>,
}

impl GameScreen {
    /// Takes ownership of a session and starts loading questions.
    #[instrument(skip(session))]
    pub fn new(mut session: SessionController, share_url: String) -> Self {
        info!("Starting game screen");
        session.start();
        Self {
            session,
            share_url,
            selected: 0,
            feedback: None,
            error: None,
            summary: None,
        }
    }

    /// The session driven by this screen.
    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Applies one session update to the view state.
    #[instrument(skip(self))]
    fn apply(&mut self, update: SessionUpdate) {
        match update {
            SessionUpdate::Started { total } => {
                debug!(total, "Questions loaded");
                self.reset_round_view();
                self.summary = None;
            }
            SessionUpdate::LoadFailed(e) => {
                self.error = Some(format!("{} Press Enter to retry.", e.user_message()));
            }
            SessionUpdate::RoundResolved { correct, fact } => {
                self.error = None;
                self.feedback = Some(Feedback { correct, fact });
            }
            SessionUpdate::CheckFailed(e) => {
                self.error = Some(format!(
                    "Could not check your answer. {} Try again.",
                    e.user_message()
                ));
            }
            SessionUpdate::Advanced { index } => {
                debug!(index, "Next question");
                self.reset_round_view();
            }
            SessionUpdate::GameOver => {
                self.reset_round_view();
                // An empty batch has nothing to share.
                if *self.session.state().total() > 0 {
                    self.summary = self.session.summary(&self.share_url);
                } else {
                    info!("No questions in batch");
                }
            }
            SessionUpdate::Stale { generation } => {
                debug!(generation = %generation, "Ignoring stale update");
            }
            SessionUpdate::Rejected(e) => {
                warn!(error = %e, "Session rejected an update");
            }
        }
    }

    fn reset_round_view(&mut self) {
        self.selected = 0;
        self.feedback = None;
        self.error = None;
    }

    fn option_count(&self) -> usize {
        self.session
            .current_question()
            .map_or(0, |q| q.options().len())
    }

    fn submit(&mut self, index: usize) {
        self.selected = index;
        match self.session.submit_option(index) {
            Ok(()) => self.error = None,
            Err(e) => debug!(error = %e, "Guess not accepted"),
        }
    }

    fn restart(&mut self) {
        info!("Player restarted the game");
        self.session.restart();
        self.reset_round_view();
        self.summary = None;
    }

    fn render_summary(&self, frame: &mut Frame, summary: &ShareSummary) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        let (headline, color) = if *summary.is_perfect() {
            ("🏆 Flawless Victory!", Color::Yellow)
        } else {
            ("🎉 Game Complete!", Color::Cyan)
        };
        let title = Paragraph::new(headline)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let links = summary.links();
        let state = self.session.state();
        let body = vec![
            Line::from(format!(
                "Final score: {} / {} {}",
                summary.score(),
                summary.total_possible(),
                summary.badge()
            )),
            Line::from(format!(
                "Correct: {}   Wrong: {}   ({:.0}%)",
                state.correct(),
                state.incorrect(),
                summary.percent()
            )),
            Line::default(),
            Line::styled(summary.message().clone(), Style::default().fg(Color::Green)),
            Line::default(),
            Line::from(format!("WhatsApp: {}", links.whatsapp())),
            Line::from(format!("Twitter:  {}", links.twitter())),
            Line::from(format!("Facebook: {}", links.facebook())),
        ];
        let paragraph = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Challenge a Friend"));
        frame.render_widget(paragraph, chunks[1]);

        let help = Paragraph::new("r: Play again | Esc: Menu")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }

    fn render_message(&self, frame: &mut Frame, text: String, color: Color) {
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Globetrotter"));
        frame.render_widget(paragraph, frame.area());
    }
}

impl Screen for GameScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        if let Some(summary) = &self.summary {
            self.render_summary(frame, summary);
            return;
        }
        match self.session.status() {
            SessionStatus::NotStarted | SessionStatus::Loading => {
                self.render_message(frame, "Loading questions...".to_string(), Color::Cyan);
                return;
            }
            SessionStatus::LoadFailed(_) => {
                let text = self
                    .error
                    .clone()
                    .unwrap_or_else(|| "Failed to load questions.".to_string());
                self.render_message(frame, format!("{}\n\nEsc: Menu", text), Color::Red);
                return;
            }
            SessionStatus::GameOver => {
                self.render_message(
                    frame,
                    "No questions available.\n\nr: Try again | Esc: Menu".to_string(),
                    Color::Yellow,
                );
                return;
            }
            SessionStatus::Playing => {}
        }
        let (Some(round), Some(question)) = (self.session.round(), self.session.current_question())
        else {
            return;
        };

        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(u16::try_from(question.options().len()).unwrap_or(8) + 2),
                Constraint::Length(4),
                Constraint::Length(3),
            ])
            .split(area);

        let state = self.session.state();
        let header = Paragraph::new(format!(
            "Question {} of {} | {} left | Score: {} {}",
            state.question_number(),
            state.total(),
            state.remaining(),
            state.score(),
            ScoreBadge::for_score(*state.score())
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let ratio = (state.percent_complete() / 100.0).clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(ratio);
        frame.render_widget(gauge, chunks[1]);

        let clues: Vec<Line> = question
            .clues()
            .iter()
            .map(|clue| Line::from(format!("🔍 {}", clue)))
            .collect();
        let clues = Paragraph::new(clues)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Where am I?"));
        frame.render_widget(clues, chunks[2]);

        let items: Vec<ListItem> = question
            .options()
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = match (round.selected(), self.feedback.as_ref()) {
                    (Some(chosen), Some(feedback)) if chosen == option => {
                        if feedback.correct {
                            Style::default().fg(Color::Green)
                        } else {
                            Style::default().fg(Color::Red)
                        }
                    }
                    _ => Style::default(),
                };
                ListItem::new(format!("{}. {}", i + 1, option)).style(style)
            })
            .collect();
        let options = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Your guess"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        frame.render_stateful_widget(options, chunks[3], &mut list_state);

        let feedback = match (&self.feedback, &self.error, round.phase()) {
            (_, Some(error), _) => vec![Line::styled(error.clone(), Style::default().fg(Color::Red))],
            (Some(feedback), None, _) => {
                let (text, color) = if feedback.correct {
                    ("🎉 Correct! Well done!", Color::Green)
                } else {
                    ("😢 Oops! Try again!", Color::Red)
                };
                vec![
                    Line::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Line::from(format!("Fun fact: {}", feedback.fact)),
                ]
            }
            (None, None, RoundPhase::Checking) => {
                vec![Line::styled("Checking...", Style::default().fg(Color::Cyan))]
            }
            (None, None, _) => Vec::new(),
        };
        let feedback = Paragraph::new(feedback)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(feedback, chunks[4]);

        let help = Paragraph::new("1-9 / ↑↓ + Enter: Guess | r: Restart | Esc: Menu")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[5]);
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Esc => return ScreenTransition::GoToMenu,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.restart();
                return ScreenTransition::Stay;
            }
            _ => {}
        }

        if matches!(self.session.status(), SessionStatus::LoadFailed(_)) {
            if key.code == KeyCode::Enter {
                info!("Retrying question fetch");
                self.error = None;
                self.session.start();
            }
            return ScreenTransition::Stay;
        }

        let count = self.option_count();
        if count == 0 {
            return ScreenTransition::Stay;
        }
        match key.code {
            KeyCode::Up => self.selected = (self.selected + count - 1) % count,
            KeyCode::Down => self.selected = (self.selected + 1) % count,
            KeyCode::Enter => self.submit(self.selected),
            KeyCode::Char(c) => {
                if let Some(n) = c.to_digit(10)
                    && n >= 1
                    && (n as usize) <= count
                {
                    self.submit(n as usize - 1);
                }
            }
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn tick(&mut self, _now: Instant) -> ScreenTransition {
        for update in self.session.pump() {
            self.apply(update);
        }
        ScreenTransition::Stay
    }
}
