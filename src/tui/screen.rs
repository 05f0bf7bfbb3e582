//! Screen trait and transition type for the app state machine.

use std::time::Instant;

use crossterm::event::KeyEvent;
use ratatui::Frame;

/// The result of handling an input event or tick on a screen.
///
/// Screens return this from [`Screen::handle_key`] and [`Screen::tick`] to
/// drive the [`AppController`](crate::AppController) state machine.
#[derive(Clone, PartialEq, Eq)]
pub enum ScreenTransition {
    /// Stay on the current screen.
    Stay,
    /// Navigate to the sign-in form.
    GoToSignIn,
    /// Navigate to the sign-up form.
    GoToSignUp,
    /// Navigate to the main menu.
    GoToMenu,
    /// Start a new game. Requires credentials.
    GoToGame,
    /// Show the leaderboard.
    GoToLeaderboard,
    /// Show the player profile. Requires credentials.
    GoToProfile,
    /// Sign in with the given credentials.
    SubmitSignIn {
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },
    /// Create an account and sign in.
    SubmitSignUp {
        /// Display name.
        name: String,
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },
    /// Forget the stored credentials and return to sign-in.
    SignOut,
    /// Exit the application.
    Quit,
}

impl ScreenTransition {
    /// Destinations that need a signed-in player.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::GoToGame | Self::GoToProfile)
    }
}

impl std::fmt::Debug for ScreenTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stay => write!(f, "Stay"),
            Self::GoToSignIn => write!(f, "GoToSignIn"),
            Self::GoToSignUp => write!(f, "GoToSignUp"),
            Self::GoToMenu => write!(f, "GoToMenu"),
            Self::GoToGame => write!(f, "GoToGame"),
            Self::GoToLeaderboard => write!(f, "GoToLeaderboard"),
            Self::GoToProfile => write!(f, "GoToProfile"),
            Self::SubmitSignIn { email, .. } => {
                f.debug_struct("SubmitSignIn").field("email", email).finish_non_exhaustive()
            }
            Self::SubmitSignUp { name, email, .. } => f
                .debug_struct("SubmitSignUp")
                .field("name", name)
                .field("email", email)
                .finish_non_exhaustive(),
            Self::SignOut => write!(f, "SignOut"),
            Self::Quit => write!(f, "Quit"),
        }
    }
}

/// Trait implemented by each screen in the app state machine.
///
/// Each screen owns its own state, renders its UI, and handles key events.
/// The controller calls these methods in the event loop.
pub trait Screen {
    /// Renders the screen into the provided [`Frame`].
    fn render(&self, frame: &mut Frame);

    /// Handles a key event and returns the resulting [`ScreenTransition`].
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition;

    /// Advances time-driven state once per frame.
    fn tick(&mut self, _now: Instant) -> ScreenTransition {
        ScreenTransition::Stay
    }
}
