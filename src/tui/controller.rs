//! App controller: the state machine driving the multi-screen TUI.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use tokio::time::{Duration, sleep};
use tracing::{debug, error, info, instrument, warn};

use crate::api::{
    ApiClient, AuthClient, HttpAnswerEvaluator, HttpQuestionSource, ServiceError,
    ServiceErrorKind, StatsClient,
};
use crate::auth::{AuthContext, CredentialStore};
use crate::config::ClientConfig;
use crate::game::SessionController;
use crate::tui::screen::{Screen, ScreenTransition};
use crate::tui::screens::{
    GameScreen, LeaderboardScreen, MenuScreen, ProfileScreen, SignInScreen, SignUpScreen,
};

const SIGN_IN_REQUIRED: &str = "Please sign in to continue.";

/// Active screen in the app state machine.
#[derive(Debug)]
enum ActiveScreen {
    SignIn(SignInScreen),
    SignUp(SignUpScreen),
    Menu(MenuScreen),
    Game(Box<GameScreen>),
    Leaderboard(LeaderboardScreen),
    Profile(ProfileScreen),
}

impl ActiveScreen {
    fn screen(&self) -> &dyn Screen {
        match self {
            Self::SignIn(s) => s,
            Self::SignUp(s) => s,
            Self::Menu(s) => s,
            Self::Game(s) => s.as_ref(),
            Self::Leaderboard(s) => s,
            Self::Profile(s) => s,
        }
    }

    fn screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            Self::SignIn(s) => s,
            Self::SignUp(s) => s,
            Self::Menu(s) => s,
            Self::Game(s) => s.as_mut(),
            Self::Leaderboard(s) => s,
            Self::Profile(s) => s,
        }
    }
}

/// Controller that drives the screen state machine.
///
/// Holds the service client and the signed-in identity. Network work for
/// transitions (sign-in, leaderboard and profile fetches) runs between
/// frames; game rounds run as background tasks inside the session.
#[derive(Debug)]
pub struct AppController {
    config: ClientConfig,
    api: ApiClient,
    store: CredentialStore,
    auth: Option<AuthContext>,
}

impl AppController {
    /// Creates a controller, restoring stored credentials when present.
    #[instrument(skip(config))]
    pub fn new(config: ClientConfig) -> Result<Self, ServiceError> {
        let api = config.api_client()?;
        let store = config.credential_store();
        let auth = match store.load() {
            Ok(auth) => auth,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable credentials");
                None
            }
        };
        info!(signed_in = auth.is_some(), "Creating AppController");
        Ok(Self {
            config,
            api,
            store,
            auth,
        })
    }

    /// The signed-in identity, if any.
    pub fn auth(&self) -> Option<&AuthContext> {
        self.auth.as_ref()
    }

    /// Runs the event loop until the player quits.
    #[instrument(skip(self, terminal))]
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting app event loop");
        let mut screen = self.initial_screen();

        loop {
            terminal.draw(|f| screen.screen().render(f))?;

            let mut transition = screen.screen_mut().tick(Instant::now());

            // Poll for input with short timeout to keep the loop responsive.
            if transition == ScreenTransition::Stay
                && event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
                && key.kind != KeyEventKind::Release
            {
                transition = screen.screen_mut().handle_key(key);
            }

            if matches!(
                transition,
                ScreenTransition::SubmitSignIn { .. } | ScreenTransition::SubmitSignUp { .. }
            ) {
                // Show the in-flight state before blocking on the request.
                terminal.draw(|f| screen.screen().render(f))?;
            }

            screen = match self.apply_transition(transition, screen).await {
                Some(next) => next,
                None => {
                    info!("App quitting");
                    return Ok(());
                }
            };

            sleep(Duration::from_millis(10)).await;
        }
    }

    fn initial_screen(&self) -> ActiveScreen {
        match &self.auth {
            Some(auth) => ActiveScreen::Menu(MenuScreen::new(auth.username().clone())),
            None => ActiveScreen::SignIn(SignInScreen::new(None)),
        }
    }

    /// Applies a screen transition, returning the next screen or `None` to quit.
    #[instrument(skip(self, current))]
    async fn apply_transition(
        &mut self,
        transition: ScreenTransition,
        current: ActiveScreen,
    ) -> Option<ActiveScreen> {
        if transition != ScreenTransition::Stay {
            debug!(transition = ?transition, "Applying screen transition");
        }

        match (transition, self.auth.clone()) {
            (ScreenTransition::Stay, _) => Some(current),

            (ScreenTransition::GoToSignIn, _) => Some(ActiveScreen::SignIn(SignInScreen::new(None))),

            (ScreenTransition::GoToSignUp, _) => Some(ActiveScreen::SignUp(SignUpScreen::new())),

            (ScreenTransition::GoToMenu, _) => Some(self.menu_or_sign_in()),

            (ScreenTransition::GoToGame, Some(auth)) => {
                info!(username = %auth.username(), "Navigating to Game");
                let session = SessionController::new(
                    Arc::new(HttpQuestionSource::new(self.api.clone(), auth.clone())),
                    Arc::new(HttpAnswerEvaluator::new(self.api.clone(), auth)),
                    self.config.rules(),
                );
                Some(ActiveScreen::Game(Box::new(GameScreen::new(
                    session,
                    self.config.share_url().clone(),
                ))))
            }

            (ScreenTransition::GoToLeaderboard, auth) => {
                info!("Navigating to Leaderboard");
                let result = StatsClient::new(self.api.clone()).leaderboard().await;
                Some(ActiveScreen::Leaderboard(LeaderboardScreen::new(
                    result,
                    auth.is_some(),
                )))
            }

            (ScreenTransition::GoToProfile, Some(auth)) => {
                info!("Navigating to Profile");
                let result = StatsClient::new(self.api.clone()).profile(&auth).await;
                if let Err(e) = &result
                    && e.kind() == ServiceErrorKind::Unauthorized
                {
                    self.sign_out();
                    return Some(ActiveScreen::SignIn(SignInScreen::new(Some(e.user_message()))));
                }
                Some(ActiveScreen::Profile(ProfileScreen::new(
                    auth.username().clone(),
                    result,
                )))
            }

            (ScreenTransition::SubmitSignIn { email, password }, _) => {
                let result = AuthClient::new(self.api.clone())
                    .sign_in(&email, &password)
                    .await;
                match result {
                    Ok(auth) => {
                        self.establish(auth);
                        Some(self.menu_or_sign_in())
                    }
                    Err(e) => Some(match current {
                        ActiveScreen::SignIn(mut s) => {
                            s.set_error(auth_failure_message(&e));
                            ActiveScreen::SignIn(s)
                        }
                        other => other,
                    }),
                }
            }

            (
                ScreenTransition::SubmitSignUp {
                    name,
                    email,
                    password,
                },
                _,
            ) => {
                let result = AuthClient::new(self.api.clone())
                    .sign_up(&name, &email, &password)
                    .await;
                match result {
                    Ok(auth) => {
                        self.establish(auth);
                        Some(self.menu_or_sign_in())
                    }
                    Err(e) => Some(match current {
                        ActiveScreen::SignUp(mut s) => {
                            s.set_error(auth_failure_message(&e));
                            ActiveScreen::SignUp(s)
                        }
                        other => other,
                    }),
                }
            }

            (ScreenTransition::SignOut, _) => {
                self.sign_out();
                Some(ActiveScreen::SignIn(SignInScreen::new(Some(
                    "You have been signed out.".to_string(),
                ))))
            }

            (ScreenTransition::Quit, _) => None,

            (protected @ (ScreenTransition::GoToGame | ScreenTransition::GoToProfile), None) => {
                warn!(transition = ?protected, "Protected screen without credentials; redirecting to sign-in");
                Some(ActiveScreen::SignIn(SignInScreen::new(Some(
                    SIGN_IN_REQUIRED.to_string(),
                ))))
            }
        }
    }

    fn menu_or_sign_in(&self) -> ActiveScreen {
        match &self.auth {
            Some(auth) => {
                info!(username = %auth.username(), "Navigating to Menu");
                ActiveScreen::Menu(MenuScreen::new(auth.username().clone()))
            }
            None => {
                warn!("No credentials for Menu; redirecting to sign-in");
                ActiveScreen::SignIn(SignInScreen::new(None))
            }
        }
    }

    /// Stores a fresh identity. Storage failure keeps the in-memory session.
    #[instrument(skip(self, auth), fields(username = %auth.username()))]
    fn establish(&mut self, auth: AuthContext) {
        if let Err(e) = self.store.save(&auth) {
            error!(error = %e, "Failed to persist credentials");
        }
        self.auth = Some(auth);
    }

    #[instrument(skip(self))]
    fn sign_out(&mut self) {
        if let Err(e) = self.store.clear() {
            error!(error = %e, "Failed to clear credentials");
        }
        self.auth = None;
        info!("Signed out");
    }
}

/// Message for a failed sign-in or sign-up, preferring the service's reason.
fn auth_failure_message(e: &ServiceError) -> String {
    match e.kind() {
        ServiceErrorKind::Unauthorized | ServiceErrorKind::Status(_) => e.message.clone(),
        _ => e.user_message(),
    }
}
