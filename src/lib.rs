//! Globetrotter - destination trivia client
//!
//! Guess the destination from its clues, learn a fact, climb the leaderboard.
//!
//! # Architecture
//!
//! - **Game**: round and session state machines driven by background completions
//! - **Api**: HTTP clients for questions, answer checks, auth and stats
//! - **Auth**: identity, credential persistence and form validation
//! - **Tui**: terminal front end over the game core
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use globetrotter::{
//!     AuthContext, ClientConfig, HttpAnswerEvaluator, HttpQuestionSource, SessionController,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::load(None)?;
//! let api = config.api_client()?;
//! let auth = AuthContext::new("token".to_string(), "traveller".to_string());
//!
//! let mut session = SessionController::new(
//!     Arc::new(HttpQuestionSource::new(api.clone(), auth.clone())),
//!     Arc::new(HttpAnswerEvaluator::new(api, auth)),
//!     config.rules(),
//! );
//! session.start();
//! while let Some(update) = session.next_update().await {
//!     println!("{:?}", update);
//!     # break;
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod auth;
mod config;
mod game;
mod tui;

// Crate-level exports - HTTP boundary
pub use api::{
    AnswerEvaluator, AnswerRequest, ApiClient, AuthClient, AuthResponse, AuthUserDto,
    HttpAnswerEvaluator, HttpQuestionSource, LEADERBOARD_SIZE, LeaderboardEntry, Medal,
    ProfileStats, QuestionDto, QuestionSource, RankedEntry, ServiceError, ServiceErrorKind,
    StatsClient, VerdictDto, questions_from_batch, rank_entries,
};

// Crate-level exports - Identity
pub use auth::{
    AuthContext, CredentialStore, FeedbackDebounce, MIN_PASSWORD_LENGTH, PasswordChecks,
    SIGN_IN_FEEDBACK_DELAY, SIGN_UP_FEEDBACK_DELAY, SPECIAL_CHARACTERS, SignInForm, SignUpForm,
    StoreError, is_valid_email,
};

// Crate-level exports - Configuration
pub use config::{
    ClientConfig, ConfigError, ENV_API_URL, ENV_CREDENTIALS, ENV_ROUND_DELAY_MS, ENV_SHARE_URL,
};

// Crate-level exports - Game core
pub use game::{
    DEFAULT_EXPIRY_DELAY, DEFAULT_POINTS_PER_CORRECT, GameError, GameEvent, GameRules,
    Generation, Question, QuestionId, RoundController, RoundPhase, RoundUpdate, ScoreBadge,
    SessionController, SessionState, SessionStatus, SessionUpdate, ShareLinks, ShareSummary,
    TaskGuard, Verdict,
};

// Crate-level exports - Terminal UI
pub use tui::{AppController, Screen, ScreenTransition, run_tui};
