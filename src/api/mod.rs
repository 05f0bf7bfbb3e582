//! HTTP boundary clients for the trivia service.

mod answers;
mod auth;
mod client;
mod error;
mod leaderboard;
mod questions;
mod schema;

pub use answers::{AnswerEvaluator, HttpAnswerEvaluator};
pub use auth::AuthClient;
pub use client::ApiClient;
pub use error::{ServiceError, ServiceErrorKind};
pub use leaderboard::{LEADERBOARD_SIZE, Medal, RankedEntry, StatsClient, rank_entries};
pub use questions::{HttpQuestionSource, QuestionSource};
pub use schema::{
    AnswerRequest, AuthResponse, AuthUserDto, LeaderboardEntry, ProfileStats, QuestionDto,
    VerdictDto, questions_from_batch,
};
