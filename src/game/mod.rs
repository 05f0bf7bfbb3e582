//! Answer validation and game progression.

mod error;
mod event;
mod question;
mod result;
mod round;
mod session;
mod task;

pub use error::GameError;
pub use event::{GameEvent, Generation};
pub use question::{Question, QuestionId, Verdict};
pub use result::{ScoreBadge, ShareLinks, ShareSummary};
pub use round::{RoundController, RoundPhase, RoundUpdate};
pub use session::{
    DEFAULT_EXPIRY_DELAY, DEFAULT_POINTS_PER_CORRECT, GameRules, SessionController, SessionState,
    SessionStatus, SessionUpdate,
};
pub use task::TaskGuard;
