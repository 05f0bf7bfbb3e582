//! Leaderboard and profile reads.

use derive_getters::Getters;
use strum::Display;
use tracing::{info, instrument};

use crate::api::client::ApiClient;
use crate::api::error::ServiceError;
use crate::api::schema::{LeaderboardEntry, ProfileStats};
use crate::auth::AuthContext;

const LEADERBOARD_PATH: &str = "/api/leaderboard";
const PROFILE_PATH: &str = "/api/user/";

/// How many leaderboard rows are shown.
pub const LEADERBOARD_SIZE: usize = 10;

/// Medal for the top three places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Medal {
    /// First place.
    #[strum(to_string = "🥇")]
    Gold,
    /// Second place.
    #[strum(to_string = "🥈")]
    Silver,
    /// Third place.
    #[strum(to_string = "🥉")]
    Bronze,
}

/// A leaderboard row with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RankedEntry {
    rank: usize,
    username: String,
    score: u32,
    medal: Option<Medal>,
}

/// Assigns positions to entries in the order the service ranked them.
#[instrument(skip(entries), fields(count = entries.len()))]
pub fn rank_entries(entries: Vec<LeaderboardEntry>) -> Vec<RankedEntry> {
    entries
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .enumerate()
        .map(|(i, e)| RankedEntry {
            rank: i + 1,
            username: e.username,
            score: e.score,
            medal: match i {
                0 => Some(Medal::Gold),
                1 => Some(Medal::Silver),
                2 => Some(Medal::Bronze),
                _ => None,
            },
        })
        .collect()
}

/// Read-only access to the leaderboard and player profile.
#[derive(Debug, Clone)]
pub struct StatsClient {
    api: ApiClient,
}

impl StatsClient {
    /// Creates a stats client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches the current top players.
    #[instrument(skip(self))]
    pub async fn leaderboard(&self) -> Result<Vec<RankedEntry>, ServiceError> {
        let entries: Vec<LeaderboardEntry> = self.api.get_json(LEADERBOARD_PATH, None).await?;
        info!(count = entries.len(), "Fetched leaderboard");
        Ok(rank_entries(entries))
    }

    /// Fetches the signed-in player's statistics.
    #[instrument(skip(self, auth), fields(username = %auth.username()))]
    pub async fn profile(&self, auth: &AuthContext) -> Result<ProfileStats, ServiceError> {
        let stats: ProfileStats = self.api.get_json(PROFILE_PATH, Some(auth)).await?;
        info!(attempted = stats.questions_attempted, "Fetched profile");
        Ok(stats)
    }
}
