//! Shareable summary of a finished session.

use derive_getters::Getters;
use reqwest::Url;
use strum::Display;
use tracing::{instrument, warn};

use crate::game::SessionState;

/// Score tier shown next to the running score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScoreBadge {
    /// Below 30 points.
    #[strum(to_string = "👶")]
    Newcomer,
    /// 30 points or more.
    #[strum(to_string = "🧭")]
    Navigator,
    /// 60 points or more.
    #[strum(to_string = "🌍")]
    Explorer,
    /// 90 points or more.
    #[strum(to_string = "🏅")]
    Champion,
}

impl ScoreBadge {
    /// Picks the badge for `score`.
    pub fn for_score(score: u32) -> Self {
        match score {
            90..=u32::MAX => Self::Champion,
            60..=89 => Self::Explorer,
            30..=59 => Self::Navigator,
            _ => Self::Newcomer,
        }
    }
}

/// Read-only view of a finished session, ready to share.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ShareSummary {
    score: u32,
    total_questions: usize,
    total_possible: u32,
    is_perfect: bool,
    message: String,
    share_url: String,
}

impl ShareSummary {
    /// Builds a summary from raw numbers.
    ///
    /// A perfect game needs at least one question and every point available.
    #[instrument]
    pub fn new(score: u32, total_questions: usize, points_per_correct: u32, share_url: &str) -> Self {
        let total_possible = u32::try_from(total_questions)
            .unwrap_or(u32::MAX)
            .saturating_mul(points_per_correct);
        let is_perfect = total_questions > 0 && score == total_possible;
        let message = if is_perfect {
            format!(
                "I aced all {} questions! Can you beat my perfect score? 🌍 {}",
                total_questions, share_url
            )
        } else {
            format!(
                "I scored {} points in Globetrotter! Try to beat me: {}",
                score, share_url
            )
        };
        Self {
            score,
            total_questions,
            total_possible,
            is_perfect,
            message,
            share_url: share_url.to_string(),
        }
    }

    /// Builds a summary from a session state.
    pub fn from_state(state: &SessionState, points_per_correct: u32, share_url: &str) -> Self {
        Self::new(*state.score(), *state.total(), points_per_correct, share_url)
    }

    /// Score tier for the final score.
    pub fn badge(&self) -> ScoreBadge {
        ScoreBadge::for_score(self.score)
    }

    /// Score as a percentage of the maximum, 0 for an empty session.
    pub fn percent(&self) -> f64 {
        if self.total_possible == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total_possible) * 100.0
    }

    /// Composes social share links carrying the challenge message.
    #[instrument(skip(self))]
    pub fn links(&self) -> ShareLinks {
        let short_text = format!(
            "I scored {} points in Globetrotter! Can you beat me? 🌍",
            self.score
        );
        ShareLinks {
            whatsapp: encode_link("https://wa.me/", &[("text", self.message.as_str())]),
            twitter: encode_link(
                "https://twitter.com/intent/tweet",
                &[("text", short_text.as_str()), ("url", self.share_url.as_str())],
            ),
            facebook: encode_link(
                "https://www.facebook.com/sharer/sharer.php",
                &[("u", self.share_url.as_str())],
            ),
        }
    }
}

/// Social share links for a summary.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ShareLinks {
    whatsapp: String,
    twitter: String,
    facebook: String,
}

fn encode_link(base: &str, params: &[(&str, &str)]) -> String {
    match Url::parse_with_params(base, params) {
        Ok(url) => url.to_string(),
        Err(e) => {
            warn!(error = %e, base, "Failed to compose share link");
            base.to_string()
        }
    }
}
