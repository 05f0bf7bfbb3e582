//! Questions and verdicts as the game core sees them.
//!
//! These are the validated domain types. Wire shapes live in the `api`
//! module and are converted at the boundary.

use derive_getters::Getters;
use derive_more::{Display, From};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Opaque question identifier issued by the trivia service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single clue puzzle: clues to display and the candidate answers.
///
/// Option order is preserved as received and is only significant for display.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct Question {
    id: QuestionId,
    clues: Vec<String>,
    options: Vec<String>,
}

impl Question {
    /// Returns the option at `index`, if any.
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    /// True if `answer` is one of the rendered options.
    pub fn has_option(&self, answer: &str) -> bool {
        self.options.iter().any(|o| o == answer)
    }
}

/// Result of checking an answer: correctness plus the explanatory fact.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct Verdict {
    correct: bool,
    fact: String,
}
