//! Wire schemas for the trivia service.
//!
//! Every response is decoded into one of these shapes and validated before it
//! reaches the game core. Anything that does not fit is a
//! [`ServiceErrorKind::MalformedResponse`](crate::ServiceErrorKind).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::api::error::ServiceError;
use crate::game::{Question, QuestionId, Verdict};

/// Fewest clues a playable question carries.
const MIN_CLUES: usize = 2;

/// A question as sent by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDto {
    /// Identifier; MongoDB-style `_id` is accepted too.
    #[serde(alias = "_id")]
    pub id: String,
    /// Clue strings.
    pub clues: Vec<String>,
    /// Candidate answers.
    pub options: Vec<String>,
}

impl TryFrom<QuestionDto> for Question {
    type Error = ServiceError;

    #[instrument(skip(dto), fields(question_id = %dto.id))]
    fn try_from(dto: QuestionDto) -> Result<Self, Self::Error> {
        if dto.id.trim().is_empty() {
            warn!("Question without identifier");
            return Err(ServiceError::malformed("question has an empty id"));
        }
        if dto.clues.len() < MIN_CLUES {
            warn!(clues = dto.clues.len(), "Question with too few clues");
            return Err(ServiceError::malformed(format!(
                "question {} needs at least {} clues, got {}",
                dto.id,
                MIN_CLUES,
                dto.clues.len()
            )));
        }
        let distinct: HashSet<&str> = dto.options.iter().map(String::as_str).collect();
        if dto.options.len() < 2 || distinct.len() != dto.options.len() {
            warn!(options = dto.options.len(), "Question with unusable options");
            return Err(ServiceError::malformed(format!(
                "question {} needs at least two distinct options",
                dto.id
            )));
        }
        Ok(Question::new(QuestionId::from(dto.id), dto.clues, dto.options))
    }
}

/// Converts a full batch, rejecting it if any question is malformed.
#[instrument(skip(batch), fields(count = batch.len()))]
pub fn questions_from_batch(batch: Vec<QuestionDto>) -> Result<Vec<Question>, ServiceError> {
    batch.into_iter().map(Question::try_from).collect()
}

/// Body of an answer-check request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    /// Question being answered.
    pub question_id: String,
    /// Option the player selected.
    pub answer: String,
}

/// Body of an answer-check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictDto {
    /// Whether the answer was right.
    #[serde(alias = "isCorrect", alias = "is_correct")]
    pub correct: bool,
    /// Explanatory fact about the destination.
    pub fact: String,
}

impl From<VerdictDto> for Verdict {
    fn from(dto: VerdictDto) -> Self {
        Verdict::new(dto.correct, dto.fact)
    }
}

/// Body of a sign-in request.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Body of a sign-up request.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// User block inside an auth response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUserDto {
    /// Display name.
    pub username: String,
}

/// Response to sign-in and sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token.
    pub token: String,
    /// Account details.
    pub user: AuthUserDto,
}

/// Error body the service sends with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Human readable reason.
    pub message: Option<String>,
}

/// One leaderboard row as ranked by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player name.
    pub username: String,
    /// Best score.
    pub score: u32,
}

/// Player statistics returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    /// Display name, when the service includes it.
    #[serde(default)]
    pub username: Option<String>,
    /// Total answers submitted.
    pub questions_attempted: u32,
    /// Answers judged correct.
    pub correct_answers: u32,
    /// Answers judged wrong.
    pub wrong_answers: u32,
}

impl ProfileStats {
    /// Percentage of attempted questions answered correctly, 0 when none attempted.
    pub fn accuracy(&self) -> f64 {
        if self.questions_attempted == 0 {
            return 0.0;
        }
        f64::from(self.correct_answers) / f64::from(self.questions_attempted) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceErrorKind;

    fn dto(id: &str, clues: &[&str], options: &[&str]) -> QuestionDto {
        QuestionDto {
            id: id.to_string(),
            clues: clues.iter().map(|s| s.to_string()).collect(),
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_question_converts() {
        let q = Question::try_from(dto("q1", &["Eiffel", "Baguette"], &["Paris", "Rome"]))
            .expect("valid question");
        assert_eq!(q.id().as_str(), "q1");
        assert_eq!(q.options().len(), 2);
    }

    #[test]
    fn test_duplicate_options_rejected() {
        let err = Question::try_from(dto("q1", &["clue", "other"], &["Paris", "Paris"])).unwrap_err();
        assert_eq!(err.kind(), ServiceErrorKind::MalformedResponse);
    }

    #[test]
    fn test_single_clue_rejected() {
        let err = Question::try_from(dto("q1", &["only one"], &["Paris", "Rome"])).unwrap_err();
        assert_eq!(err.kind(), ServiceErrorKind::MalformedResponse);
        assert!(questions_from_batch(vec![dto("q1", &["only one"], &["Paris", "Rome"])]).is_err());
    }

    #[test]
    fn test_one_bad_question_rejects_batch() {
        let batch = vec![
            dto("q1", &["a", "b"], &["Paris", "Rome"]),
            dto("", &["a"], &["Oslo", "Lima"]),
        ];
        assert!(questions_from_batch(batch).is_err());
    }

    #[test]
    fn test_verdict_accepts_is_correct_alias() {
        let v: VerdictDto =
            serde_json::from_str(r#"{"isCorrect": true, "fact": "Tall tower"}"#).unwrap();
        assert!(v.correct);
    }

    #[test]
    fn test_verdict_without_fact_rejected() {
        assert!(serde_json::from_str::<VerdictDto>(r#"{"correct": true}"#).is_err());
        assert!(serde_json::from_str::<VerdictDto>(r#"{"fact": "Tall tower"}"#).is_err());
    }

    #[test]
    fn test_accuracy_handles_zero_attempts() {
        let stats = ProfileStats {
            username: None,
            questions_attempted: 0,
            correct_answers: 0,
            wrong_answers: 0,
        };
        assert_eq!(stats.accuracy(), 0.0);
        let stats = ProfileStats {
            questions_attempted: 4,
            correct_answers: 3,
            ..stats
        };
        assert!((stats.accuracy() - 75.0).abs() < f64::EPSILON);
    }
}
