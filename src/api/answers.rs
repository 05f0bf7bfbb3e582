//! Remote answer checking.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::api::client::ApiClient;
use crate::api::error::ServiceError;
use crate::api::schema::{AnswerRequest, VerdictDto};
use crate::auth::AuthContext;
use crate::game::{QuestionId, Verdict};

const ANSWER_PATH: &str = "/api/game/answer";

/// Judges a candidate answer for a question.
///
/// Every failure (transport, status, schema) comes back as a
/// [`ServiceError`]; it never turns into an incorrect verdict.
#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    /// Checks `answer` for `question`.
    async fn check_answer(&self, question: &QuestionId, answer: &str)
    -> Result<Verdict, ServiceError>;
}

/// [`AnswerEvaluator`] backed by the trivia service.
#[derive(Debug, Clone)]
pub struct HttpAnswerEvaluator {
    api: ApiClient,
    auth: AuthContext,
}

impl HttpAnswerEvaluator {
    /// Creates an evaluator that authenticates as `auth`.
    #[instrument(skip(api, auth), fields(username = %auth.username()))]
    pub fn new(api: ApiClient, auth: AuthContext) -> Self {
        Self { api, auth }
    }
}

#[async_trait]
impl AnswerEvaluator for HttpAnswerEvaluator {
    #[instrument(skip(self), fields(question_id = %question))]
    async fn check_answer(
        &self,
        question: &QuestionId,
        answer: &str,
    ) -> Result<Verdict, ServiceError> {
        let body = AnswerRequest {
            question_id: question.as_str().to_string(),
            answer: answer.to_string(),
        };
        let dto: VerdictDto = self.api.post_json(ANSWER_PATH, &body, Some(&self.auth)).await?;
        debug!(correct = dto.correct, "Received verdict");
        Ok(dto.into())
    }
}
