//! Question batch source.

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::api::client::ApiClient;
use crate::api::error::ServiceError;
use crate::api::schema::{QuestionDto, questions_from_batch};
use crate::auth::AuthContext;
use crate::game::Question;

const QUESTIONS_PATH: &str = "/api/game/questions";

/// Supplies the active question batch at game start and on restart.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetches the current batch, already validated.
    async fn fetch_questions(&self) -> Result<Vec<Question>, ServiceError>;
}

/// [`QuestionSource`] backed by the trivia service.
#[derive(Debug, Clone)]
pub struct HttpQuestionSource {
    api: ApiClient,
    auth: AuthContext,
}

impl HttpQuestionSource {
    /// Creates a source that authenticates as `auth`.
    #[instrument(skip(api, auth), fields(username = %auth.username()))]
    pub fn new(api: ApiClient, auth: AuthContext) -> Self {
        Self { api, auth }
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    #[instrument(skip(self))]
    async fn fetch_questions(&self) -> Result<Vec<Question>, ServiceError> {
        let batch: Vec<QuestionDto> = self.api.get_json(QUESTIONS_PATH, Some(&self.auth)).await?;
        let questions = questions_from_batch(batch)?;
        info!(count = questions.len(), "Fetched question batch");
        Ok(questions)
    }
}
