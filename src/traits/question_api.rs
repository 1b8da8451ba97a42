//! Question submission / answer retrieval seam.
//!
//! The chat orchestrator only needs these two calls, so it depends on this
//! trait rather than on the concrete backend client.

use async_trait::async_trait;

use crate::error::HaiResult;
use crate::models::{AnswerStatus, QuestionId};

/// Submit-then-poll question API.
#[async_trait]
pub trait QuestionApi: Send + Sync {
    /// Submit a question and return the backend-assigned id.
    async fn submit_question(&self, text: &str) -> HaiResult<QuestionId>;

    /// Poll the answer for a previously submitted question.
    async fn fetch_answer(&self, question_id: &QuestionId) -> HaiResult<AnswerStatus>;
}
