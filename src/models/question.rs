//! Wire types for asking questions and polling for answers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-assigned identifier of a submitted question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Result of a single answer poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerStatus {
    /// The backend is still working on the answer.
    Pending,
    /// The answer is ready.
    Answered(String),
}

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskRequest {
    pub q_text: String,
}

/// Response of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskResponse {
    pub question_id: QuestionId,
}

/// Wire value of the `status` field in `GET /get_answer/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerState {
    Pending,
    Answered,
}

/// Response of `GET /get_answer/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerResponse {
    pub status: AnswerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl From<AnswerResponse> for AnswerStatus {
    fn from(response: AnswerResponse) -> Self {
        match response.status {
            AnswerState::Pending => AnswerStatus::Pending,
            AnswerState::Answered => AnswerStatus::Answered(response.answer.unwrap_or_default()),
        }
    }
}
