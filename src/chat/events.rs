//! Events emitted by the chat orchestrator.

use uuid::Uuid;

use crate::error::HaiError;
use crate::models::QuestionId;

/// Text shown when a question fails.
pub const ERROR_MESSAGE: &str = "Sorry, I encountered an error sending your message.";

/// Text shown when no answer arrived in time.
pub const TIMEOUT_MESSAGE: &str = "Response timed out.";

/// Something that happened to a question.
///
/// For each question `Sent` comes before any terminal event, and at most one
/// of `Answer`, `Error` or `Timeout` is ever emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// The backend accepted the question.
    Sent {
        local_id: Uuid,
        question_id: QuestionId,
    },
    /// The answer arrived.
    Answer {
        local_id: Uuid,
        question_id: QuestionId,
        text: String,
    },
    /// Submission failed, or polling hit an error that retrying cannot fix.
    Error {
        local_id: Uuid,
        /// `None` when the submission itself failed.
        question_id: Option<QuestionId>,
        error: HaiError,
    },
    /// No answer before the deadline.
    Timeout {
        local_id: Uuid,
        question_id: QuestionId,
    },
}

impl ChatEvent {
    pub fn local_id(&self) -> Uuid {
        match self {
            ChatEvent::Sent { local_id, .. }
            | ChatEvent::Answer { local_id, .. }
            | ChatEvent::Error { local_id, .. }
            | ChatEvent::Timeout { local_id, .. } => *local_id,
        }
    }

    pub fn question_id(&self) -> Option<&QuestionId> {
        match self {
            ChatEvent::Sent { question_id, .. }
            | ChatEvent::Answer { question_id, .. }
            | ChatEvent::Timeout { question_id, .. } => Some(question_id),
            ChatEvent::Error { question_id, .. } => question_id.as_ref(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChatEvent::Sent { .. })
    }

    /// Text to show in the conversation, if the event has any.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ChatEvent::Sent { .. } => None,
            ChatEvent::Answer { text, .. } => Some(text.clone()),
            ChatEvent::Error { .. } => Some(ERROR_MESSAGE.to_string()),
            ChatEvent::Timeout { .. } => Some(TIMEOUT_MESSAGE.to_string()),
        }
    }
}
