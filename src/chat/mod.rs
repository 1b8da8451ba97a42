//! Chat orchestration: submit a question, poll for the answer, give up at
//! the deadline.

pub mod events;
pub mod orchestrator;
pub mod question;

pub use events::ChatEvent;
pub use orchestrator::{ChatOrchestrator, PollPolicy, DEFAULT_ANSWER_TIMEOUT, DEFAULT_POLL_INTERVAL};
pub use question::{PendingQuestion, QuestionState};
