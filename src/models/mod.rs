//! Wire and identifier types shared by the backend client and the chat core.

mod login;
mod question;

pub use login::{LoginRequest, LoginResponse};
pub use question::{AnswerResponse, AnswerState, AnswerStatus, AskRequest, AskResponse, QuestionId};
