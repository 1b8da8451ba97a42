//! Backend API client.
//!
//! Thin wrapper over an [`HttpClient`] that knows the Hai endpoints, attaches
//! the session token and maps every failure onto [`HaiError`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{AuthError, HaiError, HaiResult, TransportError};
use crate::models::{
    AnswerResponse, AnswerStatus, AskRequest, AskResponse, LoginRequest, LoginResponse, QuestionId,
};
use crate::session::SessionHandle;
use crate::traits::{Headers, HttpClient, QuestionApi, Response};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Client for the Hai backend.
///
/// The token is read from the session on every call, so a sign-in or
/// sign-out takes effect for the very next request.
pub struct BackendClient<C: HttpClient> {
    /// Base URL for the backend, without a trailing slash
    pub base_url: String,
    http: C,
    session: SessionHandle,
}

impl<C: HttpClient> BackendClient<C> {
    pub fn new(base_url: impl Into<String>, http: C, session: SessionHandle) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            session,
        }
    }

    /// Exchange an identity-provider credential for a session token.
    ///
    /// POST /auth/google
    ///
    /// Sent without a bearer token. Any non-2xx answer is a rejected login.
    pub async fn login(&self, credential: &str) -> HaiResult<String> {
        let url = format!("{}/auth/google", self.base_url);
        let body = serde_json::to_string(&LoginRequest {
            id_token: credential.to_string(),
        })?;

        let response = self.http.post(&url, &body, &Self::json_headers()).await?;
        if !response.is_success() {
            return Err(AuthError::LoginRejected {
                status: response.status,
                message: response.text_lossy(),
            }
            .into());
        }

        let login: LoginResponse = Self::parse(&response)?;
        if login.access_token.trim().is_empty() {
            return Err(AuthError::InvalidToken {
                message: "login response carried an empty access_token".to_string(),
            }
            .into());
        }
        Ok(login.access_token)
    }

    /// Submit a question.
    ///
    /// POST /ask
    pub async fn submit_question(&self, text: &str) -> HaiResult<QuestionId> {
        let url = format!("{}/ask", self.base_url);
        let headers = self.auth_headers()?;
        let body = serde_json::to_string(&AskRequest {
            q_text: text.to_string(),
        })?;

        let response = self.http.post(&url, &body, &headers).await?;
        let ask: AskResponse = Self::parse(&Self::check_status(response)?)?;
        debug!(question_id = %ask.question_id, "Question submitted");
        Ok(ask.question_id)
    }

    /// Poll the answer for a submitted question.
    ///
    /// GET /get_answer/{question_id}
    pub async fn fetch_answer(&self, question_id: &QuestionId) -> HaiResult<AnswerStatus> {
        let url = format!(
            "{}/get_answer/{}",
            self.base_url,
            urlencoding::encode(question_id.as_str())
        );
        let headers = self.auth_headers()?;

        let response = self.http.get(&url, &headers).await?;
        let answer: AnswerResponse = Self::parse(&Self::check_status(response)?)?;
        Ok(answer.into())
    }

    fn json_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    /// Headers for an authenticated call, or `NotAuthenticated` without a token.
    fn auth_headers(&self) -> HaiResult<Headers> {
        let token = self.session.token().ok_or_else(HaiError::unauthenticated)?;
        let mut headers = Self::json_headers();
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        Ok(headers)
    }

    fn check_status(response: Response) -> HaiResult<Response> {
        match response.status {
            200..=299 => Ok(response),
            401 => Err(HaiError::unauthenticated()),
            status => Err(TransportError::HttpStatus {
                status,
                message: response.text_lossy(),
            }
            .into()),
        }
    }

    fn parse<T: DeserializeOwned>(response: &Response) -> HaiResult<T> {
        response.json().map_err(|e| {
            HaiError::from(TransportError::InvalidResponse {
                message: format!("{} (body: {})", e, truncate(&response.text_lossy(), 200)),
            })
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
impl<C: HttpClient> QuestionApi for BackendClient<C> {
    async fn submit_question(&self, text: &str) -> HaiResult<QuestionId> {
        BackendClient::submit_question(self, text).await
    }

    async fn fetch_answer(&self, question_id: &QuestionId) -> HaiResult<AnswerStatus> {
        BackendClient::fetch_answer(self, question_id).await
    }
}
