//! Session and chat command handlers.
//!
//! Handlers write user-facing text to `out` and return an error only when
//! the command failed; `main` turns that into a non-zero exit.

use std::io::Write;
use std::sync::Arc;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::info;

use super::args::CliCommand;
use crate::adapters::ReqwestHttpClient;
use crate::auth::sign_in_with_provider;
use crate::backend::BackendClient;
use crate::chat::{ChatEvent, ChatOrchestrator};
use crate::config::ClientConfig;
use crate::error::HaiError;
use crate::session::SessionManager;
use crate::traits::{HttpClient, StaticIdentity, TokenStore};

pub const GREETING: &str = "Hello! How can I help you today?";

const NOT_SIGNED_IN: &str = "Not signed in. Run `hai login <ID_TOKEN>` first.";
const SESSION_EXPIRED: &str = "Your session has expired. Run `hai login <ID_TOKEN>` to sign in again.";

/// Everything a session command needs.
pub struct Context<C: HttpClient> {
    pub config: ClientConfig,
    pub session: SessionManager,
    pub backend: Arc<BackendClient<C>>,
}

impl<C: HttpClient + 'static> Context<C> {
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>, http: C) -> Self {
        let session = SessionManager::new(store);
        let backend = Arc::new(BackendClient::new(
            config.api_url.clone(),
            http,
            session.handle(),
        ));
        Self {
            config,
            session,
            backend,
        }
    }

    /// A fresh orchestrator over this context's backend.
    pub fn orchestrator(&self) -> (ChatOrchestrator, mpsc::UnboundedReceiver<ChatEvent>) {
        ChatOrchestrator::new(self.backend.clone(), self.config.poll_policy())
    }

    /// Reset the session after the backend rejected it.
    async fn expire_session<W: Write>(&self, out: &mut W) -> Result<()> {
        if let Err(e) = self.session.invalidate("backend rejected the session").await {
            tracing::warn!("Failed to clear expired session: {}", e);
        }
        writeln!(out, "{}", SESSION_EXPIRED)?;
        Ok(())
    }
}

impl Context<ReqwestHttpClient> {
    /// Production context: file token store and reqwest transport.
    pub fn from_config(config: ClientConfig) -> Self {
        let store = config.token_store();
        let http = config.http_client();
        Self::new(config, Arc::new(store), http)
    }
}

/// Run a command that needs the session.
///
/// The session should already have been restored.
pub async fn run_session_command<C, R, W>(
    command: CliCommand,
    ctx: &Context<C>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    C: HttpClient + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match command {
        CliCommand::Login { id_token } => login(ctx, id_token, out).await,
        CliCommand::Logout => logout(ctx, out).await,
        CliCommand::Status => status(ctx, out).await,
        CliCommand::Ask { text } => ask(ctx, &text, out).await,
        CliCommand::Chat => chat(ctx, input, out).await,
        other => Err(eyre!("{:?} does not use the session", other)),
    }
}

pub async fn login<C, W>(ctx: &Context<C>, id_token: Option<String>, out: &mut W) -> Result<()>
where
    C: HttpClient + 'static,
    W: Write,
{
    let provider = match id_token {
        Some(token) => StaticIdentity::new(token),
        None => StaticIdentity::from_env(),
    };

    match sign_in_with_provider(&provider, &ctx.backend, &ctx.session).await {
        Ok(()) => {
            writeln!(out, "Signed in.")?;
            Ok(())
        }
        Err(HaiError::Storage(e)) => {
            writeln!(
                out,
                "Signed in, but the session could not be saved: {}",
                e.user_message()
            )?;
            Ok(())
        }
        Err(e) => Err(eyre!(e.user_message())),
    }
}

pub async fn logout<C, W>(ctx: &Context<C>, out: &mut W) -> Result<()>
where
    C: HttpClient + 'static,
    W: Write,
{
    ctx.session
        .sign_out()
        .await
        .map_err(|e| eyre!(e.user_message()))?;
    writeln!(out, "Signed out.")?;
    Ok(())
}

pub async fn status<C, W>(ctx: &Context<C>, out: &mut W) -> Result<()>
where
    C: HttpClient + 'static,
    W: Write,
{
    let session = ctx.session.handle().wait_until_settled().await;
    if session.is_authenticated() {
        writeln!(out, "Signed in ({}).", ctx.config.api_url)?;
    } else {
        writeln!(out, "Not signed in.")?;
    }
    Ok(())
}

/// Ask one question and wait for its terminal event.
pub async fn ask<C, W>(ctx: &Context<C>, text: &str, out: &mut W) -> Result<()>
where
    C: HttpClient + 'static,
    W: Write,
{
    if !ctx.session.current().is_authenticated() {
        return Err(eyre!(NOT_SIGNED_IN));
    }

    let (chat, mut events) = ctx.orchestrator();
    let local_id = chat.send_message(text);

    while let Some(event) = events.recv().await {
        if event.local_id() != local_id || !event.is_terminal() {
            continue;
        }
        if let Some(message) = event.user_message() {
            writeln!(out, "{}", message)?;
        }
        return match event {
            ChatEvent::Answer { .. } => Ok(()),
            ChatEvent::Error { error, .. } if error.requires_reauth() => {
                chat.shutdown();
                ctx.expire_session(out).await?;
                Err(eyre!(error.user_message()))
            }
            ChatEvent::Error { error, .. } => Err(eyre!(error.user_message())),
            _ => Err(eyre!(
                "No answer within {} seconds",
                ctx.config.answer_timeout.as_secs()
            )),
        };
    }

    Err(eyre!("Chat stopped before the question finished"))
}

/// Interactive chat: every non-empty input line is a new question.
///
/// `/logout` signs out and `/quit` leaves. On end of input the loop waits
/// for questions still in flight.
pub async fn chat<C, R, W>(ctx: &Context<C>, input: R, out: &mut W) -> Result<()>
where
    C: HttpClient + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if !ctx.session.current().is_authenticated() {
        return Err(eyre!(NOT_SIGNED_IN));
    }

    let (chat, mut events) = ctx.orchestrator();
    let mut lines = input.lines();
    let mut input_open = true;
    writeln!(out, "{}", GREETING)?;

    loop {
        if !input_open && chat.pending().is_empty() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                match line.trim() {
                    "" => {}
                    "/quit" => break,
                    "/logout" => {
                        // Stop polling before the token goes away.
                        chat.shutdown();
                        return logout(ctx, out).await;
                    }
                    text => {
                        chat.send_message(text);
                    }
                }
            }
            Some(event) = events.recv() => {
                if let Some(message) = event.user_message() {
                    writeln!(out, "{}", message)?;
                }
                if let ChatEvent::Error { error, .. } = &event {
                    if error.requires_reauth() {
                        chat.shutdown();
                        ctx.expire_session(out).await?;
                        return Err(eyre!(error.user_message()));
                    }
                }
            }
            else => break,
        }
    }

    chat.shutdown();
    info!("Chat ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryTokenStore, MockHttpClient, MockResponse};
    use crate::session::SessionStatus;
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn context(store: &InMemoryTokenStore) -> (Context<MockHttpClient>, MockHttpClient) {
        let http = MockHttpClient::new();
        let config = ClientConfig::new().with_api_url(BASE);
        (
            Context::new(config, Arc::new(store.clone()), http.clone()),
            http,
        )
    }

    async fn signed_in_context() -> (Context<MockHttpClient>, MockHttpClient, InMemoryTokenStore) {
        let store = InMemoryTokenStore::with_token("tok");
        let (ctx, http) = context(&store);
        ctx.session.restore().await;
        (ctx, http, store)
    }

    fn output(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_login_command() {
        let store = InMemoryTokenStore::new();
        let (ctx, http) = context(&store);
        http.set_response(
            &format!("{}/auth/google", BASE),
            MockResponse::json(json!({ "access_token": "session-tok" })),
        );
        let mut out = Vec::new();

        login(&ctx, Some("google-id".to_string()), &mut out)
            .await
            .unwrap();

        assert_eq!(output(out), "Signed in.\n");
        assert_eq!(store.token(), Some("session-tok".to_string()));
    }

    #[tokio::test]
    async fn test_login_with_unsaved_session_still_succeeds() {
        let store = InMemoryTokenStore::new();
        store.set_set_should_fail(true);
        let (ctx, http) = context(&store);
        http.set_default_response(MockResponse::json(json!({ "access_token": "session-tok" })));
        let mut out = Vec::new();

        login(&ctx, Some("google-id".to_string()), &mut out)
            .await
            .unwrap();

        assert!(output(out).starts_with("Signed in, but the session could not be saved"));
        assert!(ctx.session.current().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rejected_is_an_error() {
        let store = InMemoryTokenStore::new();
        let (ctx, http) = context(&store);
        http.set_default_response(MockResponse::status(401, "bad"));

        let err = login(&ctx, Some("google-id".to_string()), &mut Vec::new())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Backend authentication failed.");
    }

    #[tokio::test]
    async fn test_status_and_logout() {
        let (ctx, _http, store) = signed_in_context().await;

        let mut out = Vec::new();
        status(&ctx, &mut out).await.unwrap();
        assert_eq!(output(out), "Signed in (http://api.test).\n");

        let mut out = Vec::new();
        logout(&ctx, &mut out).await.unwrap();
        assert_eq!(output(out), "Signed out.\n");
        assert!(store.token().is_none());

        let mut out = Vec::new();
        status(&ctx, &mut out).await.unwrap();
        assert_eq!(output(out), "Not signed in.\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ask_prints_answer() {
        let (ctx, http, _store) = signed_in_context().await;
        http.set_response(
            &format!("{}/ask", BASE),
            MockResponse::json(json!({ "question_id": "q1" })),
        );
        let poll_url = format!("{}/get_answer/q1", BASE);
        http.push_response(&poll_url, MockResponse::json(json!({ "status": "pending" })));
        http.set_response(
            &poll_url,
            MockResponse::json(json!({ "status": "answered", "answer": "Hi there" })),
        );
        let mut out = Vec::new();

        ask(&ctx, "Hello", &mut out).await.unwrap();

        assert_eq!(output(out), "Hi there\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ask_when_signed_out_makes_no_request() {
        let store = InMemoryTokenStore::new();
        let (ctx, http) = context(&store);
        ctx.session.restore().await;

        let err = ask(&ctx, "Hello", &mut Vec::new()).await.unwrap_err();

        assert_eq!(err.to_string(), NOT_SIGNED_IN);
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ask_submit_failure_prints_apology() {
        let (ctx, http, _store) = signed_in_context().await;
        http.set_default_response(MockResponse::status(500, "boom"));
        let mut out = Vec::new();

        assert!(ask(&ctx, "Hello", &mut out).await.is_err());

        assert_eq!(
            output(out),
            "Sorry, I encountered an error sending your message.\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ask_timeout() {
        let (ctx, http, _store) = signed_in_context().await;
        http.set_response(
            &format!("{}/ask", BASE),
            MockResponse::json(json!({ "question_id": "q2" })),
        );
        http.set_response(
            &format!("{}/get_answer/", BASE),
            MockResponse::json(json!({ "status": "pending" })),
        );
        let mut out = Vec::new();

        let err = ask(&ctx, "Test", &mut out).await.unwrap_err();

        assert_eq!(output(out), "Response timed out.\n");
        assert_eq!(err.to_string(), "No answer within 120 seconds");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ask_401_invalidates_session() {
        let (ctx, http, store) = signed_in_context().await;
        http.set_response(
            &format!("{}/ask", BASE),
            MockResponse::json(json!({ "question_id": "q1" })),
        );
        http.set_response(
            &format!("{}/get_answer/q1", BASE),
            MockResponse::status(401, "expired"),
        );
        let mut out = Vec::new();

        assert!(ask(&ctx, "Hello", &mut out).await.is_err());

        let printed = output(out);
        assert!(printed.contains("Sorry, I encountered an error sending your message."));
        assert!(printed.contains(SESSION_EXPIRED));
        assert_eq!(ctx.session.current().status(), SessionStatus::Unauthenticated);
        assert!(store.token().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_greets_and_answers_each_line() {
        let (ctx, http, _store) = signed_in_context().await;
        http.push_response(
            &format!("{}/ask", BASE),
            MockResponse::json(json!({ "question_id": "q1" })),
        );
        http.push_response(
            &format!("{}/ask", BASE),
            MockResponse::json(json!({ "question_id": "q2" })),
        );
        http.set_response(
            &format!("{}/get_answer/q1", BASE),
            MockResponse::json(json!({ "status": "answered", "answer": "one" })),
        );
        http.push_response(
            &format!("{}/get_answer/q2", BASE),
            MockResponse::json(json!({ "status": "pending" })),
        );
        http.set_response(
            &format!("{}/get_answer/q2", BASE),
            MockResponse::json(json!({ "status": "answered", "answer": "two" })),
        );
        let mut out = Vec::new();

        chat(&ctx, &b"first\n\nsecond\n"[..], &mut out).await.unwrap();

        let printed = output(out);
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines[0], GREETING);
        assert_eq!(lines.len(), 3);
        assert!(lines.contains(&"one"));
        assert!(lines.contains(&"two"));
        assert_eq!(http.request_count(&format!("{}/ask", BASE)), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_logout_stops_polling_then_signs_out() {
        let (ctx, http, store) = signed_in_context().await;
        http.set_response(
            &format!("{}/ask", BASE),
            MockResponse::json(json!({ "question_id": "q1" })),
        );
        http.set_response(
            &format!("{}/get_answer/", BASE),
            MockResponse::json(json!({ "status": "pending" })),
        );
        let mut out = Vec::new();

        chat(&ctx, &b"Hello\n/logout\n"[..], &mut out).await.unwrap();

        assert!(output(out).ends_with("Signed out.\n"));
        assert!(store.token().is_none());
        let polls = http.request_count(&format!("{}/get_answer/", BASE));
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        assert_eq!(http.request_count(&format!("{}/get_answer/", BASE)), polls);
    }

    #[tokio::test]
    async fn test_chat_requires_session() {
        let store = InMemoryTokenStore::new();
        let (ctx, _http) = context(&store);

        let err = chat(&ctx, &b""[..], &mut Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), NOT_SIGNED_IN);
    }
}
