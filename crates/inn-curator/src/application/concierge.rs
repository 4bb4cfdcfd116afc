//! ConciergeBridge: turns a guest's message into a reply string.
//!
//! The bridge always produces a reply.  A missing credential, a failed
//! session start, and a failed send all collapse into fixed fallback text:
//!
//! | Situation                      | Reply                   |
//! |--------------------------------|-------------------------|
//! | no backend (credential absent) | [`OFFLINE_REPLY`]       |
//! | backend or transport error     | [`HIGH_TRAFFIC_REPLY`]  |
//! | backend returned empty text    | [`EMPTY_REPLY`]         |
//!
//! One chat session is opened lazily on the first message and reused for
//! every later message so the assistant keeps the conversation context.
//! [`ConciergeBridge::reply`] takes `&mut self`, so a second message cannot
//! be sent while the first is still waiting.

use std::time::SystemTime;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Reply when no assistant credential is configured.
pub const OFFLINE_REPLY: &str =
    "I apologize, but I am currently offline. Please contact the Ship Inn front desk directly.";

/// Reply when the assistant call fails.
pub const HIGH_TRAFFIC_REPLY: &str =
    "I am currently experiencing high traffic. Please try again in a moment.";

/// Reply when the assistant answers with no text.
pub const EMPTY_REPLY: &str = "I apologize, I didn't quite catch that.";

/// First message shown in a fresh chat transcript.
pub const GREETING: &str =
    "Good day. I am your Ship Inn concierge. How may I assist you with your heritage stay today?";

/// Persona prompt sent with every session.
pub const SYSTEM_INSTRUCTION: &str = "\
You are the dedicated AI Concierge for 'Ship Inn Stanley'.
Your tone is sophisticated, warm, professional, and reflects the rich heritage and rugged coastal beauty of Stanley, Tasmania.
Your goal is to assist guests with:
1. Room recommendations (Heritage Suites, Luxury Apartments).
2. Explaining local history and amenities.
3. Recommendations for exploring 'The Nut', local seafood, and coastal trails.

Keep responses concise (under 100 words).
If asked about booking, explain this is a demo and to contact the Ship Inn front desk.
Introduce yourself as the Ship Inn Concierge on the first message.
";

/// Failures from the remote assistant.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant request failed: {0}")]
    Transport(String),

    #[error("assistant returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode assistant response: {0}")]
    Decode(String),
}

/// Opens conversation sessions with a remote assistant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn start_session(&self) -> Result<Box<dyn ChatSession>, AssistantError>;
}

/// One ongoing conversation.  Implementations keep the turn history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatSession: Send {
    async fn send(&mut self, message: &str) -> Result<String, AssistantError>;
}

/// Never-failing front for a [`ChatBackend`].
pub struct ConciergeBridge<B> {
    backend: Option<B>,
    session: Option<Box<dyn ChatSession>>,
    session_id: Option<Uuid>,
}

impl<B: ChatBackend> ConciergeBridge<B> {
    /// `None` means the credential is absent: every reply is [`OFFLINE_REPLY`].
    pub fn new(backend: Option<B>) -> Self {
        Self {
            backend,
            session: None,
            session_id: None,
        }
    }

    pub fn is_online(&self) -> bool {
        self.backend.is_some()
    }

    /// Identifier of the current session, once one has been opened.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    /// Sends `message` and returns the reply or a fallback.
    pub async fn reply(&mut self, message: &str) -> String {
        let Some(backend) = self.backend.as_ref() else {
            debug!("no assistant credential; replying offline");
            return OFFLINE_REPLY.to_string();
        };

        if self.session.is_none() {
            match backend.start_session().await {
                Ok(session) => {
                    let id = Uuid::new_v4();
                    info!(session = %id, "concierge session started");
                    self.session = Some(session);
                    self.session_id = Some(id);
                }
                Err(e) => {
                    warn!("failed to start concierge session: {e}");
                    return HIGH_TRAFFIC_REPLY.to_string();
                }
            }
        }
        // Borrowed in place: dropping this future mid-send keeps the session.
        let Some(session) = self.session.as_mut() else {
            return HIGH_TRAFFIC_REPLY.to_string();
        };

        let result = session.send(message).await;

        match result {
            Ok(text) if text.trim().is_empty() => EMPTY_REPLY.to_string(),
            Ok(text) => text,
            Err(e) => {
                warn!(session = ?self.session_id, "concierge reply failed: {e}");
                HIGH_TRAFFIC_REPLY.to_string()
            }
        }
    }
}

// ── Chat transcript ───────────────────────────────────────────────────────────

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub sent_at: SystemTime,
}

impl ChatMessage {
    fn now(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            sent_at: SystemTime::now(),
        }
    }
}

/// Transcript plus bridge: what the chat widget drives.
pub struct ConciergeChat<B> {
    bridge: ConciergeBridge<B>,
    transcript: Vec<ChatMessage>,
}

impl<B: ChatBackend> ConciergeChat<B> {
    /// Starts a transcript seeded with [`GREETING`].
    pub fn new(bridge: ConciergeBridge<B>) -> Self {
        Self {
            bridge,
            transcript: vec![ChatMessage::now(ChatRole::Model, GREETING)],
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Appends the guest's message and the reply.
    ///
    /// Whitespace-only input is ignored and returns `None`.
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }
        self.transcript.push(ChatMessage::now(ChatRole::User, input));
        let reply = self.bridge.reply(input).await;
        self.transcript.push(ChatMessage::now(ChatRole::Model, reply));
        self.transcript.last()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Session whose first send never completes.
    struct StallOnce {
        stalled: bool,
    }

    #[async_trait]
    impl ChatSession for StallOnce {
        async fn send(&mut self, _message: &str) -> Result<String, AssistantError> {
            if !self.stalled {
                self.stalled = true;
                std::future::pending::<()>().await;
            }
            Ok("resumed".to_string())
        }
    }

    fn session_replying(replies: Vec<Result<String, AssistantError>>) -> MockChatSession {
        let mut session = MockChatSession::new();
        let mut replies = replies.into_iter();
        session
            .expect_send()
            .returning(move |_| replies.next().expect("no more scripted replies"));
        session
    }

    fn backend_with(session: MockChatSession) -> MockChatBackend {
        let mut backend = MockChatBackend::new();
        backend
            .expect_start_session()
            .times(1)
            .return_once(move || Ok(Box::new(session) as Box<dyn ChatSession>));
        backend
    }

    #[tokio::test]
    async fn test_offline_bridge_returns_offline_reply() {
        let mut bridge: ConciergeBridge<MockChatBackend> = ConciergeBridge::new(None);

        assert!(!bridge.is_online());
        assert_eq!(bridge.reply("Do you have parking?").await, OFFLINE_REPLY);
        assert!(bridge.session_id().is_none());
    }

    #[tokio::test]
    async fn test_session_is_created_once_and_reused() {
        // Arrange
        let session = session_replying(vec![Ok("Welcome.".into()), Ok("Room 3.".into())]);
        let mut bridge = ConciergeBridge::new(Some(backend_with(session)));

        // Act
        let first = bridge.reply("Hello").await;
        let id = bridge.session_id();
        let second = bridge.reply("Which room?").await;

        // Assert – `times(1)` on start_session enforces a single session
        assert_eq!(first, "Welcome.");
        assert_eq!(second, "Room 3.");
        assert!(id.is_some());
        assert_eq!(bridge.session_id(), id);
    }

    #[tokio::test]
    async fn test_send_error_returns_high_traffic_reply_and_keeps_session() {
        let session = session_replying(vec![
            Err(AssistantError::Status {
                status: 429,
                body: "quota".into(),
            }),
            Ok("Back again.".into()),
        ]);
        let mut bridge = ConciergeBridge::new(Some(backend_with(session)));

        assert_eq!(bridge.reply("Hello").await, HIGH_TRAFFIC_REPLY);
        assert_eq!(bridge.reply("Hello?").await, "Back again.");
    }

    #[tokio::test]
    async fn test_failed_session_start_is_retried_on_next_message() {
        // Arrange
        let mut backend = MockChatBackend::new();
        let mut seq = mockall::Sequence::new();
        backend
            .expect_start_session()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(AssistantError::Transport("dns".into())));
        let session = session_replying(vec![Ok("Hello.".into())]);
        backend
            .expect_start_session()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move || Ok(Box::new(session) as Box<dyn ChatSession>));
        let mut bridge = ConciergeBridge::new(Some(backend));

        // Act / Assert
        assert_eq!(bridge.reply("Hi").await, HIGH_TRAFFIC_REPLY);
        assert!(bridge.session_id().is_none());
        assert_eq!(bridge.reply("Hi").await, "Hello.");
    }

    #[tokio::test]
    async fn test_abandoned_reply_keeps_the_session_for_the_next_message() {
        // Arrange
        let mut backend = MockChatBackend::new();
        backend
            .expect_start_session()
            .times(1)
            .return_once(|| Ok(Box::new(StallOnce { stalled: false }) as Box<dyn ChatSession>));
        let mut bridge = ConciergeBridge::new(Some(backend));

        // Act: give up on the first reply while its send is still pending
        let abandoned = tokio::time::timeout(Duration::from_millis(10), bridge.reply("Hello")).await;
        let id = bridge.session_id();
        let reply = bridge.reply("Still there?").await;

        // Assert
        assert!(abandoned.is_err());
        assert!(id.is_some());
        assert_eq!(reply, "resumed");
        assert_eq!(bridge.session_id(), id);
    }

    #[tokio::test]
    async fn test_blank_reply_is_replaced() {
        let session = session_replying(vec![Ok("   ".into())]);
        let mut bridge = ConciergeBridge::new(Some(backend_with(session)));

        assert_eq!(bridge.reply("Hello").await, EMPTY_REPLY);
    }

    #[tokio::test]
    async fn test_chat_transcript_starts_with_greeting_and_records_turns() {
        let session = session_replying(vec![Ok("Certainly.".into())]);
        let mut chat = ConciergeChat::new(ConciergeBridge::new(Some(backend_with(session))));

        let reply = chat.send("A quiet room, please").await.map(|m| m.text.clone());

        assert_eq!(reply.as_deref(), Some("Certainly."));
        let roles: Vec<ChatRole> = chat.transcript().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::Model, ChatRole::User, ChatRole::Model]);
        assert_eq!(chat.transcript()[0].text, GREETING);
    }

    #[tokio::test]
    async fn test_chat_ignores_blank_input() {
        let mut chat: ConciergeChat<MockChatBackend> = ConciergeChat::new(ConciergeBridge::new(None));

        assert!(chat.send("   ").await.is_none());
        assert_eq!(chat.transcript().len(), 1);
    }
}
