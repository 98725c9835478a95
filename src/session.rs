//! Per-user conversational state for the chat bot.
//!
//! Single and combo listings take two turns (details, then URLs); Instagram
//! captions take one. A finished round trip removes the session, and
//! sessions idle for longer than the TTL are pruned on every write.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use teloxide::types::UserId;
use tokio::sync::Mutex;

use crate::ai::FormatMode;
use crate::text_utils::combine_listing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Idle,
    AwaitingDetails,
    AwaitingUrls,
    AwaitingCaption,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub mode: Option<FormatMode>,
    pub step: Step,
    pub description: String,
    pub urls: String,
    last_seen: Instant,
}

/// What the bot should do after feeding a message into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// No flow is active; the message is ignored.
    Ignore,
    /// Details were stored; ask for URLs next.
    NeedUrls,
    /// All input collected; call the model.
    Ready { mode: FormatMode, input: String },
}

impl Session {
    pub fn idle() -> Self {
        Self {
            mode: None,
            step: Step::Idle,
            description: String::new(),
            urls: String::new(),
            last_seen: Instant::now(),
        }
    }

    /// Start a flow for `mode`. Instagram collects everything in one message.
    pub fn start(mode: FormatMode) -> Self {
        let step = match mode {
            FormatMode::Instagram => Step::AwaitingCaption,
            _ => Step::AwaitingDetails,
        };
        Self {
            mode: Some(mode),
            step,
            ..Self::idle()
        }
    }

    pub fn advance(&mut self, text: &str) -> Advance {
        self.last_seen = Instant::now();
        let Some(mode) = self.mode else {
            return Advance::Ignore;
        };
        match self.step {
            Step::Idle => Advance::Ignore,
            Step::AwaitingDetails => {
                self.description = text.to_string();
                self.step = Step::AwaitingUrls;
                Advance::NeedUrls
            }
            Step::AwaitingUrls => {
                self.urls = text.to_string();
                self.step = Step::Idle;
                Advance::Ready {
                    mode,
                    input: combine_listing(&self.description, &self.urls),
                }
            }
            Step::AwaitingCaption => {
                self.step = Step::Idle;
                Advance::Ready {
                    mode,
                    input: text.to_string(),
                }
            }
        }
    }
}

/// Sessions keyed by Telegram user, shared between handlers.
#[derive(Clone, Debug)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<UserId, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn set(&self, user: UserId, session: Session) {
        let mut sessions = self.inner.lock().await;
        prune(&mut sessions, self.ttl);
        tracing::debug!(user_id = user.0, step = ?session.step, mode = ?session.mode, "Setting session");
        sessions.insert(user, session);
    }

    pub async fn clear(&self, user: UserId) {
        tracing::debug!(user_id = user.0, "Clearing session");
        self.inner.lock().await.remove(&user);
    }

    /// Feed a message into the user's session and drop it once finished.
    pub async fn advance(&self, user: UserId, text: &str) -> Advance {
        let mut sessions = self.inner.lock().await;
        let Some(session) = sessions.get_mut(&user) else {
            return Advance::Ignore;
        };
        let outcome = session.advance(text);
        if session.step == Step::Idle {
            sessions.remove(&user);
        }
        tracing::trace!(user_id = user.0, ?outcome, "Advanced session");
        outcome
    }

    pub async fn get(&self, user: UserId) -> Option<Session> {
        self.inner.lock().await.get(&user).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn prune(sessions: &mut HashMap<UserId, Session>, ttl: Duration) {
    let before = sessions.len();
    sessions.retain(|_, s| s.last_seen.elapsed() < ttl);
    let removed = before - sessions.len();
    if removed > 0 {
        tracing::debug!(removed, "Pruned idle sessions");
    }
}
