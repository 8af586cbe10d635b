//! In-memory [`botcheck::Transport`] for integration tests.
//!
//! Keeps one private chat between a test actor and a bot. Tests (or a fake backend task reading
//! [`BotEvent`]s) push bot replies and edits; the harness sees them through `fetch_recent`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use botcheck::{
    Affordance, HarnessError, Message, MessageDirection, MessageId, Peer, Result, Transport, User,
};
use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::Instant;

pub const ACTOR_ID: i64 = 1001;
pub const BOT_ID: i64 = 5000;
pub const BOT_USERNAME: &str = "booking_bot";

/// What the actor did, as seen by the bot backend.
#[derive(Debug, Clone)]
pub enum BotEvent {
    Text(Message),
    Press { message_id: MessageId, token: String },
}

#[derive(Default)]
struct ChatState {
    next_id: MessageId,
    messages: Vec<Message>,
    presses: Vec<(MessageId, String)>,
    action_times: Vec<Instant>,
    fetches: usize,
    throttle_next_fetch: Option<Duration>,
}

pub struct ScriptedBot {
    actor: User,
    authorized: bool,
    state: Mutex<ChatState>,
    events: Option<mpsc::UnboundedSender<BotEvent>>,
}

impl ScriptedBot {
    fn build(actor_id: i64, authorized: bool, events: Option<mpsc::UnboundedSender<BotEvent>>) -> Self {
        Self {
            actor: User {
                id: actor_id,
                username: Some(format!("tester{}", actor_id)),
                first_name: Some("Tester".to_string()),
                is_bot: false,
            },
            authorized,
            state: Mutex::new(ChatState {
                next_id: 1,
                ..Default::default()
            }),
            events,
        }
    }

    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(ACTOR_ID, true, None))
    }

    pub fn for_actor(actor_id: i64) -> Arc<Self> {
        Arc::new(Self::build(actor_id, true, None))
    }

    /// Bot whose actor actions are forwarded to the returned receiver.
    pub fn with_events() -> (Arc<Self>, mpsc::UnboundedReceiver<BotEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self::build(ACTOR_ID, true, Some(tx))), rx)
    }

    /// Connection whose session is not logged in.
    pub fn unauthorized() -> Arc<Self> {
        Arc::new(Self::build(ACTOR_ID, false, None))
    }

    pub fn actor(&self) -> &User {
        &self.actor
    }

    /// Appends a message from the bot and returns it.
    pub fn bot_reply(&self, text: &str, affordances: Vec<Affordance>) -> Message {
        let mut state = self.state.lock().unwrap();
        let message = Message {
            id: state.next_id,
            chat_id: BOT_ID,
            sender_id: BOT_ID,
            direction: MessageDirection::Incoming,
            text: text.to_string(),
            affordances,
            created_at: Utc::now(),
            edited_at: None,
        };
        state.next_id += 1;
        state.messages.push(message.clone());
        message
    }

    /// Rewrites the text of message `id` in place. Returns false when there is no such message.
    pub fn bot_edit(&self, id: MessageId, text: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        match state.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.text = text.to_string();
                message.edited_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    pub fn presses(&self) -> Vec<(MessageId, String)> {
        self.state.lock().unwrap().presses.clone()
    }

    /// When each send/press reached the transport.
    pub fn action_times(&self) -> Vec<Instant> {
        self.state.lock().unwrap().action_times.clone()
    }

    pub fn fetches(&self) -> usize {
        self.state.lock().unwrap().fetches
    }

    /// Makes the next `fetch_recent` fail with a flood wait of `retry_after`.
    pub fn throttle_next_fetch(&self, retry_after: Duration) {
        self.state.lock().unwrap().throttle_next_fetch = Some(retry_after);
    }

    fn emit(&self, event: BotEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

#[async_trait]
impl Transport for ScriptedBot {
    async fn whoami(&self) -> Result<User> {
        if self.authorized {
            Ok(self.actor.clone())
        } else {
            Err(HarnessError::Unauthorized("AUTH_KEY_UNREGISTERED".to_string()))
        }
    }

    async fn resolve_peer(&self, username: &str) -> Result<Peer> {
        if username.trim_start_matches('@') == BOT_USERNAME {
            Ok(Peer {
                id: BOT_ID,
                username: Some(BOT_USERNAME.to_string()),
            })
        } else {
            Err(HarnessError::Transport(format!(
                "USERNAME_NOT_OCCUPIED: {}",
                username
            )))
        }
    }

    async fn send_text(&self, peer: &Peer, text: &str) -> Result<Message> {
        let message = {
            let mut state = self.state.lock().unwrap();
            let message = Message {
                id: state.next_id,
                chat_id: peer.id,
                sender_id: self.actor.id,
                direction: MessageDirection::Outgoing,
                text: text.to_string(),
                affordances: Vec::new(),
                created_at: Utc::now(),
                edited_at: None,
            };
            state.next_id += 1;
            state.messages.push(message.clone());
            state.action_times.push(Instant::now());
            message
        };
        self.emit(BotEvent::Text(message.clone()));
        Ok(message)
    }

    async fn fetch_recent(&self, _peer: &Peer, limit: usize) -> Result<Vec<Message>> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        if let Some(retry_after) = state.throttle_next_fetch.take() {
            return Err(HarnessError::Throttled { retry_after });
        }
        Ok(state.messages.iter().rev().take(limit).cloned().collect())
    }

    async fn press(&self, _peer: &Peer, message_id: MessageId, token: &str) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            if !state.messages.iter().any(|m| m.id == message_id) {
                return Err(HarnessError::Transport("MESSAGE_ID_INVALID".to_string()));
            }
            state.presses.push((message_id, token.to_string()));
            state.action_times.push(Instant::now());
        }
        self.emit(BotEvent::Press {
            message_id,
            token: token.to_string(),
        });
        Ok(())
    }
}
