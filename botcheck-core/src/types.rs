//! Core types: user, peer, message, affordance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Ordering key of a message. Strictly increasing within one conversation.
pub type MessageId = i64;

/// Authenticated account identity (the test actor, or the bot as seen by the transport).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub is_bot: bool,
}

impl User {
    /// `@username` when known, otherwise the numeric id.
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(name) => format!("@{}", name),
            None => self.id.to_string(),
        }
    }
}

/// Target of a conversation (the bot under test), resolved by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub id: i64,
    pub username: Option<String>,
}

/// Direction of the message relative to the actor (sent by the actor or received from the peer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

/// Invokable action attached to a message (an inline button). `token` is opaque callback data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affordance {
    pub label: String,
    pub token: String,
}

impl Affordance {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// A single message as fetched from the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: i64,
    pub sender_id: i64,
    pub direction: MessageDirection,
    pub text: String,
    /// Row-major order as rendered.
    pub affordances: Vec<Affordance>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl Message {
    /// True when the message was written by `actor` (an echo of our own send).
    pub fn is_from(&self, actor: &User) -> bool {
        self.direction == MessageDirection::Outgoing || self.sender_id == actor.id
    }

    /// All affordance labels, in order.
    pub fn labels(&self) -> Vec<String> {
        self.affordances.iter().map(|a| a.label.clone()).collect()
    }

    /// All `(label, token)` pairs, in order.
    pub fn affordance_pairs(&self) -> Vec<(String, String)> {
        self.affordances
            .iter()
            .map(|a| (a.label.clone(), a.token.clone()))
            .collect()
    }

    /// Token of the first affordance whose label contains `label_contains` and whose token starts
    /// with `token_prefix`. Absent constraints are ignored.
    pub fn find_token(
        &self,
        label_contains: Option<&str>,
        token_prefix: Option<&str>,
    ) -> Option<&str> {
        self.affordances
            .iter()
            .find(|a| {
                label_contains.map_or(true, |l| a.label.contains(l))
                    && token_prefix.map_or(true, |p| a.token.starts_with(p))
            })
            .map(|a| a.token.as_str())
    }

    /// Every token starting with `prefix`, in order.
    pub fn tokens_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.affordances
            .iter()
            .filter(|a| a.token.starts_with(prefix))
            .map(|a| a.token.as_str())
            .collect()
    }

    /// Picks the affordance to invoke: an exact `token` match wins, otherwise the first label
    /// containing `label`. Fails with [`HarnessError::AffordanceNotFound`] listing all labels.
    pub fn select_affordance(&self, label: Option<&str>, token: Option<&str>) -> Result<&Affordance> {
        let by_token = token.and_then(|t| self.affordances.iter().find(|a| a.token == t));
        let by_label = || label.and_then(|l| self.affordances.iter().find(|a| a.label.contains(l)));

        by_token
            .or_else(by_label)
            .ok_or_else(|| HarnessError::AffordanceNotFound {
                label: label.map(str::to_string),
                token: token.map(str::to_string),
                available: self.labels(),
            })
    }
}
