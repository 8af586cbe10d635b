//! Transport abstraction: the chat connection the harness drives.
//!
//! [`Transport`] is implemented by a user-account client in real runs and by scripted fakes in
//! tests. Any call may fail with [`crate::HarnessError::Throttled`] when the upstream asks the
//! client to slow down.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Message, MessageId, Peer, User};

/// Chat connection acting as one authenticated user.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the authenticated identity. Fails when the session is not authorized.
    async fn whoami(&self) -> Result<User>;
    /// Resolves a bot username (with or without `@`) to a peer.
    async fn resolve_peer(&self, username: &str) -> Result<Peer>;
    /// Sends a text message to the peer and returns it as stored by the server.
    async fn send_text(&self, peer: &Peer, text: &str) -> Result<Message>;
    /// Fetches up to `limit` of the most recent messages in the chat with `peer`, in any order.
    async fn fetch_recent(&self, peer: &Peer, limit: usize) -> Result<Vec<Message>>;
    /// Presses the affordance carrying `token` on message `message_id`.
    async fn press(&self, peer: &Peer, message_id: MessageId, token: &str) -> Result<()>;
}
