//! # botcheck
//!
//! End-to-end harness for chat bots. A [`Session`] authenticates the test actors and resets the
//! backend store; each actor gets a [`Conversation`] that sends text, presses inline buttons and
//! waits for the bot's replies with polling, rate limiting and flood backoff built in.
//! Core types (Transport, Message, HarnessError) come from botcheck-core; store access from storage.

pub mod backoff;
pub mod config;
pub mod conversation;
pub mod criteria;
pub mod rate_limit;
pub mod session;

pub use botcheck_core::{
    init_tracing, normalize_markup, Affordance, HarnessError, Message, MessageDirection,
    MessageId, Peer, Result, Transport, User,
};
pub use storage::{BaselineReport, StoreInspector};

pub use backoff::{bounded, retry_once_on_flood};
pub use config::{HarnessConfig, Pacing};
pub use conversation::{Conversation, PREVIEW_CHARS};
pub use criteria::ReplyCriteria;
pub use rate_limit::RateLimiter;
pub use session::{Session, SessionBuilder};
