//! # botcheck-core
//!
//! Core types and traits for the bot test harness: [`Transport`], [`Message`] and its
//! [`Affordance`]s, [`HarnessError`], markup normalization, and tracing initialization.
//! Transport-agnostic; a concrete user-account client implements [`Transport`].

pub mod error;
pub mod logger;
pub mod markup;
pub mod transport;
pub mod types;

pub use error::{HarnessError, Result};
pub use logger::init_tracing;
pub use markup::{normalize_markup, preview};
pub use transport::Transport;
pub use types::{Affordance, Message, MessageDirection, MessageId, Peer, User};
