//! Conversation handle: one test actor talking to the bot under test.
//!
//! # Entry points
//!
//! - **[`Conversation::send`]** / **[`Conversation::send_and_await`]** – text out, reply back.
//! - **[`Conversation::await_reply`]** / **[`Conversation::await_reply_after`]** – poll for a reply
//!   newer than a marker.
//! - **[`Conversation::invoke`]** / **[`Conversation::invoke_and_await`]** – press an inline button,
//!   then accept either a new message or an in-place edit of the pressed one.
//!
//! Only inbound messages with an ordering key above the reference marker are ever considered, so
//! a reply to an earlier action can never be taken for the answer to the latest one.

use std::sync::Arc;
use std::time::Duration;

use botcheck_core::{
    normalize_markup, preview, HarnessError, Message, MessageId, Peer, Result, Transport, User,
};
use tokio::time::{sleep, timeout as within, Instant};
use tracing::{debug, info, instrument, warn};

use crate::backoff::{bounded, retry_once_on_flood};
use crate::config::Pacing;
use crate::criteria::ReplyCriteria;
use crate::rate_limit::RateLimiter;

/// Characters of the nearest non-matching candidate kept in a timeout error.
pub const PREVIEW_CHARS: usize = 200;

/// Longest wait a single poll loop will honor; larger timeouts are capped here.
const MAX_WAIT: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Binds one authenticated actor to one bot, with private rate-limit clock and last-sent marker.
pub struct Conversation {
    label: String,
    transport: Arc<dyn Transport>,
    actor: User,
    peer: Peer,
    pacing: Pacing,
    limiter: RateLimiter,
    last_sent: Option<MessageId>,
}

impl Conversation {
    pub fn new(
        label: impl Into<String>,
        transport: Arc<dyn Transport>,
        actor: User,
        peer: Peer,
        pacing: Pacing,
    ) -> Self {
        Self {
            label: label.into(),
            transport,
            actor,
            peer,
            pacing,
            limiter: RateLimiter::new(pacing.action_interval),
            last_sent: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn actor(&self) -> &User {
        &self.actor
    }

    pub fn peer(&self) -> &Peer {
        &self.peer
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Ordering key of the last message this conversation sent.
    pub fn last_sent(&self) -> Option<MessageId> {
        self.last_sent
    }

    /// Sends `text` to the bot and moves the last-sent marker to the new message.
    #[instrument(skip(self, text), fields(actor = %self.label))]
    pub async fn send(&mut self, text: &str) -> Result<Message> {
        self.limiter.acquire().await;

        let transport = self.transport.as_ref();
        let peer = &self.peer;
        let limit = self.pacing.reply_timeout;
        let sent = retry_once_on_flood(self.pacing.flood_margin, "send_text", move || {
            bounded(limit, "send_text", transport.send_text(peer, text))
        })
        .await?;

        self.last_sent = Some(sent.id);
        info!(message_id = sent.id, text, "Sent message");
        Ok(sent)
    }

    /// Waits for a reply newer than the last sent message.
    pub async fn await_reply(
        &self,
        criteria: &ReplyCriteria,
        timeout: Option<Duration>,
    ) -> Result<Message> {
        self.await_reply_after(self.last_sent, criteria, timeout).await
    }

    /// Waits for an inbound message with key above `after` whose normalized text satisfies
    /// `criteria`. With `after == None` any inbound message qualifies.
    #[instrument(skip(self, criteria), fields(actor = %self.label, criteria = %criteria))]
    pub async fn await_reply_after(
        &self,
        after: Option<MessageId>,
        criteria: &ReplyCriteria,
        timeout: Option<Duration>,
    ) -> Result<Message> {
        let actor = &self.actor;
        self.poll_for(criteria, timeout, |message, _| {
            !message.is_from(actor) && after.map_or(true, |marker| message.id > marker)
        })
        .await
    }

    /// Sends `text` and waits for a reply newer than that very message.
    pub async fn send_and_await(
        &mut self,
        text: &str,
        criteria: &ReplyCriteria,
        timeout: Option<Duration>,
    ) -> Result<Message> {
        let sent = self.send(text).await?;
        self.await_reply_after(Some(sent.id), criteria, timeout).await
    }

    /// Presses an affordance of `message`, chosen by exact `token` or else by `label` substring.
    #[instrument(skip(self, message), fields(actor = %self.label, message_id = message.id))]
    pub async fn invoke(
        &mut self,
        message: &Message,
        label: Option<&str>,
        token: Option<&str>,
    ) -> Result<()> {
        let affordance = message.select_affordance(label, token)?;
        self.limiter.acquire().await;

        let transport = self.transport.as_ref();
        let peer = &self.peer;
        let message_id = message.id;
        let token = affordance.token.as_str();
        let limit = self.pacing.reply_timeout;
        retry_once_on_flood(self.pacing.flood_margin, "press", move || {
            bounded(limit, "press", transport.press(peer, message_id, token))
        })
        .await?;

        info!(label = %affordance.label, token, "Pressed affordance");
        Ok(())
    }

    /// Presses an affordance, then waits for the bot's answer: either a new inbound message after
    /// `message`, or `message` itself edited so that its visible text changed.
    pub async fn invoke_and_await(
        &mut self,
        message: &Message,
        label: Option<&str>,
        token: Option<&str>,
        criteria: &ReplyCriteria,
        timeout: Option<Duration>,
    ) -> Result<Message> {
        self.invoke(message, label, token).await?;

        let original_id = message.id;
        let original_text = normalize_markup(&message.text);
        let actor = &self.actor;
        self.poll_for(criteria, timeout, |candidate, normalized| {
            if candidate.id == original_id {
                normalized != original_text
            } else {
                candidate.id > original_id && !candidate.is_from(actor)
            }
        })
        .await
    }

    /// Polls the chat until an eligible message matches `criteria` or the deadline passes.
    /// `eligible` gets each message with its normalized text; candidates are checked oldest first.
    /// A fetch still pending at the deadline is abandoned.
    async fn poll_for<F>(
        &self,
        criteria: &ReplyCriteria,
        timeout: Option<Duration>,
        eligible: F,
    ) -> Result<Message>
    where
        F: Fn(&Message, &str) -> bool,
    {
        let timeout = timeout.unwrap_or(self.pacing.reply_timeout);
        let started = Instant::now();
        let deadline = started
            .checked_add(timeout)
            .unwrap_or_else(|| started + MAX_WAIT);
        let mut near_miss: Option<(MessageId, String)> = None;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let fetched = within(
                remaining,
                self.transport.fetch_recent(&self.peer, self.pacing.fetch_limit),
            )
            .await;
            match fetched {
                Err(_) => debug!("Fetch still pending at deadline"),
                Ok(Ok(mut batch)) => {
                    batch.sort_by_key(|m| m.id);
                    for message in batch {
                        let normalized = normalize_markup(&message.text);
                        if !eligible(&message, &normalized) {
                            continue;
                        }
                        if criteria.matches(&normalized) {
                            debug!(message_id = message.id, "Reply matched");
                            return Ok(message);
                        }
                        if near_miss.as_ref().map_or(true, |(id, _)| message.id >= *id) {
                            near_miss = Some((message.id, normalized));
                        }
                    }
                }
                Ok(Err(HarnessError::Throttled { retry_after })) => {
                    let wait = retry_after.min(deadline.saturating_duration_since(Instant::now()));
                    warn!(
                        retry_after_ms = retry_after.as_millis() as u64,
                        "Throttled while polling"
                    );
                    sleep(wait).await;
                }
                Ok(Err(e)) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                let preview = near_miss.map(|(_, text)| preview(&text, PREVIEW_CHARS));
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    near_miss = preview.as_deref().unwrap_or(""),
                    "No matching reply"
                );
                return Err(HarnessError::ResponseTimeout {
                    timeout,
                    criteria: criteria.to_string(),
                    preview,
                });
            }
            sleep(self.pacing.poll_interval.min(deadline - now)).await;
        }
    }
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("label", &self.label)
            .field("actor", &self.actor)
            .field("peer", &self.peer)
            .field("last_sent", &self.last_sent)
            .finish()
    }
}
