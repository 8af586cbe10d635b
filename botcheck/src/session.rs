//! Session fixture: authenticates every actor, resolves the bot, resets the backend store and
//! hands out one [`Conversation`] per actor for the whole test run.

use std::collections::HashMap;
use std::sync::Arc;

use botcheck_core::{HarnessError, Result, Transport};
use storage::{BaselineReport, StoreInspector};
use tracing::{info, instrument};

use crate::config::{HarnessConfig, Pacing};
use crate::conversation::Conversation;

/// Collects transports and the store before [`SessionBuilder::start`] connects them.
pub struct SessionBuilder {
    target_bot: String,
    expected_actors: Vec<String>,
    pacing: Pacing,
    preserved_tables: Vec<String>,
    reset_store: bool,
    actors: Vec<(String, Arc<dyn Transport>)>,
    store: Option<StoreInspector>,
}

impl SessionBuilder {
    /// Registers the connection for the actor `label`.
    pub fn actor(mut self, label: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        self.actors.push((label.into(), transport));
        self
    }

    pub fn store(mut self, store: StoreInspector) -> Self {
        self.store = Some(store);
        self
    }

    /// Verifies every actor is authorized, resolves the bot for each of them and resets the
    /// store. Fails before any scenario runs if one actor cannot be used.
    #[instrument(skip(self), fields(target = %self.target_bot))]
    pub async fn start(self) -> Result<Session> {
        self.pacing.validate()?;
        for expected in &self.expected_actors {
            if !self.actors.iter().any(|(label, _)| label == expected) {
                return Err(HarnessError::Config(format!(
                    "no transport registered for actor '{}'",
                    expected
                )));
            }
        }
        if self.actors.is_empty() {
            return Err(HarnessError::Config("session has no actors".to_string()));
        }

        let mut conversations = HashMap::new();
        for (label, transport) in self.actors {
            let actor = transport.whoami().await.map_err(|e| {
                HarnessError::Unauthorized(format!("actor '{}' is not usable: {}", label, e))
            })?;
            let peer = transport.resolve_peer(&self.target_bot).await?;
            info!(
                actor = %label,
                account = %actor.display_name(),
                peer_id = peer.id,
                "Actor connected"
            );
            let conversation = Conversation::new(label.clone(), transport, actor, peer, self.pacing);
            if conversations.insert(label.clone(), conversation).is_some() {
                return Err(HarnessError::Config(format!("actor '{}' registered twice", label)));
            }
        }

        let baseline = match (&self.store, self.reset_store) {
            (Some(store), true) => Some(
                store
                    .reset_to_baseline(&self.preserved_tables)
                    .await
                    .map_err(|e| HarnessError::Database(e.to_string()))?,
            ),
            _ => None,
        };

        Ok(Session {
            conversations,
            store: self.store,
            baseline,
        })
    }
}

/// Live conversations of a test run, keyed by actor label, plus the backend store.
pub struct Session {
    conversations: HashMap<String, Conversation>,
    store: Option<StoreInspector>,
    baseline: Option<BaselineReport>,
}

impl Session {
    pub fn builder(config: &HarnessConfig) -> SessionBuilder {
        SessionBuilder {
            target_bot: config.target_bot.clone(),
            expected_actors: config.actors.clone(),
            pacing: config.pacing(),
            preserved_tables: config.preserved_tables.clone(),
            reset_store: config.reset_store_on_start,
            actors: Vec::new(),
            store: None,
        }
    }

    pub fn conversation(&mut self, label: &str) -> Result<&mut Conversation> {
        self.conversations
            .get_mut(label)
            .ok_or_else(|| HarnessError::UnknownActor(label.to_string()))
    }

    /// Moves a conversation out, e.g. to drive it from its own task.
    pub fn take(&mut self, label: &str) -> Result<Conversation> {
        self.conversations
            .remove(label)
            .ok_or_else(|| HarnessError::UnknownActor(label.to_string()))
    }

    /// Labels of the conversations still held, sorted.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.conversations.keys().cloned().collect();
        labels.sort();
        labels
    }

    pub fn store(&self) -> Option<&StoreInspector> {
        self.store.as_ref()
    }

    /// What the baseline reset at start removed; `None` when no reset ran.
    pub fn baseline(&self) -> Option<&BaselineReport> {
        self.baseline.as_ref()
    }
}
