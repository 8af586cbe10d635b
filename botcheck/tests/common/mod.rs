//! Shared helpers for botcheck integration tests.

#![allow(dead_code)]

pub mod scripted_bot;

use std::sync::{Arc, Once};
use std::time::Duration;

use botcheck::{Conversation, Pacing, Peer};
use tracing_subscriber::{fmt, EnvFilter};

use scripted_bot::{ScriptedBot, BOT_ID, BOT_USERNAME};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing once per test process; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug,botcheck=debug"));

        let _ = fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init();
    });
}

/// Pacing used with paused tokio time: 1s action floor, 100ms polls, 5s default timeout.
pub fn test_pacing() -> Pacing {
    Pacing {
        reply_timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(100),
        action_interval: Duration::from_secs(1),
        flood_margin: Duration::from_millis(500),
        fetch_limit: 20,
    }
}

pub fn bot_peer() -> Peer {
    Peer {
        id: BOT_ID,
        username: Some(BOT_USERNAME.to_string()),
    }
}

/// Conversation of the bot's actor with the bot, bypassing the session fixture.
pub fn conversation_with(bot: &Arc<ScriptedBot>) -> Conversation {
    init_tracing();
    Conversation::new(
        "client",
        bot.clone(),
        bot.actor().clone(),
        bot_peer(),
        test_pacing(),
    )
}
