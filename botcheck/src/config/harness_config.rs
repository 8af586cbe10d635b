//! Harness config: target bot, actors, pacing, backend store, logging. Loaded from env.

use anyhow::Result;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::Pacing;

/// Everything a test run needs to know before it opens connections.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// TARGET_BOT: username of the bot under test
    pub target_bot: String,
    /// TEST_ACTORS: labels of the accounts that drive the bot, one conversation each
    pub actors: Vec<String>,
    pub pacing: Pacing,
    /// DATABASE_URL: backend store inspected by scenarios
    pub database_url: String,
    /// PRESERVED_TABLES: reference tables kept by the baseline reset
    pub preserved_tables: Vec<String>,
    /// RESET_STORE_ON_START
    pub reset_store_on_start: bool,
    /// LOG_FILE
    pub log_file: String,
}

impl HarnessConfig {
    /// Load from environment variables. TARGET_BOT is required; everything else has a default.
    pub fn load() -> Result<Self> {
        let target_bot =
            env::var("TARGET_BOT").map_err(|_| anyhow::anyhow!("TARGET_BOT not set"))?;
        let defaults = Pacing::default();

        let pacing = Pacing {
            reply_timeout: Duration::from_secs(env_or(
                "REPLY_TIMEOUT_SECS",
                defaults.reply_timeout.as_secs(),
            )),
            poll_interval: Duration::from_millis(env_or(
                "POLL_INTERVAL_MS",
                defaults.poll_interval.as_millis() as u64,
            )),
            action_interval: Duration::from_millis(env_or(
                "ACTION_INTERVAL_MS",
                defaults.action_interval.as_millis() as u64,
            )),
            flood_margin: Duration::from_millis(env_or(
                "FLOOD_MARGIN_MS",
                defaults.flood_margin.as_millis() as u64,
            )),
            fetch_limit: env_or("FETCH_LIMIT", defaults.fetch_limit),
        };

        let actors = env::var("TEST_ACTORS")
            .map(|s| split_list(&s))
            .unwrap_or_else(|_| vec!["client".to_string()]);
        let reset_store_on_start = env::var("RESET_STORE_ON_START")
            .map(|s| parse_flag(&s))
            .unwrap_or(true);
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/botcheck.log".to_string());
        let store = Self::store_from_env();

        Ok(Self {
            target_bot,
            actors,
            pacing,
            reset_store_on_start,
            log_file,
            ..store
        })
    }

    /// Defaults with DATABASE_URL and PRESERVED_TABLES read from env. TARGET_BOT is not needed,
    /// so store tooling works without a bot configured.
    pub fn store_from_env() -> Self {
        let mut config = Self::for_target("");
        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(tables) = env::var("PRESERVED_TABLES") {
            config.preserved_tables = split_list(&tables);
        }
        config
    }

    /// Defaults for the given target, single `client` actor. Used by tests and tools.
    pub fn for_target(target_bot: impl Into<String>) -> Self {
        Self {
            target_bot: target_bot.into(),
            actors: vec!["client".to_string()],
            pacing: Pacing::default(),
            database_url: "./backend.db".to_string(),
            preserved_tables: Vec::new(),
            reset_store_on_start: true,
            log_file: "logs/botcheck.log".to_string(),
        }
    }

    /// Validate config. Call after load() to fail fast before any connection is opened.
    pub fn validate(&self) -> Result<()> {
        if self.target_bot.trim_start_matches('@').trim().is_empty() {
            anyhow::bail!("TARGET_BOT is empty");
        }
        if self.actors.is_empty() {
            anyhow::bail!("TEST_ACTORS must name at least one actor");
        }
        self.pacing.validate()?;
        Ok(())
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
