//! Harness configuration: target bot, actors, pacing, backend store and logging, from env.

mod harness_config;
mod pacing;


pub use harness_config::HarnessConfig;
pub use pacing::Pacing;
