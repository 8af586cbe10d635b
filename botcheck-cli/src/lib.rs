//! # botcheck-cli
//!
//! Store tooling for test runs: argument parsing and settings resolution. The binary lives in
//! `main.rs`.

pub mod cli;

pub use cli::{store_settings, Cli, Commands};
