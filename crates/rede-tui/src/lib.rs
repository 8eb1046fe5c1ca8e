//! Full-screen TUI for the rede client.
//!
//! Elm-style split: `update` is the pure reducer (all state mutation),
//! `effects` are commands it returns, and `runtime` owns the terminal
//! and executes effects by spawning async handlers against `rede-core`.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use anyhow::Result;
use rede_core::config::Config;
pub use runtime::TuiRuntime;

/// Runs the interactive client until the user quits.
pub async fn run(config: Config) -> Result<()> {
    let mut runtime = TuiRuntime::new(config)?;
    runtime.run()
}
