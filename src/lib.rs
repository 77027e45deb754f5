//! # zorkcore - Command Resolution & World-State Engine
//!
//! The runtime core of a Zork-style text adventure: a command interpreter
//! that maps free-form player text onto state transitions across a graph of
//! scenes, an item/container model, and a scoring engine that awards every
//! bonus at most once.
//!
//! ## Features
//!
//! - **Fixed grammar**: verb, verb + target, and verb + target + preposition + target,
//!   with verb synonyms and direction abbreviations.
//! - **Scoped resolution**: targets resolve against inventory, open containers and the
//!   visible items of the current scene, in that order.
//! - **Containers**: open/close/lock state, capacity by item size, no self-nesting.
//! - **Weight-gated exits**: exits can require a light load, a flag, or an open item.
//! - **Idempotent scoring**: first-visit and deposit bonuses guarded by flags and
//!   capped at the world's maximum score.
//! - **Data-driven interactions**: `turn on lamp`, `move rug` and friends come from
//!   item JSON, with conditions and effects.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zorkcore::config::Config;
//! use zorkcore::game::{CommandProcessor, JsonWorldLoader, World};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let world = World::load(&JsonWorldLoader::new(&config.game.data_dir))?;
//!     let mut game = CommandProcessor::from_world(world, &config.game)?;
//!
//!     let result = game.process("open mailbox");
//!     println!("{} (score {:+})", result.message, result.score_change);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - data model, state store, services, parser and command processor
//! - [`config`] - TOML configuration
//! - [`logutil`] - helpers for logging player-supplied text
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  Command Processor  │ ← parse, resolve, check, mutate, score
//! └─────────────────────┘
//!            │
//! ┌──────────┴──────────────────────────────┐
//! │ Scene │ Item/Container │ Inventory │ Scoring │ ← services
//! └──────────┬──────────────────────────────┘
//!            │
//! ┌─────────────────────┐
//! │     Game State      │ ← single mutable aggregate
//! └─────────────────────┘
//! ```

pub mod config;
pub mod game;
pub mod logutil;
