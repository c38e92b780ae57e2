//! # Soulkeeper - Per-Player Soul Ledger for Game Servers
//!
//! Soulkeeper tracks four kinds of "souls" that players earn through ordinary play
//! (mining ore, harvesting crops, killing players, hunting monsters) and lets them spend
//! those souls on a redeemable condensate item.
//!
//! ## Features
//!
//! - **Ledger**: Four non-negative balances per player, keyed by player UUID.
//! - **Reward Policy**: Fixed block tables, ripeness-gated crops, and level-tiered monster rewards.
//! - **Commands**: `/souls` show, `redeem`, and the `admin set|add|remove` tools with tab completion.
//! - **Persistence**: Whole-ledger JSON snapshots with locked, atomic writes and periodic autosave.
//! - **Host Boundary**: Game engines plug in through the [`host::GameHost`] trait; a
//!   line-oriented console host ships for scripting and operator use.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use soulkeeper::config::Config;
//! use soulkeeper::server::SoulServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let mut server = SoulServer::new(config).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`souls`] - Categories, balances, the ledger store, reward policy, event and command handling
//! - [`host`] - The game host trait and the console host
//! - [`storage`] - Souls document persistence and autosave
//! - [`server`] - Service lifecycle around the console host
//! - [`config`] - Configuration management
//! - [`logutil`] - Log-safe rendering of untrusted input

pub mod config;
pub mod host;
pub mod logutil;
pub mod server;
pub mod souls;
pub mod storage;
