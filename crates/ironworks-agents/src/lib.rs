//! Concurrent trading and production engine for the Ironworks economy.
//!
//! Three kinds of agents run continuously, one thread each: extractors dig
//! raw goods out of nothing but labor cost, factories assemble them into
//! higher-tier items, and wholesalers buy and resell. Agents trade through
//! the [`Tradeable`] contract.
//!
//! # Locking discipline
//!
//! Every agent owns exactly one [`std::sync::Mutex`] guarding its
//! `(balance, inventory)` pair. A thread never holds two agent locks at
//! once: a buyer calls the seller's `trade()` (seller's lock only), then
//! applies the purchase to itself (its own lock only). This makes deadlock
//! between agents structurally impossible regardless of who trades with
//! whom.
//!
//! # Shutdown
//!
//! Cooperative: each run loop polls a shared stop flag at the top of every
//! iteration, so in-flight production and trade steps always complete
//! before a thread exits.

pub mod contract;
pub mod core;
pub mod error;
pub mod extractor;
pub mod factory;
pub mod pacing;
pub mod report;
pub mod vault;
pub mod wholesaler;

pub use crate::core::{AgentCore, EconomyEnv};
pub use contract::Tradeable;
pub use error::AgentError;
pub use extractor::Extractor;
pub use factory::{Factory, standard_recipe};
pub use pacing::Pacing;
pub use report::{ChannelSink, LogSink, NullSink, ReportSink};
pub use vault::Vault;
pub use wholesaler::Wholesaler;
