//! Error types for the ironworks-agents crate.
//!
//! Insufficient funds and insufficient stock during normal operation are
//! *not* errors: loops back off, and `trade()` signals refusal with a zero
//! return. The variants here cover misconfiguration (fatal for the agent's
//! loop) and arithmetic conditions that are unreachable when the locking
//! discipline holds.

use ironworks_types::{AgentId, ItemKind};

/// Errors that can occur during agent construction, wiring, or vault
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Attempted to remove more of an item than the vault holds.
    #[error("insufficient stock: wanted {requested} {kind} but only have {available}")]
    InsufficientStock {
        /// The item kind being removed.
        kind: ItemKind,
        /// The quantity the caller attempted to remove.
        requested: u32,
        /// The quantity actually held.
        available: u32,
    },

    /// A debit would take the balance below zero.
    #[error("insufficient funds: needed {required} but balance is {available}")]
    InsufficientFunds {
        /// The amount the caller attempted to debit.
        required: i64,
        /// The current balance.
        available: i64,
    },

    /// Adding to an item quantity overflowed `u32`.
    #[error("stock overflow for {kind}")]
    StockOverflow {
        /// The item kind whose quantity overflowed.
        kind: ItemKind,
    },

    /// A balance credit or debit overflowed `i64`.
    #[error("balance overflow during {context}")]
    BalanceOverflow {
        /// Description of the operation that overflowed.
        context: &'static str,
    },

    /// An agent was created for an item kind outside its tier (e.g. an
    /// extractor asked to produce a manufactured item).
    #[error("{kind} is not {expected}")]
    WrongTier {
        /// The offending item kind.
        kind: ItemKind,
        /// What the agent required ("a raw material", "a manufactured good").
        expected: &'static str,
    },

    /// A factory was created with an empty list of required inputs.
    #[error("factory bill of materials is empty")]
    EmptyBillOfMaterials,

    /// A wholesaler was created with nothing to trade.
    #[error("wholesaler has no tradeable kinds")]
    NoTradeableKinds,

    /// A factory or wholesaler reached its run loop without any trading
    /// peers. Fatal: the agent can structurally never make progress.
    #[error("agent {agent} has no trading peers")]
    NoTradingPeers {
        /// The misconfigured agent.
        agent: AgentId,
    },

    /// Supplier wiring was attempted twice on the same agent.
    #[error("agent {agent} already has suppliers wired")]
    PeersAlreadyWired {
        /// The doubly-wired agent.
        agent: AgentId,
    },
}
