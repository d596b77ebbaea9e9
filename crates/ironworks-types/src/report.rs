//! Report payloads for the presentation sink.
//!
//! Agents publish these after every state-changing step. The core never
//! reads them back; they exist solely so an external display (console,
//! log stream, UI) can follow funds, stock, and notable events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::AgentId;
use crate::items::ItemKind;

/// A fire-and-forget notification from an agent to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Report {
    /// The agent's balance changed.
    FundsChanged {
        /// The agent whose balance changed.
        agent: AgentId,
        /// The new balance.
        balance: i64,
    },
    /// The agent's inventory changed.
    StockChanged {
        /// The agent whose inventory changed.
        agent: AgentId,
        /// Snapshot of the inventory after the change.
        stock: BTreeMap<ItemKind, u32>,
    },
    /// A short human-readable event (creation, production tick, trade
    /// outcome, start/stop).
    Note {
        /// The agent the event concerns.
        agent: AgentId,
        /// The event text.
        message: String,
    },
}

impl Report {
    /// The agent this report concerns.
    pub const fn agent(&self) -> AgentId {
        match self {
            Self::FundsChanged { agent, .. }
            | Self::StockChanged { agent, .. }
            | Self::Note { agent, .. } => *agent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_exposes_its_agent() {
        let agent = AgentId::new();
        let report = Report::FundsChanged {
            agent,
            balance: 250,
        };
        assert_eq!(report.agent(), agent);
    }

    #[test]
    fn stock_report_serde_round_trip() {
        let agent = AgentId::new();
        let mut stock = BTreeMap::new();
        stock.insert(ItemKind::Chip, 4);
        let report = Report::StockChanged { agent, stock };

        let json = serde_json::to_string(&report).unwrap_or_default();
        let back: Result<Report, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(report));
    }
}
