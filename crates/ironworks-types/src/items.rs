//! Item and worker-role enumerations.
//!
//! Items are organized into tiers reflecting the production chain:
//! - Raw: extracted from the ground by paying labor, consumed by factories.
//! - Manufactured: assembled from lower-tier items, each unit consuming
//!   exactly one unit of every required input.
//!
//! Every item kind is produced by exactly one worker role; the role's
//! salary is the labor cost of one production step (see `ironworks-costs`).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Item kinds
// ---------------------------------------------------------------------------

/// A typed good that can be held in an inventory and traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    // --- Raw ---
    /// Quartz sand, dug by miners. Input to chips.
    Sand,
    /// Copper ore, dug by miners. Input to chips.
    Copper,
    /// Crude petrol, pumped by miners. Input to plastic.
    Petrol,

    // --- Manufactured ---
    /// Molded plastic, made from petrol.
    Plastic,
    /// An integrated circuit, made from sand and copper.
    Chip,
    /// A finished robot, made from a chip and plastic.
    Robot,
}

impl ItemKind {
    /// All item kinds, in production-chain order.
    pub const ALL: [Self; 6] = [
        Self::Sand,
        Self::Copper,
        Self::Petrol,
        Self::Plastic,
        Self::Chip,
        Self::Robot,
    ];

    /// Whether this kind is extracted directly (not assembled).
    pub const fn is_raw(self) -> bool {
        matches!(self, Self::Sand | Self::Copper | Self::Petrol)
    }

    /// Short lowercase name for logs and reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sand => "sand",
            Self::Copper => "copper",
            Self::Petrol => "petrol",
            Self::Plastic => "plastic",
            Self::Chip => "chip",
            Self::Robot => "robot",
        }
    }
}

impl core::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Worker roles
// ---------------------------------------------------------------------------

/// The labor role that produces an item kind.
///
/// Wages paid to a role are a pure cost: the money leaves the economy
/// (an implicit labor pool), which is why agent balances are not conserved
/// across production steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkerRole {
    /// Extracts raw resources (sand, copper, petrol).
    Miner,
    /// Molds petrol into plastic.
    PlasticWorker,
    /// Assembles chips from sand and copper.
    Technician,
    /// Assembles robots from chips and plastic.
    Engineer,
}

impl WorkerRole {
    /// Short lowercase name for logs and reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Miner => "miner",
            Self::PlasticWorker => "plastic worker",
            Self::Technician => "technician",
            Self::Engineer => "engineer",
        }
    }
}

impl core::fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_kinds_are_exactly_the_extractable_ones() {
        let raw: Vec<ItemKind> = ItemKind::ALL.into_iter().filter(|k| k.is_raw()).collect();
        assert_eq!(raw, vec![ItemKind::Sand, ItemKind::Copper, ItemKind::Petrol]);
    }

    #[test]
    fn item_kind_serde_round_trip() {
        for kind in ItemKind::ALL {
            let json = serde_json::to_string(&kind).unwrap_or_default();
            let back: ItemKind = serde_json::from_str(&json).unwrap_or(ItemKind::Sand);
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn display_names_are_lowercase() {
        assert_eq!(ItemKind::Robot.to_string(), "robot");
        assert_eq!(WorkerRole::PlasticWorker.to_string(), "plastic worker");
    }
}
