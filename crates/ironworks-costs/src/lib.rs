//! Cost oracle for the Ironworks economy.
//!
//! A pure, stateless lookup service: item kind to unit price, item kind to
//! the worker role that produces it, and role to salary. Prices are fixed
//! for the duration of a run; agents consult the oracle at the moment of a
//! trade or production step and never cache the answer.
//!
//! The oracle is a trait rather than free functions so that tests can
//! substitute arbitrary price tables without touching agent code. The
//! production table lives in [`StandardCosts`].

use ironworks_types::{ItemKind, WorkerRole};

// ---------------------------------------------------------------------------
// Oracle contract
// ---------------------------------------------------------------------------

/// Pure lookup of prices and wages.
///
/// Implementations must be side-effect free and return the same answers for
/// the whole run. All agents in one economy share a single oracle instance.
pub trait CostOracle: Send + Sync {
    /// The sale price of one unit of `kind`.
    fn unit_cost(&self, kind: ItemKind) -> i64;

    /// The worker role that produces `kind`.
    fn producer_role(&self, kind: ItemKind) -> WorkerRole;

    /// The salary paid for one production step performed by `role`.
    fn salary(&self, role: WorkerRole) -> i64;

    /// Convenience: the labor cost of producing one unit of `kind`.
    fn labor_cost(&self, kind: ItemKind) -> i64 {
        self.salary(self.producer_role(kind))
    }
}

// ---------------------------------------------------------------------------
// Standard table
// ---------------------------------------------------------------------------

/// The fixed production-run cost table.
///
/// Manufactured goods price above the sum of their inputs plus labor, so a
/// well-supplied factory is profitable; raw goods price above the miner's
/// salary so extractors self-sustain once they are selling.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCosts;

impl CostOracle for StandardCosts {
    fn unit_cost(&self, kind: ItemKind) -> i64 {
        match kind {
            ItemKind::Sand => 120,
            ItemKind::Copper => 170,
            ItemKind::Petrol => 150,
            ItemKind::Plastic => 280,
            ItemKind::Chip => 440,
            ItemKind::Robot => 990,
        }
    }

    fn producer_role(&self, kind: ItemKind) -> WorkerRole {
        match kind {
            ItemKind::Sand | ItemKind::Copper | ItemKind::Petrol => WorkerRole::Miner,
            ItemKind::Plastic => WorkerRole::PlasticWorker,
            ItemKind::Chip => WorkerRole::Technician,
            ItemKind::Robot => WorkerRole::Engineer,
        }
    }

    fn salary(&self, role: WorkerRole) -> i64 {
        match role {
            WorkerRole::Miner => 60,
            WorkerRole::PlasticWorker => 80,
            WorkerRole::Technician => 100,
            WorkerRole::Engineer => 150,
        }
    }
}
