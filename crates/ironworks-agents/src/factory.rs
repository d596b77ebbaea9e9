//! Factory: consumes required inputs plus a worker wage, assembles one
//! manufactured good at a time.
//!
//! Procurement and production alternate in one loop. When every required
//! input is on hand the factory builds; otherwise it orders the most
//! starved input from its suppliers, one unit per round. The factory's own
//! lock is never held across a peer's `trade` call.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use std::thread;

use ironworks_types::{AgentId, ItemKind};
use tracing::{debug, error, warn};

use crate::contract::Tradeable;
use crate::core::{AgentCore, EconomyEnv};
use crate::error::AgentError;

/// The fixed bill of materials for a manufactured good.
///
/// Returns `None` for raw materials, which are extracted rather than
/// assembled.
pub const fn standard_recipe(built: ItemKind) -> Option<&'static [ItemKind]> {
    match built {
        ItemKind::Plastic => Some(&[ItemKind::Petrol]),
        ItemKind::Chip => Some(&[ItemKind::Sand, ItemKind::Copper]),
        ItemKind::Robot => Some(&[ItemKind::Chip, ItemKind::Plastic]),
        ItemKind::Sand | ItemKind::Copper | ItemKind::Petrol => None,
    }
}

/// Assembles one kind of manufactured good from one unit of each required
/// input.
pub struct Factory {
    core: AgentCore,
    built: ItemKind,
    requires: Vec<ItemKind>,
    suppliers: OnceLock<Vec<Arc<dyn Tradeable>>>,
}

impl Factory {
    /// Create a factory with an explicit bill of materials.
    ///
    /// # Errors
    ///
    /// Fails with [`AgentError::WrongTier`] if `built` is a raw material,
    /// or [`AgentError::EmptyBillOfMaterials`] if `requires` is empty.
    pub fn new(
        env: EconomyEnv,
        initial_balance: i64,
        built: ItemKind,
        requires: Vec<ItemKind>,
    ) -> Result<Self, AgentError> {
        if built.is_raw() {
            return Err(AgentError::WrongTier {
                kind: built,
                expected: "a manufactured good",
            });
        }
        if requires.is_empty() {
            return Err(AgentError::EmptyBillOfMaterials);
        }
        let core = AgentCore::new(env, initial_balance);
        core.note(format!("factory open for {built}"));
        Ok(Self {
            core,
            built,
            requires,
            suppliers: OnceLock::new(),
        })
    }

    /// Create a factory using the standard recipe for `built`.
    ///
    /// # Errors
    ///
    /// Fails with [`AgentError::WrongTier`] if `built` has no recipe.
    pub fn with_standard_recipe(
        env: EconomyEnv,
        initial_balance: i64,
        built: ItemKind,
    ) -> Result<Self, AgentError> {
        let requires = standard_recipe(built).ok_or(AgentError::WrongTier {
            kind: built,
            expected: "a manufactured good",
        })?;
        Self::new(env, initial_balance, built, requires.to_vec())
    }

    /// Wire the suppliers this factory orders from. Callable once, before
    /// the run loop starts.
    ///
    /// # Errors
    ///
    /// Fails with [`AgentError::PeersAlreadyWired`] on a second call.
    pub fn set_suppliers(&self, suppliers: Vec<Arc<dyn Tradeable>>) -> Result<(), AgentError> {
        self.suppliers
            .set(suppliers)
            .map_err(|_| AgentError::PeersAlreadyWired {
                agent: self.core.id(),
            })
    }

    /// The good this factory assembles.
    pub const fn built_kind(&self) -> ItemKind {
        self.built
    }

    /// The required input kinds, in procurement-preference order.
    pub fn requires(&self) -> &[ItemKind] {
        &self.requires
    }

    /// Current balance.
    pub fn balance(&self) -> i64 {
        self.core.balance()
    }

    /// Current inventory snapshot.
    pub fn stock(&self) -> BTreeMap<ItemKind, u32> {
        self.core.stock()
    }

    /// Units built so far.
    pub fn produced(&self) -> u64 {
        self.core.produced()
    }

    /// Total wages paid out, derived from the production counter.
    pub fn wages_paid(&self) -> i64 {
        let role = self.core.env().oracle.producer_role(self.built);
        let salary = self.core.env().oracle.salary(role);
        i64::try_from(self.core.produced())
            .ok()
            .and_then(|count| count.checked_mul(salary))
            .unwrap_or(i64::MAX)
    }

    /// Whether one unit of every required input is on hand.
    pub fn verify_resources(&self) -> bool {
        let vault = self.core.lock();
        self.requires.iter().all(|kind| vault.has_item(*kind, 1))
    }

    /// Attempt one build step.
    ///
    /// Funds check, input consumption, and the wage debit happen in a
    /// single critical section; the assembly delay and completion credit
    /// follow outside it. Returns false with no state change when an input
    /// or the wage is missing.
    pub fn build_item(&self) -> bool {
        let wage = self.core.env().oracle.labor_cost(self.built);
        {
            let mut vault = self.core.lock();
            if vault.balance() < wage {
                return false;
            }
            if !self.requires.iter().all(|kind| vault.has_item(*kind, 1)) {
                return false;
            }
            for kind in &self.requires {
                if let Err(err) = vault.remove_item(*kind, 1) {
                    warn!(agent = %self.core.id(), %err, "input vanished under the lock");
                    return false;
                }
            }
            if let Err(err) = vault.debit(wage) {
                warn!(agent = %self.core.id(), %err, "wage debit failed under the lock");
                return false;
            }
        }

        // Assembly time, spent holding no lock.
        thread::sleep(self.core.env().pacing.work_delay());

        self.core.complete_production(self.built);
        self.core.note(format!("built 1 {}", self.built));
        true
    }

    /// Attempt to buy one unit of the most starved required input.
    ///
    /// The starved kind is the required kind held in the lowest quantity,
    /// ties broken by recipe order. Suppliers are tried in wiring order;
    /// the first non-zero `trade` wins. Returns false when the unit is
    /// unaffordable or no supplier could fill it.
    pub fn order_resources(&self) -> bool {
        let Some(suppliers) = self.suppliers.get() else {
            return false;
        };

        let wanted = {
            let vault = self.core.lock();
            let Some(kind) = self
                .requires
                .iter()
                .copied()
                .min_by_key(|kind| vault.quantity(*kind))
            else {
                return false;
            };
            if vault.balance() < self.core.env().oracle.unit_cost(kind) {
                debug!(agent = %self.core.id(), %kind, "cannot afford input");
                return false;
            }
            kind
        };

        // Own lock released: each trade serializes on the seller's lock only.
        for supplier in suppliers {
            let paid = supplier.trade(wanted, 1);
            if paid > 0 {
                self.core.apply_purchase(wanted, 1, paid);
                return true;
            }
        }
        debug!(agent = %self.core.id(), kind = %wanted, "no supplier had stock");
        false
    }

    /// Run the build/procure loop until the economy-wide stop is requested.
    ///
    /// A factory with no wired suppliers is a misconfiguration: the loop
    /// reports it and exits immediately.
    pub fn run(&self) {
        if self.suppliers.get().is_none_or(Vec::is_empty) {
            let err = AgentError::NoTradingPeers {
                agent: self.core.id(),
            };
            error!(agent = %self.core.id(), %err, "factory cannot run");
            self.core.note(String::from("no suppliers wired, shutting down"));
            return;
        }
        debug!(agent = %self.core.id(), built = %self.built, "factory running");
        while !self.core.stop_requested() {
            if self.verify_resources() {
                if !self.build_item() {
                    thread::sleep(self.core.env().pacing.funds_backoff);
                }
            } else {
                self.order_resources();
                thread::sleep(self.core.env().pacing.order_backoff);
            }
            self.core.publish_state();
        }
        self.core.publish_state();
        debug!(agent = %self.core.id(), built = %self.built, "factory stopped");
    }
}

impl Tradeable for Factory {
    fn id(&self) -> AgentId {
        self.core.id()
    }

    fn items_for_sale(&self) -> BTreeMap<ItemKind, u32> {
        self.core.snapshot_for_sale(&[self.built])
    }

    fn trade(&self, kind: ItemKind, qty: u32) -> i64 {
        self.core.sell(kind, qty, &[self.built])
    }
}

impl core::fmt::Debug for Factory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Factory")
            .field("id", &self.core.id())
            .field("built", &self.built)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}
