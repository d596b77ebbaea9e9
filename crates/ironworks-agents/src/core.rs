//! Shared agent state and the locked primitives every agent builds on.
//!
//! [`AgentCore`] owns the single mutex guarding one agent's [`Vault`] and
//! implements the critical sections of the trading contract: atomic
//! check-and-debit, atomic sell, atomic purchase application, and
//! production crediting. Concrete agents (extractor, factory, wholesaler)
//! embed a core and add their role-specific loop on top.
//!
//! [`EconomyEnv`] bundles what every agent in one economy shares: the cost
//! oracle, the report sink, the cooperative stop flag, and pacing. The
//! bootstrap clones one env into every agent before any thread starts.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ironworks_costs::CostOracle;
use ironworks_types::{AgentId, ItemKind, Report};
use tracing::{debug, warn};

use crate::pacing::Pacing;
use crate::report::ReportSink;
use crate::vault::Vault;

// ---------------------------------------------------------------------------
// Shared environment
// ---------------------------------------------------------------------------

/// Dependencies shared by every agent in one economy.
#[derive(Clone)]
pub struct EconomyEnv {
    /// Price and wage lookup, consulted at every trade/production step.
    pub oracle: Arc<dyn CostOracle>,
    /// Presentation sink for fire-and-forget state notifications.
    pub sink: Arc<dyn ReportSink>,
    /// Cooperative stop flag, polled at the top of every run loop.
    pub stop: Arc<AtomicBool>,
    /// Wait intervals for backoff and simulated work.
    pub pacing: Pacing,
}

impl EconomyEnv {
    /// Create an environment with a fresh stop flag and standard pacing.
    pub fn new(oracle: Arc<dyn CostOracle>, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            oracle,
            sink,
            stop: Arc::new(AtomicBool::new(false)),
            pacing: Pacing::standard(),
        }
    }

    /// Replace the pacing (builder style).
    #[must_use]
    pub const fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Ask every agent sharing this environment to stop after its current
    /// iteration.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Whether a stop has been requested.
    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

impl core::fmt::Debug for EconomyEnv {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EconomyEnv")
            .field("pacing", &self.pacing)
            .field("stop", &self.stop_requested())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Agent core
// ---------------------------------------------------------------------------

/// The state every concrete agent embeds: identity, the locked vault, and
/// the shared environment.
pub struct AgentCore {
    id: AgentId,
    vault: Mutex<Vault>,
    env: EconomyEnv,
}

impl AgentCore {
    /// Create a core with a starting balance and empty inventory.
    pub fn new(env: EconomyEnv, initial_balance: i64) -> Self {
        Self {
            id: AgentId::new(),
            vault: Mutex::new(Vault::new(initial_balance)),
            env,
        }
    }

    /// This agent's identifier.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// The shared environment.
    pub const fn env(&self) -> &EconomyEnv {
        &self.env
    }

    /// Whether the economy-wide stop flag is set.
    pub fn stop_requested(&self) -> bool {
        self.env.stop_requested()
    }

    /// Acquire this agent's vault lock.
    ///
    /// A poisoned lock is recovered rather than propagated: the vault
    /// never holds torn state because every mutation is a completed
    /// checked operation.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Vault> {
        self.vault.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current balance (own lock, released immediately).
    pub fn balance(&self) -> i64 {
        self.lock().balance()
    }

    /// Current inventory snapshot (own lock, released immediately).
    pub fn stock(&self) -> BTreeMap<ItemKind, u32> {
        self.lock().snapshot()
    }

    /// Completed production steps so far.
    pub fn produced(&self) -> u64 {
        self.lock().produced()
    }

    // -----------------------------------------------------------------------
    // Contract primitives
    // -----------------------------------------------------------------------

    /// Snapshot of sellable stock: one entry per sellable kind, including
    /// kinds currently at zero.
    pub fn snapshot_for_sale(&self, sellable: &[ItemKind]) -> BTreeMap<ItemKind, u32> {
        let vault = self.lock();
        sellable
            .iter()
            .map(|kind| (*kind, vault.quantity(*kind)))
            .collect()
    }

    /// Sell `qty` units of `kind` to a calling peer.
    ///
    /// Preconditions are checked atomically under this agent's lock:
    /// `qty > 0`, `kind` in `sellable`, and stock at least `qty`. On
    /// success the stock is debited and the balance credited in the same
    /// critical section, and the amount paid is returned. Any unmet
    /// precondition returns 0 with no state change. The sale notification
    /// goes to the sink after the lock is released.
    pub fn sell(&self, kind: ItemKind, qty: u32, sellable: &[ItemKind]) -> i64 {
        if qty == 0 || !sellable.contains(&kind) {
            return 0;
        }
        let Some(price) = self.env.oracle.unit_cost(kind).checked_mul(i64::from(qty)) else {
            return 0;
        };

        let (balance, stock) = {
            let mut vault = self.lock();
            if !vault.has_item(kind, qty) {
                return 0;
            }
            if vault.balance().checked_add(price).is_none() {
                return 0;
            }
            if vault.remove_item(kind, qty).is_err() || vault.credit(price).is_err() {
                return 0;
            }
            (vault.balance(), vault.snapshot())
        };

        debug!(agent = %self.id, %kind, qty, price, "sold");
        self.env.sink.publish(Report::Note {
            agent: self.id,
            message: format!("sold {qty} {kind} for {price}"),
        });
        self.env.sink.publish(Report::FundsChanged {
            agent: self.id,
            balance,
        });
        self.env.sink.publish(Report::StockChanged {
            agent: self.id,
            stock,
        });
        price
    }

    /// Atomically debit `cost` if the balance covers it.
    ///
    /// Returns false (no mutation) when funds are insufficient -- the
    /// normal backpressure signal, not an error.
    pub fn try_pay(&self, cost: i64) -> bool {
        let balance = {
            let mut vault = self.lock();
            if vault.balance() < cost {
                return false;
            }
            if let Err(err) = vault.debit(cost) {
                warn!(agent = %self.id, %err, "debit failed after affordability check");
                return false;
            }
            vault.balance()
        };
        self.env.sink.publish(Report::FundsChanged {
            agent: self.id,
            balance,
        });
        true
    }

    /// Credit one finished unit of `kind` and bump the production counter.
    pub fn complete_production(&self, kind: ItemKind) {
        let stock = {
            let mut vault = self.lock();
            vault.record_production();
            if let Err(err) = vault.add_item(kind, 1) {
                warn!(agent = %self.id, %err, "production credit failed");
            }
            vault.snapshot()
        };
        self.env.sink.publish(Report::StockChanged {
            agent: self.id,
            stock,
        });
    }

    /// Apply a completed purchase: credit `qty` of `kind`, debit the
    /// amount actually paid to the seller.
    ///
    /// Called only after the caller's own affordability check -- the
    /// balance cannot have dropped in between, because only this agent's
    /// thread ever debits this agent.
    pub fn apply_purchase(&self, kind: ItemKind, qty: u32, amount: i64) {
        let (balance, stock) = {
            let mut vault = self.lock();
            if let Err(err) = vault.add_item(kind, qty) {
                warn!(agent = %self.id, %err, "purchase credit failed");
                return;
            }
            if let Err(err) = vault.debit(amount) {
                warn!(agent = %self.id, %err, "purchase debit failed");
            }
            (vault.balance(), vault.snapshot())
        };
        debug!(agent = %self.id, %kind, qty, amount, "bought");
        self.env.sink.publish(Report::FundsChanged {
            agent: self.id,
            balance,
        });
        self.env.sink.publish(Report::StockChanged {
            agent: self.id,
            stock,
        });
    }

    /// Publish the current balance and inventory to the sink.
    pub fn publish_state(&self) {
        let (balance, stock) = {
            let vault = self.lock();
            (vault.balance(), vault.snapshot())
        };
        self.env.sink.publish(Report::FundsChanged {
            agent: self.id,
            balance,
        });
        self.env.sink.publish(Report::StockChanged {
            agent: self.id,
            stock,
        });
    }

    /// Publish a short human-readable event.
    pub fn note(&self, message: String) {
        self.env.sink.publish(Report::Note {
            agent: self.id,
            message,
        });
    }
}

impl core::fmt::Debug for AgentCore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AgentCore").field("id", &self.id).finish_non_exhaustive()
    }
}
