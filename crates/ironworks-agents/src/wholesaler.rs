//! Wholesaler: a stock-keeping broker between producers and consumers.
//!
//! Sells every kind in its catalogue and buys one unit at a time from its
//! suppliers whenever a catalogue kind falls below the low-water mark. Like
//! the factory, it never holds its own lock across a peer's `trade` call.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use std::thread;

use ironworks_types::{AgentId, ItemKind};
use tracing::{debug, error};

use crate::contract::Tradeable;
use crate::core::{AgentCore, EconomyEnv};
use crate::error::AgentError;

/// Buys low, holds stock, sells to whoever asks.
pub struct Wholesaler {
    core: AgentCore,
    kinds: Vec<ItemKind>,
    suppliers: OnceLock<Vec<Arc<dyn Tradeable>>>,
    low_water: u32,
}

impl Wholesaler {
    /// Create a wholesaler trading the given catalogue of kinds, restocking
    /// any kind held below `low_water`.
    ///
    /// # Errors
    ///
    /// Fails with [`AgentError::NoTradeableKinds`] if `kinds` is empty.
    pub fn new(
        env: EconomyEnv,
        initial_balance: i64,
        kinds: Vec<ItemKind>,
        low_water: u32,
    ) -> Result<Self, AgentError> {
        if kinds.is_empty() {
            return Err(AgentError::NoTradeableKinds);
        }
        let core = AgentCore::new(env, initial_balance);
        core.note(format!("wholesaler open, {} kinds on offer", kinds.len()));
        Ok(Self {
            core,
            kinds,
            suppliers: OnceLock::new(),
            low_water,
        })
    }

    /// Wire the suppliers this wholesaler restocks from. Callable once,
    /// before the run loop starts.
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

    /// The catalogue of kinds this wholesaler trades.
    pub fn kinds(&self) -> &[ItemKind] {
        &self.kinds
    }

    /// Current balance.
    pub fn balance(&self) -> i64 {
        self.core.balance()
    }

    /// Current inventory snapshot.
    pub fn stock(&self) -> BTreeMap<ItemKind, u32> {
        self.core.stock()
    }

    /// Attempt to buy one unit of the catalogue kind furthest below the
    /// low-water mark.
    ///
    /// Returns false when every kind is at or above the mark, the unit is
    /// unaffordable, or no supplier could fill it.
    pub fn restock_once(&self) -> bool {
        let Some(suppliers) = self.suppliers.get() else {
            return false;
        };

        let wanted = {
            let vault = self.core.lock();
            let Some(kind) = self
                .kinds
                .iter()
                .copied()
                .filter(|kind| vault.quantity(*kind) < self.low_water)
                .min_by_key(|kind| vault.quantity(*kind))
            else {
                return false;
            };
            if vault.balance() < self.core.env().oracle.unit_cost(kind) {
                debug!(agent = %self.core.id(), %kind, "cannot afford restock");
                return false;
            }
            kind
        };

        // Own lock released before touching any peer.
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

    /// Run the restock loop until the economy-wide stop is requested.
    ///
    /// A wholesaler with no wired suppliers is a misconfiguration: the
    /// loop reports it and exits immediately.
    pub fn run(&self) {
        if self.suppliers.get().is_none_or(Vec::is_empty) {
            let err = AgentError::NoTradingPeers {
                agent: self.core.id(),
            };
            error!(agent = %self.core.id(), %err, "wholesaler cannot run");
            self.core.note(String::from("no suppliers wired, shutting down"));
            return;
        }
        debug!(agent = %self.core.id(), "wholesaler running");
        while !self.core.stop_requested() {
            self.restock_once();
            self.core.publish_state();
            thread::sleep(self.core.env().pacing.order_backoff);
        }
        self.core.publish_state();
        debug!(agent = %self.core.id(), "wholesaler stopped");
    }
}

impl Tradeable for Wholesaler {
    fn id(&self) -> AgentId {
        self.core.id()
    }

    fn items_for_sale(&self) -> BTreeMap<ItemKind, u32> {
        self.core.snapshot_for_sale(&self.kinds)
    }

    fn trade(&self, kind: ItemKind, qty: u32) -> i64 {
        self.core.sell(kind, qty, &self.kinds)
    }
}

impl core::fmt::Debug for Wholesaler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Wholesaler")
            .field("id", &self.core.id())
            .field("kinds", &self.kinds)
            .field("low_water", &self.low_water)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use ironworks_costs::{CostOracle, StandardCosts};

    use crate::extractor::Extractor;
    use crate::pacing::Pacing;
    use crate::report::NullSink;

    use super::*;

    fn fast_env() -> EconomyEnv {
        EconomyEnv::new(Arc::new(StandardCosts), Arc::new(NullSink)).with_pacing(Pacing::fast())
    }

    fn stocked_extractor(env: EconomyEnv, kind: ItemKind, units: u32) -> Arc<Extractor> {
        let wage = StandardCosts.labor_cost(kind);
        let extractor = Extractor::new(env, wage * i64::from(units), kind).unwrap();
        for _ in 0..units {
            assert!(extractor.extract_once());
        }
        Arc::new(extractor)
    }

    #[test]
    fn rejects_empty_catalogue() {
        let result = Wholesaler::new(fast_env(), 100, Vec::new(), 2);
        assert!(matches!(result, Err(AgentError::NoTradeableKinds)));
    }

    #[test]
    fn restocks_the_kind_furthest_below_the_mark() {
        let env = fast_env();
        let wholesaler = Wholesaler::new(
            env.clone(),
            10_000,
            vec![ItemKind::Sand, ItemKind::Copper],
            3,
        )
        .unwrap();
        let sand = stocked_extractor(env.clone(), ItemKind::Sand, 5);
        let copper = stocked_extractor(env, ItemKind::Copper, 5);
        wholesaler.set_suppliers(vec![sand, copper]).unwrap();

        // Two sand in stock, zero copper: copper is furthest below.
        wholesaler.core.apply_purchase(ItemKind::Sand, 2, 0);

        assert!(wholesaler.restock_once());
        assert_eq!(wholesaler.stock().get(&ItemKind::Copper).copied(), Some(1));
        assert_eq!(
            wholesaler.balance(),
            10_000 - StandardCosts.unit_cost(ItemKind::Copper)
        );
    }

    #[test]
    fn idle_once_every_kind_meets_the_mark() {
        let env = fast_env();
        let wholesaler = Wholesaler::new(env.clone(), 10_000, vec![ItemKind::Sand], 2).unwrap();
        let sand = stocked_extractor(env, ItemKind::Sand, 5);
        wholesaler.set_suppliers(vec![sand]).unwrap();
        wholesaler.core.apply_purchase(ItemKind::Sand, 2, 0);

        assert!(!wholesaler.restock_once());
        assert_eq!(wholesaler.stock().get(&ItemKind::Sand).copied(), Some(2));
    }

    #[test]
    fn restock_skips_when_unaffordable() {
        let env = fast_env();
        let price = StandardCosts.unit_cost(ItemKind::Sand);
        let wholesaler =
            Wholesaler::new(env.clone(), price - 1, vec![ItemKind::Sand], 2).unwrap();
        let sand = stocked_extractor(env, ItemKind::Sand, 5);
        wholesaler.set_suppliers(vec![sand]).unwrap();

        assert!(!wholesaler.restock_once());
        assert_eq!(wholesaler.balance(), price - 1);
    }

    #[test]
    fn restock_moves_money_to_the_supplier() {
        let env = fast_env();
        let wholesaler = Wholesaler::new(env.clone(), 1_000, vec![ItemKind::Petrol], 2).unwrap();
        let petrol = stocked_extractor(env, ItemKind::Petrol, 1);
        let before = petrol.balance();
        wholesaler.set_suppliers(vec![petrol.clone()]).unwrap();

        assert!(wholesaler.restock_once());

        let price = StandardCosts.unit_cost(ItemKind::Petrol);
        assert_eq!(petrol.balance(), before + price);
        assert_eq!(wholesaler.balance(), 1_000 - price);
    }

    #[test]
    fn sells_only_catalogue_kinds() {
        let env = fast_env();
        let wholesaler = Wholesaler::new(env, 0, vec![ItemKind::Chip], 2).unwrap();
        wholesaler.core.apply_purchase(ItemKind::Chip, 1, 0);

        assert_eq!(wholesaler.trade(ItemKind::Robot, 1), 0);
        assert_eq!(
            wholesaler.trade(ItemKind::Chip, 1),
            StandardCosts.unit_cost(ItemKind::Chip)
        );
    }
}
