//! Extractor: pays a worker, waits out the dig, banks one raw unit.
//!
//! The extractor sits at the bottom of the supply chain. It never buys
//! from anyone; its only funding after the initial stake comes from
//! wholesalers calling [`Tradeable::trade`] on it.

use std::collections::BTreeMap;
use std::thread;

use ironworks_types::{AgentId, ItemKind};
use tracing::debug;

use crate::contract::Tradeable;
use crate::core::{AgentCore, EconomyEnv};
use crate::error::AgentError;

/// Produces one kind of raw material for a per-unit worker wage.
pub struct Extractor {
    core: AgentCore,
    kind: ItemKind,
}

impl Extractor {
    /// Create an extractor for a raw material.
    ///
    /// # Errors
    ///
    /// Fails with [`AgentError::WrongTier`] if `kind` is a manufactured
    /// good.
    pub fn new(env: EconomyEnv, initial_balance: i64, kind: ItemKind) -> Result<Self, AgentError> {
        if !kind.is_raw() {
            return Err(AgentError::WrongTier {
                kind,
                expected: "a raw material",
            });
        }
        let core = AgentCore::new(env, initial_balance);
        core.note(format!("extractor open for {kind}"));
        Ok(Self { core, kind })
    }

    /// The raw material this extractor produces.
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Current balance.
    pub fn balance(&self) -> i64 {
        self.core.balance()
    }

    /// Units extracted so far.
    pub fn produced(&self) -> u64 {
        self.core.produced()
    }

    /// Total wages paid out, derived from the production counter.
    pub fn wages_paid(&self) -> i64 {
        let role = self.core.env().oracle.producer_role(self.kind);
        let salary = self.core.env().oracle.salary(role);
        i64::try_from(self.core.produced())
            .ok()
            .and_then(|count| count.checked_mul(salary))
            .unwrap_or(i64::MAX)
    }

    /// Attempt one extraction step: pay the wage, simulate the dig, bank
    /// the unit.
    ///
    /// Returns false without waiting when the balance cannot cover the
    /// wage; the caller decides how to back off.
    pub fn extract_once(&self) -> bool {
        let wage = self.core.env().oracle.labor_cost(self.kind);
        if !self.core.try_pay(wage) {
            debug!(agent = %self.core.id(), kind = %self.kind, wage, "cannot pay worker");
            return false;
        }

        // Dig time, spent holding no lock: trades keep flowing meanwhile.
        thread::sleep(self.core.env().pacing.work_delay());

        self.core.complete_production(self.kind);
        self.core.note(format!("extracted 1 {}", self.kind));
        true
    }

    /// Run the extraction loop until the economy-wide stop is requested.
    pub fn run(&self) {
        debug!(agent = %self.core.id(), kind = %self.kind, "extractor running");
        while !self.core.stop_requested() {
            if !self.extract_once() {
                thread::sleep(self.core.env().pacing.funds_backoff);
            }
        }
        self.core.publish_state();
        debug!(agent = %self.core.id(), kind = %self.kind, "extractor stopped");
    }
}

impl Tradeable for Extractor {
    fn id(&self) -> AgentId {
        self.core.id()
    }

    fn items_for_sale(&self) -> BTreeMap<ItemKind, u32> {
        self.core.snapshot_for_sale(&[self.kind])
    }

    fn trade(&self, kind: ItemKind, qty: u32) -> i64 {
        self.core.sell(kind, qty, &[self.kind])
    }
}

impl core::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Extractor")
            .field("id", &self.core.id())
            .field("kind", &self.kind)
            .finish()
    }
}
