//! The vault: one agent's balance, inventory, and production counter.
//!
//! A [`Vault`] is plain data with checked arithmetic -- no silent
//! overflows, no panics. Concurrency is the owner's problem: every agent
//! wraps its vault in exactly one mutex and mutates it only while holding
//! that lock (see [`crate::core::AgentCore`]).
//!
//! Inventory invariant: every stored quantity is >= 1; entries are removed
//! when a quantity reaches zero, so a missing key reads as zero.

use std::collections::BTreeMap;

use ironworks_types::ItemKind;

use crate::error::AgentError;

/// One agent's mutable economic state.
#[derive(Debug)]
pub struct Vault {
    /// Currency held. Never observed negative outside the owning lock.
    balance: i64,
    /// Items held, keyed by kind. Zero-quantity entries are removed.
    inventory: BTreeMap<ItemKind, u32>,
    /// Number of completed extraction/build steps (wage statistics).
    produced: u64,
}

impl Vault {
    /// Create a vault with a starting balance and empty inventory.
    pub const fn new(initial_balance: i64) -> Self {
        Self {
            balance: initial_balance,
            inventory: BTreeMap::new(),
            produced: 0,
        }
    }

    /// The current balance.
    pub const fn balance(&self) -> i64 {
        self.balance
    }

    /// The number of completed production steps.
    pub const fn produced(&self) -> u64 {
        self.produced
    }

    /// The quantity held of `kind` (zero if absent).
    pub fn quantity(&self, kind: ItemKind) -> u32 {
        self.inventory.get(&kind).copied().unwrap_or(0)
    }

    /// Whether at least `amount` of `kind` is held.
    pub fn has_item(&self, kind: ItemKind, amount: u32) -> bool {
        self.quantity(kind) >= amount
    }

    /// Clone the full inventory map.
    pub fn snapshot(&self) -> BTreeMap<ItemKind, u32> {
        self.inventory.clone()
    }

    /// Add `amount` units of `kind`.
    ///
    /// Fails only on `u32` overflow of the stored quantity; the vault is
    /// unchanged on failure.
    pub fn add_item(&mut self, kind: ItemKind, amount: u32) -> Result<(), AgentError> {
        let current = self.quantity(kind);
        let updated = current
            .checked_add(amount)
            .ok_or(AgentError::StockOverflow { kind })?;
        if updated > 0 {
            self.inventory.insert(kind, updated);
        }
        Ok(())
    }

    /// Remove `amount` units of `kind`.
    ///
    /// Fails if fewer than `amount` are held; the vault is unchanged on
    /// failure. Removes the key entirely when the quantity reaches zero.
    pub fn remove_item(&mut self, kind: ItemKind, amount: u32) -> Result<(), AgentError> {
        let current = self.quantity(kind);
        if current < amount {
            return Err(AgentError::InsufficientStock {
                kind,
                requested: amount,
                available: current,
            });
        }
        let remaining = current.saturating_sub(amount);
        if remaining == 0 {
            self.inventory.remove(&kind);
        } else {
            self.inventory.insert(kind, remaining);
        }
        Ok(())
    }

    /// Credit `amount` to the balance.
    pub fn credit(&mut self, amount: i64) -> Result<(), AgentError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(AgentError::BalanceOverflow { context: "credit" })?;
        Ok(())
    }

    /// Debit `amount` from the balance.
    ///
    /// Fails if the balance would go negative; the vault is unchanged on
    /// failure. Callers check affordability under the same lock first, so
    /// a failure here indicates a locking bug upstream.
    pub fn debit(&mut self, amount: i64) -> Result<(), AgentError> {
        if self.balance < amount {
            return Err(AgentError::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(AgentError::BalanceOverflow { context: "debit" })?;
        Ok(())
    }

    /// Record one completed production step.
    pub const fn record_production(&mut self) {
        self.produced = self.produced.saturating_add(1);
    }
}
