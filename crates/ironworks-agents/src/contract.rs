//! The trading contract every concrete agent implements for its peers.

use std::collections::BTreeMap;

use ironworks_types::{AgentId, ItemKind};

/// An agent that can report sellable inventory and accept trade requests.
///
/// `trade` is the push side of the economy: it is invoked from *other*
/// agents' threads and must touch nothing but the callee's own locked
/// state. The caller, on a non-zero return, debits its own balance and
/// credits its own inventory in a separate critical section -- two locks,
/// never nested, which is what rules out trade deadlock by construction.
pub trait Tradeable: Send + Sync {
    /// This agent's identifier.
    fn id(&self) -> AgentId;

    /// Snapshot of currently sellable stock, taken under the agent's own
    /// lock. Advisory only: concurrent trades may invalidate it the moment
    /// it returns.
    fn items_for_sale(&self) -> BTreeMap<ItemKind, u32>;

    /// Attempt to buy `qty` units of `kind` from this agent.
    ///
    /// Returns the amount paid (`qty * unit_cost(kind)`) on success, or 0
    /// if `qty` is zero, the kind is not sold here, or stock is short. A
    /// trade either fully succeeds or fully fails; there is no partial
    /// fill and no state change on failure.
    fn trade(&self, kind: ItemKind, qty: u32) -> i64;
}
