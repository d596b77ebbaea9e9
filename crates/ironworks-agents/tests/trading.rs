//! Cross-thread trading properties.
//!
//! Everything here exercises the public API from multiple threads: trade
//! serialization on the seller's lock, all-or-nothing semantics under
//! contention, funding an idle producer through an injected sale, and a
//! short end-to-end run of a full economy.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ironworks_agents::{
    EconomyEnv, Extractor, Factory, NullSink, Pacing, Tradeable, Wholesaler,
};
use ironworks_costs::{CostOracle, StandardCosts};
use ironworks_types::{ItemKind, WorkerRole};

fn fast_env() -> EconomyEnv {
    EconomyEnv::new(Arc::new(StandardCosts), Arc::new(NullSink)).with_pacing(Pacing::fast())
}

/// A flat price table where one sale covers less than one wage, useful for
/// pinning exact balances.
#[derive(Debug, Clone, Copy)]
struct CheapOre;

impl CostOracle for CheapOre {
    fn unit_cost(&self, _kind: ItemKind) -> i64 {
        20
    }

    fn producer_role(&self, _kind: ItemKind) -> WorkerRole {
        WorkerRole::Miner
    }

    fn salary(&self, _role: WorkerRole) -> i64 {
        50
    }
}

fn extractor_with_stock(env: &EconomyEnv, kind: ItemKind, units: u32) -> Arc<Extractor> {
    let wage = env.oracle.labor_cost(kind);
    let extractor =
        Extractor::new(env.clone(), wage * i64::from(units), kind).unwrap();
    for _ in 0..units {
        assert!(extractor.extract_once());
    }
    Arc::new(extractor)
}

fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    done()
}

#[test]
fn last_unit_goes_to_exactly_one_buyer() {
    let env = fast_env();
    let price = env.oracle.unit_cost(ItemKind::Copper);
    let seller = extractor_with_stock(&env, ItemKind::Copper, 1);
    let balance_before = seller.balance();

    let mut payments = Vec::new();
    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seller = Arc::clone(&seller);
                scope.spawn(move || seller.trade(ItemKind::Copper, 1))
            })
            .collect();
        payments.extend(handles.into_iter().map(|handle| handle.join().unwrap()));
    });

    let winners = payments.iter().filter(|paid| **paid > 0).count();
    assert_eq!(winners, 1, "exactly one buyer must win the last unit");
    assert_eq!(payments.iter().sum::<i64>(), price);
    assert_eq!(seller.balance(), balance_before + price);
    assert_eq!(seller.items_for_sale().get(&ItemKind::Copper).copied(), Some(0));
}

#[test]
fn hammered_seller_accounts_for_every_unit() {
    const UNITS: u32 = 40;
    const BUYERS: usize = 6;

    let env = fast_env();
    let price = env.oracle.unit_cost(ItemKind::Sand);
    let seller = extractor_with_stock(&env, ItemKind::Sand, UNITS);
    let balance_before = seller.balance();

    let mut total_paid = 0_i64;
    let mut units_bought = 0_u32;
    thread::scope(|scope| {
        let handles: Vec<_> = (0..BUYERS)
            .map(|_| {
                let seller = Arc::clone(&seller);
                scope.spawn(move || {
                    let mut paid = 0_i64;
                    let mut bought = 0_u32;
                    for _ in 0..UNITS {
                        let amount = seller.trade(ItemKind::Sand, 1);
                        assert!(amount == 0 || amount == price);
                        if amount > 0 {
                            paid += amount;
                            bought += 1;
                        }
                    }
                    (paid, bought)
                })
            })
            .collect();
        for handle in handles {
            let (paid, bought) = handle.join().unwrap();
            total_paid += paid;
            units_bought += bought;
        }
    });

    // Every unit sold exactly once, every payment at the oracle price.
    assert_eq!(units_bought, UNITS);
    assert_eq!(total_paid, price * i64::from(UNITS));
    assert_eq!(seller.balance(), balance_before + total_paid);
    assert_eq!(seller.items_for_sale().get(&ItemKind::Sand).copied(), Some(0));
}

#[test]
fn rejected_trades_leave_no_trace() {
    let env = fast_env();
    let seller = extractor_with_stock(&env, ItemKind::Petrol, 2);
    let balance_before = seller.balance();

    assert_eq!(seller.trade(ItemKind::Petrol, 0), 0);
    assert_eq!(seller.trade(ItemKind::Sand, 1), 0);
    assert_eq!(seller.trade(ItemKind::Petrol, 3), 0);

    assert_eq!(seller.balance(), balance_before);
    assert_eq!(seller.items_for_sale().get(&ItemKind::Petrol).copied(), Some(2));
}

#[test]
fn cheap_ore_scenario_pins_exact_balances() {
    // Wage 50, price 20: extraction leaves 50, a sale tops back up to 70.
    let env = EconomyEnv::new(Arc::new(CheapOre), Arc::new(NullSink)).with_pacing(Pacing::fast());
    let extractor = Extractor::new(env, 100, ItemKind::Sand).unwrap();

    assert!(extractor.extract_once());
    assert_eq!(extractor.balance(), 50);
    assert_eq!(extractor.items_for_sale().get(&ItemKind::Sand).copied(), Some(1));

    assert_eq!(extractor.trade(ItemKind::Sand, 1), 20);
    assert_eq!(extractor.balance(), 70);
    assert_eq!(extractor.items_for_sale().get(&ItemKind::Sand).copied(), Some(0));
}

#[test]
fn broke_extractor_resumes_after_an_injected_sale() {
    let env = fast_env();
    let wage = env.oracle.labor_cost(ItemKind::Sand);
    let extractor = Arc::new(Extractor::new(env.clone(), wage, ItemKind::Sand).unwrap());

    thread::scope(|scope| {
        let runner = {
            let extractor = Arc::clone(&extractor);
            scope.spawn(move || extractor.run())
        };

        // One wage in the till: the loop extracts once, then starves.
        assert!(wait_until(Duration::from_secs(5), || extractor.produced() == 1));
        thread::sleep(Duration::from_millis(20));
        assert_eq!(extractor.produced(), 1);

        // A sale injects funds; the loop picks itself back up.
        assert!(extractor.trade(ItemKind::Sand, 1) > 0);
        assert!(wait_until(Duration::from_secs(5), || extractor.produced() >= 2));

        env.request_stop();
        runner.join().unwrap();
    });
}

#[test]
fn full_economy_runs_and_settles_its_books() {
    let env = fast_env();

    let extractors: Vec<Arc<Extractor>> = [ItemKind::Sand, ItemKind::Copper, ItemKind::Petrol]
        .into_iter()
        .map(|kind| Arc::new(Extractor::new(env.clone(), 2_000, kind).unwrap()))
        .collect();

    let factories: Vec<Arc<Factory>> = [ItemKind::Plastic, ItemKind::Chip, ItemKind::Robot]
        .into_iter()
        .map(|kind| {
            Arc::new(Factory::with_standard_recipe(env.clone(), 4_000, kind).unwrap())
        })
        .collect();

    let wholesaler = Arc::new(
        Wholesaler::new(env.clone(), 10_000, ItemKind::ALL.to_vec(), 3).unwrap(),
    );

    let mut wholesale_sources: Vec<Arc<dyn Tradeable>> = Vec::new();
    wholesale_sources.extend(extractors.iter().map(|e| Arc::clone(e) as Arc<dyn Tradeable>));
    wholesale_sources.extend(factories.iter().map(|f| Arc::clone(f) as Arc<dyn Tradeable>));
    wholesaler.set_suppliers(wholesale_sources).unwrap();
    for factory in &factories {
        factory
            .set_suppliers(vec![Arc::clone(&wholesaler) as Arc<dyn Tradeable>])
            .unwrap();
    }

    let initial_total = 3 * 2_000 + 3 * 4_000 + 10_000_i64;

    thread::scope(|scope| {
        let mut handles = Vec::new();
        for extractor in &extractors {
            let extractor = Arc::clone(extractor);
            handles.push(scope.spawn(move || extractor.run()));
        }
        for factory in &factories {
            let factory = Arc::clone(factory);
            handles.push(scope.spawn(move || factory.run()));
        }
        {
            let wholesaler = Arc::clone(&wholesaler);
            handles.push(scope.spawn(move || wholesaler.run()));
        }

        thread::sleep(Duration::from_millis(300));
        env.request_stop();
        for handle in handles {
            handle.join().unwrap();
        }
    });

    // Trades move money between agents; wages remove it from circulation.
    let wages: i64 = extractors.iter().map(|e| e.wages_paid()).sum::<i64>()
        + factories.iter().map(|f| f.wages_paid()).sum::<i64>();
    let final_total: i64 = extractors.iter().map(|e| e.balance()).sum::<i64>()
        + factories.iter().map(|f| f.balance()).sum::<i64>()
        + wholesaler.balance();

    assert_eq!(initial_total, final_total + wages);
    assert!(extractors.iter().all(|e| e.balance() >= 0));
    assert!(factories.iter().all(|f| f.balance() >= 0));
    assert!(wholesaler.balance() >= 0);

    // Something actually happened while the economy ran.
    let extracted: u64 = extractors.iter().map(|e| e.produced()).sum();
    assert!(extracted > 0, "extractors never produced");
}
