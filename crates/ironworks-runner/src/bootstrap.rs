//! Builds the economy topology and drives its lifecycle.
//!
//! Topology, fixed before any thread starts: extractors produce the raw
//! kinds round-robin, factories build the manufactured kinds round-robin
//! and buy inputs from the wholesalers, and wholesalers stock every kind,
//! buying from extractors and factories alike.

use std::thread;
use std::time::Duration;

use ironworks_agents::{EconomyEnv, Extractor, Factory, Tradeable, Wholesaler};
use ironworks_types::ItemKind;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::RunnerConfig;
use crate::error::RunnerError;

const RAW_KINDS: [ItemKind; 3] = [ItemKind::Sand, ItemKind::Copper, ItemKind::Petrol];
const MADE_KINDS: [ItemKind; 3] = [ItemKind::Plastic, ItemKind::Chip, ItemKind::Robot];

/// A fully wired economy, ready to run.
pub struct Economy {
    env: EconomyEnv,
    extractors: Vec<Arc<Extractor>>,
    factories: Vec<Arc<Factory>>,
    wholesalers: Vec<Arc<Wholesaler>>,
}

impl Economy {
    /// Construct and wire every agent described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Agent`] if an agent rejects its construction
    /// parameters; with the fixed kind tables this indicates a bug rather
    /// than bad configuration.
    pub fn build(config: &RunnerConfig, env: EconomyEnv) -> Result<Self, RunnerError> {
        let extractors = RAW_KINDS
            .into_iter()
            .cycle()
            .take(config.extractors)
            .map(|kind| Extractor::new(env.clone(), config.extractor_funds, kind).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        let factories = MADE_KINDS
            .into_iter()
            .cycle()
            .take(config.factories)
            .map(|kind| {
                Factory::with_standard_recipe(env.clone(), config.factory_funds, kind)
                    .map(Arc::new)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let wholesalers = (0..config.wholesalers)
            .map(|_| {
                Wholesaler::new(
                    env.clone(),
                    config.wholesaler_funds,
                    ItemKind::ALL.to_vec(),
                    config.low_water,
                )
                .map(Arc::new)
            })
            .collect::<Result<Vec<Arc<Wholesaler>>, _>>()?;

        // Peer lists are fixed here, before any thread exists.
        let mut producers: Vec<Arc<dyn Tradeable>> = Vec::new();
        producers.extend(
            extractors
                .iter()
                .map(|e| Arc::clone(e) as Arc<dyn Tradeable>),
        );
        producers.extend(factories.iter().map(|f| Arc::clone(f) as Arc<dyn Tradeable>));
        for wholesaler in &wholesalers {
            wholesaler.set_suppliers(producers.clone())?;
        }

        let brokers: Vec<Arc<dyn Tradeable>> = wholesalers
            .iter()
            .map(|w| Arc::clone(w) as Arc<dyn Tradeable>)
            .collect();
        for factory in &factories {
            factory.set_suppliers(brokers.clone())?;
        }

        info!(
            extractors = extractors.len(),
            factories = factories.len(),
            wholesalers = wholesalers.len(),
            "economy wired"
        );
        Ok(Self {
            env,
            extractors,
            factories,
            wholesalers,
        })
    }

    /// The extractors, in creation order.
    pub fn extractors(&self) -> &[Arc<Extractor>] {
        &self.extractors
    }

    /// The factories, in creation order.
    pub fn factories(&self) -> &[Arc<Factory>] {
        &self.factories
    }

    /// The wholesalers, in creation order.
    pub fn wholesalers(&self) -> &[Arc<Wholesaler>] {
        &self.wholesalers
    }

    /// Spawn one thread per agent, run for `duration`, then request the
    /// cooperative stop and join every thread.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Spawn`] if the OS refuses a thread.
    pub fn run_for(&self, duration: Duration) -> Result<(), RunnerError> {
        let mut handles = Vec::new();

        for (i, extractor) in self.extractors.iter().enumerate() {
            let agent = Arc::clone(extractor);
            let handle = thread::Builder::new()
                .name(format!("extractor-{}-{i}", agent.kind()))
                .spawn(move || agent.run())?;
            handles.push(handle);
        }
        for (i, factory) in self.factories.iter().enumerate() {
            let agent = Arc::clone(factory);
            let handle = thread::Builder::new()
                .name(format!("factory-{}-{i}", agent.built_kind()))
                .spawn(move || agent.run())?;
            handles.push(handle);
        }
        for (i, wholesaler) in self.wholesalers.iter().enumerate() {
            let agent = Arc::clone(wholesaler);
            let handle = thread::Builder::new()
                .name(format!("wholesaler-{i}"))
                .spawn(move || agent.run())?;
            handles.push(handle);
        }

        info!(threads = handles.len(), ?duration, "economy running");
        thread::sleep(duration);

        self.env.request_stop();
        info!("stop requested, joining agent threads");
        for handle in handles {
            if handle.join().is_err() {
                warn!("an agent thread panicked before joining");
            }
        }
        Ok(())
    }

    /// Log each agent's closing balance, stock, and wages paid.
    pub fn log_summary(&self) {
        let mut total_balance: i64 = 0;
        let mut total_wages: i64 = 0;

        for extractor in &self.extractors {
            info!(
                agent = %extractor.id(),
                kind = %extractor.kind(),
                balance = extractor.balance(),
                extracted = extractor.produced(),
                wages = extractor.wages_paid(),
                "extractor closed"
            );
            total_balance = total_balance.saturating_add(extractor.balance());
            total_wages = total_wages.saturating_add(extractor.wages_paid());
        }
        for factory in &self.factories {
            info!(
                agent = %factory.id(),
                built = %factory.built_kind(),
                balance = factory.balance(),
                built_count = factory.produced(),
                wages = factory.wages_paid(),
                stock = ?factory.stock(),
                "factory closed"
            );
            total_balance = total_balance.saturating_add(factory.balance());
            total_wages = total_wages.saturating_add(factory.wages_paid());
        }
        for wholesaler in &self.wholesalers {
            info!(
                agent = %wholesaler.id(),
                balance = wholesaler.balance(),
                stock = ?wholesaler.stock(),
                "wholesaler closed"
            );
            total_balance = total_balance.saturating_add(wholesaler.balance());
        }

        info!(total_balance, total_wages, "books closed");
    }
}
