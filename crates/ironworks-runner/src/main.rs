//! Entry point for the Ironworks economy runner.
//!
//! Wires a complete economy from environment configuration, streams agent
//! reports over a bounded channel to a display thread, runs for the
//! configured duration, then stops every agent cooperatively and logs the
//! closing books.
//!
//! ```text
//! agent threads --> ChannelSink --> display thread --> tracing
//! ```

mod bootstrap;
mod config;
mod error;

use std::sync::Arc;
use std::thread;

use ironworks_agents::{ChannelSink, EconomyEnv, LogSink, ReportSink};
use ironworks_costs::StandardCosts;
use ironworks_types::Report;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::bootstrap::Economy;
use crate::config::RunnerConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("ironworks-runner starting");

    let config = RunnerConfig::from_env()?;
    info!(
        extractors = config.extractors,
        factories = config.factories,
        wholesalers = config.wholesalers,
        run_secs = config.run_duration.as_secs(),
        "configuration loaded"
    );

    // Agent threads push reports through a bounded channel; a dedicated
    // display thread turns them into log lines. A full channel drops
    // reports rather than slowing the economy down.
    let (tx, rx) = crossbeam_channel::bounded::<Report>(1024);
    let display = thread::Builder::new()
        .name(String::from("display"))
        .spawn(move || {
            let sink = LogSink;
            while let Ok(report) = rx.recv() {
                sink.publish(report);
            }
        })?;

    let env = EconomyEnv::new(Arc::new(StandardCosts), Arc::new(ChannelSink::new(tx)));
    let economy = Economy::build(&config, env)?;
    economy.run_for(config.run_duration)?;
    economy.log_summary();

    // Dropping the economy drops the last sender; the display thread
    // drains the channel and exits.
    drop(economy);
    if display.join().is_err() {
        anyhow::bail!("display thread panicked");
    }

    info!("ironworks-runner finished");
    Ok(())
}
