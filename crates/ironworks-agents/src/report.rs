//! Reporting sink: fire-and-forget notifications to the presentation layer.
//!
//! The sink is an explicit dependency injected into each agent at
//! construction. The core never reads from it and never blocks on it; a
//! slow or absent display cannot stall the economy.

use crossbeam_channel::Sender;
use ironworks_types::Report;
use tracing::info;

/// Receives agent state notifications.
///
/// Implementations must not block: `publish` is called from agent threads
/// on every state-changing step, sometimes at high frequency.
pub trait ReportSink: Send + Sync {
    /// Deliver one report. Delivery failures are swallowed.
    fn publish(&self, report: Report);
}

/// Discards every report. The default for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn publish(&self, _report: Report) {}
}

/// Forwards reports to the `tracing` log stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn publish(&self, report: Report) {
        match report {
            Report::FundsChanged { agent, balance } => {
                info!(%agent, balance, "funds changed");
            }
            Report::StockChanged { agent, stock } => {
                info!(%agent, ?stock, "stock changed");
            }
            Report::Note { agent, message } => {
                info!(%agent, message, "agent event");
            }
        }
    }
}

/// Forwards reports over a bounded channel to a consumer thread.
///
/// If the channel is full or disconnected the report is dropped, keeping
/// the send non-blocking.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<Report>,
}

impl ChannelSink {
    /// Wrap a channel sender.
    pub const fn new(tx: Sender<Report>) -> Self {
        Self { tx }
    }
}

impl ReportSink for ChannelSink {
    fn publish(&self, report: Report) {
        let _ = self.tx.try_send(report);
    }
}
