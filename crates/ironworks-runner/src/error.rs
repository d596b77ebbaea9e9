//! Error types for the economy runner.

use ironworks_agents::AgentError;

/// Errors that can occur while bootstrapping or running an economy.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// An agent could not be constructed or wired.
    #[error("agent setup error: {0}")]
    Agent(#[from] AgentError),

    /// An agent thread could not be spawned.
    #[error("thread spawn error: {0}")]
    Spawn(#[from] std::io::Error),
}
