//! Shared type definitions for the Ironworks economy simulation.
//!
//! This crate holds the vocabulary every other crate speaks: strongly-typed
//! agent identifiers, the item and worker-role enumerations, and the report
//! payloads handed to the presentation sink. It carries no behaviour beyond
//! trivial accessors so that the agents, costs, and runner crates can depend
//! on it without cycles.

pub mod ids;
pub mod items;
pub mod report;

pub use ids::AgentId;
pub use items::{ItemKind, WorkerRole};
pub use report::Report;
