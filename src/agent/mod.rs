//! Discovery orchestration consumed by the conversational agent.

pub mod toolset;

pub use toolset::{DiscoveredTable, DiscoveryToolset};
