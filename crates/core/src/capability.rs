//! Capabilities attached to an agent.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// An external capability the agent may call through a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Web search.
    Search,
    /// Long-term conversation memory.
    Memory,
}

impl Capability {
    /// All known capabilities.
    pub const ALL: [Capability; 2] = [Capability::Search, Capability::Memory];

    /// The stable name of this capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which capabilities are available to an agent.
///
/// Built once while the agent is constructed and read-only afterwards.
/// Every known capability has an entry; absent ones map to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeMap<Capability, bool>);

impl Capabilities {
    /// A set with every capability unavailable.
    pub fn none() -> Self {
        Self(Capability::ALL.iter().map(|c| (*c, false)).collect())
    }

    /// Return a copy with `capability` set to `available`.
    pub fn with(mut self, capability: Capability, available: bool) -> Self {
        self.0.insert(capability, available);
        self
    }

    /// Whether `capability` is available.
    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.0.get(&capability).copied().unwrap_or(false)
    }

    /// The available capabilities, in a stable order.
    pub fn enabled(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0
            .iter()
            .filter_map(|(capability, available)| available.then_some(*capability))
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::none()
    }
}
