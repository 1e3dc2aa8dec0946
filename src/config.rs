//! Machine configuration.
//!
//! Bounds and bookkeeping options for one machine instance. Configurations
//! can be built in code or loaded from JSON.
//!
//! # Example
//!
//! ```rust
//! use arbor::MachineConfig;
//!
//! let config = MachineConfig::default()
//!     .with_max_chained_transitions(16)
//!     .with_history_capacity(0);
//!
//! assert_eq!(config.max_chained_transitions, 16);
//! assert_eq!(config.max_drill_depth, 64);
//!
//! let loaded = MachineConfig::from_json(r#"{ "max_drill_depth": 8 }"#).unwrap();
//! assert_eq!(loaded.max_drill_depth, 8);
//! assert_eq!(loaded.max_chained_transitions, 100);
//! ```

use serde::{Deserialize, Serialize};

/// Default bound of the pending transition loop.
pub const DEFAULT_MAX_CHAINED_TRANSITIONS: usize = 100;

/// Default bound of initial-child drilling.
pub const DEFAULT_MAX_DRILL_DEPTH: usize = 64;

/// Default number of transition records kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// Configuration of one machine instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Maximum number of transitions applied by one operation before the
    /// machine is forcibly stopped with a loop error.
    pub max_chained_transitions: usize,

    /// Maximum length of an initial-child chain.
    pub max_drill_depth: usize,

    /// Number of transition records kept; 0 disables history.
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_chained_transitions: DEFAULT_MAX_CHAINED_TRANSITIONS,
            max_drill_depth: DEFAULT_MAX_DRILL_DEPTH,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MachineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the transition chain bound.
    pub fn with_max_chained_transitions(mut self, n: usize) -> Self {
        self.max_chained_transitions = n;
        self
    }

    /// Set the drill depth bound.
    pub fn with_max_drill_depth(mut self, n: usize) -> Self {
        self.max_drill_depth = n;
        self
    }

    /// Set the history capacity.
    pub fn with_history_capacity(mut self, n: usize) -> Self {
        self.history_capacity = n;
        self
    }
}
