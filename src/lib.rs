//! # Kitbag
//!
//! Small utilities for game code that needs "random, but not too repetitive".
//!
//! ## Architecture Overview
//!
//! - **Random**: a [`RandomSource`] abstraction plus uniform and weighted
//!   draws over slices
//! - **Weighted keys**: serializable key/weight records with optional
//!   cooldowns persisted in a settings store
//! - **History**: the [`HistorySelector`], which avoids re-picking anything
//!   chosen within the last half of the collection
//! - **Store**: the [`KeyValueStore`] settings backend used to keep history
//!   and cooldowns across sessions
//!
//! ```
//! use kitbag::{HistorySelector, MemoryStore, WeightedKey, create_rng};
//!
//! let clips = vec![
//!     WeightedKey::new("footstep_a", 1.0),
//!     WeightedKey::new("footstep_b", 1.0),
//!     WeightedKey::new("footstep_c", 2.0),
//!     WeightedKey::new("footstep_d", 1.0),
//! ];
//!
//! let mut selector = HistorySelector::new(MemoryStore::new(), create_rng(Some(7)));
//! let first = selector.pick_with_history(&clips, "footsteps").unwrap().key.clone();
//! let second = selector.pick_with_history(&clips, "footsteps").unwrap().key.clone();
//! assert_ne!(first, second);
//! ```

pub mod csv;
pub mod history;
pub mod random;
pub mod store;

pub use csv::*;
pub use history::*;
pub use random::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Core error type for the kitbag utilities.
#[derive(thiserror::Error, Debug)]
pub enum KitbagError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration values are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An item description could not be parsed
    #[error("Invalid item: {0}")]
    InvalidItem(String),
}

/// Result type used throughout the kitbag codebase.
pub type KitbagResult<T> = Result<T, KitbagError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared constants.
pub mod config {
    /// History keeps `len / DEFAULT_WINDOW_DIVISOR` recent picks
    pub const DEFAULT_WINDOW_DIVISOR: usize = 2;

    /// Separator used when history is written to a settings store
    pub const CSV_DELIMITER: char = ',';
}

/// Tunables for a [`HistorySelector`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// History window is `len / window_divisor` entries. Must be non-zero.
    pub window_divisor: usize,
    /// Load an id from the store the first time it is used in a session
    pub auto_load: bool,
}

impl SelectorConfig {
    /// Reads a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> KitbagResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: SelectorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values can drive a selector.
    pub fn validate(&self) -> KitbagResult<()> {
        if self.window_divisor == 0 {
            return Err(KitbagError::InvalidConfig(
                "window_divisor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Window length for a collection of `len` items.
    pub fn window_for(&self, len: usize) -> usize {
        len / self.window_divisor.max(1)
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            window_divisor: config::DEFAULT_WINDOW_DIVISOR,
            auto_load: true,
        }
    }
}
