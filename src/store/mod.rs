//! # Store Module
//!
//! String-keyed settings storage used to carry history and cooldowns across
//! sessions.

pub mod file;

pub use file::*;

use crate::KitbagResult;
use std::collections::HashMap;

/// A local settings store keyed by string identifiers.
///
/// Reads never fail: a missing key yields the supplied default. Writes may
/// fail when the backend touches disk.
pub trait KeyValueStore {
    /// Returns the string stored under `key`, or `default`.
    fn get_string(&self, key: &str, default: &str) -> String;

    /// Stores a string under `key`.
    fn set_string(&mut self, key: &str, value: &str) -> KitbagResult<()>;

    /// Returns whether anything is stored under `key`.
    fn has_key(&self, key: &str) -> bool;

    /// Removes `key`, returning whether it was present.
    fn delete_key(&mut self, key: &str) -> KitbagResult<bool>;

    /// Returns the integer stored under `key`, or `default` when the key is
    /// missing or does not hold an integer.
    fn get_int(&self, key: &str, default: i32) -> i32 {
        if !self.has_key(key) {
            return default;
        }
        self.get_string(key, "").trim().parse().unwrap_or(default)
    }

    /// Stores an integer under `key`.
    fn set_int(&mut self, key: &str, value: i32) -> KitbagResult<()> {
        self.set_string(key, &value.to_string())
    }
}

/// Volatile store for tests and single-session use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set_string(&mut self, key: &str, value: &str) -> KitbagResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn delete_key(&mut self, key: &str) -> KitbagResult<bool> {
        Ok(self.values.remove(key).is_some())
    }
}
