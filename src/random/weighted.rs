//! # Weighted Keys
//!
//! Serializable key/weight records, typically authored in data files, and
//! cooldowns that make a key sit out a number of future draws.

use super::{draw_weighted, RandomSource};
use crate::{KeyValueStore, KitbagError, KitbagResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Anything that carries a draw weight.
pub trait Weighted {
    /// Relative draw weight. Zero, negative and NaN weights are never drawn.
    fn weight(&self) -> f32;
}

/// Anything identified by a string key.
pub trait Keyed {
    /// Identifier of this entry.
    fn key(&self) -> &str;
}

impl Weighted for f32 {
    fn weight(&self) -> f32 {
        *self
    }
}

/// A key with a relative draw weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedKey {
    pub key: String,
    pub weight: f32,
}

impl WeightedKey {
    /// Creates a new weighted key.
    pub fn new(key: impl Into<String>, weight: f32) -> Self {
        Self {
            key: key.into(),
            weight,
        }
    }
}

impl Default for WeightedKey {
    fn default() -> Self {
        Self {
            key: String::new(),
            weight: 1.0,
        }
    }
}

impl Weighted for WeightedKey {
    fn weight(&self) -> f32 {
        self.weight
    }
}

impl Keyed for WeightedKey {
    fn key(&self) -> &str {
        &self.key
    }
}

/// Parses `key` or `key:weight`. A bare key gets weight 1.
///
/// # Examples
///
/// ```
/// use kitbag::WeightedKey;
///
/// let key: WeightedKey = "goblin:2.5".parse().unwrap();
/// assert_eq!(key, WeightedKey::new("goblin", 2.5));
///
/// let key: WeightedKey = "rat".parse().unwrap();
/// assert_eq!(key.weight, 1.0);
/// ```
impl FromStr for WeightedKey {
    type Err = KitbagError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (key, weight) = match text.rsplit_once(':') {
            Some((key, weight)) => {
                let weight = weight.trim().parse::<f32>().map_err(|_| {
                    KitbagError::InvalidItem(format!("bad weight in {:?}", text))
                })?;
                (key.trim(), weight)
            }
            None => (text.trim(), 1.0),
        };

        if key.is_empty() {
            return Err(KitbagError::InvalidItem(format!("empty key in {:?}", text)));
        }
        if !(weight >= 0.0) {
            return Err(KitbagError::InvalidItem(format!(
                "weight must be non-negative in {:?}",
                text
            )));
        }

        Ok(Self::new(key, weight))
    }
}

/// A weighted key that sits out `cooldown` filter passes once started.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightedCooldownKey {
    #[serde(flatten)]
    pub base: WeightedKey,
    #[serde(default)]
    pub cooldown: u32,
}

impl WeightedCooldownKey {
    /// Creates a new weighted key with a cooldown.
    pub fn new(key: impl Into<String>, weight: f32, cooldown: u32) -> Self {
        Self {
            base: WeightedKey::new(key, weight),
            cooldown,
        }
    }
}

impl Weighted for WeightedCooldownKey {
    fn weight(&self) -> f32 {
        self.base.weight
    }
}

impl Keyed for WeightedCooldownKey {
    fn key(&self) -> &str {
        &self.base.key
    }
}

/// Draws one entry proportionally to its weight.
///
/// Returns `None` for an empty slice or when no weight is positive.
pub fn pick_by_weight<'a, T, R>(keys: &'a [T], rng: &mut R) -> Option<&'a T>
where
    T: Weighted,
    R: RandomSource + ?Sized,
{
    draw_weighted(keys.len(), |i| keys[i].weight(), rng).map(|i| &keys[i])
}

fn cooldown_key(prefix: &str, key: &str) -> String {
    format!("{}{}", prefix, key)
}

/// Puts `entry` on cooldown by storing its counter under `prefix + key`.
///
/// Entries with a cooldown of zero are left untouched.
pub fn start_cooldown<S>(entry: &WeightedCooldownKey, store: &mut S, prefix: &str) -> KitbagResult<()>
where
    S: KeyValueStore + ?Sized,
{
    if entry.cooldown == 0 {
        return Ok(());
    }
    let value = i32::try_from(entry.cooldown).unwrap_or(i32::MAX);
    store.set_int(&cooldown_key(prefix, entry.key()), value)
}

/// Drops entries that are still cooling down, ticking their counters.
///
/// Every entry with a non-zero `cooldown` whose stored counter is positive
/// is removed from `keys`, and the counter is decremented by one. Entries
/// without a cooldown are never touched.
///
/// On a failed write the entry being ticked and every entry after it stay
/// in `keys`, and the first error is returned.
pub fn remove_entries_on_cooldown<S>(
    keys: &mut Vec<WeightedCooldownKey>,
    store: &mut S,
    prefix: &str,
) -> KitbagResult<()>
where
    S: KeyValueStore + ?Sized,
{
    let mut failure = None;
    keys.retain(|entry| {
        if failure.is_some() || entry.cooldown == 0 {
            return true;
        }

        let store_key = cooldown_key(prefix, entry.key());
        let remaining = store.get_int(&store_key, 0);
        if remaining <= 0 {
            return true;
        }

        match store.set_int(&store_key, remaining - 1) {
            Ok(()) => {
                log::debug!("{} cooling down, {} passes left", store_key, remaining - 1);
                false
            }
            Err(e) => {
                log::warn!("Could not tick cooldown {}: {}", store_key, e);
                failure = Some(e);
                true
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::test_support::ScriptedRandom;
    use crate::MemoryStore;

    #[test]
    fn test_default_weight_is_one() {
        let key = WeightedKey::default();
        assert_eq!(key.weight, 1.0);
        assert!(key.key.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_items() {
        assert!("".parse::<WeightedKey>().is_err());
        assert!(":2".parse::<WeightedKey>().is_err());
        assert!("orc:heavy".parse::<WeightedKey>().is_err());
        assert!("orc:-1".parse::<WeightedKey>().is_err());
    }

    #[test]
    fn test_cooldown_key_serde_is_flat() -> KitbagResult<()> {
        let entry: WeightedCooldownKey =
            serde_json::from_str(r#"{ "key": "boss", "weight": 0.5, "cooldown": 3 }"#)?;
        assert_eq!(entry, WeightedCooldownKey::new("boss", 0.5, 3));

        let defaulted: WeightedCooldownKey = serde_json::from_str(r#"{ "key": "imp" }"#)?;
        assert_eq!(defaulted.weight(), 1.0);
        assert_eq!(defaulted.cooldown, 0);
        Ok(())
    }

    #[test]
    fn test_pick_by_weight_walks_cumulative() {
        let keys = vec![
            WeightedKey::new("common", 3.0),
            WeightedKey::new("never", 0.0),
            WeightedKey::new("rare", 1.0),
        ];
        let mut rng = ScriptedRandom::new(vec![0.1, 0.74, 0.75, 0.9]);
        let picked: Vec<_> = (0..4)
            .map(|_| pick_by_weight(&keys, &mut rng).unwrap().key.as_str())
            .collect();
        assert_eq!(picked, vec!["common", "common", "rare", "rare"]);
    }

    #[test]
    fn test_pick_by_weight_empty() {
        let mut rng = ScriptedRandom::new(vec![0.5]);
        let keys: Vec<WeightedKey> = Vec::new();
        assert!(pick_by_weight(&keys, &mut rng).is_none());
    }

    #[test]
    fn test_cooldown_lifecycle() -> KitbagResult<()> {
        let mut store = MemoryStore::new();
        let boss = WeightedCooldownKey::new("boss", 1.0, 2);
        let all = vec![boss.clone(), WeightedCooldownKey::new("imp", 1.0, 0)];

        start_cooldown(&boss, &mut store, "enc_")?;
        assert_eq!(store.get_int("enc_boss", 0), 2);

        // Two passes without the boss, then it comes back.
        for expected_left in [1, 0] {
            let mut keys = all.clone();
            remove_entries_on_cooldown(&mut keys, &mut store, "enc_")?;
            assert_eq!(keys.len(), 1);
            assert_eq!(keys[0].key(), "imp");
            assert_eq!(store.get_int("enc_boss", 0), expected_left);
        }

        let mut keys = all.clone();
        remove_entries_on_cooldown(&mut keys, &mut store, "enc_")?;
        assert_eq!(keys, all);
        Ok(())
    }

    #[test]
    fn test_zero_cooldown_never_stored() -> KitbagResult<()> {
        let mut store = MemoryStore::new();
        start_cooldown(&WeightedCooldownKey::new("imp", 1.0, 0), &mut store, "enc_")?;
        assert!(!store.has_key("enc_imp"));
        Ok(())
    }

    /// Reads through to a memory store, refuses every write.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get_string(&self, key: &str, default: &str) -> String {
            self.0.get_string(key, default)
        }

        fn set_string(&mut self, _key: &str, _value: &str) -> KitbagResult<()> {
            Err(KitbagError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only settings",
            )))
        }

        fn has_key(&self, key: &str) -> bool {
            self.0.has_key(key)
        }

        fn delete_key(&mut self, _key: &str) -> KitbagResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_failed_cooldown_write_keeps_entries() -> KitbagResult<()> {
        let mut inner = MemoryStore::new();
        inner.set_int("cd_b", 2)?;
        let mut store = ReadOnlyStore(inner);

        let all = vec![
            WeightedCooldownKey::new("a", 1.0, 0),
            WeightedCooldownKey::new("b", 1.0, 3),
            WeightedCooldownKey::new("c", 1.0, 0),
        ];
        let mut keys = all.clone();

        let result = remove_entries_on_cooldown(&mut keys, &mut store, "cd_");
        assert!(matches!(result, Err(KitbagError::Io(_))));
        assert_eq!(keys, all);
        assert_eq!(store.get_int("cd_b", 0), 2);
        Ok(())
    }
}
