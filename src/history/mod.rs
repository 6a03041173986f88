//! # History Module
//!
//! Random picks that avoid repeating recent choices.
//!
//! A [`HistorySelector`] remembers, per history id, the indices it handed out
//! most recently. The window is half the length of the collection being
//! picked from, so with four sound clips the last two played are never
//! chosen again, and a collection of one item always yields that item.
//!
//! History lives in memory for the session. [`HistorySelector::save_history`]
//! writes it to the [`KeyValueStore`] as a comma-joined list of indices, and
//! [`HistorySelector::load_history`] reads it back in a later session.

use crate::random::{draw_weighted, sanitize_weight};
use crate::{
    int_list_from_csv, to_csv, KeyValueStore, KitbagResult, RandomSource, SelectorConfig,
    Weighted,
};
use std::collections::HashMap;

/// Weighted random selection with per-id pick history.
///
/// Two call sites that share a history id share one history. Give unrelated
/// collections distinct ids.
#[derive(Debug)]
pub struct HistorySelector<S, R> {
    config: SelectorConfig,
    store: S,
    rng: R,
    histories: HashMap<String, Vec<usize>>,
}

impl<S: KeyValueStore, R: RandomSource> HistorySelector<S, R> {
    /// Creates a selector with the default configuration.
    pub fn new(store: S, rng: R) -> Self {
        Self::with_config(SelectorConfig::default(), store, rng)
    }

    /// Creates a selector with an explicit configuration.
    pub fn with_config(config: SelectorConfig, store: S, rng: R) -> Self {
        Self {
            config,
            store,
            rng,
            histories: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the selector, handing back its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Indices currently remembered for `history_id`, oldest first.
    pub fn history(&self, history_id: &str) -> Option<&[usize]> {
        self.histories.get(history_id).map(Vec::as_slice)
    }

    /// Whether `history_id` is tracked in this session.
    pub fn is_tracked(&self, history_id: &str) -> bool {
        self.histories.contains_key(history_id)
    }

    /// Picks an item by weight, skipping anything picked recently under
    /// `history_id`.
    ///
    /// Returns `None` when `items` is empty or no item has a positive weight.
    ///
    /// # Examples
    ///
    /// ```
    /// use kitbag::{create_rng, HistorySelector, MemoryStore, WeightedKey};
    ///
    /// let music = vec![
    ///     WeightedKey::new("calm", 1.0),
    ///     WeightedKey::new("tense", 1.0),
    /// ];
    /// let mut selector = HistorySelector::new(MemoryStore::new(), create_rng(Some(3)));
    ///
    /// let a = selector.pick_with_history(&music, "music").unwrap().key.clone();
    /// let b = selector.pick_with_history(&music, "music").unwrap().key.clone();
    /// assert_ne!(a, b);
    /// ```
    pub fn pick_with_history<'a, T: Weighted>(
        &mut self,
        items: &'a [T],
        history_id: &str,
    ) -> Option<&'a T> {
        let weights: Vec<f32> = items.iter().map(Weighted::weight).collect();
        self.pick_index_with_history(&weights, history_id)
            .map(|index| &items[index])
    }

    /// Picks an item uniformly, skipping anything picked recently under
    /// `history_id`.
    pub fn pick_uniform_with_history<'a, T>(
        &mut self,
        items: &'a [T],
        history_id: &str,
    ) -> Option<&'a T> {
        let weights = vec![1.0; items.len()];
        self.pick_index_with_history(&weights, history_id)
            .map(|index| &items[index])
    }

    /// Index-level form of [`pick_with_history`](Self::pick_with_history).
    ///
    /// The draw gives each eligible index the half-open interval
    /// `[sum, sum + weight)` over a uniform value in `[0, total)`. If every
    /// eligible index has zero weight the history is ignored for this draw
    /// and the full set is used instead.
    pub fn pick_index_with_history(&mut self, weights: &[f32], history_id: &str) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let window = self.config.window_for(weights.len());
        self.ensure_tracked(history_id);
        let history = self.histories.entry(history_id.to_string()).or_default();
        truncate_oldest(history, window);

        let eligible = |i: usize| {
            if history.contains(&i) {
                0.0
            } else {
                weights[i]
            }
        };

        let chosen = match draw_weighted(weights.len(), eligible, &mut self.rng) {
            Some(index) => index,
            None => {
                if weights.iter().all(|w| sanitize_weight(*w) <= 0.0) {
                    log::warn!("No positive weight to pick from for history {:?}", history_id);
                    return None;
                }
                log::debug!(
                    "History {:?} covers every weighted item, drawing from the full set",
                    history_id
                );
                draw_weighted(weights.len(), |i| weights[i], &mut self.rng)?
            }
        };

        history.push(chosen);
        truncate_oldest(history, window);
        log::debug!("Picked index {} for history {:?}", chosen, history_id);
        Some(chosen)
    }

    /// Records `item` as used without drawing.
    ///
    /// Returns `false` when `items` is empty or does not contain `item`.
    /// Otherwise the first matching index is in the history afterwards and
    /// the call returns `true`, including when it was already there.
    pub fn mark_used<T: PartialEq>(&mut self, items: &[T], item: &T, history_id: &str) -> bool {
        let Some(index) = items.iter().position(|candidate| candidate == item) else {
            return false;
        };

        self.ensure_tracked(history_id);
        let history = self.histories.entry(history_id.to_string()).or_default();
        if !history.contains(&index) {
            history.push(index);
            log::debug!("Marked index {} as used for history {:?}", index, history_id);
        }
        true
    }

    /// Writes the in-memory history for `history_id` to the store.
    ///
    /// Returns `Ok(false)` if the id is not tracked in this session. An empty
    /// history is written as an empty string.
    pub fn save_history(&mut self, history_id: &str) -> KitbagResult<bool> {
        let Some(history) = self.histories.get(history_id) else {
            return Ok(false);
        };

        let encoded = to_csv(history);
        self.store.set_string(history_id, &encoded)?;
        log::debug!("Saved history {:?} as {:?}", history_id, encoded);
        Ok(true)
    }

    /// Replaces the in-memory history for `history_id` with the stored one.
    ///
    /// A missing or malformed value gives an empty history; non-numeric and
    /// negative entries become index `0`. Returns whether the loaded history
    /// is empty.
    pub fn load_history(&mut self, history_id: &str) -> bool {
        let encoded = self.store.get_string(history_id, "");
        let history: Vec<usize> = int_list_from_csv(&encoded)
            .into_iter()
            .map(|value| usize::try_from(value).unwrap_or(0))
            .collect();

        log::debug!("Loaded history {:?} with {} entries", history_id, history.len());
        let empty = history.is_empty();
        self.histories.insert(history_id.to_string(), history);
        empty
    }

    /// Empties the history for `history_id` while keeping it tracked.
    ///
    /// Returns `false` if the id was never tracked. A later
    /// [`save_history`](Self::save_history) persists the empty history.
    pub fn clear_history(&mut self, history_id: &str) -> bool {
        match self.histories.get_mut(history_id) {
            Some(history) => {
                history.clear();
                true
            }
            None => false,
        }
    }

    /// Stops tracking `history_id` entirely. The store is not touched.
    ///
    /// Returns whether the id was tracked.
    pub fn forget_history(&mut self, history_id: &str) -> bool {
        self.histories.remove(history_id).is_some()
    }

    /// Pulls an untracked id in from the store on first use.
    fn ensure_tracked(&mut self, history_id: &str) {
        if self.config.auto_load && !self.histories.contains_key(history_id) {
            self.load_history(history_id);
        }
    }
}

fn truncate_oldest(history: &mut Vec<usize>, window: usize) {
    if history.len() > window {
        let excess = history.len() - window;
        history.drain(..excess);
    }
}
