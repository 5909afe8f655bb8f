//! Weighted pool - Integer-weighted random selection over keyed items
//!
//! Selection draws `r` in `0..total_weight` and binary-searches the cumulative
//! weights for the first entry greater than `r`. Items with weight 0 stay in
//! the pool but own an empty interval, so they are never picked.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::random::RandomPort;

/// Largest total weight a pool can hold, bounded by the random source's range
pub const MAX_TOTAL_WEIGHT: u64 = i32::MAX as u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeightedPoolError {
    #[error("No selectable items: pool is empty or every weight is zero")]
    NoSelectableItems,
    #[error("Item not found in pool: {0}")]
    ItemNotFound(String),
    #[error("Total weight would exceed {max}")]
    TotalWeightOverflow { max: u64 },
    #[error("Duplicate item id in pool: {0}")]
    DuplicateItem(String),
}

/// An item and its selection weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedItem<T> {
    pub id: String,
    pub item: T,
    pub weight: u32,
}

impl<T> WeightedItem<T> {
    pub fn is_selectable(&self) -> bool {
        self.weight > 0
    }
}

/// Keyed collection of weighted items
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedPool<T> {
    items: Vec<WeightedItem<T>>,
    #[serde(skip)]
    cumulative: Vec<u64>,
}

impl<T> Default for WeightedPool<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cumulative: Vec::new(),
        }
    }
}

impl<T> WeightedPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from a list of items, rejecting repeated ids and
    /// totals the random source cannot cover
    pub fn from_items(items: Vec<WeightedItem<T>>) -> Result<Self, WeightedPoolError> {
        for (index, entry) in items.iter().enumerate() {
            if items[..index].iter().any(|earlier| earlier.id == entry.id) {
                return Err(WeightedPoolError::DuplicateItem(entry.id.clone()));
            }
        }
        let total: u64 = items.iter().map(|entry| u64::from(entry.weight)).sum();
        if total > MAX_TOTAL_WEIGHT {
            return Err(WeightedPoolError::TotalWeightOverflow {
                max: MAX_TOTAL_WEIGHT,
            });
        }

        let cumulative = Self::cumulative_weights(&items);
        Ok(Self { items, cumulative })
    }

    /// Add an item, replacing any existing item with the same id
    pub fn add(
        &mut self,
        id: impl Into<String>,
        item: T,
        weight: u32,
    ) -> Result<(), WeightedPoolError> {
        let id = id.into();
        let replaced = self.position(&id).map_or(0, |i| u64::from(self.items[i].weight));
        if self.total_weight() - replaced + u64::from(weight) > MAX_TOTAL_WEIGHT {
            return Err(WeightedPoolError::TotalWeightOverflow {
                max: MAX_TOTAL_WEIGHT,
            });
        }

        let entry = WeightedItem { id, item, weight };
        match self.position(&entry.id) {
            Some(index) => self.items[index] = entry,
            None => self.items.push(entry),
        }
        self.rebuild();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<WeightedItem<T>, WeightedPoolError> {
        let index = self
            .position(id)
            .ok_or_else(|| WeightedPoolError::ItemNotFound(id.to_string()))?;
        let removed = self.items.remove(index);
        self.rebuild();
        Ok(removed)
    }

    /// Change an item's weight. Setting 0 disables it without removing it.
    pub fn set_weight(&mut self, id: &str, weight: u32) -> Result<(), WeightedPoolError> {
        let index = self
            .position(id)
            .ok_or_else(|| WeightedPoolError::ItemNotFound(id.to_string()))?;
        let current = u64::from(self.items[index].weight);
        if self.total_weight() - current + u64::from(weight) > MAX_TOTAL_WEIGHT {
            return Err(WeightedPoolError::TotalWeightOverflow {
                max: MAX_TOTAL_WEIGHT,
            });
        }
        self.items[index].weight = weight;
        self.rebuild();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.cumulative.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&WeightedItem<T>> {
        self.items.iter().find(|entry| entry.id == id)
    }

    pub fn items(&self) -> &[WeightedItem<T>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.items.iter().map(|entry| u64::from(entry.weight)).sum()
    }

    pub fn selectable_count(&self) -> usize {
        self.items.iter().filter(|entry| entry.is_selectable()).count()
    }

    pub fn has_selectable_items(&self) -> bool {
        self.total_weight() > 0
    }

    /// Chance that `select` returns the item, 0 when absent
    pub fn selection_probability(&self, id: &str) -> f64 {
        let total = self.total_weight();
        match self.get(id) {
            Some(entry) if total > 0 => f64::from(entry.weight) / total as f64,
            _ => 0.0,
        }
    }

    /// Pick one item with probability proportional to its weight
    pub fn select<R: RandomPort + ?Sized>(
        &self,
        rng: &R,
    ) -> Result<&WeightedItem<T>, WeightedPoolError> {
        let total = self.total_weight();
        if total == 0 {
            return Err(WeightedPoolError::NoSelectableItems);
        }
        let max = i32::try_from(total - 1).map_err(|_| WeightedPoolError::TotalWeightOverflow {
            max: MAX_TOTAL_WEIGHT,
        })?;
        let roll = u64::try_from(rng.random_range(0, max)).unwrap_or(0);

        let index = self.cumulative.partition_point(|&c| c <= roll);
        self.items
            .get(index)
            .ok_or(WeightedPoolError::NoSelectableItems)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|entry| entry.id == id)
    }

    fn rebuild(&mut self) {
        self.cumulative = Self::cumulative_weights(&self.items);
    }

    fn cumulative_weights(items: &[WeightedItem<T>]) -> Vec<u64> {
        items
            .iter()
            .scan(0u64, |running, entry| {
                *running += u64::from(entry.weight);
                Some(*running)
            })
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeightedPoolData<T> {
    items: Vec<WeightedItem<T>>,
}

impl<'de, T> Deserialize<'de> for WeightedPool<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = WeightedPoolData::<T>::deserialize(deserializer)?;
        Self::from_items(data.items).map_err(serde::de::Error::custom)
    }
}
