//! Loot use cases: tier drops from probability tables and weighted item picks.

use std::sync::Arc;

use runeforge_domain::{DropOutcome, TierSet, WeightedItem, WeightedPool, WeightedTable};

use crate::error::EngineError;
use crate::infrastructure::ports::RandomPort;

pub struct LootService {
    random: Arc<dyn RandomPort>,
}

impl LootService {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    /// Draw once from a drop table
    pub fn roll_drop<T: TierSet>(&self, table: &WeightedTable<T>) -> DropOutcome<T> {
        let outcome = table.roll_drop(self.random.as_ref());
        match outcome {
            DropOutcome::Tier(tier) => tracing::debug!(tier = ?tier, "Loot drop"),
            DropOutcome::Nothing => tracing::debug!("Loot drop: nothing"),
        }
        outcome
    }

    /// Draw `count` times from a drop table, skipping empty draws
    pub fn roll_drops<T: TierSet>(&self, table: &WeightedTable<T>, count: usize) -> Vec<T> {
        (0..count)
            .filter_map(|_| self.roll_drop(table).tier())
            .collect()
    }

    /// Pick one item from a weighted pool
    pub fn select<'a, T>(
        &self,
        pool: &'a WeightedPool<T>,
    ) -> Result<&'a WeightedItem<T>, EngineError> {
        match pool.select(self.random.as_ref()) {
            Ok(picked) => {
                tracing::debug!(
                    item = %picked.id,
                    weight = picked.weight,
                    total_weight = pool.total_weight(),
                    "Selected weighted item"
                );
                Ok(picked)
            }
            Err(e) => {
                tracing::warn!(error = %e, pool_size = pool.len(), "Weighted selection failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::random::SeededRandom;
    use runeforge_domain::{ItemTier, ScriptedRandom, WeightedPoolError};

    fn table() -> WeightedTable<ItemTier> {
        WeightedTable::create(
            [
                (ItemTier::JuryRigged, 0.5),
                (ItemTier::Scavenged, 0.3),
                (ItemTier::ClanForged, 0.1),
            ],
            0.1,
        )
        .expect("valid table")
    }

    #[test]
    fn test_roll_drop_uses_injected_random() {
        let loot = LootService::new(Arc::new(ScriptedRandom::with_floats([0.1, 0.6, 0.85, 0.95])));
        let table = table();
        assert_eq!(loot.roll_drop(&table), DropOutcome::Tier(ItemTier::JuryRigged));
        assert_eq!(loot.roll_drop(&table), DropOutcome::Tier(ItemTier::Scavenged));
        assert_eq!(loot.roll_drop(&table), DropOutcome::Tier(ItemTier::ClanForged));
        assert_eq!(loot.roll_drop(&table), DropOutcome::Nothing);
    }

    #[test]
    fn test_roll_drops_skips_nothing() {
        let loot = LootService::new(Arc::new(ScriptedRandom::with_floats([0.95, 0.2, 0.99])));
        assert_eq!(loot.roll_drops(&table(), 3), vec![ItemTier::JuryRigged]);
    }

    #[test]
    fn test_select_from_pool() {
        let mut pool = WeightedPool::new();
        pool.add("scrap", "Scrap Metal", 3).expect("add");
        pool.add("gear", "Clockwork Gear", 1).expect("add");

        let loot = LootService::new(Arc::new(ScriptedRandom::with_ints([3])));
        assert_eq!(loot.select(&pool).expect("select").id, "gear");
    }

    #[test]
    fn test_select_from_empty_pool_fails() {
        let loot = LootService::new(Arc::new(SeededRandom::new(1)));
        let pool: WeightedPool<String> = WeightedPool::new();
        assert!(matches!(
            loot.select(&pool),
            Err(EngineError::WeightedPool(WeightedPoolError::NoSelectableItems))
        ));
    }
}
