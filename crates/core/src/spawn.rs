//! Spawn engine - weighted rarity roll, then a uniform pick within the tier
//!
//! Every spawn gets a fresh [`InstanceId`] from a process-wide counter, so
//! two copies of the same definition on screen stay independently
//! selectable, and ids never repeat across sessions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::catalog::{Catalog, ItemDefinition};
use crate::rng::SimpleRng;
use crate::scoring::display_points;
use crate::types::{Category, InstanceId, Rarity, RARITY_ROLL_MAX, RARITY_THRESHOLDS};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

fn next_instance_id() -> InstanceId {
    InstanceId(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
}

/// An item on screen: a definition plus its level-scaled reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SpawnedItem {
    pub def: ItemDefinition,
    pub display_points: u32,
    pub instance_id: InstanceId,
}

impl SpawnedItem {
    pub fn category(&self) -> Category {
        self.def.category
    }

    pub fn name(&self) -> &'static str {
        self.def.name
    }

    pub fn rarity(&self) -> Rarity {
        self.def.rarity
    }
}

/// Map a roll in `[0, 100)` to a tier.
///
/// Rolls at or past the top bound land in the last (common) tier.
pub fn roll_rarity(roll: u32) -> Rarity {
    RARITY_THRESHOLDS
        .iter()
        .find(|(bound, _)| roll < *bound)
        .map(|&(_, rarity)| rarity)
        .unwrap_or(Rarity::Common)
}

/// Produces spawned items from a catalog.
#[derive(Debug, Clone)]
pub struct Spawner {
    catalog: Arc<Catalog>,
    rng: SimpleRng,
}

impl Spawner {
    pub fn new(catalog: Arc<Catalog>, seed: u32) -> Self {
        Self {
            catalog,
            rng: SimpleRng::new(seed),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Shared rng, also used for reward rolls.
    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }

    /// Spawn one item for the given level.
    pub fn spawn_item(&mut self, level: u32) -> SpawnedItem {
        let rarity = roll_rarity(self.rng.next_range(RARITY_ROLL_MAX));
        let n = self.rng.next_range(self.catalog.tier_len(rarity) as u32) as usize;
        // Catalog::new guarantees every tier is populated.
        let def = *self
            .catalog
            .tier_nth(rarity, n)
            .expect("validated catalog has items in every tier");

        SpawnedItem {
            def,
            display_points: display_points(def.base_points, level),
            instance_id: next_instance_id(),
        }
    }

    /// Spawn `count` independent items.
    pub fn spawn_initial_set(&mut self, level: u32, count: usize) -> Vec<SpawnedItem> {
        (0..count).map(|_| self.spawn_item(level)).collect()
    }
}
