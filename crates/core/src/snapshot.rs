//! Read-only view of a session for front-ends.
//!
//! Rendering reads a [`SessionSnapshot`] instead of borrowing the session, so
//! the session can live behind a channel. `snapshot_into` reuses the buffer.

use arrayvec::ArrayVec;

use crate::power_ups::PowerUpInventory;
use crate::spawn::SpawnedItem;
use crate::types::{GameMode, InstanceId, PowerUpKind, SessionPhase, ITEMS_ON_SCREEN};

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SessionSnapshot {
    pub mode: GameMode,
    pub phase: SessionPhase,
    pub score: u32,
    pub level: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub lives: Option<u32>,
    pub time_remaining: Option<u32>,
    pub items: ArrayVec<SpawnedItem, ITEMS_ON_SCREEN>,
    pub selected: Option<InstanceId>,
    pub active_effects: ArrayVec<PowerUpKind, 5>,
    pub inventory: PowerUpInventory,
    pub hints_visible: bool,
    /// Lifetime best, including this session once it ends.
    pub best_score: u32,
    /// Session accuracy in `[0, 1]`.
    pub accuracy: f64,
}

impl SessionSnapshot {
    pub fn is_selected(&self, item: &SpawnedItem) -> bool {
        self.selected == Some(item.instance_id)
    }

    pub fn selected_slot(&self) -> Option<usize> {
        let id = self.selected?;
        self.items.iter().position(|i| i.instance_id == id)
    }

    pub fn effect_active(&self, kind: PowerUpKind) -> bool {
        self.active_effects.contains(&kind)
    }
}
