//! Scoring module - points, combo bonus, level progression, accuracy
//!
//! All functions here are pure. Fractional multipliers are evaluated in `f64`
//! and floored, so `1.5x` of an odd value rounds down.

use crate::types::{COMBO_BONUS_THRESHOLD, COMBO_MILESTONE_STEP, LEVEL_UP_EVERY};

/// Points awarded for one correct sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortAward {
    /// The item's display points before any bonus.
    pub base: u32,
    /// Whether the combo multiplier applied.
    pub combo_applied: bool,
    /// Whether double points applied.
    pub doubled: bool,
    pub total: u32,
}

/// Combo multiplier: `1 + combo * 0.1` from a combo of 5, else `1`.
pub fn combo_multiplier(combo: u32) -> f64 {
    if combo >= COMBO_BONUS_THRESHOLD {
        1.0 + combo as f64 * 0.1
    } else {
        1.0
    }
}

/// Level-scaled reward: `floor(base * (1 + (level - 1) * 0.1))`.
///
/// Level 0 is treated as level 1.
pub fn display_points(base_points: u32, level: u32) -> u32 {
    let steps = level.max(1) - 1;
    (base_points as f64 * (1.0 + steps as f64 * 0.1)).floor() as u32
}

/// Fraction of correct sorts, `0.0` when nothing was sorted.
pub fn accuracy(correct: u32, incorrect: u32) -> f64 {
    let total = (correct as u64 + incorrect as u64).max(1);
    correct as f64 / total as f64
}

/// Accuracy as a whole percentage, rounded.
pub fn accuracy_percent(correct: u32, incorrect: u32) -> u32 {
    (accuracy(correct, incorrect) * 100.0).round() as u32
}

/// Points for a correct sort at the given (already incremented) combo.
pub fn award_points(display_points: u32, combo: u32, double_points: bool) -> SortAward {
    let combo_applied = combo >= COMBO_BONUS_THRESHOLD;
    let mut total = if combo_applied {
        (display_points as f64 * combo_multiplier(combo)).floor() as u32
    } else {
        display_points
    };
    if double_points {
        total = total.saturating_mul(2);
    }

    SortAward {
        base: display_points,
        combo_applied,
        doubled: double_points,
        total,
    }
}

/// Whether a combo value should announce a milestone.
pub fn is_combo_milestone(combo: u32) -> bool {
    combo > 0 && combo % COMBO_MILESTONE_STEP == 0
}

/// Whether the cumulative sorted count just reached a level-up boundary.
pub fn level_up_due(items_sorted: u32) -> bool {
    items_sorted > 0 && items_sorted % LEVEL_UP_EVERY == 0
}
