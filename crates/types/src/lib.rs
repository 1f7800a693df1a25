//! Core types module - shared enums and constants
//!
//! This module defines the fundamental types used throughout the game.
//! Everything here is plain data with no runtime dependencies, so it can be
//! used by the core rules, the async runtime, and the terminal front-end alike.
//!
//! # Session Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 1000 | Period of the session clock |
//! | `TIME_TRIAL_SECS` | 60 | Starting time for time trial |
//! | `BLITZ_SECS` | 30 | Starting time for blitz |
//! | `MARATHON_SECS` | 180 | Starting time for marathon |
//! | `TIME_FREEZE_MS` | 5000 | Time freeze effect duration |
//! | `DOUBLE_POINTS_MS` | 10000 | Double points effect duration |
//! | `SHOW_HINTS_MS` | 15000 | Hint reveal duration |
//! | `DELAYED_HINT_MS` | 3000 | Delay before a hint follows a wrong sort |
//!
//! # Rarity Roll
//!
//! A spawn draws a value in `[0, 100)` and maps it through cumulative
//! thresholds:
//!
//! | Tier | Roll range | Chance |
//! |------|------------|--------|
//! | Legendary | 0..1 | 1% |
//! | Epic | 1..5 | 4% |
//! | Rare | 5..15 | 10% |
//! | Uncommon | 15..40 | 25% |
//! | Common | 40..100 | 60% |
//!
//! # Examples
//!
//! ```
//! use ecosort_types::{Category, GameMode, PowerUpKind};
//!
//! assert_eq!(Category::from_str("organic"), Some(Category::Organic));
//! assert_eq!(GameMode::from_str("speed"), GameMode::Blitz);
//! assert_eq!(GameMode::Blitz.initial_time(), Some(30));
//! assert_eq!(PowerUpKind::TimeFreeze.duration_ms(), Some(5000));
//! assert_eq!(PowerUpKind::SkipItem.duration_ms(), None);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of items visible at once.
pub const ITEMS_ON_SCREEN: usize = 3;

/// Session clock period in milliseconds (one tick per second).
pub const TICK_MS: u64 = 1000;

/// Starting time for time trial (seconds).
pub const TIME_TRIAL_SECS: u32 = 60;

/// Starting time for blitz (seconds).
pub const BLITZ_SECS: u32 = 30;

/// Starting time for marathon (seconds).
pub const MARATHON_SECS: u32 = 180;

/// Lives granted at the start of a survival session.
pub const SURVIVAL_LIVES: u32 = 3;

/// Time freeze effect duration.
pub const TIME_FREEZE_MS: u32 = 5_000;

/// Double points effect duration.
pub const DOUBLE_POINTS_MS: u32 = 10_000;

/// Hint reveal effect duration.
pub const SHOW_HINTS_MS: u32 = 15_000;

/// Delay between an incorrect sort and the follow-up hint.
pub const DELAYED_HINT_MS: u32 = 3_000;

/// Combo at which the combo multiplier starts applying.
pub const COMBO_BONUS_THRESHOLD: u32 = 5;

/// A combo milestone event fires at every positive multiple of this.
pub const COMBO_MILESTONE_STEP: u32 = 5;

/// Level up every N cumulative sorted items.
pub const LEVEL_UP_EVERY: u32 = 10;

/// Upper bound (exclusive) of the rarity roll.
pub const RARITY_ROLL_MAX: u32 = 100;

/// Cumulative exclusive upper bounds of the rarity roll, rarest first.
pub const RARITY_THRESHOLDS: [(u32, Rarity); 5] = [
    (1, Rarity::Legendary),
    (5, Rarity::Epic),
    (15, Rarity::Rare),
    (40, Rarity::Uncommon),
    (100, Rarity::Common),
];

/// Number of session records kept by the history store.
pub const SESSION_HISTORY_LIMIT: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(TICK_MS, 1000);
        assert_eq!(TIME_FREEZE_MS, 5000);
        assert_eq!(DOUBLE_POINTS_MS, 10_000);
        assert_eq!(SHOW_HINTS_MS, 15_000);
        assert_eq!(DELAYED_HINT_MS, 3000);
    }

    #[test]
    fn rarity_thresholds_cover_the_roll() {
        let mut prev = 0;
        for (bound, _) in RARITY_THRESHOLDS {
            assert!(bound > prev);
            prev = bound;
        }
        assert_eq!(prev, RARITY_ROLL_MAX);
    }

    #[test]
    fn mode_table() {
        assert_eq!(GameMode::TimeTrial.initial_time(), Some(60));
        assert_eq!(GameMode::Blitz.initial_time(), Some(30));
        assert_eq!(GameMode::Marathon.initial_time(), Some(180));
        assert_eq!(GameMode::Zen.initial_time(), None);
        assert_eq!(GameMode::Survival.initial_time(), None);

        assert_eq!(GameMode::Survival.initial_lives(), Some(3));
        assert_eq!(GameMode::TimeTrial.initial_lives(), None);
    }

    #[test]
    fn mode_aliases() {
        assert_eq!(GameMode::from_str("normal"), GameMode::TimeTrial);
        assert_eq!(GameMode::from_str("SPEED"), GameMode::Blitz);
        assert_eq!(GameMode::from_str("zen"), GameMode::Zen);
        assert_eq!(GameMode::from_str("precision"), GameMode::TimeTrial);
    }

    #[test]
    fn power_up_names_round_trip() {
        for kind in PowerUpKind::ALL {
            assert_eq!(PowerUpKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(PowerUpKind::from_str("nope"), None);
    }
}

/// The three bins an item can be sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    Organic,
    Recyclable,
    Hazardous,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Organic, Category::Recyclable, Category::Hazardous];

    /// Parse category from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use ecosort_types::Category;
    ///
    /// assert_eq!(Category::from_str("Hazardous"), Some(Category::Hazardous));
    /// assert_eq!(Category::from_str("glass"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "organic" => Some(Category::Organic),
            "recyclable" => Some(Category::Recyclable),
            "hazardous" => Some(Category::Hazardous),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Organic => "organic",
            Category::Recyclable => "recyclable",
            Category::Hazardous => "hazardous",
        }
    }

    /// Human-readable bin name.
    pub fn bin_name(&self) -> &'static str {
        match self {
            Category::Organic => "Organic Waste",
            Category::Recyclable => "Recyclable",
            Category::Hazardous => "Hazardous Waste",
        }
    }

    /// Keyboard shortcut for the bin.
    pub fn shortcut(&self) -> char {
        match self {
            Category::Organic => 'Q',
            Category::Recyclable => 'W',
            Category::Hazardous => 'E',
        }
    }
}

/// Rarity tier governing spawn probability and reward scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Dense index, usable for per-tier tables.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// Consumable modifiers.
///
/// - **TimeFreeze**, **DoublePoints**, **ShowHints**: timed effects
/// - **SkipItem**, **ExtraLife**: one-shot, applied immediately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum PowerUpKind {
    TimeFreeze,
    DoublePoints,
    ShowHints,
    SkipItem,
    ExtraLife,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::TimeFreeze,
        PowerUpKind::DoublePoints,
        PowerUpKind::ShowHints,
        PowerUpKind::SkipItem,
        PowerUpKind::ExtraLife,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Effect duration for timed kinds, `None` for one-shot kinds.
    pub fn duration_ms(&self) -> Option<u32> {
        match self {
            PowerUpKind::TimeFreeze => Some(TIME_FREEZE_MS),
            PowerUpKind::DoublePoints => Some(DOUBLE_POINTS_MS),
            PowerUpKind::ShowHints => Some(SHOW_HINTS_MS),
            PowerUpKind::SkipItem | PowerUpKind::ExtraLife => None,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "timefreeze" => Some(PowerUpKind::TimeFreeze),
            "doublepoints" => Some(PowerUpKind::DoublePoints),
            "showhints" => Some(PowerUpKind::ShowHints),
            "skipitem" => Some(PowerUpKind::SkipItem),
            "extralife" => Some(PowerUpKind::ExtraLife),
            _ => None,
        }
    }

    /// camelCase name, as used in event payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::TimeFreeze => "timeFreeze",
            PowerUpKind::DoublePoints => "doublePoints",
            PowerUpKind::ShowHints => "showHints",
            PowerUpKind::SkipItem => "skipItem",
            PowerUpKind::ExtraLife => "extraLife",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PowerUpKind::TimeFreeze => "Time Freeze",
            PowerUpKind::DoublePoints => "Double Points",
            PowerUpKind::ShowHints => "Show Hints",
            PowerUpKind::SkipItem => "Skip Item",
            PowerUpKind::ExtraLife => "Extra Life",
        }
    }

    /// Keyboard shortcut for activation.
    pub fn shortcut(&self) -> char {
        match self {
            PowerUpKind::TimeFreeze => 'F',
            PowerUpKind::DoublePoints => 'D',
            PowerUpKind::ShowHints => 'H',
            PowerUpKind::SkipItem => 'S',
            PowerUpKind::ExtraLife => 'L',
        }
    }
}

/// Game modes.
///
/// Timed modes count down from [`GameMode::initial_time`]; survival ends
/// when lives run out; zen has neither clock nor lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GameMode {
    #[default]
    TimeTrial,
    Blitz,
    Marathon,
    Survival,
    Zen,
}

impl GameMode {
    pub const ALL: [GameMode; 5] = [
        GameMode::TimeTrial,
        GameMode::Blitz,
        GameMode::Marathon,
        GameMode::Survival,
        GameMode::Zen,
    ];

    /// Parse a mode name (case-insensitive).
    ///
    /// Accepts the menu aliases `normal` and `speed`. Anything unrecognised
    /// falls back to time trial.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "blitz" | "speed" => GameMode::Blitz,
            "marathon" => GameMode::Marathon,
            "survival" => GameMode::Survival,
            "zen" => GameMode::Zen,
            _ => GameMode::TimeTrial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::TimeTrial => "time_trial",
            GameMode::Blitz => "blitz",
            GameMode::Marathon => "marathon",
            GameMode::Survival => "survival",
            GameMode::Zen => "zen",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameMode::TimeTrial => "Time Trial",
            GameMode::Blitz => "Blitz",
            GameMode::Marathon => "Marathon",
            GameMode::Survival => "Survival",
            GameMode::Zen => "Zen",
        }
    }

    /// Starting clock in seconds, `None` when the mode is untimed.
    pub fn initial_time(&self) -> Option<u32> {
        match self {
            GameMode::TimeTrial => Some(TIME_TRIAL_SECS),
            GameMode::Blitz => Some(BLITZ_SECS),
            GameMode::Marathon => Some(MARATHON_SECS),
            GameMode::Survival | GameMode::Zen => None,
        }
    }

    /// Starting lives, `None` when lives are unbounded.
    pub fn initial_lives(&self) -> Option<u32> {
        match self {
            GameMode::Survival => Some(SURVIVAL_LIVES),
            _ => None,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.initial_time().is_some()
    }
}

/// Lifecycle phase of a session.
///
/// `Idle -> Active -> {Paused, Ended}`, `Paused -> {Active, Ended}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SessionPhase {
    #[default]
    Idle,
    Active,
    Paused,
    Ended,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Active => "active",
            SessionPhase::Paused => "paused",
            SessionPhase::Ended => "ended",
        }
    }
}

/// Process-unique identifier of a spawned item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct InstanceId(pub u64);

/// Player intents, as produced by the input layer.
///
/// These are the only ways a front-end asks the game to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Select the item in a visible slot (0-based)
    SelectSlot(usize),
    /// Select the first visible item
    SelectFirst,
    /// Sort the selected item into a bin
    Sort(Category),
    /// Spend one unit of a power-up
    Activate(PowerUpKind),
    /// Pause when active, resume when paused
    TogglePause,
    /// Start a fresh session in the current mode
    Restart,
    /// End the current session now
    End,
}
