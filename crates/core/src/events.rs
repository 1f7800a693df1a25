//! Typed game events.
//!
//! The session records what happened as [`GameEvent`]s; audio, particles,
//! achievements and the HUD each subscribe downstream. The core never knows
//! who listens.

use crate::spawn::SpawnedItem;
use crate::stats::Stats;
use crate::types::{Category, GameMode, PowerUpKind};

/// End-of-session summary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GameSummary {
    pub score: u32,
    pub level: u32,
    pub max_combo: u32,
    /// Lifetime accuracy in `[0, 1]`, this session included.
    pub accuracy: f64,
    /// Accuracy over this session's sorts only.
    pub session_accuracy: f64,
    pub mode: GameMode,
    pub correct_sorts: u32,
    pub incorrect_sorts: u32,
    pub new_best: bool,
    /// Lifetime stats after this session was folded in.
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase"))]
pub enum GameEvent {
    SessionStart {
        mode: GameMode,
        time_remaining: Option<u32>,
    },
    ItemSelected {
        item: SpawnedItem,
    },
    CorrectSort {
        points: u32,
        item: SpawnedItem,
    },
    WrongSort {
        item: SpawnedItem,
        correct_category: Category,
    },
    LevelUp {
        new_level: u32,
    },
    ComboMilestone {
        combo: u32,
    },
    PowerUpAwarded {
        kind: PowerUpKind,
    },
    PowerUpActivated {
        kind: PowerUpKind,
    },
    PowerUpExpired {
        kind: PowerUpKind,
    },
    HintOffered {
        item: SpawnedItem,
        correct_category: Category,
    },
    TimeRemaining {
        seconds: u32,
    },
    Paused,
    Resumed,
    NewBestScore {
        score: u32,
    },
    GameOver(GameSummary),
}

impl GameEvent {
    /// Stable kebab-case name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "session-start",
            GameEvent::ItemSelected { .. } => "item-selected",
            GameEvent::CorrectSort { .. } => "correct-sort",
            GameEvent::WrongSort { .. } => "wrong-sort",
            GameEvent::LevelUp { .. } => "level-up",
            GameEvent::ComboMilestone { .. } => "combo-milestone",
            GameEvent::PowerUpAwarded { .. } => "power-up-awarded",
            GameEvent::PowerUpActivated { .. } => "power-up-activated",
            GameEvent::PowerUpExpired { .. } => "power-up-expired",
            GameEvent::HintOffered { .. } => "hint-offered",
            GameEvent::TimeRemaining { .. } => "time-remaining",
            GameEvent::Paused => "paused",
            GameEvent::Resumed => "resumed",
            GameEvent::NewBestScore { .. } => "new-best-score",
            GameEvent::GameOver(_) => "game-over",
        }
    }
}

/// Events recorded since the last drain, in emission order.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.pending.iter()
    }

    /// Take everything recorded so far.
    pub fn drain(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.pending.drain(..)
    }
}
