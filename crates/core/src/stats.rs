//! Lifetime statistics and the persistence seam.
//!
//! The core calls [`StatsStore`] at session start and end only. Stores are
//! best-effort: a failed save is the store's problem to report, never the
//! game's.

use std::sync::{Arc, Mutex};

use crate::events::GameSummary;
use crate::scoring;
use crate::types::{GameMode, SESSION_HISTORY_LIMIT};

/// Aggregate numbers kept across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Stats {
    pub games_played: u32,
    pub total_score: u64,
    pub best_score: u32,
    pub items_sorted: u32,
    pub correct_sorts: u32,
    pub incorrect_sorts: u32,
    pub streak_record: u32,
    /// Seconds of active session clock.
    pub total_play_time: u32,
    pub power_ups_used: u32,
}

impl Stats {
    pub fn accuracy(&self) -> f64 {
        scoring::accuracy(self.correct_sorts, self.incorrect_sorts)
    }

    pub fn impact(&self) -> Impact {
        Impact::from_items_sorted(self.items_sorted)
    }
}

/// Rough real-world equivalent of the items sorted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Impact {
    pub co2_kg: f64,
    pub water_litres: f64,
    pub energy_kwh: f64,
    pub trees: f64,
}

impl Impact {
    pub fn from_items_sorted(items: u32) -> Self {
        let n = items as f64;
        Self {
            co2_kg: n * 0.12,
            water_litres: n * 2.8,
            energy_kwh: n * 0.6,
            trees: n * 0.025,
        }
    }
}

/// One finished session, as kept in the history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SessionRecord {
    pub mode: GameMode,
    pub score: u32,
    pub level: u32,
    pub max_combo: u32,
    /// Accuracy over this session's sorts.
    pub accuracy: f64,
    pub correct_sorts: u32,
    pub incorrect_sorts: u32,
}

impl From<&GameSummary> for SessionRecord {
    fn from(s: &GameSummary) -> Self {
        Self {
            mode: s.mode,
            score: s.score,
            level: s.level,
            max_combo: s.max_combo,
            accuracy: s.session_accuracy,
            correct_sorts: s.correct_sorts,
            incorrect_sorts: s.incorrect_sorts,
        }
    }
}

/// Persistence collaborator.
pub trait StatsStore {
    fn load_stats(&self) -> Stats;

    fn save_stats(&mut self, stats: &Stats);

    /// Append a finished session to the history.
    fn record_session(&mut self, _record: &SessionRecord) {}

    /// Most recent sessions first.
    fn recent_sessions(&self, _limit: usize) -> Vec<SessionRecord> {
        Vec::new()
    }
}

impl<S: StatsStore + ?Sized> StatsStore for Box<S> {
    fn load_stats(&self) -> Stats {
        (**self).load_stats()
    }

    fn save_stats(&mut self, stats: &Stats) {
        (**self).save_stats(stats)
    }

    fn record_session(&mut self, record: &SessionRecord) {
        (**self).record_session(record)
    }

    fn recent_sessions(&self, limit: usize) -> Vec<SessionRecord> {
        (**self).recent_sessions(limit)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    stats: Stats,
    sessions: Vec<SessionRecord>,
    saves: u32,
}

/// In-memory store. Clones share the same data, so a test can keep a handle
/// and inspect what the game saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stats(stats: Stats) -> Self {
        let store = Self::new();
        store.lock().stats = stats;
        store
    }

    /// Number of `save_stats` calls so far.
    pub fn save_count(&self) -> u32 {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A panic while holding the lock leaves plain data behind; keep using it.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StatsStore for MemoryStore {
    fn load_stats(&self) -> Stats {
        self.lock().stats
    }

    fn save_stats(&mut self, stats: &Stats) {
        let mut inner = self.lock();
        inner.stats = *stats;
        inner.saves += 1;
    }

    fn record_session(&mut self, record: &SessionRecord) {
        let mut inner = self.lock();
        inner.sessions.push(record.clone());
        let excess = inner.sessions.len().saturating_sub(SESSION_HISTORY_LIMIT);
        inner.sessions.drain(..excess);
    }

    fn recent_sessions(&self, limit: usize) -> Vec<SessionRecord> {
        self.lock().sessions.iter().rev().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: u32) -> SessionRecord {
        SessionRecord {
            mode: GameMode::Zen,
            score,
            level: 1,
            max_combo: 0,
            accuracy: 1.0,
            correct_sorts: 1,
            incorrect_sorts: 0,
        }
    }

    #[test]
    fn memory_store_clones_share_data() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        let stats = Stats {
            best_score: 99,
            ..Stats::default()
        };
        writer.save_stats(&stats);
        assert_eq!(store.load_stats().best_score, 99);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn history_is_capped_and_newest_first() {
        let mut store = MemoryStore::new();
        for score in 0..(SESSION_HISTORY_LIMIT as u32 + 5) {
            store.record_session(&record(score));
        }
        let recent = store.recent_sessions(usize::MAX);
        assert_eq!(recent.len(), SESSION_HISTORY_LIMIT);
        assert_eq!(recent[0].score, SESSION_HISTORY_LIMIT as u32 + 4);
        assert_eq!(recent.last().unwrap().score, 5);
    }

    #[test]
    fn stats_accuracy_and_impact() {
        let stats = Stats {
            items_sorted: 100,
            correct_sorts: 75,
            incorrect_sorts: 25,
            ..Stats::default()
        };
        assert_eq!(stats.accuracy(), 0.75);
        let impact = stats.impact();
        assert!((impact.co2_kg - 12.0).abs() < 1e-9);
        assert!((impact.water_litres - 280.0).abs() < 1e-9);
        assert!((impact.energy_kwh - 60.0).abs() < 1e-9);
        assert!((impact.trees - 2.5).abs() < 1e-9);
    }
}
